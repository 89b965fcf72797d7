//! Execution readiness of queued transactions

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::grouping::NonceGroup;
use crate::types::{QueuedTransaction, SafeContext, TxId};
use crate::validation::ConfirmationVerdict;

/// Lifecycle state of a queued transaction for one evaluation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    /// Fewer valid confirmations than the threshold
    Pending,
    /// Quorum reached and the nonce is the Safe's current nonce
    Ready,
    /// Quorum reached but not this transaction's turn
    Blocked,
    /// Its nonce has been consumed by another transaction
    Superseded,
    /// Reported executed by the registry
    Executed,
    /// No Safe context was available for this pass
    Unknown,
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionState::Superseded | ExecutionState::Executed)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionState::Pending => "pending",
            ExecutionState::Ready => "ready",
            ExecutionState::Blocked => "blocked",
            ExecutionState::Superseded => "superseded",
            ExecutionState::Executed => "executed",
            ExecutionState::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Assigns a state to every member of a nonce group
///
/// - Without a context every member is `Unknown`.
/// - A member the registry reports executed is `Executed`, and all of its
///   siblings are `Superseded`.
/// - Members whose nonce is below the current on-chain nonce are `Superseded`.
/// - A member without quorum, or without a verdict, is `Pending`.
/// - The first member in group order with quorum at the current nonce is
///   `Ready`; every other member with quorum is `Blocked`.
pub fn evaluate<T: QueuedTransaction>(
    group: &NonceGroup<T>,
    ctx: Option<&SafeContext>,
    verdicts: &HashMap<TxId, ConfirmationVerdict>,
) -> HashMap<TxId, ExecutionState> {
    let Some(ctx) = ctx else {
        warn!(nonce = %group.nonce(), "no Safe context, readiness unknown");
        return group
            .transactions()
            .iter()
            .map(|tx| (tx.id(), ExecutionState::Unknown))
            .collect();
    };

    let nonce = group.nonce();
    let sibling_executed = group.transactions().iter().any(|tx| tx.is_executed());
    let nonce_consumed = nonce < ctx.current_nonce();
    let mut ready_assigned = false;

    group
        .transactions()
        .iter()
        .map(|tx| {
            let id = tx.id();

            let state = if tx.is_executed() {
                ExecutionState::Executed
            } else if sibling_executed || nonce_consumed {
                ExecutionState::Superseded
            } else if !verdicts.get(&id).is_some_and(|verdict| verdict.quorum_met) {
                ExecutionState::Pending
            } else if nonce == ctx.current_nonce() && !ready_assigned {
                ready_assigned = true;
                ExecutionState::Ready
            } else {
                ExecutionState::Blocked
            };

            (id, state)
        })
        .collect()
}
