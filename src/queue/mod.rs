//! Nonce grouping, readiness evaluation and presentation of a Safe's queue

mod grouping;
mod presenter;
mod readiness;

pub use grouping::{group_by_nonce, NonceGroup};
pub use presenter::{ExecutionPayload, GroupView, QueueView, TransactionView};
pub use readiness::{evaluate, ExecutionState};

use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::types::{PendingTransaction, QueuedTransaction, SafeContext, TxId};
use crate::validation::{validate, ConfirmationVerdict};

/// A pending transaction with the outcome of one evaluation pass
#[derive(Debug, Clone)]
pub struct EvaluatedTransaction {
    pub id: TxId,
    pub pending: PendingTransaction,
    /// `None` when no context was available to validate against
    pub verdict: Option<ConfirmationVerdict>,
    pub state: ExecutionState,
}

/// A Safe's queue after one evaluation pass
#[derive(Debug, Clone)]
pub struct EvaluatedQueue {
    safe: Address,
    context: Option<SafeContext>,
    groups: Vec<NonceGroup<EvaluatedTransaction>>,
}

impl EvaluatedQueue {
    pub fn safe(&self) -> Address {
        self.safe
    }

    pub fn context(&self) -> Option<&SafeContext> {
        self.context.as_ref()
    }

    /// Groups in display order
    pub fn groups(&self) -> &[NonceGroup<EvaluatedTransaction>] {
        &self.groups
    }

    pub fn transactions(&self) -> impl Iterator<Item = &EvaluatedTransaction> {
        self.groups.iter().flat_map(|group| group.transactions().iter())
    }

    pub fn state_of(&self, id: &TxId) -> Option<ExecutionState> {
        self.transactions().find(|tx| tx.id == *id).map(|tx| tx.state)
    }

    /// Payloads for every transaction that is ready to execute
    pub fn payloads(&self) -> Vec<ExecutionPayload> {
        self.transactions()
            .filter_map(|tx| {
                ExecutionPayload::for_ready(&tx.pending.transaction, tx.verdict.as_ref()?, tx.state)
            })
            .collect()
    }

    /// Display view with owner addresses only
    pub fn view(&self) -> QueueView {
        let required = self.context.as_ref().map(SafeContext::threshold);
        let owner_count = self.context.as_ref().map(|ctx| ctx.owners().len());

        let groups = self
            .groups
            .iter()
            .map(|group| GroupView {
                nonce: group.nonce(),
                contested: group.is_contested(),
                transactions: group
                    .transactions()
                    .iter()
                    .map(|evaluated| {
                        let tx = &evaluated.pending.transaction;
                        TransactionView {
                            id: evaluated.id,
                            nonce: tx.nonce,
                            to: tx.to,
                            value: tx.value,
                            operation: tx.operation,
                            submission_time: tx.submission_time,
                            state: evaluated.state,
                            signers: evaluated
                                .verdict
                                .as_ref()
                                .map(ConfirmationVerdict::signers)
                                .unwrap_or_default(),
                            required,
                            owner_count,
                            hashing_error: evaluated
                                .verdict
                                .as_ref()
                                .and_then(|verdict| verdict.digest.as_ref().err())
                                .map(ToString::to_string),
                        }
                    })
                    .collect(),
            })
            .collect();

        QueueView {
            safe: self.safe,
            current_nonce: self.context.as_ref().map(SafeContext::current_nonce),
            stale: self.context.is_none(),
            groups,
        }
    }
}

/// A pending transaction keyed by its content id, computed once
#[derive(Debug)]
struct Keyed {
    id: TxId,
    pending: PendingTransaction,
}

impl QueuedTransaction for Keyed {
    fn id(&self) -> TxId {
        self.id
    }

    fn nonce(&self) -> U256 {
        self.pending.transaction.nonce
    }

    fn submission_time(&self) -> DateTime<Utc> {
        self.pending.transaction.submission_time
    }

    fn is_executed(&self) -> bool {
        self.pending.transaction.is_executed
    }
}

/// Collapses records with identical content into one transaction
///
/// The first record wins; later ones contribute their confirmations and
/// their executed flag. Repeated owners are left to validation to discard.
fn merge_duplicates(safe: Address, pending: Vec<PendingTransaction>) -> Vec<Keyed> {
    let mut merged: Vec<Keyed> = Vec::with_capacity(pending.len());
    let mut index: HashMap<TxId, usize> = HashMap::with_capacity(pending.len());

    for p in pending {
        if p.transaction.safe_address != safe {
            warn!(%safe, other = %p.transaction.safe_address, "dropping transaction of another Safe");
            continue;
        }

        let id = p.transaction.id();
        match index.get(&id) {
            Some(&at) => {
                debug!(%id, "merging duplicate record");
                let existing = &mut merged[at].pending;
                existing.transaction.is_executed |= p.transaction.is_executed;
                existing.confirmations.extend(p.confirmations);
            }
            None => {
                index.insert(id, merged.len());
                merged.push(Keyed { id, pending: p });
            }
        }
    }

    merged
}

/// Runs the full pipeline over one Safe's pending transactions
///
/// Transactions that belong to another Safe are dropped, and records with
/// identical content are evaluated as one transaction. Passing `None` for
/// the context marks every transaction `Unknown`; nothing is offered for
/// execution in that case.
pub fn evaluate_queue(
    safe: Address,
    ctx: Option<&SafeContext>,
    pending: Vec<PendingTransaction>,
) -> EvaluatedQueue {
    let keyed = merge_duplicates(safe, pending);

    let verdicts: HashMap<TxId, ConfirmationVerdict> = match ctx {
        Some(ctx) => keyed
            .iter()
            .map(|k| (k.id, validate(&k.pending.transaction, &k.pending.confirmations, ctx)))
            .collect(),
        None => HashMap::new(),
    };

    let groups = group_by_nonce(keyed)
        .into_iter()
        .map(|group| {
            let states = evaluate(&group, ctx, &verdicts);
            group.map(|Keyed { id, pending }| {
                let state = states.get(&id).copied().unwrap_or(ExecutionState::Unknown);
                debug!(%id, nonce = %pending.transaction.nonce, %state, "evaluated");
                EvaluatedTransaction {
                    id,
                    verdict: verdicts.get(&id).cloned(),
                    pending,
                    state,
                }
            })
        })
        .collect();

    EvaluatedQueue {
        safe,
        context: ctx.cloned(),
        groups,
    }
}
