//! Grouping of a Safe's queue into nonce slots

use std::cmp::Reverse;
use std::collections::BTreeMap;

use alloy::primitives::U256;
use chrono::{DateTime, Utc};

use crate::types::QueuedTransaction;

/// Mutually exclusive alternatives competing for one nonce
///
/// Transactions are ordered newest submission first. At most one of them can
/// ever execute on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceGroup<T> {
    nonce: U256,
    transactions: Vec<T>,
}

impl<T> NonceGroup<T> {
    pub fn nonce(&self) -> U256 {
        self.nonce
    }

    pub fn transactions(&self) -> &[T] {
        &self.transactions
    }

    pub fn into_transactions(self) -> Vec<T> {
        self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// More than one alternative is queued for this nonce
    pub fn is_contested(&self) -> bool {
        self.transactions.len() > 1
    }

    /// Transforms every member while keeping the group order
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> NonceGroup<U> {
        NonceGroup {
            nonce: self.nonce,
            transactions: self.transactions.into_iter().map(f).collect(),
        }
    }
}

impl<T: QueuedTransaction> NonceGroup<T> {
    /// Submission time of the newest member
    pub fn latest_submission(&self) -> Option<DateTime<Utc>> {
        self.transactions.first().map(|tx| tx.submission_time())
    }
}

/// Partitions one Safe's transactions by nonce
///
/// Members are ordered by submission time, newest first, ties broken by id.
/// Groups are ordered for display: larger groups first, then the group with
/// the most recent activity, then ascending nonce.
pub fn group_by_nonce<T, I>(transactions: I) -> Vec<NonceGroup<T>>
where
    T: QueuedTransaction,
    I: IntoIterator<Item = T>,
{
    let mut by_nonce: BTreeMap<U256, Vec<T>> = BTreeMap::new();
    for tx in transactions {
        by_nonce.entry(tx.nonce()).or_default().push(tx);
    }

    let mut groups: Vec<NonceGroup<T>> = by_nonce
        .into_iter()
        .map(|(nonce, mut transactions)| {
            transactions.sort_by_cached_key(|tx| (Reverse(tx.submission_time()), tx.id()));
            NonceGroup {
                nonce,
                transactions,
            }
        })
        .collect();

    groups.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then_with(|| b.latest_submission().cmp(&a.latest_submission()))
            .then_with(|| a.nonce.cmp(&b.nonce))
    });

    groups
}
