//! Read-only snapshot of a Safe's on-chain configuration

use std::collections::HashSet;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Owners, threshold, nonce and version of a Safe at one point in time
///
/// Fetched fresh for every evaluation pass and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeContext {
    address: Address,
    chain_id: u64,
    owners: Vec<Address>,
    threshold: u64,
    current_nonce: U256,
    contract_version: String,
}

impl SafeContext {
    /// Builds a snapshot, rejecting duplicate owners and thresholds outside `1..=owners`
    pub fn new(
        address: Address,
        chain_id: u64,
        owners: Vec<Address>,
        threshold: u64,
        current_nonce: U256,
        contract_version: impl Into<String>,
    ) -> Result<Self> {
        let mut seen = HashSet::with_capacity(owners.len());
        if let Some(duplicate) = owners.iter().find(|owner| !seen.insert(**owner)) {
            return Err(Error::InvalidContext(format!("duplicate owner {duplicate}")));
        }

        if threshold == 0 || threshold > owners.len() as u64 {
            return Err(Error::InvalidContext(format!(
                "threshold {threshold} outside 1..={}",
                owners.len()
            )));
        }

        Ok(Self {
            address,
            chain_id,
            owners,
            threshold,
            current_nonce,
            contract_version: contract_version.into(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Owners in the order the chain reported them
    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.owners.contains(address)
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn current_nonce(&self) -> U256 {
        self.current_nonce
    }

    pub fn contract_version(&self) -> &str {
        &self.contract_version
    }

    /// Same Safe, advanced to a newer on-chain nonce
    pub fn with_nonce(mut self, nonce: U256) -> Self {
        self.current_nonce = nonce;
        self
    }
}
