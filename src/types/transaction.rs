//! Pending Safe transactions as fetched from the transaction registry

use std::fmt;

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Confirmation, Operation};
use crate::encoding::{compute_safe_tx_hash, SafeTxLayout};

/// Content-derived identifier of a queued transaction
///
/// Independent of the contract version, so transactions that cannot be
/// hashed for signing still have a stable key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxId(pub B256);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable description of a candidate multisig transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub safe_address: Address,
    pub to: Address,
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default)]
    pub operation: Operation,
    #[serde(default)]
    pub safe_tx_gas: U256,
    #[serde(default)]
    pub base_gas: U256,
    #[serde(default)]
    pub gas_price: U256,
    /// `Address::ZERO` refunds in the native token
    #[serde(default)]
    pub gas_token: Address,
    #[serde(default)]
    pub refund_receiver: Address,
    pub nonce: U256,
    #[serde(default)]
    pub submission_time: DateTime<Utc>,
    pub chain_id: u64,
    /// Version reported alongside the transaction, if the registry knows it
    #[serde(default)]
    pub contract_version: Option<String>,
    #[serde(default)]
    pub is_executed: bool,
}

impl RawTransaction {
    /// Creates a transaction with zeroed gas/refund parameters and nonce 0
    pub fn new(
        safe_address: Address,
        chain_id: u64,
        to: Address,
        value: U256,
        data: impl Into<Bytes>,
        operation: Operation,
    ) -> Self {
        Self {
            safe_address,
            to,
            value,
            data: data.into(),
            operation,
            safe_tx_gas: U256::ZERO,
            base_gas: U256::ZERO,
            gas_price: U256::ZERO,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            nonce: U256::ZERO,
            submission_time: DateTime::<Utc>::UNIX_EPOCH,
            chain_id,
            contract_version: None,
            is_executed: false,
        }
    }

    /// Sets the nonce
    pub fn with_nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the submission time
    pub fn with_submission_time(mut self, time: DateTime<Utc>) -> Self {
        self.submission_time = time;
        self
    }

    /// Records the contract version the registry associated with the transaction
    pub fn with_contract_version(mut self, version: impl Into<String>) -> Self {
        self.contract_version = Some(version.into());
        self
    }

    /// Sets the safe transaction gas
    pub fn with_safe_tx_gas(mut self, gas: U256) -> Self {
        self.safe_tx_gas = gas;
        self
    }

    /// Marks the transaction as executed on-chain
    pub fn executed(mut self) -> Self {
        self.is_executed = true;
        self
    }

    /// keccak256(safe || chainId || structHash) with the current SafeTx layout
    pub fn id(&self) -> TxId {
        let mut encoded = Vec::with_capacity(96);

        let mut safe_bytes = [0u8; 32];
        safe_bytes[12..].copy_from_slice(self.safe_address.as_slice());
        encoded.extend_from_slice(&safe_bytes);
        encoded.extend_from_slice(&U256::from(self.chain_id).to_be_bytes::<32>());
        encoded.extend_from_slice(compute_safe_tx_hash(self, SafeTxLayout::BaseGas).as_slice());

        TxId(keccak256(&encoded))
    }
}

/// A transaction together with the confirmations submitted for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub transaction: RawTransaction,
    #[serde(default)]
    pub confirmations: Vec<Confirmation>,
}

impl PendingTransaction {
    pub fn new(transaction: RawTransaction, confirmations: Vec<Confirmation>) -> Self {
        Self {
            transaction,
            confirmations,
        }
    }
}

/// Anything that occupies a nonce slot in a Safe's queue
pub trait QueuedTransaction {
    fn id(&self) -> TxId;

    fn nonce(&self) -> U256;

    fn submission_time(&self) -> DateTime<Utc>;

    /// Whether the registry reports this transaction as executed
    fn is_executed(&self) -> bool;
}

impl<T: QueuedTransaction + ?Sized> QueuedTransaction for &T {
    fn id(&self) -> TxId {
        (**self).id()
    }

    fn nonce(&self) -> U256 {
        (**self).nonce()
    }

    fn submission_time(&self) -> DateTime<Utc> {
        (**self).submission_time()
    }

    fn is_executed(&self) -> bool {
        (**self).is_executed()
    }
}

impl QueuedTransaction for RawTransaction {
    fn id(&self) -> TxId {
        RawTransaction::id(self)
    }

    fn nonce(&self) -> U256 {
        self.nonce
    }

    fn submission_time(&self) -> DateTime<Utc> {
        self.submission_time
    }

    fn is_executed(&self) -> bool {
        self.is_executed
    }
}

impl QueuedTransaction for PendingTransaction {
    fn id(&self) -> TxId {
        self.transaction.id()
    }

    fn nonce(&self) -> U256 {
        self.transaction.nonce
    }

    fn submission_time(&self) -> DateTime<Utc> {
        self.transaction.submission_time
    }

    fn is_executed(&self) -> bool {
        self.transaction.is_executed
    }
}
