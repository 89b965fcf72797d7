//! Display and transport views of an evaluated queue

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::readiness::ExecutionState;
use crate::contracts::ISafe;
use crate::signing::normalize_signature;
use crate::types::{Operation, RawTransaction, TxId};
use crate::validation::ConfirmationVerdict;

/// One transaction as the display layer sees it
///
/// Carries owner addresses only, never signature bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: TxId,
    pub nonce: U256,
    pub to: Address,
    pub value: U256,
    pub operation: Operation,
    pub submission_time: DateTime<Utc>,
    pub state: ExecutionState,
    /// Owners whose confirmations were counted
    pub signers: Vec<Address>,
    /// Threshold, when a context was available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_count: Option<usize>,
    /// Why the transaction could not be hashed, if it could not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashing_error: Option<String>,
}

impl TransactionView {
    /// "N of M" confirmation summary
    pub fn confirmations_summary(&self) -> String {
        match self.required {
            Some(required) => format!("{} of {}", self.signers.len(), required),
            None => format!("{} of ?", self.signers.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub nonce: U256,
    pub contested: bool,
    pub transactions: Vec<TransactionView>,
}

/// The queue of one Safe, grouped and ordered for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueView {
    pub safe: Address,
    /// Current on-chain nonce, absent when the context was unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_nonce: Option<U256>,
    /// The snapshot could not be fetched; states are `unknown`
    pub stale: bool,
    pub groups: Vec<GroupView>,
}

/// A ready transaction packaged for on-chain submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayload {
    pub safe: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: Operation,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub nonce: U256,
    /// Valid owner signatures concatenated in ascending owner order
    pub signatures: Bytes,
}

impl ExecutionPayload {
    /// Builds the payload, but only for a transaction in the `Ready` state
    pub fn for_ready(
        tx: &RawTransaction,
        verdict: &ConfirmationVerdict,
        state: ExecutionState,
    ) -> Option<Self> {
        if state != ExecutionState::Ready || !verdict.quorum_met {
            return None;
        }

        let mut signed: Vec<(Address, Bytes)> = verdict
            .valid_confirmations()
            .filter_map(|validated| {
                let owner = validated.verified_owner()?;
                let scheme = validated.confirmation.signature_type?;
                let signature =
                    normalize_signature(&validated.confirmation.signature_bytes, scheme).ok()?;
                Some((owner, signature))
            })
            .collect();
        signed.sort_by_key(|(owner, _)| *owner);

        let signatures: Vec<u8> = signed
            .iter()
            .flat_map(|(_, signature)| signature.iter().copied())
            .collect();

        Some(Self {
            safe: tx.safe_address,
            to: tx.to,
            value: tx.value,
            data: tx.data.clone(),
            operation: tx.operation,
            safe_tx_gas: tx.safe_tx_gas,
            base_gas: tx.base_gas,
            gas_price: tx.gas_price,
            gas_token: tx.gas_token,
            refund_receiver: tx.refund_receiver,
            nonce: tx.nonce,
            signatures: Bytes::from(signatures),
        })
    }

    /// ABI-encoded `execTransaction` call to send to the Safe
    pub fn calldata(&self) -> Bytes {
        let call = ISafe::execTransactionCall {
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            operation: self.operation.as_u8(),
            safeTxGas: self.safe_tx_gas,
            baseGas: self.base_gas,
            gasPrice: self.gas_price,
            gasToken: self.gas_token,
            refundReceiver: self.refund_receiver,
            signatures: self.signatures.clone(),
        };

        Bytes::from(call.abi_encode())
    }
}
