//! Common test utilities for E2E tests

#![allow(dead_code)]

use alloy::primitives::{address, Address, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use chrono::{DateTime, TimeZone, Utc};
use safe_queue::signing::encode_signature;
use safe_queue::{
    hash_transaction, Confirmation, Operation, PendingTransaction, RawTransaction, SafeContext,
    SignatureType,
};

/// Macro to skip tests when ETH_RPC_URL is not set
#[macro_export]
macro_rules! skip_if_no_rpc {
    () => {
        if std::env::var("ETH_RPC_URL").is_err() {
            eprintln!("Skipping test: ETH_RPC_URL not set");
            return;
        }
    };
}

pub const SAFE: Address = address!("0xabcdefabcdefabcdefabcdefabcdefabcdefabcd");
pub const RECIPIENT: Address = address!("0x4444444444444444444444444444444444444444");
pub const CHAIN_ID: u64 = 1;

/// A Safe with three freshly generated owner keys
pub struct TestSafe {
    pub a: PrivateKeySigner,
    pub b: PrivateKeySigner,
    pub c: PrivateKeySigner,
    pub threshold: u64,
    pub version: String,
}

impl TestSafe {
    /// Owners `[A, B, C]`, threshold 2, contract v1.4.1
    pub fn new() -> Self {
        Self::with_version("1.4.1")
    }

    pub fn with_version(version: &str) -> Self {
        Self {
            a: PrivateKeySigner::random(),
            b: PrivateKeySigner::random(),
            c: PrivateKeySigner::random(),
            threshold: 2,
            version: version.to_string(),
        }
    }

    pub fn owners(&self) -> Vec<Address> {
        vec![self.a.address(), self.b.address(), self.c.address()]
    }

    /// Snapshot of the Safe at `nonce`
    pub fn context(&self, nonce: u64) -> SafeContext {
        SafeContext::new(SAFE, CHAIN_ID, self.owners(), self.threshold, U256::from(nonce), self.version.as_str())
            .expect("valid context")
    }

    /// Digest owners sign for `tx` on this Safe
    pub fn digest(&self, tx: &RawTransaction) -> B256 {
        hash_transaction(tx, &self.context(0)).expect("hashable transaction")
    }
}

pub fn submitted_at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

/// An ETH transfer to `RECIPIENT`
pub fn transfer(nonce: u64, wei: u64, submitted: i64) -> RawTransaction {
    RawTransaction::new(SAFE, CHAIN_ID, RECIPIENT, U256::from(wei), vec![], Operation::Call)
        .with_nonce(U256::from(nonce))
        .with_submission_time(submitted_at(submitted))
}

/// The zero-value self call wallets queue to cancel a nonce
pub fn cancellation(nonce: u64, submitted: i64) -> RawTransaction {
    RawTransaction::new(SAFE, CHAIN_ID, SAFE, U256::ZERO, vec![], Operation::Call)
        .with_nonce(U256::from(nonce))
        .with_submission_time(submitted_at(submitted))
}

/// Signs the raw digest (service tag `EOA`)
pub fn confirm(signer: &PrivateKeySigner, digest: B256) -> Confirmation {
    let signature = signer.sign_hash_sync(&digest).unwrap();
    Confirmation::new(
        signer.address(),
        encode_signature(&signature, SignatureType::ContractSignature),
        SignatureType::ContractSignature,
    )
}

/// Signs via `personal_sign` (service tag `ETH_SIGN`)
pub fn confirm_personal(signer: &PrivateKeySigner, digest: B256) -> Confirmation {
    let signature = signer.sign_message_sync(digest.as_slice()).unwrap();
    Confirmation::new(
        signer.address(),
        encode_signature(&signature, SignatureType::LegacyPersonalSign),
        SignatureType::LegacyPersonalSign,
    )
}

/// Attaches confirmations from `signers` over the transaction's own digest
pub fn pending(safe: &TestSafe, tx: RawTransaction, signers: &[&PrivateKeySigner]) -> PendingTransaction {
    let digest = safe.digest(&tx);
    let confirmations = signers.iter().map(|signer| confirm(signer, digest)).collect();
    PendingTransaction::new(tx, confirmations)
}
