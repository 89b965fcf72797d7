//! # safe-queue
//!
//! Confirmation validation and execution readiness for Safe multisig
//! transaction queues.
//!
//! Given a snapshot of a Safe's on-chain configuration and the pending
//! transactions reported by a transaction service, the engine decides which
//! confirmations actually count toward the threshold and whether each
//! transaction can be executed right now.
//!
//! ## Features
//!
//! - Versioned EIP-712 hashing for every released Safe contract version
//! - Signer recovery for raw-digest and `personal_sign` confirmations
//! - Owner membership, de-duplication and quorum checks that fail closed
//! - Nonce grouping with one executable alternative per nonce
//! - `execTransaction` payloads with signatures in ascending owner order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use safe_queue::{evaluate_queue, ChainConfig, SafeReader, TransactionServiceClient};
//!
//! let reader = SafeReader::connect(provider, safe_address).await?;
//! let context = reader.context().await?;
//!
//! let service = TransactionServiceClient::new(ChainConfig::new(reader.chain_id())?);
//! let pending = service.pending(safe_address, context.current_nonce()).await?;
//!
//! let queue = evaluate_queue(safe_address, Some(&context), pending);
//! for payload in queue.payloads() {
//!     println!("ready: nonce {} calldata {}", payload.nonce, payload.calldata());
//! }
//! ```
//!
//! Every evaluation pass is only as fresh as its inputs. Callers are expected
//! to fetch a new context and re-run [`evaluate_queue`] on their own cadence.

pub mod chain;
pub mod contracts;
pub mod encoding;
pub mod error;
pub mod queue;
pub mod registry;
pub mod safe;
pub mod signing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use chain::{chain_ids, ChainConfig};
pub use contracts::ISafe;
pub use encoding::{hash_transaction, ContractVersion};
pub use error::{Error, HashingError, Result, VerificationError};
pub use queue::{
    evaluate, evaluate_queue, group_by_nonce, EvaluatedQueue, EvaluatedTransaction, ExecutionPayload,
    ExecutionState, GroupView, NonceGroup, QueueView, TransactionView,
};
pub use registry::{parse_pending, TransactionServiceClient};
pub use safe::SafeReader;
pub use signing::{recover_signer, sign_confirmation, verify};
pub use types::{
    Confirmation, Operation, PendingTransaction, QueuedTransaction, RawTransaction, SafeContext,
    SignatureType, TxId,
};
pub use validation::{validate, ConfirmationOutcome, ConfirmationVerdict, Rejection, ValidatedConfirmation};

// Re-export alloy types that are commonly used
pub use alloy::network::AnyNetwork;
pub use alloy::primitives::{Address, Bytes, B256, U256};
pub use alloy::providers::Provider;
