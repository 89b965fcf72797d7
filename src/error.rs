//! Error types for safe-queue

use alloy::primitives::Address;
use thiserror::Error;

/// Result type alias for safe-queue operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching or evaluating a Safe queue
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to talk to the RPC provider
    #[error("Provider error: {0}")]
    Provider(String),

    /// The chain data provider could not produce a context for the Safe
    #[error("Context unavailable for Safe {safe}: {reason}")]
    ContextUnavailable { safe: Address, reason: String },

    /// A context snapshot violates the owner/threshold rules
    #[error("Invalid Safe context: {0}")]
    InvalidContext(String),

    /// Invalid chain ID
    #[error("Unsupported chain ID: {0}")]
    UnsupportedChain(u64),

    /// The transaction registry returned an error or an unreadable payload
    #[error("Transaction registry error: {0}")]
    Registry(String),

    /// A registry record carries a field that cannot be decoded
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Signature generation failed
    #[error("Failed to sign: {0}")]
    Signing(String),

    /// The transaction digest could not be computed
    #[error(transparent)]
    Hashing(#[from] HashingError),

    /// A confirmation signature could not be verified
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// Errors raised while computing a Safe transaction digest
///
/// Fatal to the one transaction being hashed, never to the whole queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashingError {
    /// The contract version has no known hashing layout
    #[error("Unsupported Safe contract version: {0}")]
    UnsupportedContractVersion(String),

    /// The transaction targets a different chain than the context
    #[error("Transaction chain {transaction} does not match Safe chain {context}")]
    ChainMismatch { transaction: u64, context: u64 },

    /// The transaction belongs to a different Safe than the context
    #[error("Transaction Safe {transaction} does not match context Safe {context}")]
    SafeMismatch { transaction: Address, context: Address },

    /// The transaction was recorded against another contract version
    #[error("Transaction version {transaction} does not match Safe version {context}")]
    VersionMismatch { transaction: String, context: String },
}

/// Errors raised while verifying a single confirmation
///
/// Fatal to that confirmation only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Wrong length, unknown v value, or missing signature type
    #[error("Malformed signature: {0}")]
    Malformed(String),

    /// No signer could be recovered, or the zero address was recovered
    #[error("Signer recovery failed")]
    RecoveryFailed,

    /// The recovered signer is not the owner the confirmation claims
    #[error("Signature recovers to {recovered}, confirmation claims {claimed}")]
    SignerMismatch { claimed: Address, recovered: Address },
}

impl From<alloy::transports::RpcError<alloy::transports::TransportErrorKind>> for Error {
    fn from(err: alloy::transports::RpcError<alloy::transports::TransportErrorKind>) -> Self {
        Error::Provider(err.to_string())
    }
}

impl From<alloy::contract::Error> for Error {
    fn from(err: alloy::contract::Error) -> Self {
        Error::Provider(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Registry(err.to_string())
    }
}

impl From<alloy::signers::Error> for Error {
    fn from(err: alloy::signers::Error) -> Self {
        Error::Signing(err.to_string())
    }
}
