//! Hashing of Safe transactions

mod eip712;
mod version;

pub use eip712::{
    compute_domain_separator, compute_safe_transaction_hash, compute_safe_tx_hash,
    compute_transaction_hash, hash_transaction,
};
pub use version::{ContractVersion, DomainLayout, HashingLayout, SafeTxLayout};
