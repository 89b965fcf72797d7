//! Version-aware EIP-712 hashing of Safe transactions

use alloy::primitives::{keccak256, Address, B256, U256};

use super::version::{ContractVersion, DomainLayout, SafeTxLayout};
use crate::contracts::{
    DOMAIN_SEPARATOR_TYPEHASH, LEGACY_DOMAIN_SEPARATOR_TYPEHASH, LEGACY_SAFE_TX_TYPEHASH,
    SAFE_TX_TYPEHASH,
};
use crate::error::HashingError;
use crate::types::{RawTransaction, SafeContext};

fn left_pad_address(address: Address) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[12..].copy_from_slice(address.as_slice());
    bytes
}

/// Computes the domain separator for a Safe
///
/// v1.3.0+: keccak256(abi.encode(DOMAIN_SEPARATOR_TYPEHASH, chainId, safeAddress))
/// earlier: keccak256(abi.encode(LEGACY_DOMAIN_SEPARATOR_TYPEHASH, safeAddress))
pub fn compute_domain_separator(layout: DomainLayout, chain_id: u64, safe_address: Address) -> B256 {
    let mut encoded = Vec::with_capacity(96);

    match layout {
        DomainLayout::VerifyingContract => {
            encoded.extend_from_slice(&LEGACY_DOMAIN_SEPARATOR_TYPEHASH);
        }
        DomainLayout::ChainIdAndVerifyingContract => {
            encoded.extend_from_slice(&DOMAIN_SEPARATOR_TYPEHASH);
            encoded.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
        }
    }
    encoded.extend_from_slice(&left_pad_address(safe_address));

    keccak256(&encoded)
}

/// Computes the struct hash for SafeTx
///
/// safeTxHash = keccak256(abi.encode(
///     SAFE_TX_TYPEHASH,
///     to, value, keccak256(data), operation,
///     safeTxGas, baseGas, gasPrice, gasToken, refundReceiver, nonce
/// ))
///
/// The two layouts only differ in the type hash; `dataGas` occupies the
/// same slot `baseGas` does.
pub fn compute_safe_tx_hash(tx: &RawTransaction, layout: SafeTxLayout) -> B256 {
    let mut encoded = Vec::with_capacity(352);

    let typehash = match layout {
        SafeTxLayout::DataGas => &LEGACY_SAFE_TX_TYPEHASH,
        SafeTxLayout::BaseGas => &SAFE_TX_TYPEHASH,
    };
    encoded.extend_from_slice(typehash);

    encoded.extend_from_slice(&left_pad_address(tx.to));
    encoded.extend_from_slice(&tx.value.to_be_bytes::<32>());
    encoded.extend_from_slice(keccak256(&tx.data).as_slice());

    let mut op_bytes = [0u8; 32];
    op_bytes[31] = tx.operation.as_u8();
    encoded.extend_from_slice(&op_bytes);

    encoded.extend_from_slice(&tx.safe_tx_gas.to_be_bytes::<32>());
    encoded.extend_from_slice(&tx.base_gas.to_be_bytes::<32>());
    encoded.extend_from_slice(&tx.gas_price.to_be_bytes::<32>());
    encoded.extend_from_slice(&left_pad_address(tx.gas_token));
    encoded.extend_from_slice(&left_pad_address(tx.refund_receiver));
    encoded.extend_from_slice(&tx.nonce.to_be_bytes::<32>());

    keccak256(&encoded)
}

/// Computes the final EIP-712 hash to sign
///
/// hash = keccak256("\x19\x01" || domainSeparator || safeTxHash)
pub fn compute_transaction_hash(domain_separator: B256, safe_tx_hash: B256) -> B256 {
    let mut encoded = Vec::with_capacity(66);

    encoded.extend_from_slice(&[0x19, 0x01]);
    encoded.extend_from_slice(domain_separator.as_slice());
    encoded.extend_from_slice(safe_tx_hash.as_slice());

    keccak256(&encoded)
}

/// Computes the digest owners sign for `tx` under the given contract version
pub fn compute_safe_transaction_hash(tx: &RawTransaction, version: &ContractVersion) -> B256 {
    let layout = version.layout();
    let domain_separator = compute_domain_separator(layout.domain, tx.chain_id, tx.safe_address);
    let safe_tx_hash = compute_safe_tx_hash(tx, layout.safe_tx);
    compute_transaction_hash(domain_separator, safe_tx_hash)
}

/// Computes the canonical digest of `tx` against a Safe snapshot
///
/// The layout comes from the context's contract version. Fails closed when
/// the version is unknown or when the transaction was recorded for another
/// Safe, chain, or contract version.
pub fn hash_transaction(tx: &RawTransaction, ctx: &SafeContext) -> Result<B256, HashingError> {
    let version = ContractVersion::parse(ctx.contract_version())?;

    if tx.chain_id != ctx.chain_id() {
        return Err(HashingError::ChainMismatch {
            transaction: tx.chain_id,
            context: ctx.chain_id(),
        });
    }

    if tx.safe_address != ctx.address() {
        return Err(HashingError::SafeMismatch {
            transaction: tx.safe_address,
            context: ctx.address(),
        });
    }

    if let Some(reported) = &tx.contract_version {
        let reported_version = ContractVersion::parse(reported)?;
        if !reported_version.same_release(&version) {
            return Err(HashingError::VersionMismatch {
                transaction: reported.clone(),
                context: ctx.contract_version().to_string(),
            });
        }
    }

    Ok(compute_safe_transaction_hash(tx, &version))
}
