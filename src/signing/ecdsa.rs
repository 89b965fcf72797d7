//! ECDSA confirmation signatures in the Safe encoding
//!
//! Safe packs signatures as r (32 bytes) || s (32 bytes) || v (1 byte).
//! A v of 27/28 means the owner signed the transaction hash directly; 31/32
//! means the owner used eth_sign/personal_sign and the contract subtracts 4
//! before recovering against the EIP-191 prefixed hash.

use alloy::primitives::{eip191_hash_message, Address, Bytes, Signature, B256, U256};
use alloy::signers::Signer;

use crate::error::{Result, VerificationError};
use crate::types::{Confirmation, SignatureType};

const SIGNATURE_LENGTH: usize = 65;

impl SignatureType {
    /// The digest this scheme's signatures actually cover
    pub fn signing_digest(&self, tx_hash: B256) -> B256 {
        match self {
            SignatureType::ContractSignature => tx_hash,
            SignatureType::LegacyPersonalSign => eip191_hash_message(tx_hash),
        }
    }

    /// Maps a Safe v byte to the y-parity, rejecting values from other schemes
    fn parity(&self, v: u8) -> Option<bool> {
        match (self, v) {
            (SignatureType::ContractSignature, 27) => Some(false),
            (SignatureType::ContractSignature, 28) => Some(true),
            // Raw personal_sign output before the Safe +4 adjustment is accepted too
            (SignatureType::LegacyPersonalSign, 27 | 31) => Some(false),
            (SignatureType::LegacyPersonalSign, 28 | 32) => Some(true),
            _ => None,
        }
    }

    /// The v byte the Safe contract expects for this scheme on execution
    fn execution_v(&self, y_parity: bool) -> u8 {
        match (self, y_parity) {
            (SignatureType::ContractSignature, false) => 27,
            (SignatureType::ContractSignature, true) => 28,
            (SignatureType::LegacyPersonalSign, false) => 31,
            (SignatureType::LegacyPersonalSign, true) => 32,
        }
    }
}

/// Parses a 65-byte Safe signature for the given scheme
pub fn parse_signature(bytes: &[u8], scheme: SignatureType) -> std::result::Result<Signature, VerificationError> {
    if bytes.len() != SIGNATURE_LENGTH {
        return Err(VerificationError::Malformed(format!(
            "expected {SIGNATURE_LENGTH} bytes, got {}",
            bytes.len()
        )));
    }

    let v = bytes[64];
    let y_parity = scheme
        .parity(v)
        .ok_or_else(|| VerificationError::Malformed(format!("v value {v} invalid for {scheme:?}")))?;

    let r = U256::from_be_slice(&bytes[..32]);
    let s = U256::from_be_slice(&bytes[32..64]);

    Ok(Signature::new(r, s, y_parity))
}

/// Recovers the address that produced `signature` over `tx_hash` under `scheme`
pub fn recover_signer(
    tx_hash: B256,
    signature: &[u8],
    scheme: SignatureType,
) -> std::result::Result<Address, VerificationError> {
    let parsed = parse_signature(signature, scheme)?;
    let digest = scheme.signing_digest(tx_hash);

    let recovered = parsed
        .recover_address_from_prehash(&digest)
        .map_err(|_| VerificationError::RecoveryFailed)?;

    if recovered == Address::ZERO {
        return Err(VerificationError::RecoveryFailed);
    }

    Ok(recovered)
}

/// Verifies one confirmation against a transaction digest
///
/// Succeeds with the signer only when the record names a scheme, the
/// signature recovers under that scheme's digest, and the recovered address
/// is the owner the confirmation claims.
pub fn verify(tx_hash: B256, confirmation: &Confirmation) -> std::result::Result<Address, VerificationError> {
    let scheme = confirmation
        .signature_type
        .ok_or_else(|| VerificationError::Malformed("missing signature type".to_string()))?;

    let recovered = recover_signer(tx_hash, &confirmation.signature_bytes, scheme)?;

    if recovered != confirmation.owner_address_claimed {
        return Err(VerificationError::SignerMismatch {
            claimed: confirmation.owner_address_claimed,
            recovered,
        });
    }

    Ok(recovered)
}

/// Encodes a signature as r || s || v with the v the Safe expects for `scheme`
pub fn encode_signature(signature: &Signature, scheme: SignatureType) -> Bytes {
    let mut sig_bytes = Vec::with_capacity(SIGNATURE_LENGTH);
    sig_bytes.extend_from_slice(&signature.r().to_be_bytes::<32>());
    sig_bytes.extend_from_slice(&signature.s().to_be_bytes::<32>());
    sig_bytes.push(scheme.execution_v(signature.v()));

    Bytes::from(sig_bytes)
}

/// Re-encodes a confirmation signature with the execution v byte for its scheme
pub fn normalize_signature(bytes: &[u8], scheme: SignatureType) -> std::result::Result<Bytes, VerificationError> {
    let parsed = parse_signature(bytes, scheme)?;
    Ok(encode_signature(&parsed, scheme))
}

/// Produces a confirmation for `tx_hash` with the given scheme
pub async fn sign_confirmation<S: Signer + Sync>(
    signer: &S,
    tx_hash: B256,
    scheme: SignatureType,
) -> Result<Confirmation> {
    let signature = match scheme {
        SignatureType::ContractSignature => signer.sign_hash(&tx_hash).await?,
        SignatureType::LegacyPersonalSign => signer.sign_message(tx_hash.as_slice()).await?,
    };

    Ok(Confirmation::new(
        signer.address(),
        encode_signature(&signature, scheme),
        scheme,
    ))
}
