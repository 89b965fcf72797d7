//! Owner confirmations attached to a pending transaction

use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

/// How an owner produced a confirmation signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatureType {
    /// Recoverable ECDSA signature over the Safe transaction hash itself
    ContractSignature,
    /// `personal_sign` over the Safe transaction hash (EIP-191 prefixed)
    LegacyPersonalSign,
}

impl SignatureType {
    /// Maps a transaction service `signatureType` tag to a scheme
    ///
    /// Tags this engine cannot verify off-chain (`CONTRACT_SIGNATURE`,
    /// `APPROVED_HASH`, unknown values) map to `None`.
    pub fn from_service_tag(tag: &str) -> Option<Self> {
        match tag {
            "EOA" => Some(Self::ContractSignature),
            "ETH_SIGN" => Some(Self::LegacyPersonalSign),
            _ => None,
        }
    }
}

/// An off-chain signature an owner submitted for one transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub owner_address_claimed: Address,
    pub signature_bytes: Bytes,
    /// `None` when the record carried no usable scheme tag
    #[serde(default)]
    pub signature_type: Option<SignatureType>,
}

impl Confirmation {
    pub fn new(owner: Address, signature: impl Into<Bytes>, signature_type: SignatureType) -> Self {
        Self {
            owner_address_claimed: owner,
            signature_bytes: signature.into(),
            signature_type: Some(signature_type),
        }
    }

    /// A record whose scheme tag is missing or not understood
    pub fn untagged(owner: Address, signature: impl Into<Bytes>) -> Self {
        Self {
            owner_address_claimed: owner,
            signature_bytes: signature.into(),
            signature_type: None,
        }
    }
}
