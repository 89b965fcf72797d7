//! Confirmation set validation and quorum
//!
//! Every ambiguity resolves to "not counted": an unhashable transaction
//! has no valid confirmations, an unverifiable signature is dropped, an
//! address outside the current owner set is dropped, and an owner is
//! counted at most once.

use std::collections::HashSet;

use alloy::primitives::{Address, B256};
use tracing::{debug, warn};

use crate::encoding::hash_transaction;
use crate::error::{HashingError, VerificationError};
use crate::signing::verify;
use crate::types::{Confirmation, RawTransaction, SafeContext};

/// Why a confirmation was not counted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The transaction digest could not be computed
    Unhashable,
    Verification(VerificationError),
    /// Signed by an address that is not currently an owner
    NotOwner(Address),
    /// The owner was already counted by an earlier confirmation
    Duplicate(Address),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// Verified, owned and counted for this owner
    Valid(Address),
    Invalid(Rejection),
}

/// A confirmation paired with its validation outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfirmation {
    pub confirmation: Confirmation,
    pub outcome: ConfirmationOutcome,
}

impl ValidatedConfirmation {
    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, ConfirmationOutcome::Valid(_))
    }

    pub fn verified_owner(&self) -> Option<Address> {
        match self.outcome {
            ConfirmationOutcome::Valid(owner) => Some(owner),
            ConfirmationOutcome::Invalid(_) => None,
        }
    }
}

/// Result of validating one transaction's confirmations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationVerdict {
    /// The digest owners were checked against
    pub digest: Result<B256, HashingError>,
    /// Every submitted confirmation, in submission order
    pub confirmations: Vec<ValidatedConfirmation>,
    pub quorum_met: bool,
}

impl ConfirmationVerdict {
    /// Counted confirmations, at most one per owner
    pub fn valid_confirmations(&self) -> impl Iterator<Item = &ValidatedConfirmation> {
        self.confirmations.iter().filter(|c| c.is_valid())
    }

    pub fn valid_count(&self) -> usize {
        self.valid_confirmations().count()
    }

    /// Owners whose confirmations were counted
    pub fn signers(&self) -> Vec<Address> {
        self.valid_confirmations()
            .filter_map(ValidatedConfirmation::verified_owner)
            .collect()
    }
}

/// Validates the confirmations of `tx` against a Safe snapshot
pub fn validate(tx: &RawTransaction, confirmations: &[Confirmation], ctx: &SafeContext) -> ConfirmationVerdict {
    let digest = match hash_transaction(tx, ctx) {
        Ok(digest) => digest,
        Err(err) => {
            warn!(nonce = %tx.nonce, safe = %tx.safe_address, error = %err, "transaction cannot be hashed");
            return ConfirmationVerdict {
                digest: Err(err),
                confirmations: confirmations
                    .iter()
                    .cloned()
                    .map(|confirmation| ValidatedConfirmation {
                        confirmation,
                        outcome: ConfirmationOutcome::Invalid(Rejection::Unhashable),
                    })
                    .collect(),
                quorum_met: false,
            };
        }
    };

    let mut counted: HashSet<Address> = HashSet::with_capacity(confirmations.len());
    let validated: Vec<ValidatedConfirmation> = confirmations
        .iter()
        .map(|confirmation| {
            let outcome = match check(digest, confirmation, ctx, &counted) {
                Ok(owner) => {
                    counted.insert(owner);
                    ConfirmationOutcome::Valid(owner)
                }
                Err(rejection) => {
                    debug!(
                        %digest,
                        owner = %confirmation.owner_address_claimed,
                        ?rejection,
                        "confirmation not counted"
                    );
                    ConfirmationOutcome::Invalid(rejection)
                }
            };
            ValidatedConfirmation {
                confirmation: confirmation.clone(),
                outcome,
            }
        })
        .collect();

    let quorum_met = counted.len() as u64 >= ctx.threshold();

    ConfirmationVerdict {
        digest: Ok(digest),
        confirmations: validated,
        quorum_met,
    }
}

fn check(
    digest: B256,
    confirmation: &Confirmation,
    ctx: &SafeContext,
    counted: &HashSet<Address>,
) -> Result<Address, Rejection> {
    let owner = verify(digest, confirmation).map_err(Rejection::Verification)?;

    if !ctx.is_owner(&owner) {
        return Err(Rejection::NotOwner(owner));
    }

    if counted.contains(&owner) {
        return Err(Rejection::Duplicate(owner));
    }

    Ok(owner)
}
