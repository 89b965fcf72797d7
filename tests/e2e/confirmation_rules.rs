//! Which confirmations count toward quorum

use alloy::primitives::U256;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use safe_queue::{
    sign_confirmation, validate, Confirmation, ConfirmationOutcome, HashingError, Rejection, SignatureType,
    VerificationError,
};

use crate::common::{confirm, confirm_personal, transfer, TestSafe};

/// Unsupported versions never reach quorum, however many owners signed
#[test]
fn test_unsupported_version_fails_closed() {
    let supported = TestSafe::new();
    let tx = transfer(5, 1, 0);
    let digest = supported.digest(&tx);
    let confirmations = [
        confirm(&supported.a, digest),
        confirm(&supported.b, digest),
        confirm(&supported.c, digest),
    ];

    for version in ["0.0.1", "1.3.1", "1.5.0-rc.1", "2.0.0", "latest"] {
        let safe = TestSafe {
            a: supported.a.clone(),
            b: supported.b.clone(),
            c: supported.c.clone(),
            threshold: supported.threshold,
            version: version.to_string(),
        };
        let ctx = safe.context(5);
        let verdict = validate(&tx, &confirmations, &ctx);
        assert!(!verdict.quorum_met, "version {version}");
        assert!(matches!(verdict.digest, Err(HashingError::UnsupportedContractVersion(_))));
    }
}

#[test]
fn test_transaction_version_must_match_context() {
    let safe = TestSafe::with_version("1.3.0");
    let tx = transfer(5, 1, 0);
    let digest = safe.digest(&tx);
    let confirmations = [confirm(&safe.a, digest), confirm(&safe.b, digest)];

    assert!(validate(&tx, &confirmations, &safe.context(5)).quorum_met);
    assert!(validate(&tx.clone().with_contract_version("1.3.0+L2"), &confirmations, &safe.context(5)).quorum_met);

    let verdict = validate(&tx.with_contract_version("1.1.1"), &confirmations, &safe.context(5));
    assert!(!verdict.quorum_met);
    assert!(matches!(verdict.digest, Err(HashingError::VersionMismatch { .. })));
}

/// Owners [A, B, C], threshold 2, signatures from A and outsider D
#[test]
fn test_outsider_never_counts() {
    let safe = TestSafe::new();
    let outsider = PrivateKeySigner::random();
    let tx = transfer(5, 1, 0);
    let digest = safe.digest(&tx);

    let verdict = validate(&tx, &[confirm(&safe.a, digest), confirm(&outsider, digest)], &safe.context(5));
    assert!(!verdict.quorum_met);
    assert_eq!(verdict.signers(), vec![safe.a.address()]);
    assert_eq!(
        verdict.confirmations[1].outcome,
        ConfirmationOutcome::Invalid(Rejection::NotOwner(outsider.address()))
    );
}

/// Two confirmations from A count once
#[test]
fn test_same_owner_counts_once() {
    let safe = TestSafe::new();
    let tx = transfer(5, 1, 0);
    let digest = safe.digest(&tx);

    // Same owner through both schemes is still one owner
    let verdict = validate(
        &tx,
        &[confirm(&safe.a, digest), confirm_personal(&safe.a, digest)],
        &safe.context(5),
    );
    assert!(!verdict.quorum_met);
    assert_eq!(verdict.valid_count(), 1);
}

#[test]
fn test_personal_sign_checked_against_prefixed_digest() {
    let safe = TestSafe::new();
    let tx = transfer(5, 1, 0);
    let digest = safe.digest(&tx);

    let verdict = validate(
        &tx,
        &[confirm(&safe.a, digest), confirm_personal(&safe.b, digest)],
        &safe.context(5),
    );
    assert!(verdict.quorum_met);

    // Raw-digest signature relabelled as personal_sign
    let raw = safe.b.sign_hash_sync(&digest).unwrap();
    let relabelled = Confirmation::new(safe.b.address(), raw.as_bytes().to_vec(), SignatureType::LegacyPersonalSign);
    let verdict = validate(&tx, &[confirm(&safe.a, digest), relabelled], &safe.context(5));
    assert!(!verdict.quorum_met);

    // personal_sign signature relabelled as a raw-digest signature
    let personal = confirm_personal(&safe.b, digest);
    let relabelled = Confirmation::new(
        safe.b.address(),
        personal.signature_bytes.clone(),
        SignatureType::ContractSignature,
    );
    let verdict = validate(&tx, &[confirm(&safe.a, digest), relabelled], &safe.context(5));
    assert!(!verdict.quorum_met);
}

#[test]
fn test_untagged_confirmation_rejected() {
    let safe = TestSafe::new();
    let tx = transfer(5, 1, 0);
    let digest = safe.digest(&tx);

    let valid = confirm(&safe.b, digest);
    let untagged = Confirmation::untagged(valid.owner_address_claimed, valid.signature_bytes);

    let verdict = validate(&tx, &[confirm(&safe.a, digest), untagged], &safe.context(5));
    assert!(!verdict.quorum_met);
    assert!(matches!(
        verdict.confirmations[1].outcome,
        ConfirmationOutcome::Invalid(Rejection::Verification(VerificationError::Malformed(_)))
    ));
}

#[test]
fn test_confirmations_for_another_nonce_rejected() {
    let safe = TestSafe::new();
    let tx = transfer(5, 1, 0);
    let replayed = safe.digest(&tx.clone().with_nonce(U256::from(4)));

    let verdict = validate(&tx, &[confirm(&safe.a, replayed), confirm(&safe.b, replayed)], &safe.context(5));
    assert!(!verdict.quorum_met);
    assert_eq!(verdict.valid_count(), 0);
}

#[tokio::test]
async fn test_signed_confirmations_validate() {
    let safe = TestSafe::with_version("1.1.1");
    let tx = transfer(5, 1, 0);
    let digest = safe.digest(&tx);

    let a = sign_confirmation(&safe.a, digest, SignatureType::ContractSignature)
        .await
        .unwrap();
    let c = sign_confirmation(&safe.c, digest, SignatureType::LegacyPersonalSign)
        .await
        .unwrap();

    let verdict = validate(&tx, &[a, c], &safe.context(5));
    assert!(verdict.quorum_met);
    assert_eq!(verdict.signers(), vec![safe.a.address(), safe.c.address()]);
}
