//! Evaluating a queue decoded from a saved service response

use alloy::primitives::B256;
use alloy::signers::local::PrivateKeySigner;
use serde_json::json;

use safe_queue::{evaluate_queue, parse_pending, ExecutionState};

use crate::common::{confirm, confirm_personal, transfer, TestSafe, CHAIN_ID, RECIPIENT, SAFE};

fn record(nonce: u64, submitted: &str, confirmations: serde_json::Value) -> serde_json::Value {
    json!({
        "safe": SAFE,
        "to": RECIPIENT,
        "value": "1",
        "data": null,
        "operation": 0,
        "safeTxGas": "0",
        "baseGas": 0,
        "gasPrice": "0",
        "gasToken": "0x0000000000000000000000000000000000000000",
        "refundReceiver": "0x0000000000000000000000000000000000000000",
        "nonce": nonce.to_string(),
        "submissionDate": submitted,
        "isExecuted": false,
        "confirmations": confirmations,
    })
}

fn eoa(signer: &PrivateKeySigner, digest: B256) -> serde_json::Value {
    let c = confirm(signer, digest);
    json!({ "owner": c.owner_address_claimed, "signature": c.signature_bytes, "signatureType": "EOA" })
}

fn eth_sign(signer: &PrivateKeySigner, digest: B256) -> serde_json::Value {
    let c = confirm_personal(signer, digest);
    json!({ "owner": c.owner_address_claimed, "signature": c.signature_bytes, "signatureType": "ETH_SIGN" })
}

#[test]
fn test_service_page_to_ready_payload() {
    let safe = TestSafe::new();
    let digest = safe.digest(&transfer(5, 1, 0));
    let next_digest = safe.digest(&transfer(6, 1, 0));

    let page = json!({
        "count": 2,
        "next": null,
        "previous": null,
        "results": [
            record(5, "2024-05-01T10:00:00Z", json!([eoa(&safe.a, digest), eth_sign(&safe.b, digest)])),
            record(6, "2024-05-01T11:00:00Z", json!([
                eoa(&safe.c, next_digest),
                { "owner": safe.a.address(), "signature": "0x", "signatureType": "APPROVED_HASH" }
            ])),
        ]
    });

    let pending = parse_pending(&page.to_string(), CHAIN_ID).unwrap();
    assert_eq!(pending.len(), 2);

    let queue = evaluate_queue(SAFE, Some(&safe.context(5)), pending);
    let states: Vec<(u64, ExecutionState)> = queue
        .transactions()
        .map(|t| (t.pending.transaction.nonce.to::<u64>(), t.state))
        .collect();
    assert!(states.contains(&(5, ExecutionState::Ready)));
    assert!(states.contains(&(6, ExecutionState::Pending)));

    let payloads = queue.payloads();
    assert_eq!(payloads.len(), 1);
    // personal_sign confirmations are submitted with v + 4
    let vs: Vec<u8> = payloads[0].signatures.chunks(65).map(|chunk| chunk[64]).collect();
    assert_eq!(vs.len(), 2);
    assert_eq!(vs.iter().filter(|v| **v >= 31).count(), 1);
}
