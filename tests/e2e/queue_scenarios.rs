//! Readiness of whole queues across evaluation passes

use alloy::primitives::U256;
use alloy::sol_types::SolCall;
use safe_queue::{evaluate_queue, ExecutionState, ISafe, PendingTransaction};

use crate::common::{cancellation, pending, transfer, TestSafe, SAFE};

/// T1 at the current nonce with A and B is ready; T2 at the next nonce with C alone is pending
#[test]
fn test_scenario_ready_and_pending() {
    let safe = TestSafe::new();
    let t1 = pending(&safe, transfer(5, 100, 0), &[&safe.a, &safe.b]);
    let t2 = pending(&safe, transfer(6, 200, 10), &[&safe.c]);
    let (id1, id2) = (t1.transaction.id(), t2.transaction.id());

    let queue = evaluate_queue(SAFE, Some(&safe.context(5)), vec![t1, t2]);
    assert_eq!(queue.state_of(&id1), Some(ExecutionState::Ready));
    assert_eq!(queue.state_of(&id2), Some(ExecutionState::Pending));

    let view = queue.view();
    assert_eq!(view.current_nonce, Some(U256::from(5)));
    assert!(!view.stale);
    let summaries: Vec<String> = view
        .groups
        .iter()
        .flat_map(|g| g.transactions.iter().map(|t| t.confirmations_summary()))
        .collect();
    assert!(summaries.contains(&"2 of 2".to_string()));
    assert!(summaries.contains(&"1 of 2".to_string()));
}

/// A send and its cancellation compete for nonce 5; the send executes
#[test]
fn test_scenario_cancellation_superseded() {
    let safe = TestSafe::new();
    let send = pending(&safe, transfer(5, 100, 0), &[&safe.a, &safe.b]);
    let cancel = pending(&safe, cancellation(5, 60), &[&safe.c]);
    let (send_id, cancel_id) = (send.transaction.id(), cancel.transaction.id());
    let queue_input = vec![send.clone(), cancel.clone()];

    let before = evaluate_queue(SAFE, Some(&safe.context(5)), queue_input.clone());
    assert_eq!(before.groups().len(), 1);
    assert!(before.groups()[0].is_contested());
    assert_eq!(before.state_of(&send_id), Some(ExecutionState::Ready));
    assert_eq!(before.state_of(&cancel_id), Some(ExecutionState::Pending));

    let payloads = before.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].nonce, U256::from(5));
    assert_eq!(payloads[0].value, U256::from(100));

    let after = evaluate_queue(SAFE, Some(&safe.context(6)), queue_input);
    assert_eq!(after.state_of(&cancel_id), Some(ExecutionState::Superseded));
    assert_eq!(after.state_of(&send_id), Some(ExecutionState::Superseded));
    assert!(after.payloads().is_empty());
}

/// The service already reports the send executed but the snapshot lags behind
#[test]
fn test_executed_before_snapshot_catches_up() {
    let safe = TestSafe::new();
    let mut send = pending(&safe, transfer(5, 100, 0), &[&safe.a, &safe.b]);
    send.transaction = send.transaction.executed();
    let cancel = pending(&safe, cancellation(5, 60), &[&safe.a, &safe.c]);
    let (send_id, cancel_id) = (send.transaction.id(), cancel.transaction.id());

    let queue = evaluate_queue(SAFE, Some(&safe.context(5)), vec![send, cancel]);
    assert_eq!(queue.state_of(&send_id), Some(ExecutionState::Executed));
    assert_eq!(queue.state_of(&cancel_id), Some(ExecutionState::Superseded));
    assert!(queue.payloads().is_empty());
}

/// Two fully signed alternatives for one nonce: only one is offered
#[test]
fn test_at_most_one_ready_per_nonce() {
    let safe = TestSafe::new();
    let older = pending(&safe, transfer(5, 100, 0), &[&safe.a, &safe.b]);
    let newer = pending(&safe, transfer(5, 300, 30), &[&safe.b, &safe.c]);

    let queue = evaluate_queue(SAFE, Some(&safe.context(5)), vec![older.clone(), newer.clone()]);
    let states: Vec<ExecutionState> = queue.transactions().map(|t| t.state).collect();
    assert_eq!(states.iter().filter(|s| **s == ExecutionState::Ready).count(), 1);
    assert_eq!(queue.state_of(&newer.transaction.id()), Some(ExecutionState::Ready));
    assert_eq!(queue.state_of(&older.transaction.id()), Some(ExecutionState::Blocked));
    assert_eq!(queue.payloads().len(), 1);
}

/// A fully signed transaction is ready exactly at its nonce and blocked before it
#[test]
fn test_readiness_follows_nonce() {
    let safe = TestSafe::new();
    let tx = pending(&safe, transfer(7, 1, 0), &[&safe.a, &safe.c]);
    let id = tx.transaction.id();

    for (current, expected) in [
        (5, ExecutionState::Blocked),
        (6, ExecutionState::Blocked),
        (7, ExecutionState::Ready),
        (8, ExecutionState::Superseded),
    ] {
        let queue = evaluate_queue(SAFE, Some(&safe.context(current)), vec![tx.clone()]);
        assert_eq!(queue.state_of(&id), Some(expected), "current nonce {current}");
    }
}

#[test]
fn test_owner_change_between_passes() {
    let safe = TestSafe::new();
    let tx = pending(&safe, transfer(5, 1, 0), &[&safe.a, &safe.c]);
    let id = tx.transaction.id();

    let queue = evaluate_queue(SAFE, Some(&safe.context(5)), vec![tx.clone()]);
    assert_eq!(queue.state_of(&id), Some(ExecutionState::Ready));

    // C removed from the owner set
    let shrunk = safe_queue::SafeContext::new(
        SAFE,
        crate::common::CHAIN_ID,
        vec![safe.a.address(), safe.b.address()],
        2,
        U256::from(5),
        "1.4.1",
    )
    .unwrap();
    let queue = evaluate_queue(SAFE, Some(&shrunk), vec![tx]);
    assert_eq!(queue.state_of(&id), Some(ExecutionState::Pending));
}

#[test]
fn test_without_context_everything_unknown() {
    let safe = TestSafe::new();
    let txs = vec![
        pending(&safe, transfer(5, 1, 0), &[&safe.a, &safe.b]),
        pending(&safe, transfer(6, 1, 0), &[&safe.a]),
    ];

    let queue = evaluate_queue(SAFE, None, txs);
    assert!(queue.transactions().all(|t| t.state == ExecutionState::Unknown));
    assert!(queue.payloads().is_empty());

    let view = queue.view();
    assert!(view.stale);
    assert_eq!(view.current_nonce, None);
    assert!(view.groups.iter().all(|g| g.transactions.iter().all(|t| t.confirmations_summary() == "0 of ?")));
}

#[test]
fn test_foreign_transactions_dropped() {
    let safe = TestSafe::new();
    let ours = pending(&safe, transfer(5, 1, 0), &[&safe.a, &safe.b]);
    let mut foreign_tx = transfer(5, 2, 0);
    foreign_tx.safe_address = alloy::primitives::Address::repeat_byte(0x99);
    let foreign = PendingTransaction::new(foreign_tx, vec![]);

    let queue = evaluate_queue(SAFE, Some(&safe.context(5)), vec![ours, foreign]);
    assert_eq!(queue.transactions().count(), 1);
    assert!(!queue.groups()[0].is_contested());
}

#[test]
fn test_payload_calldata_targets_exec_transaction() {
    let safe = TestSafe::new();
    let tx = pending(&safe, transfer(5, 100, 0), &[&safe.c, &safe.a, &safe.b]);

    let queue = evaluate_queue(SAFE, Some(&safe.context(5)), vec![tx]);
    let payload = queue.payloads().pop().unwrap();
    assert_eq!(payload.safe, SAFE);
    assert_eq!(payload.signatures.len(), 3 * 65);

    let call = ISafe::execTransactionCall::abi_decode(&payload.calldata()).unwrap();
    assert_eq!(call.to, crate::common::RECIPIENT);
    assert_eq!(call.value, U256::from(100));
    assert_eq!(call.signatures, payload.signatures);

    // Owners appear in ascending address order
    let mut owners = safe.owners();
    owners.sort();
    let recovered: Vec<_> = payload
        .signatures
        .chunks(65)
        .map(|chunk| {
            let digest = safe.digest(&queue.transactions().next().unwrap().pending.transaction);
            safe_queue::recover_signer(digest, chunk, safe_queue::SignatureType::ContractSignature).unwrap()
        })
        .collect();
    assert_eq!(recovered, owners);
}

#[test]
fn test_unhashable_transaction_still_listed() {
    let safe = TestSafe::with_version("1.6.0");
    let tx = transfer(5, 1, 0);
    let queue = evaluate_queue(SAFE, Some(&safe.context(5)), vec![PendingTransaction::new(tx, vec![])]);

    let view = queue.view();
    let listed = &view.groups[0].transactions[0];
    assert_eq!(listed.state, ExecutionState::Pending);
    assert!(listed.hashing_error.as_deref().unwrap().contains("1.6.0"));
}
