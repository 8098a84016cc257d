//! Device exchange
//!
//! A store swaps a customer-returned device for a replacement from its own
//! stock. Only the replacement record is written.

use crate::*;
use custody_core::Error as CustodyError;

/// Returned device `old` (RETURNED_TO_STORE) and replacement `new` (RECEIVED at the store)
fn exchange_fixture(ledger: &Custody) {
    device_after(ledger, "old", 6);
    device_after(ledger, "new", 4);
}

fn store_ledger() -> Custody {
    let mut ledger = create_ledger();
    exchange_fixture(&ledger);
    ledger.act_as(Affiliation::Store);
    ledger
}

#[test]
fn test_exchange_updates_replacement_only() {
    let ledger = store_ledger();
    let old_before = stored_bytes(ledger.ledger(), "old");

    let receipt = ledger.exchange_device("new", "CUSTOMER", "old").unwrap();
    assert_eq!(receipt.operation, "exchange_device");
    assert_eq!(receipt.from_status, DeviceStatus::Received);
    assert_eq!(receipt.to_status, DeviceStatus::Exchanged);

    let new = ledger.get_device_details("new").unwrap();
    assert_eq!(new.status, DeviceStatus::Exchanged);
    assert!(new.owner.is(Affiliation::Customer));
    assert_eq!(new.previous_id.as_ref().map(|id| id.as_str()), Some("old"));
    assert!(new.sold_at.is_some());

    assert_eq!(stored_bytes(ledger.ledger(), "old"), old_before);
}

#[test]
fn test_exchange_to_named_customer() {
    let ledger = store_ledger();
    ledger.exchange_device("new", "alice", "old").unwrap();
    assert_eq!(
        ledger.get_device_details("new").unwrap().owner,
        Holder::Named("alice".into())
    );
}

#[test]
fn test_exchange_model_mismatch_changes_nothing() {
    let mut ledger = create_ledger();
    device_after(&ledger, "old", 6);
    ledger
        .create_device_with("new", DeviceSpec::new("LENOVO", "K5", "01-01-2017"))
        .unwrap();
    for step in &HAPPY_PATH[..4] {
        step.run(&ledger, "new").unwrap();
    }
    ledger.act_as(Affiliation::Store);

    let old_before = stored_bytes(ledger.ledger(), "old");
    let new_before = stored_bytes(ledger.ledger(), "new");

    let err = ledger.exchange_device("new", "CUSTOMER", "old").unwrap_err();
    match custody_error(err) {
        CustodyError::InvalidTransition { id, reason, .. } => {
            assert_eq!(id, "new");
            assert!(reason.contains("model"));
        }
        other => panic!("Expected InvalidTransition, got {:?}", other),
    }

    assert_eq!(stored_bytes(ledger.ledger(), "old"), old_before);
    assert_eq!(stored_bytes(ledger.ledger(), "new"), new_before);
}

#[test]
fn test_exchange_requires_returned_device() {
    let mut ledger = create_ledger();
    device_after(&ledger, "old", 4);
    device_after(&ledger, "new", 4);
    ledger.act_as(Affiliation::Store);

    let err = ledger.exchange_device("new", "CUSTOMER", "old").unwrap_err();
    match custody_error(err) {
        CustodyError::InvalidTransition { id, .. } => assert_eq!(id, "old"),
        other => panic!("Expected InvalidTransition, got {:?}", other),
    }
}

#[test]
fn test_exchange_requires_received_replacement() {
    let mut ledger = create_ledger();
    device_after(&ledger, "old", 6);
    device_after(&ledger, "new", 3);
    ledger.act_as(Affiliation::Store);

    let err = ledger.exchange_device("new", "CUSTOMER", "old").unwrap_err();
    match custody_error(err) {
        CustodyError::InvalidTransition { id, .. } => assert_eq!(id, "new"),
        other => panic!("Expected InvalidTransition, got {:?}", other),
    }
}

#[test]
fn test_exchange_is_store_only() {
    let mut ledger = create_ledger();
    exchange_fixture(&ledger);
    ledger.act_as(Affiliation::Warehouse);

    let err = ledger.exchange_device("new", "CUSTOMER", "old").unwrap_err();
    assert!(matches!(
        custody_error(err),
        CustodyError::PermissionDenied { .. }
    ));
}

#[test]
fn test_exchange_with_missing_device_is_not_found() {
    let ledger = store_ledger();
    assert!(ledger
        .exchange_device("new", "CUSTOMER", "ghost")
        .unwrap_err()
        .is_not_found());
    assert!(ledger
        .exchange_device("ghost", "CUSTOMER", "old")
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_exchange_with_itself_is_rejected() {
    let ledger = store_ledger();
    let err = ledger.exchange_device("old", "CUSTOMER", "old").unwrap_err();
    assert!(err.is_rejection());
}

#[test]
fn test_exchange_revalidates_when_returned_device_moves() {
    let (store, mut ledger) = create_faulty_ledger(3);
    exchange_fixture(&ledger);
    ledger.act_as(Affiliation::Store);
    let new_before = stored_bytes(ledger.ledger(), "new");

    // Between validation and commit, the store ships the returned device on
    let other = ledger.clone();
    store.before_next_commit(move |_| {
        HAPPY_PATH[6].run(&other, "old").unwrap();
    });

    let err = ledger.exchange_device("new", "CUSTOMER", "old").unwrap_err();
    match custody_error(err) {
        CustodyError::InvalidTransition { id, .. } => assert_eq!(id, "old"),
        other => panic!("Expected InvalidTransition, got {:?}", other),
    }
    assert_eq!(stored_bytes(ledger.ledger(), "new"), new_before);
    assert_eq!(
        ledger.get_device_details("old").unwrap().status,
        DeviceStatus::ReturnedToWarehouse
    );
}
