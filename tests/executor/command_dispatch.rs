//! Command Dispatch Tests
//!
//! Tests that the Executor dispatches every Command variant and returns
//! the matching Output.

use crate::common::*;
use custody::DeviceSpec;

// ============================================================================
// Creation and Queries
// ============================================================================

#[test]
fn create_device_returns_record() {
    let executor = create_executor();

    let output = executor
        .execute(Command::CreateDevice {
            id: "123456".into(),
            spec: Some(DeviceSpec::new("LENOVO", "VIBE", "03-12-2016")),
        })
        .unwrap();

    match output {
        Output::Device(record) => {
            assert_eq!(record.id.as_str(), "123456");
            assert_eq!(record.status, DeviceStatus::Created);
        }
        _ => panic!("Expected Device output"),
    }
}

#[test]
fn get_device_returns_record() {
    let executor = create_executor();
    create(&executor, "1");
    assert_eq!(status_of(&executor, "1"), DeviceStatus::Created);
}

#[test]
fn check_unique_returns_bool() {
    let executor = create_executor();
    create(&executor, "1");

    let taken = executor
        .execute(Command::CheckUnique { id: "1".into() })
        .unwrap();
    let free = executor
        .execute(Command::CheckUnique { id: "2".into() })
        .unwrap();
    assert_eq!(taken, Output::Bool(false));
    assert_eq!(free, Output::Bool(true));
}

#[test]
fn list_devices_returns_records_in_order() {
    let executor = create_executor();
    create(&executor, "b");
    create(&executor, "a");

    match executor.execute(Command::ListDevices).unwrap() {
        Output::Devices(records) => {
            let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids, ["b", "a"]);
        }
        _ => panic!("Expected Devices output"),
    }
}

#[test]
fn device_count_returns_count() {
    let executor = create_executor();
    assert_eq!(executor.execute(Command::DeviceCount).unwrap(), Output::Count(0));
    create(&executor, "1");
    assert_eq!(executor.execute(Command::DeviceCount).unwrap(), Output::Count(1));
}

// ============================================================================
// Mutations
// ============================================================================

#[test]
fn transition_returns_receipt() {
    let executor = create_executor();
    create(&executor, "1");

    let output = executor
        .execute(Command::Transition {
            op: Transition::DeliverToWarehouse,
            id: "1".into(),
            args: TransitionArgs::new(party(Affiliation::Vendor), "WAREHOUSE")
                .with_consignment("CN-1"),
        })
        .unwrap();

    match output {
        Output::Receipt(receipt) => {
            assert_eq!(receipt.operation, "transfer_to_warehouse");
            assert_eq!(receipt.from_status, DeviceStatus::Created);
            assert_eq!(receipt.to_status, DeviceStatus::DeliveredToWarehouse);
        }
        _ => panic!("Expected Receipt output"),
    }
}

#[test]
fn rejected_transition_is_custody_error() {
    let executor = create_executor();
    create(&executor, "1");

    let err = executor
        .execute(Command::Transition {
            op: Transition::AcceptFromVendor,
            id: "1".into(),
            args: TransitionArgs::new(party(Affiliation::Warehouse), "WAREHOUSE"),
        })
        .unwrap_err();

    assert!(matches!(err, Error::Custody(_)));
    assert_eq!(err.kind(), "InvalidTransition");
    assert!(err.is_rejection());
    assert_eq!(status_of(&executor, "1"), DeviceStatus::Created);
}

#[test]
fn mutations_are_classified() {
    assert!(Command::CreateDevice {
        id: "1".into(),
        spec: None
    }
    .is_mutation());
    assert!(!Command::ListDevices.is_mutation());
    assert!(!Command::CheckUnique { id: "1".into() }.is_mutation());
}
