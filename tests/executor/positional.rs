//! Positional Request Tests
//!
//! Requests arrive as an operation name plus string arguments. Both the
//! canonical and the legacy operation names must dispatch.

use crate::common::*;

fn run(executor: &Executor, name: &str, values: &[&str], caller: Affiliation) -> Result<Output, Error> {
    executor.execute_positional(name, &args(values), &party(caller))
}

#[test]
fn full_lifecycle_with_legacy_names() {
    use Affiliation::*;
    let executor = create_executor();

    run(&executor, "create_device", &["1", "LENOVO", "VIBE", "03-12-2016"], Vendor).unwrap();
    let steps: [(&str, &[&str], Affiliation, DeviceStatus); 10] = [
        ("TRF_TO_WH", &["1", "WAREHOUSE", "CN-1"], Vendor, DeviceStatus::DeliveredToWarehouse),
        ("ACPT_FROM_VENDOR", &["1", "WAREHOUSE"], Warehouse, DeviceStatus::Received),
        ("TRF_TO_STRE", &["1", "STORE", "CN-2"], Warehouse, DeviceStatus::DeliveredToStore),
        ("ACPT_FROM_WAREHOUSE", &["1", "STORE"], Store, DeviceStatus::Received),
        ("TRF_TO_CUST", &["1", "CUSTOMER", "-"], Store, DeviceStatus::DeliveredToCustomer),
        ("RTN_FROM_CUST", &["1", "STORE"], Store, DeviceStatus::ReturnedToStore),
        ("RTN_TO_WAREHOUSE", &["1", "WAREHOUSE", "CN-3"], Store, DeviceStatus::ReturnedToWarehouse),
        ("ACPT_FROM_STRE", &["1", "WAREHOUSE"], Warehouse, DeviceStatus::Received),
        ("RTN_TO_VENDOR", &["1", "VENDOR", "CN-4"], Warehouse, DeviceStatus::ReturnedToVendor),
        ("ACPT_RTN_FROM_WAREHOUSE", &["1", "VENDOR"], Vendor, DeviceStatus::Received),
    ];
    for (name, values, caller, expected) in steps {
        match run(&executor, name, values, caller) {
            Ok(Output::Receipt(receipt)) => assert_eq!(receipt.to_status, expected, "{}", name),
            other => panic!("{} returned {:?}", name, other),
        }
    }
}

#[test]
fn canonical_and_legacy_names_agree() {
    for op in Transition::ALL {
        assert_eq!(Transition::from_name(op.name()), Some(op));
        assert_eq!(Transition::from_name(op.legacy_name()), Some(op));
    }
}

#[test]
fn exchange_with_legacy_name() {
    use Affiliation::*;
    let executor = create_executor();
    create(&executor, "old");
    create(&executor, "new");

    let walk: [(&str, &[&str], Affiliation); 6] = [
        ("TRF_TO_WH", &["old", "WAREHOUSE", "CN-1"], Vendor),
        ("ACPT_FROM_VENDOR", &["old", "WAREHOUSE"], Warehouse),
        ("TRF_TO_STRE", &["old", "STORE", "CN-2"], Warehouse),
        ("ACPT_FROM_WAREHOUSE", &["old", "STORE"], Store),
        ("TRF_TO_CUST", &["old", "CUSTOMER"], Store),
        ("RTN_FROM_CUST", &["old", "STORE"], Store),
    ];
    for (name, values, caller) in walk {
        run(&executor, name, values, caller).unwrap();
    }
    for (name, values, caller) in &walk[..4] {
        let values: Vec<&str> = values
            .iter()
            .map(|v| if *v == "old" { "new" } else { *v })
            .collect();
        run(&executor, name, &values, *caller).unwrap();
    }

    run(&executor, "EXCHANGE_DEV", &["new", "CUSTOMER", "old"], Store).unwrap();
    assert_eq!(status_of(&executor, "new"), DeviceStatus::Exchanged);
    assert_eq!(status_of(&executor, "old"), DeviceStatus::ReturnedToStore);
}

#[test]
fn query_aliases() {
    let executor = create_executor();
    create(&executor, "1");

    for name in ["get_device_details", "get_device"] {
        assert!(matches!(
            run(&executor, name, &["1"], Affiliation::Vendor),
            Ok(Output::Device(_))
        ));
    }
    for name in ["check_unique", "check_unique_imei"] {
        assert_eq!(
            run(&executor, name, &["1"], Affiliation::Vendor).unwrap(),
            Output::Bool(false)
        );
    }
    for name in ["list_devices", "get_devices"] {
        assert!(matches!(
            run(&executor, name, &[], Affiliation::Vendor),
            Ok(Output::Devices(ref records)) if records.len() == 1
        ));
    }
}

#[test]
fn wrong_arity_is_invalid_arguments() {
    let executor = create_executor();
    create(&executor, "1");

    for (name, values) in [
        ("create_device", &["1", "LENOVO"][..]),
        ("TRF_TO_WH", &["1", "WAREHOUSE"][..]),
        ("ACPT_FROM_VENDOR", &["1"][..]),
        ("EXCHANGE_DEV", &["1", "CUSTOMER"][..]),
        ("list_devices", &["extra"][..]),
    ] {
        let err = run(&executor, name, values, Affiliation::Vendor).unwrap_err();
        assert!(
            matches!(err, Error::InvalidArguments { .. }),
            "{} with {:?} returned {:?}",
            name,
            values,
            err
        );
    }
    assert_eq!(status_of(&executor, "1"), DeviceStatus::Created);
}

#[test]
fn unknown_operation() {
    let executor = create_executor();
    let err = run(&executor, "teleport", &["1"], Affiliation::Vendor).unwrap_err();
    assert!(matches!(err, Error::UnknownOperation { ref name } if name == "teleport"));
    assert_eq!(err.kind(), "UnknownOperation");
}
