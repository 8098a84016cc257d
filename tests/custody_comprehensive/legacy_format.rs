//! Records written in the legacy ledger layout
//!
//! Stores populated by earlier deployments use `deviceName`, `null`
//! registry lists, Go `time.Time.String()` dates and `"UNDEFINED"` for
//! unset fields. The ledger must read
//! them and carry them forward through further transitions.

use crate::*;

const LEGACY_RECORD: &str = r#"{
    "deviceName": "LENOVO",
    "devicemodel": "VIBE",
    "dateofmanf": "03-12-2016",
    "consignmentnumber": "CN-1",
    "dateofdelivery": "2017-05-01 10:00:00.123456789 +0000 UTC",
    "dateofreceipt": "UNDEFINED",
    "dateofsale": "UNDEFINED",
    "oldimei": "UNDEFINED",
    "imei": "777",
    "status": "DELIVERED_TO_WAREHOUSE",
    "soldby": "UNDEFINED",
    "owner": "VENDOR"
}"#;

/// A store seeded the way the legacy system left it
fn legacy_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .put("imeiIds", br#"{"imeis":["777"]}"#.to_vec())
        .unwrap();
    store.put("777", LEGACY_RECORD.as_bytes().to_vec()).unwrap();
    store
}

#[test]
fn test_reads_legacy_record() {
    let ledger = Custody::builder().store(legacy_store()).open().unwrap();

    let record = ledger.get_device_details("777").unwrap();
    assert_eq!(record.name, "LENOVO");
    assert_eq!(record.status, DeviceStatus::DeliveredToWarehouse);
    assert!(record.owner.is(Affiliation::Vendor));
    assert_eq!(record.consignment_number.as_deref(), Some("CN-1"));
    assert_eq!(
        record.delivered_at.unwrap().to_string(),
        "2017-05-01T10:00:00.123456789Z"
    );
    assert!(record.received_at.is_none());
    assert!(record.sold_by.is_none());
    assert!(record.previous_id.is_none());

    assert_eq!(ledger.device_count().unwrap(), 1);
    assert_eq!(ledger.list_devices().unwrap(), vec![record]);
    assert!(!ledger.check_unique("777").unwrap());
}

#[test]
fn test_legacy_record_continues_lifecycle() {
    let store = legacy_store();
    let ledger = Custody::builder().store(store.clone()).open().unwrap();

    HAPPY_PATH[1].run(&ledger, "777").unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&store.get("777").unwrap().unwrap().value).unwrap();
    assert_eq!(raw["devicename"], "LENOVO");
    assert_eq!(raw["status"], "RECEIVED");
    assert_eq!(raw["owner"], "WAREHOUSE");
    assert_eq!(raw["dateofdelivery"], "2017-05-01T10:00:00.123456789Z");
    assert_eq!(raw["dateofsale"], "UNDEFINED");
    assert_ne!(raw["dateofreceipt"], "UNDEFINED");
}

#[test]
fn test_null_registry_list_is_empty() {
    let store = Arc::new(MemoryStore::new());
    store.put("imeiIds", br#"{"imeis":null}"#.to_vec()).unwrap();
    let ledger = Custody::builder().store(store.clone()).open().unwrap();

    assert_eq!(ledger.device_count().unwrap(), 0);
    ledger.create_device("1").unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&store.get("imeiIds").unwrap().unwrap().value).unwrap();
    assert_eq!(raw, serde_json::json!({ "imeis": ["1"] }));
}

#[test]
fn test_new_records_use_legacy_layout() {
    let (store, ledger) = create_ledger_with_store();
    ledger.create_device("1").unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&store.get("1").unwrap().unwrap().value).unwrap();
    for field in [
        "devicename",
        "devicemodel",
        "dateofmanf",
        "consignmentnumber",
        "dateofdelivery",
        "dateofreceipt",
        "dateofsale",
        "oldimei",
        "imei",
        "status",
        "soldby",
        "owner",
    ] {
        assert!(raw.get(field).is_some(), "missing {}", field);
    }
    assert_eq!(raw["consignmentnumber"], "UNDEFINED");
}
