//! Configuration and access modes

use crate::*;
use custody::AccessMode;
use custody_core::Error as CustodyError;
use std::io::Write;

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_file_overrides_defaults() {
    let file = write_config(
        r#"
registry_key = "deviceIds"
max_commit_retries = 5

[defaults]
name = "ACME"
model = "X1"
manufactured_on = "01-01-2020"
"#,
    );
    let store = Arc::new(MemoryStore::new());
    let ledger = Custody::builder()
        .store(store.clone())
        .config_file(file.path())
        .open()
        .unwrap();

    let record = ledger.create_device("1").unwrap();
    assert_eq!(record.name, "ACME");
    assert_eq!(record.model, "X1");
    assert_eq!(ledger.ledger().config().max_commit_retries, 5);

    assert!(store.get("deviceIds").unwrap().is_some());
    assert!(store.get("imeiIds").unwrap().is_none());
    assert_eq!(ledger.device_count().unwrap(), 1);
}

#[test]
fn test_custom_registry_key_is_reserved() {
    let ledger = Custody::builder()
        .config(LedgerConfig::default().registry_key("deviceIds"))
        .open()
        .unwrap();

    let err = ledger.create_device("deviceIds").unwrap_err();
    assert!(matches!(
        custody_error(err),
        CustodyError::InvalidIdentifier { .. }
    ));
    // The default key is an ordinary identifier under a custom registry
    ledger.create_device("imeiIds").unwrap();
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Custody::builder()
        .config_file(dir.path().join("absent.toml"))
        .open()
        .unwrap_err();
    assert!(matches!(err, custody::Error::Config(_)));
}

#[test]
fn test_malformed_config_file() {
    let file = write_config("max_commit_retries = \"lots\"");
    let err = Custody::builder()
        .config_file(file.path())
        .open()
        .unwrap_err();
    assert!(matches!(err, custody::Error::Config(_)));
}

// =============================================================================
// READ-ONLY
// =============================================================================

#[test]
fn test_read_only_rejects_every_mutation() {
    let (store, writer) = create_ledger_with_store();
    device_after(&writer, "1", 0);
    let before = store.snapshot();

    let mut reader = Custody::builder().store(store.clone()).read_only().open().unwrap();
    for result in [
        reader.create_device("2").map(|_| ()),
        reader
            .transfer_to_warehouse("1", "WAREHOUSE", "CN-1")
            .map(|_| ()),
    ] {
        assert!(matches!(
            custody_error(result.unwrap_err()),
            CustodyError::ReadOnly { .. }
        ));
    }
    reader.act_as(Affiliation::Store);
    let err = reader.exchange_device("1", "CUSTOMER", "2").unwrap_err();
    assert!(matches!(custody_error(err), CustodyError::ReadOnly { .. }));

    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_read_only_serves_queries() {
    let (store, writer) = create_ledger_with_store();
    writer.create_device("1").unwrap();

    let reader = Custody::builder().store(store).read_only().open().unwrap();
    assert_eq!(reader.get_device_details("1").unwrap().id.as_str(), "1");
    assert!(!reader.check_unique("1").unwrap());
    assert_eq!(reader.device_count().unwrap(), 1);
}

#[test]
fn test_read_only_does_not_initialize_registry() {
    let store = Arc::new(MemoryStore::new());
    let reader = Custody::builder()
        .store(store.clone())
        .config(LedgerConfig::default().access_mode(AccessMode::ReadOnly))
        .open()
        .unwrap();

    assert!(store.is_empty());
    assert!(reader.list_devices().unwrap().is_empty());
    assert_eq!(reader.device_count().unwrap(), 0);
}
