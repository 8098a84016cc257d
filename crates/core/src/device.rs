//! Device record schema
//!
//! One [`DeviceRecord`] exists per physical device, stored under its
//! identifier. Records are encoded as JSON objects using the legacy ledger
//! field names, with unset optional fields written as `"UNDEFINED"`.

use crate::error::{Error, Result};
use crate::types::{Affiliation, DeviceId, DeviceStatus, Holder, Timestamp};
use serde::{Deserialize, Serialize};

/// Descriptive fields supplied at creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSpec {
    /// Brand / product name
    pub name: String,
    /// Model; exchanges require matching models
    pub model: String,
    /// Manufacture date, kept as supplied
    pub manufactured_on: String,
}

impl DeviceSpec {
    /// Build a spec from its three fields
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        manufactured_on: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            manufactured_on: manufactured_on.into(),
        }
    }
}

impl Default for DeviceSpec {
    fn default() -> Self {
        Self::new("LENOVO", "VIBE", "03-12-2016")
    }
}

/// Current state of one device
///
/// Fields are public for reading; all mutation after creation goes through
/// the custody state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Brand / product name
    #[serde(rename = "devicename", alias = "deviceName")]
    pub name: String,
    /// Model
    #[serde(rename = "devicemodel")]
    pub model: String,
    /// Manufacture date, opaque
    #[serde(rename = "dateofmanf", default)]
    pub manufactured_on: String,
    /// Shipment identifier of the most recent delivery
    #[serde(rename = "consignmentnumber", default, with = "sentinel")]
    pub consignment_number: Option<String>,
    /// Most recent dispatch
    #[serde(rename = "dateofdelivery", default, with = "sentinel")]
    pub delivered_at: Option<Timestamp>,
    /// Most recent acceptance
    #[serde(rename = "dateofreceipt", default, with = "sentinel")]
    pub received_at: Option<Timestamp>,
    /// Sale or exchange
    #[serde(rename = "dateofsale", default, with = "sentinel")]
    pub sold_at: Option<Timestamp>,
    /// Device this one replaced in an exchange
    #[serde(rename = "oldimei", default, with = "sentinel")]
    pub previous_id: Option<DeviceId>,
    /// Identifier; equals the store key
    #[serde(rename = "imei")]
    pub id: DeviceId,
    /// Custody state
    pub status: DeviceStatus,
    /// Seller identity, set on sale
    #[serde(rename = "soldby", default, with = "sentinel")]
    pub sold_by: Option<String>,
    /// Current custodian
    pub owner: Holder,
}

impl DeviceRecord {
    /// New record in `CREATED`, held by the vendor
    pub fn new(id: DeviceId, spec: DeviceSpec) -> Self {
        Self {
            name: spec.name,
            model: spec.model,
            manufactured_on: spec.manufactured_on,
            consignment_number: None,
            delivered_at: None,
            received_at: None,
            sold_at: None,
            previous_id: None,
            id,
            status: DeviceStatus::Created,
            sold_by: None,
            owner: Holder::Party(Affiliation::Vendor),
        }
    }

    /// Validate a raw identifier and build a new record
    pub fn create(raw_id: &str, spec: DeviceSpec) -> Result<Self> {
        Ok(Self::new(DeviceId::new(raw_id)?, spec))
    }

    /// Encode to the store's value format
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::corrupt(self.id.as_str(), e))
    }

    /// Decode the value stored under `key`
    ///
    /// A record whose `imei` differs from its key is corrupt.
    pub fn from_bytes(key: &str, bytes: &[u8]) -> Result<Self> {
        let record: DeviceRecord =
            serde_json::from_slice(bytes).map_err(|e| Error::corrupt(key, e))?;
        if record.id.as_str() != key {
            return Err(Error::corrupt(
                key,
                format!("record identifier {} does not match its key", record.id),
            ));
        }
        Ok(record)
    }
}

/// Optional fields encoded with the `UNDEFINED` sentinel.
///
/// Decoding treats a missing field, `null`, `""` and `"UNDEFINED"` as unset.
mod sentinel {
    use crate::types::UNDEFINED;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_str(UNDEFINED),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") | Some(UNDEFINED) => Ok(None),
            Some(s) => s.parse().map(Some).map_err(de::Error::custom),
        }
    }
}
