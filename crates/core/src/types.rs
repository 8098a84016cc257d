//! Core types for the custody ledger
//!
//! This module defines the fundamental types used throughout the system:
//! - [`DeviceId`]: Immutable device identifier (IMEI-equivalent)
//! - [`Affiliation`]: Role of a party in the supply chain
//! - [`Holder`]: Current custodian of a device
//! - [`DeviceStatus`]: Closed set of custody states
//! - [`Timestamp`]: UTC instant attached to custody transitions

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel written for unset optional fields in the legacy wire format.
pub const UNDEFINED: &str = "UNDEFINED";

/// Returns true if `raw` would read back as an unset field.
pub fn is_unset_token(raw: &str) -> bool {
    raw.is_empty() || raw == UNDEFINED
}

/// Unique identifier of a physical device
///
/// A `DeviceId` is validated on construction and never changes afterwards.
/// It doubles as the store key of the device record.
///
/// # Examples
///
/// ```
/// use custody_core::DeviceId;
///
/// let id = DeviceId::new("356938035643809").unwrap();
/// assert_eq!(id.as_str(), "356938035643809");
/// assert!(DeviceId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Validate and wrap a raw identifier
    ///
    /// Rejects empty and whitespace-only identifiers, identifiers containing
    /// control characters, and the unset sentinel.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let reason = if raw.is_empty() {
            Some("identifier is empty")
        } else if raw.trim().is_empty() {
            Some("identifier is blank")
        } else if raw.chars().any(char::is_control) {
            Some("identifier contains control characters")
        } else if raw == UNDEFINED {
            Some("identifier collides with the unset sentinel")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidIdentifier {
                id: raw,
                reason: reason.to_string(),
            }),
            None => Ok(DeviceId(raw)),
        }
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DeviceId::new(s)
    }
}

impl TryFrom<String> for DeviceId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        DeviceId::new(value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Role of a party in the supply chain
///
/// Affiliations are asserted by the caller and trusted by the ledger;
/// verifying them is the job of the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Affiliation {
    /// Manufacturer / vendor
    Vendor,
    /// Distribution warehouse
    Warehouse,
    /// Retail store
    Store,
    /// End customer
    Customer,
}

impl Affiliation {
    /// All affiliations in supply-chain order
    pub const ALL: [Affiliation; 4] = [
        Affiliation::Vendor,
        Affiliation::Warehouse,
        Affiliation::Store,
        Affiliation::Customer,
    ];

    /// Canonical wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            Affiliation::Vendor => "VENDOR",
            Affiliation::Warehouse => "WAREHOUSE",
            Affiliation::Store => "STORE",
            Affiliation::Customer => "CUSTOMER",
        }
    }

    /// Exact (case-sensitive) match against the canonical token
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == token)
    }
}

impl fmt::Display for Affiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Affiliation {
    type Err = Error;

    /// Case-insensitive parse, for command-line and config input
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput {
                message: format!("unknown affiliation {:?}", s),
            })
    }
}

/// Current custodian of a device
///
/// Supply-chain tiers hold devices under their affiliation token; once a
/// device is sold or exchanged the owner becomes whatever identity the store
/// supplied for the customer. An identity spelled exactly like an
/// affiliation token (e.g. `CUSTOMER`) is that affiliation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Holder {
    /// A supply-chain party identified by its affiliation
    Party(Affiliation),
    /// A named identity (typically a customer)
    Named(String),
}

impl Holder {
    /// Parse an owner token; empty tokens are rejected
    pub fn parse(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if is_unset_token(token.trim()) {
            return Err(Error::InvalidInput {
                message: format!("owner token {:?} is empty", token),
            });
        }
        Ok(match Affiliation::from_token(&token) {
            Some(affiliation) => Holder::Party(affiliation),
            None => Holder::Named(token),
        })
    }

    /// True if the holder is the given affiliation
    pub fn is(&self, affiliation: Affiliation) -> bool {
        matches!(self, Holder::Party(a) if *a == affiliation)
    }

    /// Wire token of the holder
    pub fn as_str(&self) -> &str {
        match self {
            Holder::Party(a) => a.as_str(),
            Holder::Named(name) => name,
        }
    }
}

impl From<Affiliation> for Holder {
    fn from(affiliation: Affiliation) -> Self {
        Holder::Party(affiliation)
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Holder {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Holder::parse(value)
    }
}

impl From<Holder> for String {
    fn from(holder: Holder) -> Self {
        match holder {
            Holder::Party(a) => a.as_str().to_string(),
            Holder::Named(name) => name,
        }
    }
}

/// Custody state of a device
///
/// `Received` is shared by every tier: a device in `Received` is at the
/// warehouse, the store or back at the vendor depending on its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    /// Registered by the vendor, not yet shipped
    Created,
    /// Shipped from vendor to warehouse
    DeliveredToWarehouse,
    /// Accepted by the current owner (any tier)
    #[serde(alias = "Received")]
    Received,
    /// Shipped from warehouse to store
    DeliveredToStore,
    /// Sold to a customer
    DeliveredToCustomer,
    /// Returned by a customer to the store
    ReturnedToStore,
    /// Handed to a customer in exchange for a returned device
    #[serde(alias = "Exchanged")]
    Exchanged,
    /// Shipped back from store to warehouse
    ReturnedToWarehouse,
    /// Shipped back from warehouse to vendor
    ReturnedToVendor,
}

impl DeviceStatus {
    /// All statuses
    pub const ALL: [DeviceStatus; 9] = [
        DeviceStatus::Created,
        DeviceStatus::DeliveredToWarehouse,
        DeviceStatus::Received,
        DeviceStatus::DeliveredToStore,
        DeviceStatus::DeliveredToCustomer,
        DeviceStatus::ReturnedToStore,
        DeviceStatus::Exchanged,
        DeviceStatus::ReturnedToWarehouse,
        DeviceStatus::ReturnedToVendor,
    ];

    /// Canonical wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Created => "CREATED",
            DeviceStatus::DeliveredToWarehouse => "DELIVERED_TO_WAREHOUSE",
            DeviceStatus::Received => "RECEIVED",
            DeviceStatus::DeliveredToStore => "DELIVERED_TO_STORE",
            DeviceStatus::DeliveredToCustomer => "DELIVERED_TO_CUSTOMER",
            DeviceStatus::ReturnedToStore => "RETURNED_TO_STORE",
            DeviceStatus::Exchanged => "EXCHANGED",
            DeviceStatus::ReturnedToWarehouse => "RETURNED_TO_WAREHOUSE",
            DeviceStatus::ReturnedToVendor => "RETURNED_TO_VENDOR",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UTC instant of a custody transition
///
/// Encoded as an RFC 3339 string with as many fractional digits as needed,
/// so that decoding reproduces the exact instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current instant
    pub fn now() -> Self {
        Timestamp(Utc::now())
    }

    /// Wrap a chrono instant
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Timestamp(at)
    }

    /// Build from microseconds since the Unix epoch
    pub fn from_micros(micros: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_micros(micros).map(Timestamp)
    }

    /// The underlying chrono instant
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    /// Accepts RFC 3339 and, for records written by the legacy ledger, the
    /// layout of Go's `time.Time.String()`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(s)
            .or_else(|e| parse_go_time(s).ok_or(e))
            .map(|at| Timestamp(at.with_timezone(&Utc)))
    }
}

/// Parse `2016-12-03 10:15:30.123456789 +0000 UTC`, with or without the
/// zone abbreviation and a trailing monotonic reading (`m=+0.001`).
fn parse_go_time(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.split(" m=").next()?.trim_end();
    let mut fields: Vec<&str> = s.split(' ').collect();
    if fields.len() == 4 {
        fields.pop();
    }
    if fields.len() != 3 {
        return None;
    }
    DateTime::parse_from_str(&fields.join(" "), "%Y-%m-%d %H:%M:%S%.f %z").ok()
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
