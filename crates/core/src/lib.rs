//! Core types for the custody ledger
//!
//! This crate defines the device record model shared by every layer:
//! - Identifiers, affiliations, holders, statuses and timestamps
//! - The [`DeviceRecord`] schema and its wire encoding
//! - The append-only [`DeviceRegistry`]
//! - The [`Error`] taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod device;
pub mod error;
pub mod registry;
pub mod types;

pub use device::{DeviceRecord, DeviceSpec};
pub use error::{Error, Result};
pub use registry::DeviceRegistry;
pub use types::{is_unset_token, Affiliation, DeviceId, DeviceStatus, Holder, Timestamp, UNDEFINED};
