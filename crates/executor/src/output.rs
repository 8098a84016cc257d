//! Command results

use custody_core::DeviceRecord;
use custody_engine::TransitionReceipt;
use serde::Serialize;

/// What a [`Command`](crate::Command) produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Output {
    /// A single device record (creation, lookup)
    Device(DeviceRecord),
    /// Records in creation order
    Devices(Vec<DeviceRecord>),
    /// Boolean answer (uniqueness)
    Bool(bool),
    /// Count of registered devices
    Count(usize),
    /// Result of a committed transition or exchange
    Receipt(TransitionReceipt),
}

impl Output {
    /// Short name of the variant, used in mismatch errors
    pub fn variant_name(&self) -> &'static str {
        match self {
            Output::Device(_) => "Device",
            Output::Devices(_) => "Devices",
            Output::Bool(_) => "Bool",
            Output::Count(_) => "Count",
            Output::Receipt(_) => "Receipt",
        }
    }
}
