//! Query handlers (read-only).

use custody_engine::DeviceLedger;

use crate::{Output, Result};

/// Handle GetDevice command.
pub fn get_device(ledger: &DeviceLedger, id: &str) -> Result<Output> {
    Ok(Output::Device(ledger.get_device(id)?))
}

/// Handle CheckUnique command.
pub fn check_unique(ledger: &DeviceLedger, id: &str) -> Result<Output> {
    Ok(Output::Bool(ledger.is_unique(id)?))
}

/// Handle ListDevices command.
pub fn list_devices(ledger: &DeviceLedger) -> Result<Output> {
    Ok(Output::Devices(ledger.list_devices()?))
}

/// Handle DeviceCount command.
pub fn device_count(ledger: &DeviceLedger) -> Result<Output> {
    Ok(Output::Count(ledger.device_count()?))
}
