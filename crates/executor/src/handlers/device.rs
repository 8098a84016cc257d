//! Mutation handlers: creation, transitions, exchange.

use custody_core::DeviceSpec;
use custody_engine::{DeviceLedger, Transition, TransitionArgs};

use crate::{Output, Result};

/// Handle CreateDevice command.
pub fn create_device(ledger: &DeviceLedger, id: &str, spec: Option<DeviceSpec>) -> Result<Output> {
    let record = ledger.create_device(id, spec)?;
    Ok(Output::Device(record))
}

/// Handle Transition command.
pub fn transition(
    ledger: &DeviceLedger,
    op: Transition,
    id: &str,
    args: &TransitionArgs,
) -> Result<Output> {
    let receipt = ledger.transition(op, id, args)?;
    Ok(Output::Receipt(receipt))
}

/// Handle Exchange command.
pub fn exchange(
    ledger: &DeviceLedger,
    id: &str,
    old_id: &str,
    args: &TransitionArgs,
) -> Result<Output> {
    let receipt = ledger.exchange(id, old_id, args)?;
    Ok(Output::Receipt(receipt))
}
