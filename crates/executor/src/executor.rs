//! The command executor.

use custody_engine::{Caller, DeviceLedger};

use crate::handlers;
use crate::{Command, Output, Result};

/// Runs [`Command`]s against a [`DeviceLedger`].
///
/// The executor is stateless beyond the ledger it wraps; the caller travels
/// inside each command.
#[derive(Debug, Clone)]
pub struct Executor {
    ledger: DeviceLedger,
}

impl Executor {
    /// Wrap a ledger
    pub fn new(ledger: DeviceLedger) -> Self {
        Self { ledger }
    }

    /// Executor over a fresh in-memory ledger
    pub fn ephemeral() -> Result<Self> {
        Ok(Self::new(DeviceLedger::ephemeral()?))
    }

    /// The wrapped ledger
    pub fn ledger(&self) -> &DeviceLedger {
        &self.ledger
    }

    /// Run one command
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        tracing::debug!(operation = cmd.name(), "Executing command");
        let ledger = &self.ledger;
        match cmd {
            Command::CreateDevice { id, spec } => handlers::device::create_device(ledger, &id, spec),
            Command::Transition { op, id, args } => {
                handlers::device::transition(ledger, op, &id, &args)
            }
            Command::Exchange { id, old_id, args } => {
                handlers::device::exchange(ledger, &id, &old_id, &args)
            }
            Command::GetDevice { id } => handlers::query::get_device(ledger, &id),
            Command::CheckUnique { id } => handlers::query::check_unique(ledger, &id),
            Command::ListDevices => handlers::query::list_devices(ledger),
            Command::DeviceCount => handlers::query::device_count(ledger),
        }
    }

    /// Decode a named operation with positional arguments and run it
    pub fn execute_positional(&self, name: &str, args: &[String], caller: &Caller) -> Result<Output> {
        let cmd = Command::from_positional(name, args, caller)?;
        self.execute(cmd)
    }
}
