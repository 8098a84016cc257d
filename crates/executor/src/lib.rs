//! Command execution layer for the custody ledger
//!
//! Every operation is a [`Command`] value; [`Executor::execute`] runs it and
//! returns an [`Output`]. Requests that arrive as an operation name plus
//! positional string arguments are decoded with [`Command::from_positional`],
//! which also accepts the legacy dispatcher names (`TRF_TO_WH`,
//! `EXCHANGE_DEV`, `get_devices`, ...).
//!
//! # Example
//!
//! ```
//! use custody_executor::{Command, Executor, Output};
//!
//! let executor = Executor::ephemeral().unwrap();
//! executor
//!     .execute(Command::CreateDevice { id: "123456".into(), spec: None })
//!     .unwrap();
//! let unique = executor
//!     .execute(Command::CheckUnique { id: "123456".into() })
//!     .unwrap();
//! assert_eq!(unique, Output::Bool(false));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
mod error;
mod executor;
mod handlers;
mod output;

pub use command::Command;
pub use error::{Error, Result};
pub use executor::Executor;
pub use output::Output;

// Re-exported so callers need only this crate to build commands
pub use custody_core::{Affiliation, DeviceRecord, DeviceSpec, DeviceStatus, Holder};
pub use custody_engine::{
    AccessMode, Caller, DeviceLedger, LedgerConfig, Transition, TransitionArgs, TransitionReceipt,
};
