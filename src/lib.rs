//! # Custody
//!
//! Device custody ledger for a vendor → warehouse → store → customer supply
//! chain, with returns and exchanges.
//!
//! Every device is a record keyed by its identifier. Records change only
//! through custody transitions, each gated on the caller's affiliation, the
//! recipient's affiliation, and the device's current status and owner.
//!
//! ## Quick Start
//!
//! ```
//! use custody::prelude::*;
//!
//! let mut ledger = Custody::ephemeral()?;
//! ledger.create_device("123456")?;
//! ledger.transfer_to_warehouse("123456", "WAREHOUSE", "CN-1")?;
//!
//! ledger.act_as(Affiliation::Warehouse);
//! let receipt = ledger.accept_from_vendor("123456", "WAREHOUSE")?;
//! assert_eq!(receipt.to_status, DeviceStatus::Received);
//! # Ok::<(), custody::Error>(())
//! ```
//!
//! ## Layers
//!
//! - `custody-core`: record model, wire format, error taxonomy
//! - `custody-storage`: the versioned key-value store contract and [`MemoryStore`]
//! - `custody-engine`: the state machine, registry, queries and [`DeviceLedger`]
//! - `custody-executor`: [`Command`]/[`Output`] dispatch
//! - this crate: the typed [`Custody`] facade

#![warn(missing_docs)]

mod custody;
mod error;

pub mod prelude;

// Re-export main entry points
pub use custody::{Custody, CustodyBuilder};
pub use error::{Error, Result};

// Re-export the layers' public types
pub use custody_core::{
    Affiliation, DeviceId, DeviceRecord, DeviceRegistry, DeviceSpec, DeviceStatus, Holder,
    Timestamp,
};
pub use custody_engine::{
    AccessMode, Caller, ConfigError, DeviceLedger, LedgerConfig, Transition, TransitionArgs,
    TransitionReceipt,
};
pub use custody_executor::{Command, Executor, Output};
pub use custody_storage::{LedgerStore, MemoryStore, Precondition, Versioned, WriteBatch};
