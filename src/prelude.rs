//! Convenient imports for the custody ledger.
//!
//! ```
//! use custody::prelude::*;
//!
//! let ledger = Custody::ephemeral()?;
//! assert!(ledger.check_unique("123456")?);
//! # Ok::<(), custody::Error>(())
//! ```

// Main entry point
pub use crate::custody::{Custody, CustodyBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Record model
pub use crate::{Affiliation, DeviceRecord, DeviceSpec, DeviceStatus, Holder, Timestamp};

// Operations
pub use crate::{Caller, LedgerConfig, Transition, TransitionArgs, TransitionReceipt};

// Storage
pub use crate::{LedgerStore, MemoryStore};
