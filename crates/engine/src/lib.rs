//! Custody engine
//!
//! This crate runs the custody state machine against a ledger store:
//! - [`transition`]: the pure transition table and the exchange rule
//! - [`registry`]: the append-only identifier registry
//! - [`query`]: read-only lookups
//! - [`ledger`]: [`DeviceLedger`], the read-validate-commit loop tying them together
//! - [`config`]: [`LedgerConfig`] and its TOML loader

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod ledger;
pub mod query;
pub mod registry;
pub mod transition;

pub use config::{AccessMode, ConfigError, LedgerConfig};
pub use ledger::DeviceLedger;
pub use query::QueryService;
pub use registry::RegistryManager;
pub use transition::{
    Caller, Effect, Rule, Transition, TransitionArgs, TransitionReceipt, EXCHANGE,
    EXCHANGE_LEGACY,
};

use custody_core::Error;
use custody_storage::StoreError;

/// Convert a store error into a ledger error
///
/// Conflicts are retryable: the same request may succeed against fresh state.
pub(crate) fn store_error(e: StoreError) -> Error {
    Error::PersistenceFailure {
        retryable: e.is_conflict(),
        reason: e.to_string(),
    }
}
