//! Storage layer for the custody ledger
//!
//! This crate defines the contract the ledger expects from its key-value
//! collaborator, plus an in-memory implementation:
//! - [`LedgerStore`]: versioned `get`, conditional atomic `commit`
//! - [`MemoryStore`]: DashMap-backed store with a serialized commit path
//! - [`FaultyStore`] (feature `testing`): wrapper injecting conflicts and
//!   write failures

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod fault;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
#[cfg(any(test, feature = "testing"))]
pub use fault::FaultyStore;
pub use memory::MemoryStore;
pub use traits::{LedgerStore, Precondition, Versioned, Write, WriteBatch};
