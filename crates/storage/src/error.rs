//! Store errors

use crate::traits::Precondition;
use thiserror::Error;

/// Errors reported by a [`LedgerStore`](crate::LedgerStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A write precondition did not hold; nothing in the batch was applied
    #[error("conflict on key {key:?}: expected {expected}, found {}", display_version(.actual))]
    Conflict {
        /// Key whose precondition failed
        key: String,
        /// The precondition that was checked
        expected: Precondition,
        /// Version found in the store, `None` if absent
        actual: Option<u64>,
    },

    /// The backend refused or failed the operation
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Check if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

fn display_version(version: &Option<u64>) -> String {
    match version {
        Some(v) => format!("version {}", v),
        None => "no entry".to_string(),
    }
}
