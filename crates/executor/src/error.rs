//! Executor errors

use thiserror::Error;

/// Errors returned by [`Executor::execute`](crate::Executor::execute).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The ledger rejected or failed the operation
    #[error(transparent)]
    Custody(#[from] custody_core::Error),

    /// Operation name not recognized
    #[error("unknown operation: {name}")]
    UnknownOperation {
        /// The name as supplied
        name: String,
    },

    /// Wrong number or shape of positional arguments
    #[error("invalid arguments for {operation}: {reason}")]
    InvalidArguments {
        /// Operation name
        operation: String,
        /// What was wrong
        reason: String,
    },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal {
        /// Description
        reason: String,
    },
}

/// Result type for executor operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable code for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Custody(e) => e.kind(),
            Error::UnknownOperation { .. } => "UnknownOperation",
            Error::InvalidArguments { .. } => "InvalidArguments",
            Error::Internal { .. } => "Internal",
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Custody(e) if e.is_retryable())
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Custody(e) if e.is_not_found())
    }

    /// Check if the request was refused before anything was written.
    pub fn is_rejection(&self) -> bool {
        match self {
            Error::Custody(e) => e.is_rejection(),
            Error::UnknownOperation { .. } | Error::InvalidArguments { .. } => true,
            Error::Internal { .. } => false,
        }
    }
}
