//! Unified error type for the custody facade.
//!
//! Wraps the ledger's error taxonomy, configuration failures and dispatch
//! failures behind one type with the usual classification helpers.

use custody_engine::ConfigError;
use thiserror::Error;

/// All custody facade errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The ledger rejected or failed the operation
    #[error(transparent)]
    Custody(#[from] custody_core::Error),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The executor could not dispatch the request
    #[error(transparent)]
    Dispatch(custody_executor::Error),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<custody_executor::Error> for Error {
    fn from(e: custody_executor::Error) -> Self {
        match e {
            custody_executor::Error::Custody(inner) => Error::Custody(inner),
            other => Error::Dispatch(other),
        }
    }
}

impl Error {
    /// Stable code for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Custody(e) => e.kind(),
            Error::Config(_) => "Config",
            Error::Dispatch(e) => e.kind(),
        }
    }

    /// Check if this error is retryable.
    ///
    /// Retryable errors (commit conflicts) may succeed on retry with fresh data.
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
            Error::Dispatch(e) => e.is_rejection(),
            Error::Config(_) => false,
        }
    }

    /// The ledger error, if this is one
    pub fn as_custody(&self) -> Option<&custody_core::Error> {
        match self {
            Error::Custody(e) => Some(e),
            _ => None,
        }
    }
}
