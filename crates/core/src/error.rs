//! Error taxonomy for custody operations.
//!
//! Every ledger operation either applies its mutation in full and succeeds,
//! or applies nothing and fails with one of these kinds. Kinds stay
//! distinguishable so the boundary layer can map them to user-facing
//! messages.

use thiserror::Error;

/// All custody errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Identifier is empty, malformed or reserved
    #[error("invalid device identifier {id:?}: {reason}")]
    InvalidIdentifier {
        /// The rejected identifier
        id: String,
        /// Why it was rejected
        reason: String,
    },

    /// Creation against an identifier that is already registered
    #[error("device already exists: {id}")]
    AlreadyExists {
        /// The existing identifier
        id: String,
    },

    /// No record stored under the identifier
    #[error("device not found: {id}")]
    NotFound {
        /// The missing identifier
        id: String,
    },

    /// Stored value could not be parsed
    #[error("corrupt value under key {key:?}: {reason}")]
    Corrupt {
        /// Store key of the unreadable value
        key: String,
        /// Decoder message
        reason: String,
    },

    /// Record state does not satisfy the transition's preconditions
    #[error("{operation} rejected for device {id}: {reason}")]
    InvalidTransition {
        /// Operation name
        operation: String,
        /// Device the transition addressed
        id: String,
        /// Which precondition failed
        reason: String,
    },

    /// Caller or recipient affiliation is not allowed for the transition
    #[error("{operation} not permitted: {reason}")]
    PermissionDenied {
        /// Operation name
        operation: String,
        /// Which affiliation check failed
        reason: String,
    },

    /// Store write failed or a concurrent write was detected
    #[error("persistence failure: {reason}")]
    PersistenceFailure {
        /// Store message
        reason: String,
        /// True if the same request may succeed against fresh state
        retryable: bool,
    },

    /// Mutation attempted on a ledger opened read-only
    #[error("ledger is read-only, {operation} rejected")]
    ReadOnly {
        /// Operation name
        operation: String,
    },

    /// Malformed argument (unknown affiliation, empty token, ...)
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the problem
        message: String,
    },
}

/// Result type for custody operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable code for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidIdentifier { .. } => "InvalidIdentifier",
            Error::AlreadyExists { .. } => "AlreadyExists",
            Error::NotFound { .. } => "NotFound",
            Error::Corrupt { .. } => "Corrupt",
            Error::InvalidTransition { .. } => "InvalidTransition",
            Error::PermissionDenied { .. } => "PermissionDenied",
            Error::PersistenceFailure { .. } => "PersistenceFailure",
            Error::ReadOnly { .. } => "ReadOnly",
            Error::InvalidInput { .. } => "InvalidInput",
        }
    }

    /// Check if this error is retryable.
    ///
    /// Only conflicts detected at commit time are retryable; a retry reads
    /// fresh state and re-validates.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::PersistenceFailure { retryable: true, .. })
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this is a precondition rejection (nothing was written).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::InvalidTransition { .. } | Error::PermissionDenied { .. } | Error::ReadOnly { .. }
        )
    }

    /// Wrap a decoder failure for the value stored under `key`.
    pub fn corrupt(key: impl Into<String>, reason: impl ToString) -> Self {
        Error::Corrupt {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}
