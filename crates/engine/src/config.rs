//! Ledger configuration
//!
//! Configuration can be built in code or loaded from TOML. Every field is
//! optional; missing fields take the defaults below.
//!
//! ```toml
//! registry_key = "imeiIds"
//! max_commit_retries = 3
//! access_mode = "read_write"
//!
//! [defaults]
//! name = "LENOVO"
//! model = "VIBE"
//! manufactured_on = "03-12-2016"
//! ```

use custody_core::{DeviceId, DeviceSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Store key of the registry record unless configured otherwise
pub const DEFAULT_REGISTRY_KEY: &str = "imeiIds";

/// Conflict retries per operation unless configured otherwise
pub const DEFAULT_MAX_COMMIT_RETRIES: u32 = 3;

/// Controls whether the ledger accepts mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Creations and transitions allowed
    #[default]
    ReadWrite,
    /// Queries only
    ReadOnly,
}

/// Configuration of a [`DeviceLedger`](crate::DeviceLedger)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Reserved store key holding the device registry
    pub registry_key: String,
    /// How many times a conflicting commit is re-read and retried
    pub max_commit_retries: u32,
    /// Read-write or read-only
    pub access_mode: AccessMode,
    /// Descriptive fields for the one-argument creation form
    pub defaults: DeviceSpec,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            registry_key: DEFAULT_REGISTRY_KEY.to_string(),
            max_commit_retries: DEFAULT_MAX_COMMIT_RETRIES,
            access_mode: AccessMode::ReadWrite,
            defaults: DeviceSpec::default(),
        }
    }
}

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// File that failed to load
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are unusable
    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl LedgerConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: LedgerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check values that the type system cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        DeviceId::new(self.registry_key.as_str())
            .map_err(|e| ConfigError::Invalid(format!("registry_key: {}", e)))?;
        if self.defaults.model.trim().is_empty() {
            return Err(ConfigError::Invalid("defaults.model must not be empty".into()));
        }
        Ok(())
    }

    /// Set the access mode
    pub fn access_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = mode;
        self
    }

    /// Set the retry budget for conflicting commits
    pub fn max_commit_retries(mut self, retries: u32) -> Self {
        self.max_commit_retries = retries;
        self
    }

    /// Set the registry key
    pub fn registry_key(mut self, key: impl Into<String>) -> Self {
        self.registry_key = key.into();
        self
    }

    /// Set the creation defaults
    pub fn defaults(mut self, spec: DeviceSpec) -> Self {
        self.defaults = spec;
        self
    }

    /// True if mutations are rejected
    pub fn is_read_only(&self) -> bool {
        self.access_mode == AccessMode::ReadOnly
    }
}
