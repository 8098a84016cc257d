//! Device ledger
//!
//! `DeviceLedger` is the entry point for custody operations. Each mutation
//! follows the same cycle:
//!
//! 1. Read the addressed record(s) with their store versions
//! 2. Run the pure transition against what was read
//! 3. Commit the result conditioned on those versions
//!
//! A conflict at step 3 means another writer got there first. The cycle is
//! re-run against fresh state up to `max_commit_retries` times before the
//! conflict is reported as a retryable [`Error::PersistenceFailure`].
//!
//! # Example
//!
//! ```
//! use custody_engine::{Caller, DeviceLedger, Transition, TransitionArgs};
//! use custody_core::{Affiliation, DeviceStatus};
//!
//! let ledger = DeviceLedger::ephemeral().unwrap();
//! ledger.create_device("123456", None).unwrap();
//!
//! let args = TransitionArgs::new(Caller::party(Affiliation::Vendor), "WAREHOUSE")
//!     .with_consignment("CN-1");
//! let receipt = ledger
//!     .transition(Transition::DeliverToWarehouse, "123456", &args)
//!     .unwrap();
//! assert_eq!(receipt.to_status, DeviceStatus::DeliveredToWarehouse);
//! ```

use crate::config::LedgerConfig;
use crate::query::QueryService;
use crate::registry::RegistryManager;
use crate::store_error;
use crate::transition::{self, Transition, TransitionArgs, TransitionReceipt, EXCHANGE};
use custody_core::{DeviceId, DeviceRecord, DeviceSpec, Error, Result, Timestamp};
use custody_storage::{LedgerStore, MemoryStore, Precondition, WriteBatch};
use std::sync::Arc;

/// Operation name used for creation in errors and logs
pub const CREATE: &str = "create_device";

/// Custody ledger over a [`LedgerStore`]
///
/// Cheap to share: the store is reference counted and every operation takes
/// `&self`.
#[derive(Clone)]
pub struct DeviceLedger {
    store: Arc<dyn LedgerStore>,
    config: LedgerConfig,
}

impl std::fmt::Debug for DeviceLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceLedger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DeviceLedger {
    /// Open a ledger over `store`
    ///
    /// Read-write ledgers write an empty registry if none exists yet.
    pub fn open(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Result<Self> {
        config.validate().map_err(|e| Error::InvalidInput {
            message: e.to_string(),
        })?;
        let ledger = Self { store, config };
        if !ledger.config.is_read_only() {
            ledger.registry().initialize()?;
        }
        tracing::debug!(
            registry_key = %ledger.config.registry_key,
            access_mode = ?ledger.config.access_mode,
            "Opened device ledger"
        );
        Ok(ledger)
    }

    /// Read-write ledger over a fresh in-memory store
    pub fn ephemeral() -> Result<Self> {
        Self::open(Arc::new(MemoryStore::new()), LedgerConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    /// Registry manager bound to this ledger's store
    pub fn registry(&self) -> RegistryManager<'_> {
        RegistryManager::new(self.store.as_ref(), &self.config.registry_key)
    }

    /// Query service bound to this ledger's store
    pub fn query(&self) -> QueryService<'_> {
        QueryService::new(self.store.as_ref(), &self.config.registry_key)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current record of `id`
    pub fn get_device(&self, id: &str) -> Result<DeviceRecord> {
        self.query().get_device(id)
    }

    /// True iff no usable record exists for `id`
    pub fn is_unique(&self, id: &str) -> Result<bool> {
        self.query().is_unique(id)
    }

    /// Every readable device in creation order
    pub fn list_devices(&self) -> Result<Vec<DeviceRecord>> {
        self.query().list_devices()
    }

    /// Number of registered identifiers
    pub fn device_count(&self) -> Result<usize> {
        self.query().device_count()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Register a new device in `CREATED`, held by the vendor
    ///
    /// `spec` of `None` uses the configured defaults. The record and the
    /// registry append commit together or not at all.
    pub fn create_device(&self, id: &str, spec: Option<DeviceSpec>) -> Result<DeviceRecord> {
        self.ensure_writable(CREATE)?;
        let id = DeviceId::new(id)?;
        if id.as_str() == self.config.registry_key {
            return Err(Error::InvalidIdentifier {
                id: id.to_string(),
                reason: "identifier is the reserved registry key".to_string(),
            });
        }
        let record = DeviceRecord::new(id, spec.unwrap_or_else(|| self.config.defaults.clone()));
        let bytes = record.to_bytes()?;

        let version = self.with_retry(CREATE, record.id.as_str(), || {
            if self.store.exists(record.id.as_str()).map_err(store_error)? {
                return Err(Error::AlreadyExists {
                    id: record.id.to_string(),
                });
            }
            let mut batch = WriteBatch::new();
            self.registry().stage_append(&mut batch, record.id.clone())?;
            batch.put_if(record.id.as_str(), bytes.clone(), Precondition::Absent);
            self.store.commit(batch).map_err(store_error)
        })?;

        tracing::info!(device = %record.id, version, "Created device");
        Ok(record)
    }

    /// Apply a single-record custody transition to `id`
    pub fn transition(
        &self,
        op: Transition,
        id: &str,
        args: &TransitionArgs,
    ) -> Result<TransitionReceipt> {
        self.ensure_writable(op.name())?;
        let receipt = self.with_retry(op.name(), id, || {
            let current = self.query().get_versioned(id)?;
            let now = Timestamp::now();
            let next = transition::apply(op, &current.value, args, now)?;

            let mut batch = WriteBatch::new();
            batch.put_if(id, next.to_bytes()?, Precondition::Version(current.version));
            let version = self.store.commit(batch).map_err(store_error)?;
            Ok(TransitionReceipt::new(op.name(), &current.value, &next, version, now))
        })?;

        tracing::info!(
            operation = %op,
            device = %receipt.id,
            from = %receipt.from_status,
            to = %receipt.to_status,
            owner = %receipt.to_owner,
            version = receipt.version,
            "Committed custody transition"
        );
        Ok(receipt)
    }

    /// Exchange the returned device `old_id` for the replacement `id`
    ///
    /// Only the replacement is written. The commit is conditioned on the
    /// returned device still being at the version that was validated.
    pub fn exchange(
        &self,
        id: &str,
        old_id: &str,
        args: &TransitionArgs,
    ) -> Result<TransitionReceipt> {
        self.ensure_writable(EXCHANGE)?;
        let receipt = self.with_retry(EXCHANGE, id, || {
            let query = self.query();
            let old = query.get_versioned(old_id)?;
            let new = query.get_versioned(id)?;
            let now = Timestamp::now();
            let next = transition::exchange(&old.value, &new.value, args, now)?;

            let mut batch = WriteBatch::new();
            batch
                .check(old_id, Precondition::Version(old.version))
                .put_if(id, next.to_bytes()?, Precondition::Version(new.version));
            let version = self.store.commit(batch).map_err(store_error)?;
            Ok(TransitionReceipt::new(EXCHANGE, &new.value, &next, version, now))
        })?;

        tracing::info!(
            operation = EXCHANGE,
            device = %receipt.id,
            replaced = %old_id,
            owner = %receipt.to_owner,
            version = receipt.version,
            "Committed device exchange"
        );
        Ok(receipt)
    }

    fn ensure_writable(&self, operation: &str) -> Result<()> {
        if self.config.is_read_only() {
            return Err(Error::ReadOnly {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    /// Run `attempt` until it stops failing with a retryable error
    fn with_retry<T>(
        &self,
        operation: &str,
        device: &str,
        mut attempt: impl FnMut() -> Result<T>,
    ) -> Result<T> {
        let max_retries = self.config.max_commit_retries;
        let mut retries = 0;
        loop {
            match attempt() {
                Err(e) if e.is_retryable() && retries < max_retries => {
                    retries += 1;
                    tracing::warn!(
                        operation,
                        device,
                        retry = retries,
                        error = %e,
                        "Commit conflict, retrying against fresh state"
                    );
                }
                Err(e) => {
                    if e.is_rejection() {
                        tracing::warn!(operation, device, error = %e, "Custody operation rejected");
                    } else if e.is_retryable() {
                        tracing::error!(
                            operation,
                            device,
                            retries,
                            error = %e,
                            "Giving up after repeated commit conflicts"
                        );
                    }
                    return Err(e);
                }
                Ok(value) => return Ok(value),
            }
        }
    }
}
