//! Registry manager
//!
//! The registry is the single record listing every identifier ever created.
//! Appends are staged into the creation batch and committed together with
//! the new device record, conditioned on the registry version that was read,
//! so concurrent creations cannot lose each other's entries.

use crate::store_error;
use custody_core::{DeviceId, DeviceRecord, DeviceRegistry, Result};
use custody_storage::{LedgerStore, Precondition, Versioned, WriteBatch};

/// Reads and stages updates to the registry record
pub struct RegistryManager<'a> {
    store: &'a dyn LedgerStore,
    key: &'a str,
}

impl<'a> RegistryManager<'a> {
    /// Manage the registry stored under `key`
    pub fn new(store: &'a dyn LedgerStore, key: &'a str) -> Self {
        Self { store, key }
    }

    /// Store key of the registry
    pub fn key(&self) -> &str {
        self.key
    }

    /// Current registry and its version; an absent registry is empty
    pub fn load(&self) -> Result<Versioned<Option<DeviceRegistry>>> {
        match self.store.get(self.key).map_err(store_error)? {
            Some(entry) => {
                let registry = DeviceRegistry::from_bytes(self.key, &entry.value)?;
                Ok(Versioned::new(Some(registry), entry.version))
            }
            None => Ok(Versioned::new(None, 0)),
        }
    }

    /// Write an empty registry unless one exists
    ///
    /// Returns true if a registry was written.
    pub fn initialize(&self) -> Result<bool> {
        if self.load()?.value.is_some() {
            return Ok(false);
        }
        let mut batch = WriteBatch::new();
        batch.put_if(
            self.key,
            DeviceRegistry::new().to_bytes()?,
            Precondition::Absent,
        );
        match self.store.commit(batch) {
            Ok(version) => {
                tracing::debug!(key = %self.key, version, "Initialized device registry");
                Ok(true)
            }
            // Someone else initialized it first
            Err(e) if e.is_conflict() => Ok(false),
            Err(e) => Err(store_error(e)),
        }
    }

    /// Append `id` and commit on its own
    ///
    /// Does not deduplicate; creation checks existence first and commits the
    /// append together with the record through [`stage_append`](Self::stage_append).
    pub fn register(&self, id: DeviceId) -> Result<u64> {
        let mut batch = WriteBatch::new();
        self.stage_append(&mut batch, id)?;
        self.store.commit(batch).map_err(store_error)
    }

    /// Add the append of `id` to `batch`, conditioned on the version read
    pub fn stage_append(&self, batch: &mut WriteBatch, id: DeviceId) -> Result<()> {
        let current = self.load()?;
        let precondition = match current.value {
            Some(_) => Precondition::Version(current.version),
            None => Precondition::Absent,
        };
        let mut registry = current.value.unwrap_or_default();
        registry.append(id);
        batch.put_if(self.key, registry.to_bytes()?, precondition);
        Ok(())
    }

    /// Every registered identifier in creation order
    pub fn list_all(&self) -> Result<Vec<DeviceId>> {
        Ok(self
            .load()?
            .value
            .map(|registry| registry.ids().to_vec())
            .unwrap_or_default())
    }

    /// True iff a parseable record is stored under `id`
    pub fn exists(&self, id: &DeviceId) -> Result<bool> {
        match self.store.get(id.as_str()).map_err(store_error)? {
            Some(entry) => Ok(DeviceRecord::from_bytes(id.as_str(), &entry.value).is_ok()),
            None => Ok(false),
        }
    }
}
