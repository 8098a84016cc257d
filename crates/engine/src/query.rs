//! Read-only queries over the ledger

use crate::registry::RegistryManager;
use crate::store_error;
use custody_core::{DeviceId, DeviceRecord, Error, Result};
use custody_storage::{LedgerStore, Versioned};

/// Lookups that never write
pub struct QueryService<'a> {
    store: &'a dyn LedgerStore,
    registry_key: &'a str,
}

impl<'a> QueryService<'a> {
    /// Query the store, using `registry_key` for enumeration
    pub fn new(store: &'a dyn LedgerStore, registry_key: &'a str) -> Self {
        Self {
            store,
            registry_key,
        }
    }

    /// Current record of `id`
    pub fn get_device(&self, id: &str) -> Result<DeviceRecord> {
        self.get_versioned(id).map(|entry| entry.value)
    }

    /// Current record of `id` with the version it was read at
    pub fn get_versioned(&self, id: &str) -> Result<Versioned<DeviceRecord>> {
        let id = DeviceId::new(id)?;
        if id.as_str() == self.registry_key {
            return Err(Error::NotFound { id: id.to_string() });
        }
        let entry = self
            .store
            .get(id.as_str())
            .map_err(store_error)?
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        tracing::debug!(device = %id, version = entry.version, "Read device record");
        let version = entry.version;
        let record = DeviceRecord::from_bytes(id.as_str(), &entry.value)?;
        Ok(Versioned::new(record, version))
    }

    /// True iff no usable record exists for `id`
    ///
    /// Missing, unparseable and invalid identifiers all count as unique.
    /// Store failures are reported, not guessed at.
    pub fn is_unique(&self, id: &str) -> Result<bool> {
        match self.get_device(id) {
            Ok(_) => Ok(false),
            Err(Error::NotFound { .. } | Error::Corrupt { .. } | Error::InvalidIdentifier { .. }) => {
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    /// Every readable device in creation order
    ///
    /// Entries whose record is missing or unreadable are skipped with a
    /// warning instead of failing the whole listing.
    pub fn list_devices(&self) -> Result<Vec<DeviceRecord>> {
        let ids = RegistryManager::new(self.store, self.registry_key).list_all()?;
        let mut devices = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get_device(id.as_str()) {
                Ok(record) => devices.push(record),
                Err(e @ (Error::NotFound { .. } | Error::Corrupt { .. })) => {
                    tracing::warn!(device = %id, error = %e, "Skipping unreadable registry entry");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(devices)
    }

    /// Number of registered identifiers
    pub fn device_count(&self) -> Result<usize> {
        Ok(RegistryManager::new(self.store, self.registry_key)
            .list_all()?
            .len())
    }
}
