//! In-memory ledger store
//!
//! # Design
//!
//! - DashMap: sharded, reads never take the commit lock
//! - FxHash: fast non-crypto hash for string keys
//! - Commit lock: validation and apply run as one critical section, so two
//!   commits conditioned on the same observed version cannot both succeed
//! - Global version: every commit allocates one version shared by all of
//!   its writes

use crate::error::{StoreError, StoreResult};
use crate::traits::{LedgerStore, Versioned, WriteBatch};
use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxHasher;
use std::collections::BTreeMap;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicU64, Ordering};

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// DashMap-backed [`LedgerStore`]
///
/// # Thread Safety
///
/// All operations are thread-safe:
/// - get(): shard read guard only
/// - commit(): serialized by an internal lock
///
/// # Example
///
/// ```
/// use custody_storage::{LedgerStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// let version = store.put("k", b"v".to_vec()).unwrap();
/// assert_eq!(store.get("k").unwrap().unwrap().version, version);
/// ```
pub struct MemoryStore {
    entries: DashMap<String, Versioned<Vec<u8>>, FxBuildHasher>,
    /// Last allocated commit version
    version: AtomicU64,
    /// Serializes validate → apply
    commit_lock: Mutex<()>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
            version: AtomicU64::new(0),
            commit_lock: Mutex::new(()),
        }
    }

    /// Last committed version (0 before the first commit)
    pub fn current_version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of every entry, ordered by key
    pub fn snapshot(&self) -> BTreeMap<String, Versioned<Vec<u8>>> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned<Vec<u8>>>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn commit(&self, batch: WriteBatch) -> StoreResult<u64> {
        let _commit_guard = self.commit_lock.lock();

        for (key, precondition) in batch.preconditions() {
            let current = self.entries.get(key).map(|entry| entry.version);
            if !precondition.holds(current) {
                tracing::debug!(
                    key = %key,
                    expected = %precondition,
                    actual = ?current,
                    "Commit rejected by precondition"
                );
                return Err(StoreError::Conflict {
                    key: key.to_string(),
                    expected: precondition,
                    actual: current,
                });
            }
        }

        let commit_version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        for write in batch {
            self.entries
                .insert(write.key, Versioned::new(write.value, commit_version));
        }
        Ok(commit_version)
    }
}
