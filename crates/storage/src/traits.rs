//! Store contract
//!
//! The ledger treats its store as an external collaborator. It needs only
//! keyed reads and keyed writes, but it must never commit a read-modify-write
//! against stale state, so every read carries a version and every write can
//! be conditioned on one.

use crate::error::StoreResult;
use std::fmt;
use std::sync::Arc;

/// A value together with the store version that last wrote it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    /// Stored value
    pub value: T,
    /// Commit version of the last write to this key
    pub version: u64,
}

impl<T> Versioned<T> {
    /// Pair a value with its version
    pub fn new(value: T, version: u64) -> Self {
        Self { value, version }
    }

    /// Transform the value, keeping the version
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Versioned<U> {
        Versioned {
            value: f(self.value),
            version: self.version,
        }
    }
}

/// Condition a single write places on the current state of its key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Unconditional (last writer wins)
    Any,
    /// Key must not exist
    Absent,
    /// Key must exist at exactly this version
    Version(u64),
}

impl Precondition {
    /// Condition matching what a read observed
    pub fn observed(version: Option<u64>) -> Self {
        match version {
            Some(v) => Precondition::Version(v),
            None => Precondition::Absent,
        }
    }

    /// Check the condition against the key's current version
    pub fn holds(&self, current: Option<u64>) -> bool {
        match (self, current) {
            (Precondition::Any, _) => true,
            (Precondition::Absent, None) => true,
            (Precondition::Version(expected), Some(actual)) => *expected == actual,
            _ => false,
        }
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::Any => f.write_str("any"),
            Precondition::Absent => f.write_str("no entry"),
            Precondition::Version(v) => write!(f, "version {}", v),
        }
    }
}

/// One conditional write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    /// Target key
    pub key: String,
    /// Encoded value
    pub value: Vec<u8>,
    /// Condition on the key's current state
    pub precondition: Precondition,
}

/// Writes committed together: all apply or none do
///
/// A batch may also carry read checks: preconditions on keys it does not
/// write, so a commit can depend on state it only read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<Write>,
    checks: Vec<(String, Precondition)>,
}

impl WriteBatch {
    /// Empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unconditional write
    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) -> &mut Self {
        self.put_if(key, value, Precondition::Any)
    }

    /// Add a conditional write
    pub fn put_if(
        &mut self,
        key: impl Into<String>,
        value: Vec<u8>,
        precondition: Precondition,
    ) -> &mut Self {
        self.writes.push(Write {
            key: key.into(),
            value,
            precondition,
        });
        self
    }

    /// Require `key` to satisfy `precondition` without writing it
    pub fn check(&mut self, key: impl Into<String>, precondition: Precondition) -> &mut Self {
        self.checks.push((key.into(), precondition));
        self
    }

    /// Writes in insertion order
    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    /// Read checks in insertion order
    pub fn checks(&self) -> &[(String, Precondition)] {
        &self.checks
    }

    /// Every precondition in the batch, checks first
    pub fn preconditions(&self) -> impl Iterator<Item = (&str, Precondition)> {
        self.checks
            .iter()
            .map(|(key, p)| (key.as_str(), *p))
            .chain(self.writes.iter().map(|w| (w.key.as_str(), w.precondition)))
    }

    /// Number of writes (checks excluded)
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// True if the batch has no writes
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl IntoIterator for WriteBatch {
    type Item = Write;
    type IntoIter = std::vec::IntoIter<Write>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}

/// Key-value collaborator of the custody ledger
///
/// # Contract
///
/// - `get` returns the latest committed value and its version.
/// - `commit` checks every precondition in the batch, read checks included,
///   and only if all hold applies every write under one new version.
///   Otherwise it returns [`StoreError::Conflict`](crate::StoreError::Conflict)
///   and applies nothing.
/// - Commits are serializable: two commits conditioned on the same observed
///   version cannot both succeed.
pub trait LedgerStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StoreResult<Option<Versioned<Vec<u8>>>>;

    /// Atomically apply a batch of conditional writes, returning the commit version
    fn commit(&self, batch: WriteBatch) -> StoreResult<u64>;

    /// Unconditional single-key write
    fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<u64> {
        let mut batch = WriteBatch::new();
        batch.put(key, value);
        self.commit(batch)
    }

    /// True if a value is stored under `key`
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: LedgerStore + ?Sized> LedgerStore for Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned<Vec<u8>>>> {
        (**self).get(key)
    }

    fn commit(&self, batch: WriteBatch) -> StoreResult<u64> {
        (**self).commit(batch)
    }
}
