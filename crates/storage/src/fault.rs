//! Fault-injecting store wrapper
//!
//! Wraps any [`LedgerStore`] and lets a test script what the next commits
//! see: spurious conflicts, backend failures, or a concurrent writer that
//! sneaks in between a read and the commit that depends on it.

use crate::error::{StoreError, StoreResult};
use crate::traits::{LedgerStore, Versioned, WriteBatch};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

type Interleave<S> = Box<dyn FnOnce(&S) + Send>;

/// [`LedgerStore`] wrapper with scripted faults
pub struct FaultyStore<S> {
    inner: S,
    conflicts: AtomicUsize,
    failures: AtomicUsize,
    commits: AtomicUsize,
    interleave: Mutex<Vec<Interleave<S>>>,
}

impl<S: LedgerStore> FaultyStore<S> {
    /// Wrap a store with no faults scheduled
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            conflicts: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            commits: AtomicUsize::new(0),
            interleave: Mutex::new(Vec::new()),
        }
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Fail the next `n` commits with a conflict
    pub fn inject_conflicts(&self, n: usize) {
        self.conflicts.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` commits with a backend error
    pub fn inject_failures(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Run `f` against the wrapped store just before the next commit
    pub fn before_next_commit(&self, f: impl FnOnce(&S) + Send + 'static) {
        self.interleave.lock().push(Box::new(f));
    }

    /// Commits attempted so far, including failed ones
    pub fn commit_attempts(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    fn take(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl<S: LedgerStore> LedgerStore for FaultyStore<S> {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned<Vec<u8>>>> {
        self.inner.get(key)
    }

    fn commit(&self, batch: WriteBatch) -> StoreResult<u64> {
        self.commits.fetch_add(1, Ordering::SeqCst);

        let pending: Vec<_> = self.interleave.lock().drain(..).collect();
        for f in pending {
            f(&self.inner);
        }

        if Self::take(&self.failures) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        if Self::take(&self.conflicts) {
            let key = batch
                .writes()
                .first()
                .map(|w| w.key.clone())
                .unwrap_or_default();
            return Err(StoreError::Conflict {
                key,
                expected: crate::traits::Precondition::Any,
                actual: None,
            });
        }
        self.inner.commit(batch)
    }
}
