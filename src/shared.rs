//! Shared Store
//!
//! A cloneable, thread-safe handle around one [`Store`].
//!
//! ## Concurrency Model: Single Exclusive Lock
//!
//! Every operation, reads included, holds the same `parking_lot::Mutex` for
//! its whole duration. This keeps the check-then-create of a first `set` on
//! a new key atomic, and keeps a snapshot save from observing a half-applied
//! mutation. Reads return owned clones so no borrow outlives the lock.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::{KcvError, Result};
use crate::protocol::{Command, Reply};
use crate::store::Store;

/// Thread-safe handle to a shared Store
pub struct SharedStore<K, C, V>
where
    K: Eq + Hash,
    C: Ord,
{
    inner: Arc<Mutex<Store<K, C, V>>>,
}

impl<K, C, V> SharedStore<K, C, V>
where
    K: Eq + Hash,
    C: Ord,
{
    /// Take ownership of a store and share it
    pub fn new(store: Store<K, C, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Lock the store for a sequence of operations
    pub fn lock(&self) -> MutexGuard<'_, Store<K, C, V>> {
        self.inner.lock()
    }

    pub fn set(&self, key: K, column: C, value: V) {
        self.inner.lock().set(key, column, value);
    }

    pub fn get<KQ, CQ>(&self, key: &KQ, column: &CQ) -> Option<V>
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
        C: Borrow<CQ>,
        CQ: Ord + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key, column).cloned()
    }

    pub fn get_key<KQ>(&self, key: &KQ) -> Vec<(C, V)>
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
        C: Clone,
        V: Clone,
    {
        self.inner.lock().get_key(key)
    }

    pub fn get_keys(&self) -> HashSet<K>
    where
        K: Clone,
    {
        self.inner.lock().get_keys()
    }

    pub fn get_slice<KQ, CQ>(&self, key: &KQ, start: Option<&CQ>, stop: Option<&CQ>) -> Vec<(C, V)>
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
        C: Borrow<CQ> + Clone,
        CQ: Ord + ?Sized,
        V: Clone,
    {
        self.inner.lock().get_slice(key, start, stop)
    }

    pub fn delete<KQ, CQ>(&self, key: &KQ, column: &CQ) -> Option<V>
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
        C: Borrow<CQ>,
        CQ: Ord + ?Sized,
    {
        self.inner.lock().delete(key, column)
    }

    pub fn delete_key<KQ>(&self, key: &KQ) -> bool
    where
        K: Borrow<KQ>,
        KQ: Hash + Eq + ?Sized,
    {
        self.inner.lock().delete_key(key).is_some()
    }

    /// Save the snapshot while holding the lock
    pub fn save(&self) -> Result<()> {
        self.inner.lock().save()
    }

    /// Number of live handles, this one included
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Close the store through its last handle
    ///
    /// Fails with [`KcvError::StillShared`] while other handles exist; this
    /// handle is released either way. When the remaining handles all call
    /// `close`, even concurrently, exactly one of them closes the store and
    /// returns its save result. A handle that is dropped instead can only
    /// log a save failure.
    pub fn close(self) -> Result<()> {
        let others = Arc::strong_count(&self.inner) - 1;
        match Arc::into_inner(self.inner) {
            Some(mutex) => mutex.into_inner().close(),
            None => Err(KcvError::StillShared(others)),
        }
    }
}

impl<K, C, V> SharedStore<K, C, V>
where
    K: Eq + Hash + Clone,
    C: Ord + Clone,
    V: Clone,
{
    /// Execute a command under the lock
    pub fn execute(&self, command: Command<K, C, V>) -> Result<Reply<K, C, V>> {
        self.inner.lock().execute(command)
    }
}

impl<K, C, V> Clone for SharedStore<K, C, V>
where
    K: Eq + Hash,
    C: Ord,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, C, V> From<Store<K, C, V>> for SharedStore<K, C, V>
where
    K: Eq + Hash,
    C: Ord,
{
    fn from(store: Store<K, C, V>) -> Self {
        Self::new(store)
    }
}
