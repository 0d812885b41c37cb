//! # Memoized Lookups
//!
//! [`Memo`] remembers the result of an expensive computation per key, so
//! repeated fetches of the same profile or conversation cost one directory or
//! API round trip. Keys are explicit and typed; a call site that cannot name
//! a stable key passes `None` and bypasses the store entirely.
//!
//! Entries are written at most once and never evicted. The store stays until
//! [`Memo::clear`], which callers use to force refetching after the backing
//! data changed.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;
use tracing::trace;

/// A keyed, write-once memo store.
///
/// Values are handed out as clones, so cached types are typically records or
/// `Arc`-backed handles. Computation runs outside the store lock; under a
/// racing first call both callers may compute, and the first writer's value
/// is kept and returned to both.
pub struct Memo<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The cached value for a key, if one was stored.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// A snapshot of the stored keys, in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    /// Drops every entry, forcing the next call per key to recompute.
    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap();
        trace!(dropped = entries.len(), "Memo cleared");
        entries.clear();
    }

    /// Returns the cached value for the key, or computes and stores it.
    ///
    /// A `None` key bypasses the store: the computation runs and nothing is
    /// read or written.
    pub fn get_or_insert_with(&self, key: Option<K>, compute: impl FnOnce() -> V) -> V {
        let Some(key) = key else {
            trace!("Memo bypass");
            return compute();
        };
        if let Some(hit) = self.get(&key) {
            trace!(?key, "Memo hit");
            return hit;
        }
        let value = compute();
        self.commit(key, value)
    }

    /// Async variant of [`Memo::get_or_insert_with`]. The future is awaited
    /// outside the store lock.
    pub async fn get_or_compute<Fut>(&self, key: Option<K>, compute: impl FnOnce() -> Fut) -> V
    where
        Fut: Future<Output = V>,
    {
        let Some(key) = key else {
            trace!("Memo bypass");
            return compute().await;
        };
        if let Some(hit) = self.get(&key) {
            trace!(?key, "Memo hit");
            return hit;
        }
        let value = compute().await;
        self.commit(key, value)
    }

    /// Fallible variant of [`Memo::get_or_compute`]. An `Err` is returned to
    /// the caller and never stored, so the next call retries.
    pub async fn try_get_or_compute<Fut, E>(
        &self,
        key: Option<K>,
        compute: impl FnOnce() -> Fut,
    ) -> Result<V, E>
    where
        Fut: Future<Output = Result<V, E>>,
    {
        let Some(key) = key else {
            trace!("Memo bypass");
            return compute().await;
        };
        if let Some(hit) = self.get(&key) {
            trace!(?key, "Memo hit");
            return Ok(hit);
        }
        let value = compute().await?;
        Ok(self.commit(key, value))
    }

    /// First write wins: a racing writer's value is dropped in favor of the
    /// committed one.
    fn commit(&self, key: K, value: V) -> V {
        let mut entries = self.entries.lock().unwrap();
        match entries.entry(key) {
            Entry::Occupied(slot) => slot.get().clone(),
            Entry::Vacant(slot) => {
                trace!(key = ?slot.key(), "Memo store");
                slot.insert(value).clone()
            }
        }
    }
}

impl<K, V> Default for Memo<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
