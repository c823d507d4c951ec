//! DashMap backed map with an exact live-entry counter
//!
//! Storage is delegated to [`dashmap::DashMap`], which already makes each of its own
//! load/insert/remove calls atomic per key. DashMap's `len` walks every shard, so this
//! backend keeps its own cache-padded `AtomicUsize` instead and reports it in O(1).
//!
//! ## Counter bookkeeping
//!
//! The counter moves exactly once per net insertion and once per net removal:
//!
//! - `store` probes through the entry API; only the vacant (insert) branch increments
//! - `load_or_store` increments only when its own insert-if-absent found nothing
//! - `load_and_delete` / `delete` decrement only when a value was actually removed
//!
//! Increments happen while the shard guard of the inserted key is still held. A removal
//! must acquire that guard first, so every decrement is ordered after the increment it
//! pairs with and the counter never underflows.
//!
//! ## Range isolation
//!
//! `range` first collects the keys shard by shard, then re-reads each key and runs the
//! callback with no shard guard held. The view is live: keys deleted after collection
//! are skipped and later overwrites are seen. The callback may call back into the map,
//! writes included.

use crate::map::ConcurrentMap;
use crate::util::CachePadded;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::sync::atomic::{AtomicUsize, Ordering};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::hash_map::RandomState;

/// [`CountedMap`] hashing with `fxhash`.
pub type FxCountedMap<K, V> = CountedMap<K, V, fxhash::FxBuildHasher>;

/// A concurrent map over `DashMap` with O(1) exact `len`
///
/// # Type Parameters
///
/// * `K` - The key type, must implement `Hash + Eq`
/// * `V` - The value type; `load` hands out clones
/// * `S` - The hasher builder, `RandomState` by default
///
/// # Examples
///
/// ```rust
/// use twinmap::{ConcurrentMap, CountedMap};
///
/// let map: CountedMap<&str, u32> = CountedMap::new();
/// map.store("a", 1);
/// map.store("a", 2);
/// map.delete(&"missing");
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.load(&"a"), Some(2));
/// ```
pub struct CountedMap<K, V, S = RandomState> {
    inner: DashMap<K, V, S>,

    // Live entries, maintained by every mutating path
    len: CachePadded<AtomicUsize>,
}

impl<K, V> CountedMap<K, V, RandomState>
where
    K: Hash + Eq,
{
    /// Create an empty map
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Create an empty map with room for at least `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> CountedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone,
{
    /// Create an empty map that hashes keys with `hasher`
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_inner(DashMap::with_hasher(hasher))
    }

    /// Create an empty map with the given capacity and hasher
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from_inner(DashMap::with_capacity_and_hasher(capacity, hasher))
    }

    fn from_inner(inner: DashMap<K, V, S>) -> Self {
        let len = inner.len();
        Self {
            inner,
            len: CachePadded::new(AtomicUsize::new(len)),
        }
    }

    /// Consume the map and return the underlying `DashMap`
    pub fn into_inner(self) -> DashMap<K, V, S> {
        self.inner
    }

    #[inline]
    fn record_insert(&self) {
        self.len.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_remove(&self) {
        let previous = self.len.fetch_sub(1, Ordering::Relaxed);
        debug_assert!(previous > 0, "live-entry counter underflow");
    }
}

impl<K, V, S> ConcurrentMap<K, V> for CountedMap<K, V, S>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
    S: BuildHasher + Clone + Send + Sync,
{
    fn load(&self, key: &K) -> Option<V> {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    fn store(&self, key: K, value: V) {
        match self.inner.entry(key) {
            Entry::Occupied(mut existing) => {
                existing.insert(value);
            }
            Entry::Vacant(slot) => {
                let _guard = slot.insert(value);
                self.record_insert();
            }
        }
    }

    fn load_or_store(&self, key: K, value: V) -> (V, bool) {
        match self.inner.entry(key) {
            Entry::Occupied(existing) => (existing.get().clone(), true),
            Entry::Vacant(slot) => {
                let stored = slot.insert(value);
                self.record_insert();
                (stored.value().clone(), false)
            }
        }
    }

    fn load_and_delete(&self, key: &K) -> Option<V> {
        let (_, value) = self.inner.remove(key)?;
        self.record_remove();
        Some(value)
    }

    fn delete(&self, key: &K) {
        if self.inner.remove(key).is_some() {
            self.record_remove();
        }
    }

    fn range(&self, f: &mut dyn FnMut(&K, &V) -> bool) {
        let keys: Vec<K> = self.inner.iter().map(|entry| entry.key().clone()).collect();
        let mut visited = 0;
        for key in keys {
            // Guard dropped before the callback runs
            let Some(value) = self.load(&key) else {
                continue;
            };
            visited += 1;
            if !f(&key, &value) {
                log::trace!("range stopped by callback after {} entries", visited);
                return;
            }
        }
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }
}

impl<K, V, S> Default for CountedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> FromIterator<(K, V)> for CountedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_inner(iter.into_iter().collect())
    }
}

impl<K, V, S> fmt::Debug for CountedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountedMap")
            .field("len", &self.len.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
