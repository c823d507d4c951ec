//! Reader/writer-lock backed map
//!
//! A plain `HashMap` guarded by a single [`parking_lot::RwLock`].
//!
//! ## Design
//!
//! - Writers (`store`, `delete`, `load_or_store`, `load_and_delete`) hold the exclusive lock
//!   across the whole check-then-act sequence, so each compound operation is one atomic step
//! - Readers (`load`, `len`) hold the shared lock
//! - `range` holds the shared lock only while copying entries into a snapshot, then runs the
//!   callback with no lock held
//!
//! ## Performance Characteristics
//!
//! - **Load**: O(1) average case, blocks behind an active writer
//! - **Store / Delete**: O(1) average case, serialized with every other writer
//! - **Range**: O(n) copy under the shared lock, then O(n) callbacks lock-free
//!
//! ## Example
//!
//! ```rust
//! use twinmap::{ConcurrentMap, RwLockMap};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let map: Arc<RwLockMap<i32, i32>> = Arc::new(RwLockMap::new());
//!
//! let writer = thread::spawn({
//!     let map = Arc::clone(&map);
//!     move || {
//!         for i in 0..100 {
//!             map.store(i, i * 2);
//!         }
//!     }
//! });
//! writer.join().unwrap();
//!
//! let mut sum = 0;
//! map.range(&mut |_, v| {
//!     sum += *v;
//!     true
//! });
//! assert_eq!(sum, 9900);
//! ```

use crate::map::ConcurrentMap;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use parking_lot::RwLock;
use std::collections::hash_map::{Entry, RandomState};
use std::collections::HashMap;

/// [`RwLockMap`] hashing with `fxhash`.
pub type FxRwLockMap<K, V> = RwLockMap<K, V, fxhash::FxBuildHasher>;

/// A concurrent map guarded by one reader/writer lock
///
/// # Type Parameters
///
/// * `K` - The key type, must implement `Hash + Eq`
/// * `V` - The value type; `load` and `range` hand out clones
/// * `S` - The hasher builder, `RandomState` by default
///
/// # Range isolation
///
/// [`range`](ConcurrentMap::range) iterates over a snapshot copied under the shared lock.
/// Entries inserted or deleted while the callback runs are not observed, and the callback
/// may freely call back into the same map, writes included.
///
/// # Examples
///
/// ```rust
/// use twinmap::{ConcurrentMap, RwLockMap};
///
/// let map: RwLockMap<i32, String> = RwLockMap::new();
/// assert_eq!(map.load_or_store(1, "a".to_string()), ("a".to_string(), false));
/// assert_eq!(map.load_or_store(1, "b".to_string()), ("a".to_string(), true));
/// assert_eq!(map.load_and_delete(&1), Some("a".to_string()));
/// assert_eq!(map.load_and_delete(&1), None);
/// ```
pub struct RwLockMap<K, V, S = RandomState> {
    store: RwLock<HashMap<K, V, S>>,
}

impl<K, V> RwLockMap<K, V, RandomState> {
    /// Create an empty map
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Create an empty map with room for at least `capacity` entries before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> RwLockMap<K, V, S> {
    /// Create an empty map that hashes keys with `hasher`
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            store: RwLock::new(HashMap::with_hasher(hasher)),
        }
    }

    /// Create an empty map with the given capacity and hasher
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            store: RwLock::new(HashMap::with_capacity_and_hasher(capacity, hasher)),
        }
    }

    /// Consume the map and return the inner `HashMap`
    pub fn into_inner(self) -> HashMap<K, V, S> {
        self.store.into_inner()
    }
}

impl<K, V, S> RwLockMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Copy every entry while holding the shared lock.
    ///
    /// The lock is released before this returns.
    fn snapshot(&self) -> Vec<(K, V)> {
        let store = self.store.read();
        let mut entries = Vec::with_capacity(store.len());
        entries.extend(store.iter().map(|(k, v)| (k.clone(), v.clone())));
        entries
    }
}

impl<K, V, S> ConcurrentMap<K, V> for RwLockMap<K, V, S>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
    S: BuildHasher + Send + Sync,
{
    fn load(&self, key: &K) -> Option<V> {
        self.store.read().get(key).cloned()
    }

    fn store(&self, key: K, value: V) {
        self.store.write().insert(key, value);
    }

    fn load_or_store(&self, key: K, value: V) -> (V, bool) {
        let mut store = self.store.write();
        match store.entry(key) {
            Entry::Occupied(existing) => (existing.get().clone(), true),
            Entry::Vacant(slot) => (slot.insert(value).clone(), false),
        }
    }

    fn load_and_delete(&self, key: &K) -> Option<V> {
        self.store.write().remove(key)
    }

    fn delete(&self, key: &K) {
        self.store.write().remove(key);
    }

    fn range(&self, f: &mut dyn FnMut(&K, &V) -> bool) {
        let entries = self.snapshot();
        let total = entries.len();

        for (visited, (key, value)) in entries.iter().enumerate() {
            if !f(key, value) {
                log::trace!("range stopped by callback after {} of {} entries", visited + 1, total);
                return;
            }
        }
    }

    fn len(&self) -> usize {
        self.store.read().len()
    }
}

impl<K, V, S: Default> Default for RwLockMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> FromIterator<(K, V)> for RwLockMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            store: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl<K, V, S> fmt::Debug for RwLockMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("RwLockMap");
        match self.store.try_read() {
            Some(store) => out.field("len", &store.len()),
            None => out.field("len", &"<locked>"),
        };
        out.finish_non_exhaustive()
    }
}
