//! The operation set shared by every backend
//!
//! [`ConcurrentMap`] is object safe, so callers can hold a `Box<dyn ConcurrentMap<K, V>>`
//! and stay agnostic of the backend chosen at construction time.
//!
//! Forwarding impls are provided for `&M`, `Box<M>` and `Arc<M>`, plus `Option<M>`, where
//! `None` acts as a disabled map: every operation has zero effect and never panics.

use std::sync::Arc;

/// A key/value map that is safe to share between threads
///
/// All synchronization is internal. Per-key operations are atomic; no ordering is promised
/// between operations on different keys.
///
/// Values leave the map by clone (`load`, `load_or_store`) or by move (`load_and_delete`).
/// Mutating a returned value does not affect the map.
///
/// # Examples
///
/// ```rust
/// use twinmap::{ConcurrentMap, RwLockMap};
///
/// fn count_visits(map: &dyn ConcurrentMap<String, u32>, page: &str) {
///     let (current, _) = map.load_or_store(page.to_string(), 0);
///     map.store(page.to_string(), current + 1);
/// }
///
/// let map: RwLockMap<String, u32> = RwLockMap::new();
/// count_visits(&map, "/index");
/// assert_eq!(map.load(&"/index".to_string()), Some(1));
/// ```
pub trait ConcurrentMap<K, V>: Send + Sync {
    /// Returns a clone of the value stored for `key`, or `None` if the key is absent.
    fn load(&self, key: &K) -> Option<V>;

    /// Stores `value` for `key`, replacing any existing value.
    fn store(&self, key: K, value: V);

    /// Returns the existing value for `key` if present, otherwise stores `value`.
    ///
    /// The returned flag is `true` when the value was loaded and `false` when this call
    /// stored it. Among callers racing on an absent key exactly one observes `false`; the
    /// others observe that caller's value.
    fn load_or_store(&self, key: K, value: V) -> (V, bool);

    /// Removes `key` and returns its previous value, or `None` if it was absent.
    fn load_and_delete(&self, key: &K) -> Option<V>;

    /// Removes `key`. Does nothing if the key is absent.
    fn delete(&self, key: &K);

    /// Calls `f` for each entry until it returns `false` or every entry has been visited.
    ///
    /// The isolation `f` observes depends on the backend; see [`RwLockMap`] and
    /// [`CountedMap`].
    ///
    /// [`RwLockMap`]: crate::RwLockMap
    /// [`CountedMap`]: crate::CountedMap
    fn range(&self, f: &mut dyn FnMut(&K, &V) -> bool);

    /// Number of live entries.
    fn len(&self) -> usize;

    /// `true` if the map holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! forward_concurrent_map {
    ($($ptr:ty),* $(,)?) => {$(
        impl<K, V, M> ConcurrentMap<K, V> for $ptr
        where
            M: ConcurrentMap<K, V> + ?Sized,
        {
            #[inline]
            fn load(&self, key: &K) -> Option<V> {
                (**self).load(key)
            }

            #[inline]
            fn store(&self, key: K, value: V) {
                (**self).store(key, value)
            }

            #[inline]
            fn load_or_store(&self, key: K, value: V) -> (V, bool) {
                (**self).load_or_store(key, value)
            }

            #[inline]
            fn load_and_delete(&self, key: &K) -> Option<V> {
                (**self).load_and_delete(key)
            }

            #[inline]
            fn delete(&self, key: &K) {
                (**self).delete(key)
            }

            #[inline]
            fn range(&self, f: &mut dyn FnMut(&K, &V) -> bool) {
                (**self).range(f)
            }

            #[inline]
            fn len(&self) -> usize {
                (**self).len()
            }

            #[inline]
            fn is_empty(&self) -> bool {
                (**self).is_empty()
            }
        }
    )*};
}

forward_concurrent_map!(&M, Box<M>, Arc<M>);

/// `None` is a disabled map.
///
/// `load_or_store(k, v)` on a disabled map hands `v` back with `loaded == false` without
/// retaining it.
impl<K, V, M> ConcurrentMap<K, V> for Option<M>
where
    M: ConcurrentMap<K, V>,
{
    fn load(&self, key: &K) -> Option<V> {
        self.as_ref().and_then(|map| map.load(key))
    }

    fn store(&self, key: K, value: V) {
        if let Some(map) = self {
            map.store(key, value);
        }
    }

    fn load_or_store(&self, key: K, value: V) -> (V, bool) {
        match self {
            Some(map) => map.load_or_store(key, value),
            None => (value, false),
        }
    }

    fn load_and_delete(&self, key: &K) -> Option<V> {
        self.as_ref().and_then(|map| map.load_and_delete(key))
    }

    fn delete(&self, key: &K) {
        if let Some(map) = self {
            map.delete(key);
        }
    }

    fn range(&self, f: &mut dyn FnMut(&K, &V) -> bool) {
        if let Some(map) = self {
            map.range(f);
        }
    }

    fn len(&self) -> usize {
        self.as_ref().map_or(0, |map| map.len())
    }
}
