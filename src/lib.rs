//! # twinmap
//!
//! One concurrent key/value contract, two interchangeable backends.
//!
//! ## Backends
//!
//! - **[`RwLockMap`]**: a `HashMap` behind a single reader/writer lock. `range` walks a
//!   point-in-time snapshot.
//! - **[`CountedMap`]**: a [`dashmap::DashMap`] with an atomic live-entry counter layered on
//!   top, so `len` is exact and O(1). `range` may observe concurrent mutation.
//!
//! Both implement [`ConcurrentMap`], so application code can be written once and pick a
//! backend at construction time through [`Backend`] or [`MapConfig`].
//!
//! ## Quick Start
//!
//! ```rust
//! use twinmap::{new_map, Backend, ConcurrentMap};
//!
//! let map = new_map::<&str, i32>(Backend::Counted);
//! map.store("foo", 1);
//! assert_eq!(map.load(&"foo"), Some(1));
//! assert_eq!(map.load_or_store("foo", 2), (1, true));
//! assert_eq!(map.len(), 1);
//! ```
//!
//! ## Thread Safety
//!
//! Every backend synchronizes internally. A map can be shared across threads behind an
//! `Arc` with no additional locking.
//!
//! ## Disabled maps
//!
//! `Option<M>` implements [`ConcurrentMap`] whenever `M` does. `None` behaves as a disabled
//! placeholder: reads report absence, writes are dropped and `len` is zero.

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod map;

pub use crate::map::{
    new_map, Backend, ConcurrentMap, CountedMap, FxCountedMap, FxRwLockMap, MapConfig, RwLockMap,
};

/// Common utilities and helper types
pub mod util {
    use core::ops::Deref;

    /// Cache line size for alignment purposes
    pub const CACHE_LINE_SIZE: usize = 64;

    /// Pad a value to its own cache line
    ///
    /// Used to keep hot atomics such as the live-entry counter from sharing a line with the
    /// map state next to them.
    #[repr(align(64))]
    #[derive(Default)]
    pub struct CachePadded<T> {
        value: T,
    }

    impl<T> CachePadded<T> {
        /// Create a new cache-padded value
        #[inline]
        pub const fn new(value: T) -> Self {
            Self { value }
        }

        /// Get the inner value
        #[inline]
        pub fn into_inner(self) -> T {
            self.value
        }
    }

    impl<T> Deref for CachePadded<T> {
        type Target = T;

        #[inline]
        fn deref(&self) -> &T {
            &self.value
        }
    }

    impl<T: core::fmt::Debug> core::fmt::Debug for CachePadded<T> {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            core::fmt::Debug::fmt(&self.value, f)
        }
    }
}

/// Error types for twinmap configuration
///
/// Map operations themselves never fail; absence is reported through `Option` and `bool`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The backend name did not match any known backend
    UnknownBackend(String),
    /// The capacity could not be parsed as a non-negative integer
    InvalidCapacity(String),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::UnknownBackend(name) => write!(f, "Unknown map backend: {name:?}"),
            Error::InvalidCapacity(raw) => write!(f, "Invalid map capacity: {raw:?}"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type for twinmap operations
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cache_padded_alignment() {
        assert_eq!(core::mem::align_of::<util::CachePadded<u8>>(), util::CACHE_LINE_SIZE);
        assert!(core::mem::size_of::<util::CachePadded<AtomicUsize>>() >= util::CACHE_LINE_SIZE);
    }

    #[test]
    fn test_cache_padded_deref() {
        let padded = util::CachePadded::new(AtomicUsize::new(41));
        padded.fetch_add(1, Ordering::Relaxed);
        assert_eq!(padded.load(Ordering::Relaxed), 42);
        assert_eq!(padded.into_inner().into_inner(), 42);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::UnknownBackend("btree".to_string()).to_string(),
            "Unknown map backend: \"btree\""
        );
        assert_eq!(
            Error::InvalidCapacity("-1".to_string()).to_string(),
            "Invalid map capacity: \"-1\""
        );
    }
}
