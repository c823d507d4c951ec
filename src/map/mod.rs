//! Map implementations
//!
//! This module provides the [`ConcurrentMap`] contract and its two backends.
//!
//! ## Available Maps
//!
//! - [`RwLockMap`]: `HashMap` behind one `parking_lot::RwLock`, snapshot iteration
//! - [`CountedMap`]: `DashMap` plus an atomic live-entry counter, live iteration
//!
//! ## Choosing a Map
//!
//! | Backend | `load` | writes | `len` | `range` view |
//! |---------|--------|--------|-------|--------------|
//! | Locked | shared lock | exclusive lock | O(1) | snapshot, callback may re-enter |
//! | Counted | shard read lock | shard write lock | O(1) atomic | live per key, callback may re-enter |
//!
//! - Use `RwLockMap` when `range` callbacks need a stable point-in-time view
//! - Use `CountedMap` when many threads write to disjoint keys
//! - Use [`Backend::Disabled`] or `Option::None` as a no-op placeholder

pub mod config;
pub mod contract;
pub mod counted;
pub mod locked;

pub use self::config::{new_map, Backend, MapConfig};
pub use self::contract::ConcurrentMap;
pub use self::counted::{CountedMap, FxCountedMap};
pub use self::locked::{FxRwLockMap, RwLockMap};


#[cfg(test)]
mod proptests;
