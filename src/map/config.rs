//! Backend selection
//!
//! [`MapConfig`] picks a backend at construction time and hands back a boxed
//! [`ConcurrentMap`], so the caller never names the concrete type.
//!
//! ```rust
//! use twinmap::{Backend, ConcurrentMap, MapConfig};
//!
//! let map = MapConfig::new()
//!     .backend(Backend::Locked)
//!     .capacity(1024)
//!     .build::<u64, String>();
//!
//! map.store(1, "one".to_string());
//! assert_eq!(map.len(), 1);
//! ```

use crate::map::{ConcurrentMap, CountedMap, RwLockMap};
use crate::{Error, Result};
use core::fmt;
use core::hash::Hash;
use core::str::FromStr;

/// Environment variable read by [`MapConfig::from_env`] for the backend name
pub const BACKEND_ENV: &str = "TWINMAP_BACKEND";

/// Environment variable read by [`MapConfig::from_env`] for the initial capacity
pub const CAPACITY_ENV: &str = "TWINMAP_CAPACITY";

/// Which concurrency strategy backs a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase", try_from = "String"))]
pub enum Backend {
    /// [`RwLockMap`]: one reader/writer lock, snapshot `range`
    #[default]
    Locked,
    /// [`CountedMap`]: `DashMap` plus an atomic counter, live `range`
    Counted,
    /// A map that drops every write and reports itself empty
    Disabled,
}

impl Backend {
    /// Every backend, in declaration order
    pub const ALL: [Backend; 3] = [Backend::Locked, Backend::Counted, Backend::Disabled];

    /// Canonical lowercase name, as accepted by [`FromStr`]
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Locked => "locked",
            Backend::Counted => "counted",
            Backend::Disabled => "disabled",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "locked" | "rwlock" => Ok(Backend::Locked),
            "counted" | "dashmap" => Ok(Backend::Counted),
            "disabled" => Ok(Backend::Disabled),
            _ => Err(Error::UnknownBackend(s.to_string())),
        }
    }
}

// Deserialization accepts exactly what `FromStr` accepts
impl TryFrom<String> for Backend {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Construction parameters for a backend-agnostic map
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    /// Backend to build
    pub backend: Backend,
    /// Entries to reserve room for up front; `0` leaves the backend's default
    pub capacity: usize,
}

impl MapConfig {
    /// Locked backend, no preallocation
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the initial capacity
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Read the configuration from `TWINMAP_BACKEND` and `TWINMAP_CAPACITY`
    ///
    /// Unset variables keep their defaults; set but malformed ones are an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(BACKEND_ENV) {
            config.backend = raw.parse()?;
        }
        if let Some(raw) = lookup(CAPACITY_ENV) {
            config.capacity = raw
                .trim()
                .parse()
                .map_err(|_| Error::InvalidCapacity(raw.clone()))?;
        }

        Ok(config)
    }

    /// Build an empty map for this configuration
    pub fn build<K, V>(&self) -> Box<dyn ConcurrentMap<K, V>>
    where
        K: Hash + Eq + Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        log::debug!(
            "building {} map with capacity {}",
            self.backend,
            self.capacity
        );

        match self.backend {
            Backend::Locked => Box::new(RwLockMap::<K, V>::with_capacity(self.capacity)),
            Backend::Counted => Box::new(CountedMap::<K, V>::with_capacity(self.capacity)),
            Backend::Disabled => Box::new(None::<RwLockMap<K, V>>),
        }
    }
}

/// Build an empty map on `backend` with default capacity
///
/// # Examples
///
/// ```rust
/// use twinmap::{new_map, Backend, ConcurrentMap};
///
/// for backend in Backend::ALL {
///     let map = new_map::<i32, &str>(backend);
///     let (actual, loaded) = map.load_or_store(1, "a");
///     assert_eq!((actual, loaded), ("a", false));
/// }
/// ```
pub fn new_map<K, V>(backend: Backend) -> Box<dyn ConcurrentMap<K, V>>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    MapConfig::new().backend(backend).build()
}
