//! Keyed in-memory store with per-entry expiry.
//!
//! Used to keep loaded catalogs around between linking calls. The clock is
//! injected so expiry can be driven deterministically in tests.

use crate::catalog::load_entities;
use crate::error::LinkerError;
use crate::models::Entity;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Time source for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Thread-safe key/value store whose entries expire `ttl` after insertion.
///
/// A zero `ttl` disables storage: `set` is a no-op and every `get` misses.
pub struct TtlCache<K, V, C = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

/// Cache of parsed catalog files keyed by path.
pub type CatalogCache = TtlCache<PathBuf, Arc<Vec<Entity>>>;

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache measuring expiry with the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash,
    V: Clone,
    C: Clock,
{
    /// Create a cache measuring expiry with `clock`.
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<K, CacheEntry<V>>>, LinkerError> {
        self.entries.lock().map_err(|_| LinkerError::CachePoisoned)
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) < self.ttl
    }

    /// Fetch a live value, evicting it first if it has expired.
    ///
    /// # Errors
    /// Returns [`LinkerError::CachePoisoned`] when the cache mutex is poisoned.
    pub fn get(&self, key: &K) -> Result<Option<V>, LinkerError> {
        let now = self.clock.now();
        let mut entries = self.entries()?;
        let expired = match entries.get(key) {
            Some(entry) if self.is_fresh(entry, now) => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    /// Store `value` under `key`, restarting its lifetime.
    ///
    /// # Errors
    /// Returns [`LinkerError::CachePoisoned`] when the cache mutex is poisoned.
    pub fn set(&self, key: K, value: V) -> Result<(), LinkerError> {
        if self.ttl.is_zero() {
            return Ok(());
        }
        let stored_at = self.clock.now();
        self.entries()?.insert(key, CacheEntry { value, stored_at });
        Ok(())
    }

    /// Return `true` when `key` holds a value that has not expired.
    pub fn is_valid(&self, key: &K) -> Result<bool, LinkerError> {
        let now = self.clock.now();
        Ok(self
            .entries()?
            .get(key)
            .map(|entry| self.is_fresh(entry, now))
            .unwrap_or(false))
    }

    /// Drop one entry.
    ///
    /// # Returns
    /// `Ok(true)` when an entry (live or expired) was removed.
    pub fn invalidate(&self, key: &K) -> Result<bool, LinkerError> {
        Ok(self.entries()?.remove(key).is_some())
    }

    /// Drop every entry.
    pub fn clear(&self) -> Result<(), LinkerError> {
        self.entries()?.clear();
        Ok(())
    }

    /// Return the cached value for `key`, or run `load` and cache its result.
    ///
    /// `load` runs without the cache lock held, so two callers racing on the
    /// same cold key may both load; the later `set` wins.
    ///
    /// # Errors
    /// Propagates errors from `load` (nothing is cached in that case) and
    /// [`LinkerError::CachePoisoned`].
    pub fn get_or_try_insert_with<F>(&self, key: K, load: F) -> Result<V, LinkerError>
    where
        F: FnOnce() -> Result<V, LinkerError>,
    {
        if let Some(value) = self.get(&key)? {
            return Ok(value);
        }
        let value = load()?;
        self.set(key, value.clone())?;
        Ok(value)
    }
}

/// Load a catalog file through `cache`, reading the file only on a miss.
///
/// # Errors
/// Returns the errors of [`load_entities`] and [`LinkerError::CachePoisoned`].
pub fn load_entities_cached<C: Clock>(
    cache: &TtlCache<PathBuf, Arc<Vec<Entity>>, C>,
    path: &Path,
) -> Result<Arc<Vec<Entity>>, LinkerError> {
    cache.get_or_try_insert_with(path.to_path_buf(), || {
        tracing::debug!("Catalog cache miss for {}", path.display());
        load_entities(path).map(Arc::new)
    })
}
