//! Time-bounded payload cache
//!
//! The manager decides *when* a stored payload is usable; a [`CacheStore`]
//! decides *how* bytes are kept. Payloads are stored as JSON.

pub mod store;

pub use store::{CacheRecord, CacheStore, FileCacheStore, MemoryCacheStore};

use crate::error::SyncResult;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Deterministic cache key: two logically identical requests map to the same key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: String,
    pub name: String,
}

impl CacheKey {
    /// Key for one sheet of one spreadsheet file
    pub fn for_sheet(file_id: &str, sheet: &str) -> Self {
        Self {
            namespace: file_id.to_string(),
            name: sheet.to_string(),
        }
    }

    /// Key for an arbitrary request URL
    pub fn for_url(url: &str) -> Self {
        Self {
            namespace: "url".to_string(),
            name: url.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Per-call cache behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    pub enabled: bool,
    pub freshness_window_secs: u64,
    pub force_refresh: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            freshness_window_secs: 600,
            force_refresh: false,
        }
    }
}

/// Fetch-or-cache over a [`CacheStore`]
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn CacheStore>,
}

impl CacheManager {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Return a fresh cached value for `key`, or call `loader` and store its result.
    ///
    /// - A cached entry is used only when the cache is enabled, no refresh is forced,
    ///   and the entry is younger than the freshness window.
    /// - Loader errors propagate untouched and leave the cache as it was.
    /// - Unreadable or undecodable entries count as a miss.
    pub fn fetch<T, F>(&self, key: &CacheKey, options: CacheOptions, loader: F) -> SyncResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> SyncResult<T>,
    {
        if options.enabled && !options.force_refresh {
            if let Some(value) = self.lookup(key, options.freshness_window_secs) {
                debug!(key = %key, "cache hit");
                return Ok(value);
            }
            debug!(key = %key, "cache miss");
        }

        let value = loader()?;

        if options.enabled {
            self.save(key, &value);
        }

        Ok(value)
    }

    /// Whether a usable entry exists right now
    pub fn is_fresh(&self, key: &CacheKey, options: CacheOptions) -> bool {
        options.enabled
            && !options.force_refresh
            && self.fresh_record(key, options.freshness_window_secs).is_some()
    }

    /// Drop the entry for `key`
    pub fn invalidate(&self, key: &CacheKey) -> SyncResult<()> {
        self.store.remove(key)?;
        Ok(())
    }

    fn lookup<T: DeserializeOwned>(&self, key: &CacheKey, window_secs: u64) -> Option<T> {
        let record = self.fresh_record(key, window_secs)?;
        match serde_json::from_slice(&record.bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "ignoring corrupt cache entry");
                None
            }
        }
    }

    fn fresh_record(&self, key: &CacheKey, window_secs: u64) -> Option<CacheRecord> {
        let record = match self.store.get(key) {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed");
                return None;
            }
        };

        let age = Utc::now().signed_duration_since(record.timestamp).num_seconds();
        let window = i64::try_from(window_secs).unwrap_or(i64::MAX);
        if age < window {
            Some(record)
        } else {
            debug!(key = %key, age, window, "cache entry expired");
            None
        }
    }

    fn save<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = %e, "could not encode cache entry");
                return;
            }
        };
        if let Err(e) = self.store.put(key, &bytes) {
            warn!(key = %key, error = %e, "cache write failed");
        }
    }
}
