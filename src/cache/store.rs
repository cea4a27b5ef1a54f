//! Response Cache Module
//!
//! Keyed storage of successful fetch results. An entry is served only while
//! it is younger than the caller's window; there is no size bound and no
//! background sweep, so entries leave only through expiry on lookup,
//! overwrite, or an explicit clear.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

/// Cache handle shared by every fetcher that should see the same entries.
pub type SharedCache<T> = Arc<RwLock<ResponseCache<T>>>;

// == Lookup Result ==
/// Outcome of a freshness-checked lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// A live entry was found
    Fresh(CacheEntry<T>),
    /// An entry existed but its window had elapsed; it has been removed
    Expired,
    /// Nothing stored under the key
    Missing,
}

// == Response Cache ==
/// In-memory map from cache key to the last successful result.
#[derive(Debug)]
pub struct ResponseCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    stats: CacheStats,
}

impl<T> Default for ResponseCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }
}

impl<T: Clone> ResponseCache<T> {
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache behind a shared async lock.
    pub fn shared() -> SharedCache<T> {
        Arc::new(RwLock::new(Self::new()))
    }

    // == Lookup ==
    /// Returns the entry for `key` if it is younger than `cache_time_ms`.
    ///
    /// A stale entry is evicted before returning, so the caller refetches
    /// against an empty slot.
    pub fn lookup(&mut self, key: &str, cache_time_ms: u64, now_ms: u64) -> Lookup<T> {
        match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                debug!(key, "cache miss");
                Lookup::Missing
            }
            Some(entry) if entry.is_fresh(now_ms, cache_time_ms) => {
                let entry = entry.clone();
                self.stats.record_hit();
                debug!(key, "cache hit");
                Lookup::Fresh(entry)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_expired();
                self.stats.set_total_entries(self.entries.len());
                debug!(key, "cache entry expired");
                Lookup::Expired
            }
        }
    }

    // == Insert ==
    /// Stores `data` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, data: T, now_ms: u64) {
        self.entries.insert(key.into(), CacheEntry::new(data, now_ms));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Peek ==
    /// Returns the stored entry without freshness checks or stats updates.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    // == Remove ==
    /// Evicts one entry. Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Evicts every entry and returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.set_total_entries(0);
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
