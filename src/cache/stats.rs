//! Response cache counters.

use serde::Serialize;

/// Lookup outcomes for a [`ResponseCache`](crate::cache::ResponseCache).
///
/// An expired entry counts as both an expiration and a miss, since the
/// caller has to go upstream either way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    /// Entries currently held
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of lookups recorded.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Share of lookups served from cache, 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// A lookup for a key with no entry.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// A lookup that found an entry older than its window.
    pub fn record_expired(&mut self) {
        self.expirations += 1;
        self.misses += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
