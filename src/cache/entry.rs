//! Cache Entry Module
//!
//! A cached payload stamped with the time it was fetched.

use serde::Serialize;

// == Cache Entry ==
/// A successful fetch result and when it was stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Store timestamp (Unix milliseconds)
    pub timestamp: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry stamped at `now_ms`.
    pub fn new(data: T, now_ms: u64) -> Self {
        Self {
            data,
            timestamp: now_ms,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was stored.
    ///
    /// Saturates at zero if the clock moved backwards.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp)
    }

    // == Is Fresh ==
    /// Checks whether the entry may still be served.
    ///
    /// Boundary condition: an entry is fresh only while its age is strictly
    /// below the window, so at exactly `cache_time_ms` it is already stale.
    pub fn is_fresh(&self, now_ms: u64, cache_time_ms: u64) -> bool {
        self.age_ms(now_ms) < cache_time_ms
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("wards".to_string(), 1_000);

        assert_eq!(entry.data, "wards");
        assert_eq!(entry.timestamp, 1_000);
    }

    #[test]
    fn test_entry_fresh_within_window() {
        let entry = CacheEntry::new(1, 0);

        assert!(entry.is_fresh(0, 2_000));
        assert!(entry.is_fresh(1_999, 2_000));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(1, 0);

        assert!(!entry.is_fresh(2_000, 2_000), "Entry should be stale at boundary");
        assert!(!entry.is_fresh(2_500, 2_000));
    }

    #[test]
    fn test_zero_window_never_fresh() {
        let entry = CacheEntry::new(1, 500);
        assert!(!entry.is_fresh(500, 0));
    }

    #[test]
    fn test_age_saturates_when_clock_goes_backwards() {
        let entry = CacheEntry::new(1, 5_000);
        assert_eq!(entry.age_ms(4_000), 0);
        assert!(entry.is_fresh(4_000, 1));
    }
}
