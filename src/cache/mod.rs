//! Cache Module
//!
//! Keyed in-memory response cache with time-to-live freshness checks.

mod clock;
mod entry;
mod stats;
mod store;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::{Lookup, ResponseCache, SharedCache};

// == Public Constants ==
/// Default freshness window in milliseconds (5 minutes)
pub const DEFAULT_CACHE_TIME_MS: u64 = 5 * 60 * 1000;
