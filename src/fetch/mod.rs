//! Fetch Module
//!
//! Wraps an asynchronous data source with request-state tracking, error
//! normalization, and optional time-windowed caching per key.

mod envelope;
mod fetcher;
mod state;

#[cfg(test)]
mod property_tests;

pub use envelope::ApiEnvelope;
pub use fetcher::{FetchCache, FetchOptions, FetchSnapshot};
pub use state::RequestState;
