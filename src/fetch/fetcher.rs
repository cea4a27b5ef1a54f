//! Fetch Cache Module
//!
//! Runs a zero-argument async operation and publishes `{data, state, error,
//! last_fetched}`. With a cache key configured, successful results are kept
//! in a [`ResponseCache`] and reused while younger than the cache window.
//!
//! `execute` borrows the fetcher mutably, so two executions of the same
//! instance can never overlap. Dropping an in-flight `execute` future cancels
//! it: the operation's eventual result is never observed and nothing is
//! written to the cache, while the published state stays `Loading` until the
//! next `execute`.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{
    Clock, Lookup, ResponseCache, SharedCache, SystemClock, DEFAULT_CACHE_TIME_MS,
};
use crate::error::{Result, UserMessage};
use crate::fetch::{ApiEnvelope, RequestState};

// == Fetch Options ==
/// Per-instance fetch configuration.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Key under which successful results are cached; `None` disables caching
    pub cache_key: Option<String>,
    /// Freshness window in milliseconds
    pub cache_time_ms: u64,
    /// Run on mount and whenever the dependency list changes
    pub immediate: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            cache_key: None,
            cache_time_ms: DEFAULT_CACHE_TIME_MS,
            immediate: true,
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn cache_time_ms(mut self, ms: u64) -> Self {
        self.cache_time_ms = ms;
        self
    }

    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }
}

// == Fetch Snapshot ==
/// Point-in-time copy of what a fetcher publishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchSnapshot<T> {
    pub data: Option<T>,
    pub state: RequestState,
    pub error: Option<String>,
    /// Unix milliseconds of the data currently published
    pub last_fetched: Option<u64>,
}

// == Fetch Cache ==
/// Data fetcher with loading-state tracking and a keyed TTL cache.
pub struct FetchCache<T, F> {
    operation: F,
    options: FetchOptions,
    cache: SharedCache<T>,
    clock: Arc<dyn Clock>,
    data: Option<T>,
    state: RequestState,
    error: Option<UserMessage>,
    last_fetched: Option<u64>,
    dependencies: Vec<Value>,
}

impl<T, F, Fut> FetchCache<T, F>
where
    T: Clone,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ApiEnvelope<T>>>,
{
    // == Constructor ==
    /// Creates a fetcher with its own private cache and the system clock.
    pub fn new(operation: F, options: FetchOptions) -> Self {
        Self {
            operation,
            options,
            cache: ResponseCache::shared(),
            clock: Arc::new(SystemClock),
            data: None,
            state: RequestState::Idle,
            error: None,
            last_fetched: None,
            dependencies: Vec::new(),
        }
    }

    /// Uses `cache` instead of a private one, so fetchers can share entries.
    pub fn with_cache(mut self, cache: SharedCache<T>) -> Self {
        self.cache = cache;
        self
    }

    /// Uses `clock` for freshness checks and timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the initial dependency list without triggering a fetch.
    pub fn with_dependencies(mut self, dependencies: Vec<Value>) -> Self {
        self.dependencies = dependencies;
        self
    }

    // == Execute ==
    /// Fetches, or serves a fresh cache entry, and settles the state.
    ///
    /// Failures are published as a normalized message and never returned;
    /// the previously published data is kept. A successful envelope without
    /// a payload publishes no data and leaves nothing cached under the key.
    pub async fn execute(&mut self) -> RequestState {
        self.state = RequestState::Loading;
        self.error = None;

        if let Some(key) = self.options.cache_key.clone() {
            let now = self.clock.now_ms();
            let lookup = self
                .cache
                .write()
                .await
                .lookup(&key, self.options.cache_time_ms, now);

            if let Lookup::Fresh(entry) = lookup {
                debug!(key = %key, fetched_at = entry.timestamp, "serving cached data");
                self.data = Some(entry.data);
                self.last_fetched = Some(entry.timestamp);
                self.state = RequestState::Success;
                return self.state;
            }
        }

        let outcome = (self.operation)().await.and_then(ApiEnvelope::into_result);

        match outcome {
            Ok(payload) => {
                let now = self.clock.now_ms();
                if let Some(key) = &self.options.cache_key {
                    let mut cache = self.cache.write().await;
                    match &payload {
                        Some(data) => cache.insert(key.clone(), data.clone(), now),
                        // Nothing to serve later, and older data must not resurface
                        None => {
                            cache.remove(key);
                        }
                    }
                }
                self.data = payload;
                self.last_fetched = Some(now);
                self.state = RequestState::Success;
            }
            Err(err) => {
                let message = err.user_message();
                warn!(
                    error = %err,
                    cache_key = ?self.options.cache_key,
                    "fetch failed: {}",
                    message
                );
                self.error = Some(message);
                self.state = RequestState::Error;
            }
        }

        self.state
    }

    /// Runs `execute` again. Cache rules still apply.
    pub async fn refetch(&mut self) -> RequestState {
        self.execute().await
    }

    // == Lifecycle ==
    /// Performs the initial fetch when configured as immediate.
    pub async fn mount(&mut self) -> Option<RequestState> {
        if self.options.immediate {
            Some(self.execute().await)
        } else {
            None
        }
    }

    /// Replaces the dependency list, refetching if any value changed.
    ///
    /// Returns whether a fetch ran.
    pub async fn set_dependencies(&mut self, dependencies: Vec<Value>) -> bool {
        if dependencies == self.dependencies {
            return false;
        }
        self.dependencies = dependencies;

        if self.options.immediate {
            self.execute().await;
            true
        } else {
            false
        }
    }

    // == Cache Control ==
    /// Evicts this fetcher's cache entry. Published data is untouched.
    pub async fn clear_cache(&self) -> bool {
        match &self.options.cache_key {
            Some(key) => self.cache.write().await.remove(key),
            None => false,
        }
    }

    /// Evicts every entry in the underlying cache. Published data is untouched.
    pub async fn clear_all_cache(&self) -> usize {
        self.cache.write().await.clear()
    }

    // == Accessors ==
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == RequestState::Loading
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error.map(|m| m.as_str())
    }

    pub fn error_kind(&self) -> Option<UserMessage> {
        self.error
    }

    pub fn last_fetched(&self) -> Option<u64> {
        self.last_fetched
    }

    pub fn snapshot(&self) -> FetchSnapshot<T> {
        FetchSnapshot {
            data: self.data.clone(),
            state: self.state,
            error: self.error().map(str::to_string),
            last_fetched: self.last_fetched,
        }
    }
}
