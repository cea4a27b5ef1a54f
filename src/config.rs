//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::DEFAULT_CACHE_TIME_MS;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the hospital REST backend
    pub upstream_url: String,
    /// Freshness window in milliseconds for cached reference data
    pub reference_cache_ttl_ms: u64,
    /// Upstream request timeout in seconds
    pub request_timeout_secs: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_URL` - Backend base URL (default: http://127.0.0.1:5000/api)
    /// - `REFERENCE_CACHE_TTL_MS` - Reference data cache window (default: 300000)
    /// - `REQUEST_TIMEOUT_SECS` - Upstream request timeout (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            upstream_url: env::var("UPSTREAM_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.upstream_url),
            reference_cache_ttl_ms: env_or(
                "REFERENCE_CACHE_TTL_MS",
                defaults.reference_cache_ttl_ms,
            ),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            upstream_url: "http://127.0.0.1:5000/api".to_string(),
            reference_cache_ttl_ms: DEFAULT_CACHE_TIME_MS,
            request_timeout_secs: 30,
        }
    }
}
