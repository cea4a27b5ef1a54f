//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::fetch::{FetchSnapshot, RequestState};
use crate::validation::{FormValues, ValidationResult};

/// Response body for `POST /validate/:form`
#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub form: String,
    pub valid: bool,
    /// Field name to message, only for fields that failed
    pub errors: BTreeMap<String, String>,
    /// Submitted values after whitespace trimming
    pub values: FormValues,
}

impl ValidateResponse {
    pub fn new(form: impl Into<String>, values: FormValues, result: ValidationResult) -> Self {
        Self {
            form: form.into(),
            valid: result.is_valid,
            errors: result.errors,
            values,
        }
    }
}

/// Response body for `GET /reference/:resource`
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceResponse {
    pub resource: String,
    pub state: RequestState,
    pub data: Option<Value>,
    pub error: Option<String>,
    /// Unix milliseconds of the data returned
    pub last_fetched: Option<u64>,
    /// `last_fetched` in RFC 3339, for humans
    pub last_fetched_at: Option<String>,
}

impl ReferenceResponse {
    pub fn new(resource: impl Into<String>, snapshot: FetchSnapshot<Value>) -> Self {
        let last_fetched_at = snapshot
            .last_fetched
            .and_then(|ms| chrono::DateTime::from_timestamp_millis(ms as i64))
            .map(|dt| dt.to_rfc3339());

        Self {
            resource: resource.into(),
            state: snapshot.state,
            data: snapshot.data,
            error: snapshot.error,
            last_fetched: snapshot.last_fetched,
            last_fetched_at,
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for `DELETE /cache` and `DELETE /cache/:resource`
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    pub message: String,
    pub removed: usize,
}

impl ClearCacheResponse {
    pub fn new(scope: &str, removed: usize) -> Self {
        let noun = if removed == 1 { "entry" } else { "entries" };
        Self {
            message: format!("Cleared {} cache {} for {}", removed, noun, scope),
            removed,
        }
    }
}

/// Response body for `GET /schemas`
#[derive(Debug, Clone, Serialize)]
pub struct SchemasResponse {
    pub schemas: Vec<&'static str>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
