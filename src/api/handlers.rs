//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::info;

use crate::cache::{Clock, ResponseCache, SharedCache, SystemClock};
use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fetch::{FetchCache, FetchOptions};
use crate::models::{
    ClearCacheResponse, HealthResponse, ReferenceResponse, SchemasResponse, ScreenRequest,
    StatsResponse, ValidateResponse,
};
use crate::validation::{
    sanitize_and_validate, schemas, screen_registration, validate_field, FieldPattern, FieldRule,
    FieldValue, FormValues, RegistrationOutcome,
};

static RESOURCE_RULE: Lazy<FieldRule> = Lazy::new(|| {
    FieldRule::new()
        .required()
        .max_length(64)
        .pattern(FieldPattern::new(r"[A-Za-z0-9_-]+").expect("resource pattern must compile"))
        .message("Resource names may only contain letters, digits, '-' and '_'")
});

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream backend client
    pub client: ApiClient,
    /// Reference data cache shared by every request
    pub reference_cache: SharedCache<Value>,
    /// Time source for cache freshness
    pub clock: Arc<dyn Clock>,
    /// Freshness window for reference data
    pub reference_cache_ttl_ms: u64,
}

impl AppState {
    /// Creates a new AppState with an empty cache and the system clock.
    pub fn new(client: ApiClient, reference_cache_ttl_ms: u64) -> Self {
        Self {
            client,
            reference_cache: ResponseCache::shared(),
            clock: Arc::new(SystemClock),
            reference_cache_ttl_ms,
        }
    }

    /// Replaces the clock, e.g. to control expiry in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ApiClient::new(
            config.upstream_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(client, config.reference_cache_ttl_ms))
    }
}

fn check_resource(resource: &str) -> Result<()> {
    let value = FieldValue::from(resource);
    match validate_field("resource", Some(&value), &RESOURCE_RULE) {
        Some(message) => Err(AppError::Validation {
            field: Some("resource".to_string()),
            message,
        }),
        None => Ok(()),
    }
}

/// Handler for POST /validate/:form
///
/// Sanitizes and validates a submitted form against a built-in schema.
pub async fn validate_handler(
    Path(form): Path<String>,
    Json(values): Json<FormValues>,
) -> Result<Json<ValidateResponse>> {
    let schema =
        schemas::lookup(&form).ok_or_else(|| AppError::NotFound(format!("form '{}'", form)))?;

    let (cleaned, result) = sanitize_and_validate(&values, schema);
    Ok(Json(ValidateResponse::new(form, cleaned, result)))
}

/// Handler for POST /patients/screen
///
/// Validates a registration and checks it against existing patients.
pub async fn screen_handler(Json(req): Json<ScreenRequest>) -> Json<RegistrationOutcome> {
    Json(screen_registration(&req.values, &req.existing))
}

/// Handler for GET /reference/:resource
///
/// Serves reference data from the upstream backend through the shared cache.
/// Upstream failures are reported in the body's `state` and `error` fields.
pub async fn reference_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> Result<Json<ReferenceResponse>> {
    check_resource(&resource)?;

    let client = state.client.clone();
    let path = resource.clone();
    let operation = move || {
        let client = client.clone();
        let path = path.clone();
        async move { client.get::<Value>(&path).await }
    };

    let options = FetchOptions::new()
        .cache_key(resource.clone())
        .cache_time_ms(state.reference_cache_ttl_ms);
    let mut fetcher = FetchCache::new(operation, options)
        .with_cache(state.reference_cache.clone())
        .with_clock(state.clock.clone());

    fetcher.execute().await;

    Ok(Json(ReferenceResponse::new(resource, fetcher.snapshot())))
}

/// Handler for GET /stats
///
/// Returns reference cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.reference_cache.read().await;
    Json(StatsResponse::from(cache.stats()))
}

/// Handler for DELETE /cache/:resource
pub async fn clear_resource_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> Result<Json<ClearCacheResponse>> {
    check_resource(&resource)?;

    let removed = state.reference_cache.write().await.remove(&resource);
    info!(resource = %resource, removed, "reference cache entry cleared");

    Ok(Json(ClearCacheResponse::new(&resource, usize::from(removed))))
}

/// Handler for DELETE /cache
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let removed = state.reference_cache.write().await.clear();
    info!(removed, "reference cache cleared");

    Json(ClearCacheResponse::new("all resources", removed))
}

/// Handler for GET /schemas
pub async fn schemas_handler() -> Json<SchemasResponse> {
    Json(SchemasResponse {
        schemas: schemas::names(),
    })
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
