//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_all_handler, clear_resource_handler, health_handler, reference_handler,
    schemas_handler, screen_handler, stats_handler, validate_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, since the browser front end is served elsewhere
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/schemas", get(schemas_handler))
        .route("/validate/:form", post(validate_handler))
        .route("/patients/screen", post(screen_handler))
        .route("/reference/:resource", get(reference_handler))
        .route("/stats", get(stats_handler))
        .route("/cache", delete(clear_all_handler))
        .route("/cache/:resource", delete(clear_resource_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
