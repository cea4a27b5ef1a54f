//! API Module
//!
//! HTTP handlers and routing for the form gateway.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /schemas` - List built-in form schemas
//! - `POST /validate/:form` - Sanitize and validate a form submission
//! - `POST /patients/screen` - Screen a patient registration for duplicates
//! - `GET /reference/:resource` - Cached reference data from the backend
//! - `GET /stats` - Reference cache statistics
//! - `DELETE /cache` - Clear every cached resource
//! - `DELETE /cache/:resource` - Clear one cached resource

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
