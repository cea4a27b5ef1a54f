//! HMS Forms - Validation and reference-data gateway for a hospital front end
//!
//! Provides declarative form validation, duplicate-patient screening, and a
//! keyed TTL cache in front of the hospital REST backend.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod validation;

pub use api::AppState;
pub use client::ApiClient;
pub use config::Config;
pub use error::{AppError, UserMessage};
pub use fetch::{FetchCache, FetchOptions, RequestState};
pub use validation::{validate_form, ValidationResult, ValidationSchema};
