//! Request and Response models for the gateway API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ScreenRequest;
pub use responses::{
    ClearCacheResponse, HealthResponse, ReferenceResponse, SchemasResponse, StatsResponse,
    ValidateResponse,
};
