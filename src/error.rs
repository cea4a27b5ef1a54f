//! Error types for the form gateway
//!
//! Provides the error taxonomy using thiserror, plus the single normalization
//! step that turns any error into one user-facing message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::validation::DuplicateCandidate;

// == User Messages ==
/// Closed set of messages the UI is allowed to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserMessage {
    NetworkError,
    Unauthorized,
    Forbidden,
    NotFound,
    ValidationError,
    ServerError,
    Timeout,
    FileTooLarge,
    UnsupportedFileType,
    SessionExpired,
    /// Fallback for errors outside the taxonomy
    Unexpected,
}

impl UserMessage {
    /// Returns the display string for this message.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserMessage::NetworkError => {
                "Network error. Please check your internet connection and try again."
            }
            UserMessage::Unauthorized => "You are not authorized. Please log in again.",
            UserMessage::Forbidden => "You do not have permission to perform this action.",
            UserMessage::NotFound => "The requested resource was not found.",
            UserMessage::ValidationError => "Please check your input and try again.",
            UserMessage::ServerError => "Server error. Please try again later.",
            UserMessage::Timeout => "Request timed out. Please try again.",
            UserMessage::FileTooLarge => "File size is too large. Maximum size is 5MB.",
            UserMessage::UnsupportedFileType => "File type is not supported.",
            UserMessage::SessionExpired => "Your session has expired. Please log in again.",
            UserMessage::Unexpected => "An unexpected error occurred. Please try again.",
        }
    }
}

impl std::fmt::Display for UserMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// == App Error Enum ==
/// Unified error type for fetches, validation and the HTTP surface.
#[derive(Error, Debug)]
pub enum AppError {
    /// Field-level rejection (400)
    #[error("Validation failed{}: {message}", .field.as_ref().map(|f| format!(" on '{}'", f)).unwrap_or_default())]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// Missing or invalid credentials (401)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Credentials valid but insufficient (403)
    #[error("Not permitted: {0}")]
    Authorization(String),

    /// Credentials were valid once but have lapsed
    #[error("Session expired")]
    SessionExpired,

    /// No response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout
    #[error("{method} {endpoint} timed out")]
    Timeout { endpoint: String, method: String },

    /// Upload rejected because of its size (413)
    #[error("File too large")]
    FileTooLarge,

    /// Upload rejected because of its media type (415)
    #[error("Unsupported file type")]
    UnsupportedFileType,

    /// Request collides with existing records (409)
    #[error("Conflict with {} existing record(s)", .candidates.len())]
    Conflict { candidates: Vec<DuplicateCandidate> },

    /// Envelope came back with `success: false`
    #[error("Request rejected: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    /// Any other non-2xx response
    #[error("{method} {endpoint} failed with status {status}: {message}")]
    Api {
        status: u16,
        endpoint: String,
        method: String,
        message: String,
    },

    /// Named resource does not exist on this gateway
    #[error("Not found: {0}")]
    NotFound(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    // == Normalization ==
    /// Maps this error onto exactly one user-facing message.
    pub fn user_message(&self) -> UserMessage {
        match self {
            AppError::Validation { .. } => UserMessage::ValidationError,
            AppError::Auth(_) => UserMessage::Unauthorized,
            AppError::Authorization(_) => UserMessage::Forbidden,
            AppError::SessionExpired => UserMessage::SessionExpired,
            AppError::Network(_) => UserMessage::NetworkError,
            AppError::Timeout { .. } => UserMessage::Timeout,
            AppError::FileTooLarge => UserMessage::FileTooLarge,
            AppError::UnsupportedFileType => UserMessage::UnsupportedFileType,
            AppError::Conflict { .. } => UserMessage::ValidationError,
            AppError::Rejected { .. } => UserMessage::ServerError,
            AppError::Api { status, .. } => match status {
                400 | 422 => UserMessage::ValidationError,
                401 => UserMessage::Unauthorized,
                403 => UserMessage::Forbidden,
                404 => UserMessage::NotFound,
                408 | 504 => UserMessage::Timeout,
                413 => UserMessage::FileTooLarge,
                415 => UserMessage::UnsupportedFileType,
                500..=599 => UserMessage::ServerError,
                _ => UserMessage::Unexpected,
            },
            AppError::NotFound(_) => UserMessage::NotFound,
            AppError::Internal(_) => UserMessage::Unexpected,
        }
    }

    /// HTTP status used when this error is returned by the gateway itself.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Auth(_) | AppError::SessionExpired => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::Network(_) | AppError::Rejected { .. } => StatusCode::BAD_GATEWAY,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UnsupportedFileType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Normalizes any error into the display string shown to users.
pub fn error_message(err: &AppError) -> &'static str {
    err.user_message().as_str()
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "request failed");

        let status = self.status_code();
        let kind = self.user_message();
        let mut body = json!({
            "error": kind.as_str(),
            "kind": kind,
        });

        match &self {
            AppError::Validation {
                field: Some(field), ..
            } => {
                body["field"] = json!(field);
            }
            AppError::Conflict { candidates } => {
                body["candidates"] = json!(candidates);
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, AppError>;
