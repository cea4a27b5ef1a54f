//! Tagged result envelope returned by the upstream backend.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

// == Api Envelope ==
/// `{ success, data, message }` wrapper used by every backend endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    /// Absent or `null` on endpoints with nothing to return
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Failed envelope with an explanatory message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Converts the tag into a `Result`. A successful envelope may carry
    /// no payload.
    pub fn into_result(self) -> Result<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(AppError::Rejected {
                message: self.message,
            })
        }
    }
}
