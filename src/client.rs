//! Upstream API Client
//!
//! Thin reqwest wrapper for the hospital REST backend. Every response body is
//! a `{success, data, message}` envelope; transport failures and non-2xx
//! statuses are classified into [`AppError`] with the endpoint and method
//! that produced them.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::fetch::ApiEnvelope;
use crate::validation::DuplicateCandidate;

/// Body codes the backend uses for a lapsed login.
const SESSION_EXPIRED_CODES: [&str; 2] = ["SESSION_EXPIRED", "TOKEN_EXPIRED"];

// == Error Body ==
/// Shape of a non-2xx body; every field is optional.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    duplicates: Vec<DuplicateCandidate>,
}

// == Api Client ==
/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    // == Constructor ==
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // == Requests ==
    /// `GET {base}/{path}`
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiEnvelope<T>> {
        self.send::<T, ()>(Method::GET, path, None).await
    }

    /// `POST {base}/{path}` with a JSON body
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiEnvelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let endpoint = format!("/{}", path.trim_start_matches('/'));
        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(method = %method, endpoint = %endpoint, "upstream request");

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, &endpoint, &method))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ApiEnvelope<T>>()
                .await
                .map_err(|e| AppError::Api {
                    status: status.as_u16(),
                    endpoint,
                    method: method.to_string(),
                    message: format!("malformed response body: {}", e),
                });
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        Err(status_error(status, body, endpoint, &method))
    }
}

// == Classification ==
fn transport_error(err: reqwest::Error, endpoint: &str, method: &Method) -> AppError {
    if err.is_timeout() {
        AppError::Timeout {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    } else {
        AppError::Network(format!("{} {}: {}", method, endpoint, err))
    }
}

fn status_error(
    status: StatusCode,
    body: ErrorBody,
    endpoint: String,
    method: &Method,
) -> AppError {
    let message = body
        .message
        .clone()
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    match status {
        StatusCode::BAD_REQUEST => AppError::Validation {
            field: body.field,
            message,
        },
        StatusCode::UNAUTHORIZED => {
            let expired = body
                .code
                .as_deref()
                .is_some_and(|c| SESSION_EXPIRED_CODES.contains(&c));
            if expired {
                AppError::SessionExpired
            } else {
                AppError::Auth(message)
            }
        }
        StatusCode::FORBIDDEN => AppError::Authorization(message),
        StatusCode::CONFLICT => AppError::Conflict {
            candidates: body.duplicates,
        },
        StatusCode::PAYLOAD_TOO_LARGE => AppError::FileTooLarge,
        StatusCode::UNSUPPORTED_MEDIA_TYPE => AppError::UnsupportedFileType,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => AppError::Timeout {
            endpoint,
            method: method.to_string(),
        },
        _ => AppError::Api {
            status: status.as_u16(),
            endpoint,
            method: method.to_string(),
            message,
        },
    }
}
