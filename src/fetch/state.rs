//! Request lifecycle state.

use serde::Serialize;

/// Where a fetcher is in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl RequestState {
    /// True once a request has finished, either way.
    pub fn is_settled(&self) -> bool {
        matches!(self, RequestState::Success | RequestState::Error)
    }
}
