//! Backend client error types.

use axum::http::StatusCode;

/// Errors from backend calls.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The configured base URL does not parse.
    #[error("invalid backend base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build backend HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connect, timeout or transport failure.
    #[error("could not reach backend {endpoint}: {source}")]
    Unreachable {
        endpoint: String,
        source: reqwest::Error,
    },

    /// Backend returned a non-2xx status with a JSON (or empty) body.
    #[error("backend {endpoint} returned {status}")]
    Rejected {
        endpoint: String,
        status: StatusCode,
        message: Option<String>,
    },

    /// Backend returned something other than the JSON that was expected.
    #[error("backend {endpoint} returned a non-JSON response with status {status}")]
    Malformed { endpoint: String, status: StatusCode },

    /// Request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl BackendError {
    /// Whether the failure happened before the backend produced a response.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}
