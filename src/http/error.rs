//! Error translation for route handlers.
//!
//! Every handler returns `Result<_, ApiError>`. Failures become the uniform
//! envelope `{ "error": "<message>" }` with a status chosen by variant:
//!
//! | Variant              | Status                   |
//! |----------------------|--------------------------|
//! | `Unauthorized`       | 401                      |
//! | `Validation`         | 400                      |
//! | `NotFound`           | 404                      |
//! | `MethodNotAllowed`   | 405                      |
//! | `Timeout`            | 408                      |
//! | `PayloadTooLarge`    | 413                      |
//! | `Upstream`           | backend status, passed on |
//! | `BackendUnreachable` | 502                      |
//! | `Internal`           | 500                      |
//! | `Status`             | as given                 |
//!
//! Internal details are logged, never returned to the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::BackendError;
use crate::validation::ValidationError;

/// Message returned whenever the backend cannot be reached.
pub const BACKEND_UNREACHABLE_MESSAGE: &str = "Could not connect to backend server";

/// JSON body of every failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

/// Application-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Request body or parameters failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// No route for the requested path.
    #[error("not found: {0}")]
    NotFound(String),

    /// Route exists but not for this method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The request did not complete within the gateway deadline.
    #[error("request timed out")]
    Timeout,

    /// The request body exceeds the configured limit.
    #[error("request body too large")]
    PayloadTooLarge,

    /// The backend rejected the call; its status is relayed.
    #[error("backend returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    /// Network-level failure reaching the backend. Holds the log detail.
    #[error("backend unreachable: {0}")]
    BackendUnreachable(String),

    /// Anything else. Holds the message shown to the caller.
    #[error("internal error: {0}")]
    Internal(String),

    /// A bare status produced outside the handlers.
    #[error("request failed with {0}")]
    Status(StatusCode),
}

impl ApiError {
    /// Translate a backend failure, using `fallback` as the caller-facing
    /// message when the backend did not supply one.
    pub fn from_backend(err: BackendError, fallback: &str) -> Self {
        match err {
            BackendError::Unreachable { .. } => Self::BackendUnreachable(err.to_string()),
            BackendError::Rejected {
                status, message, ..
            } => Self::Upstream {
                status,
                message: message.unwrap_or_else(|| fallback.to_string()),
            },
            other => {
                tracing::error!(error = %other, "backend call failed");
                Self::Internal(fallback.to_string())
            }
        }
    }

    /// Status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream { status, .. } => *status,
            Self::BackendUnreachable(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Status(status) => *status,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Unauthorized(msg)
            | Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Upstream { message, .. } => message.clone(),
            Self::BackendUnreachable(_) => BACKEND_UNREACHABLE_MESSAGE.to_string(),
            Self::MethodNotAllowed => "Method not allowed".to_string(),
            Self::Timeout => "Request timed out".to_string(),
            Self::PayloadTooLarge => "Request body too large".to_string(),
            Self::Status(status) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        Self::from_backend(err, "Internal server error")
    }
}

impl ApiError {
    /// Error for a status emitted by a layer rather than a handler.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::METHOD_NOT_ALLOWED => Self::MethodNotAllowed,
            StatusCode::REQUEST_TIMEOUT => Self::Timeout,
            StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge,
            other => Self::Status(other),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::BackendUnreachable(_) => tracing::error!(error = %self, "backend unreachable"),
            Self::Upstream { .. } => tracing::warn!(error = %self, "backend rejected request"),
            _ => tracing::debug!(error = %self, "request rejected"),
        }

        let body = ErrorEnvelope {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_bad_request() {
        let err = ApiError::from(ValidationError::InvalidPhone);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Invalid phone number format");
    }

    #[test]
    fn rejected_keeps_backend_status_and_message() {
        let err = ApiError::from_backend(
            BackendError::Rejected {
                endpoint: "/api/employees".into(),
                status: StatusCode::CONFLICT,
                message: Some("Email already registered".into()),
            },
            "Registration failed",
        );
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.public_message(), "Email already registered");
    }

    #[test]
    fn rejected_without_message_uses_fallback() {
        let err = ApiError::from_backend(
            BackendError::Rejected {
                endpoint: "/api/employees".into(),
                status: StatusCode::FORBIDDEN,
                message: None,
            },
            "Failed to fetch employees",
        );
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.public_message(), "Failed to fetch employees");
    }

    #[test]
    fn malformed_hides_detail() {
        let err = ApiError::from_backend(
            BackendError::Malformed {
                endpoint: "/api/finance/tax-declarations".into(),
                status: StatusCode::OK,
            },
            "Failed to fetch tax declarations",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to fetch tax declarations");
    }

    #[test]
    fn layer_statuses_get_messages() {
        let err = ApiError::from_status(StatusCode::REQUEST_TIMEOUT);
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(err.public_message(), "Request timed out");

        let err = ApiError::from_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.public_message(), "Unsupported Media Type");
    }

    #[test]
    fn unreachable_uses_fixed_message() {
        let err = ApiError::BackendUnreachable("connection refused (os error 111)".into());
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.public_message(), BACKEND_UNREACHABLE_MESSAGE);
    }
}
