//! Response relaying.
//!
//! # Responsibilities
//! - Relay the backend's status code and JSON body to the caller
//! - Serve static fallback payloads when a degraded route gives up
//!
//! # Design Decisions
//! - Backend replies are relayed as parsed JSON, never as raw bytes, so the
//!   caller always receives `application/json`
//! - Backend failures are mapped by `http::error`, not here

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::backend::BackendResponse;

impl IntoResponse for BackendResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// A `200 OK` JSON reply built locally instead of by the backend.
pub fn fallback(body: Value) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}
