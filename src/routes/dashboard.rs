//! Dashboard statistics.
//!
//! Rendered pages request this during builds, when the backend may not be
//! running at all. The call is bounded by a short deadline and degrades to
//! zeroed statistics instead of failing.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::auth::OptionalAuthToken;
use crate::backend::{BackendCall, BackendError};
use crate::http::error::ApiError;
use crate::http::response::fallback;
use crate::http::server::AppState;
use crate::resilience::timeouts::{with_deadline, Deadline};

const STATS_PATH: &str = "/api/dashboard/stats";

/// Payload served when the backend does not answer in time.
pub fn fallback_stats() -> Value {
    json!({
        "totalEmployees": 0,
        "activeEmployees": 0,
        "onLeave": 0,
        "newHires": 0,
        "openPositions": 0,
        "fallback": true
    })
}

/// `GET /api/dashboard/stats`
pub async fn stats(
    State(state): State<AppState>,
    OptionalAuthToken(token): OptionalAuthToken,
) -> Result<Response, ApiError> {
    let mut call = BackendCall::get(STATS_PATH);
    if let Some(token) = &token {
        call = call.bearer(token);
    }

    let limit = state.fallback_timeout();
    match with_deadline(limit, state.backend.send(call)).await {
        Deadline::Completed(Ok(reply)) => Ok(reply.into_response()),
        Deadline::Completed(Err(err @ BackendError::Unreachable { .. })) => {
            tracing::warn!(error = %err, "Backend unreachable, serving fallback stats");
            Ok(fallback(fallback_stats()))
        }
        Deadline::Completed(Err(err)) => {
            Err(ApiError::from_backend(err, "Failed to fetch dashboard stats"))
        }
        Deadline::Expired => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Backend too slow, serving fallback stats");
            Ok(fallback(fallback_stats()))
        }
    }
}
