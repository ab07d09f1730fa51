//! Employee listing, profile lock and profile photo.

use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::auth::AuthToken;
use crate::backend::{BackendCall, BackendResponse};
use crate::enrichment::employee::enrich_employees;
use crate::http::error::ApiError;
use crate::http::request::{JsonBody, RawBody};
use crate::http::server::AppState;
use crate::validation::{check_path_id, normalize, RequiredFields, Validate, ValidationError};

const LIST_PATH: &str = "/api/employees";

/// Filters accepted by the listing routes, forwarded as-is.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    fn to_call(&self, token: &AuthToken) -> BackendCall {
        BackendCall::get(LIST_PATH)
            .bearer(token)
            .query_opt("search", self.search.as_deref())
            .query_opt("status", self.status.as_deref())
            .query_opt("page", self.page.as_deref())
            .query_opt("limit", self.limit.as_deref())
    }
}

/// `GET /api/admin/employees`
pub async fn list(
    State(state): State<AppState>,
    token: AuthToken,
    Query(query): Query<ListQuery>,
) -> Result<BackendResponse, ApiError> {
    state
        .backend
        .send(query.to_call(&token))
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to fetch employees"))
}

/// `GET /api/admin/employees/enhanced`
///
/// Same listing, with each employee's photo, position and department
/// merged in from their profile.
pub async fn list_enhanced(
    State(state): State<AppState>,
    token: AuthToken,
    Query(query): Query<ListQuery>,
) -> Result<BackendResponse, ApiError> {
    let reply = state
        .backend
        .send(query.to_call(&token))
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to fetch employees"))?;

    let body = enrich_employees(&state.backend, &token, reply.body).await;
    Ok(BackendResponse {
        status: reply.status,
        body,
    })
}

fn lock_path(id: &str) -> Result<String, ApiError> {
    check_path_id(id)?;
    Ok(format!("/api/employees/{id}/profile/lock"))
}

fn photo_path(id: &str) -> Result<String, ApiError> {
    check_path_id(id)?;
    Ok(format!("/api/employees/{id}/profile/photo"))
}

/// Lock state change.
#[derive(Debug, Default, Deserialize)]
pub struct LockRequest {
    pub locked: Option<bool>,
    pub reason: Option<String>,
}

/// Lock state forwarded to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockUpdate {
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Validate for LockRequest {
    type Output = LockUpdate;

    fn validate(self) -> Result<LockUpdate, ValidationError> {
        RequiredFields::new()
            .check("locked", self.locked.as_ref())
            .finish()?;
        Ok(LockUpdate {
            locked: self.locked.unwrap_or_default(),
            reason: normalize(self.reason),
        })
    }
}

/// `GET /api/employees/{id}/profile/lock`
pub async fn get_lock(
    State(state): State<AppState>,
    token: AuthToken,
    Path(id): Path<String>,
) -> Result<BackendResponse, ApiError> {
    let path = lock_path(&id)?;
    state
        .backend
        .send(BackendCall::get(path).bearer(&token))
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to fetch profile lock status"))
}

/// `PUT /api/employees/{id}/profile/lock`
pub async fn set_lock(
    State(state): State<AppState>,
    token: AuthToken,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<LockRequest>,
) -> Result<BackendResponse, ApiError> {
    let path = lock_path(&id)?;
    let update = request.validate()?;

    let call = BackendCall::put(path).bearer(&token).json(&update)?;
    let reply = state
        .backend
        .send(call)
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to update profile lock"))?;

    tracing::info!(employee_id = %id, locked = update.locked, "Profile lock updated");
    Ok(reply)
}

/// `POST /api/employees/{id}/profile/photo`
///
/// The multipart body is forwarded byte-for-byte with its boundary intact.
pub async fn upload_photo(
    State(state): State<AppState>,
    token: AuthToken,
    Path(id): Path<String>,
    headers: HeaderMap,
    RawBody(body): RawBody,
) -> Result<BackendResponse, ApiError> {
    let path = photo_path(&id)?;

    let content_type = headers
        .get(CONTENT_TYPE)
        .filter(|v| {
            v.to_str()
                .is_ok_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        })
        .cloned()
        .ok_or_else(|| ApiError::Validation("Expected multipart/form-data upload".into()))?;

    if body.is_empty() {
        return Err(ApiError::Validation("No photo provided".into()));
    }

    let size = body.len();
    let call = BackendCall::post(path).bearer(&token).raw(content_type, body);
    let reply = state
        .backend
        .send(call)
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to upload photo"))?;

    tracing::info!(employee_id = %id, bytes = size, "Profile photo uploaded");
    Ok(reply)
}

/// `DELETE /api/employees/{id}/profile/photo`
pub async fn delete_photo(
    State(state): State<AppState>,
    token: AuthToken,
    Path(id): Path<String>,
) -> Result<BackendResponse, ApiError> {
    let path = photo_path(&id)?;
    state
        .backend
        .send(BackendCall::delete(path).bearer(&token))
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to delete photo"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_requires_flag() {
        let err = LockRequest::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: locked");

        let update = LockRequest {
            locked: Some(false),
            reason: Some("  ".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(
            update,
            LockUpdate {
                locked: false,
                reason: None
            }
        );
    }

    #[test]
    fn paths_reject_traversal() {
        assert!(lock_path("../../admin").is_err());
        assert_eq!(photo_path("42").unwrap(), "/api/employees/42/profile/photo");
    }
}
