//! Account registration.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{BackendCall, BackendResponse};
use crate::http::error::ApiError;
use crate::http::request::JsonBody;
use crate::http::server::AppState;
use crate::validation::{
    check_phone, normalize, split_full_name, RequiredFields, Role, Validate, ValidationError,
};

/// Registration form as sent by the portal.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub mobile: Option<String>,
    pub role: Option<String>,
    pub terms_agreed: Option<bool>,
    pub profile_data: Option<Value>,
    pub photo: Option<String>,
}

/// Registration record forwarded to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub terms_agreed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Validate for RegisterRequest {
    type Output = RegisterPayload;

    fn validate(self) -> Result<RegisterPayload, ValidationError> {
        let full_name = normalize(self.full_name);
        let email = normalize(self.email);
        // Passwords are checked for blankness but forwarded as typed.
        let password = self.password.filter(|p| !p.trim().is_empty());
        let phone = normalize(self.mobile);

        RequiredFields::new()
            .check("fullName", full_name.as_ref())
            .check("email", email.as_ref())
            .check("password", password.as_ref())
            .finish()?;
        check_phone(phone.as_deref())?;

        let (first_name, last_name) = split_full_name(full_name.as_deref().unwrap_or_default());
        let role = Role::coerce(self.role.as_deref());

        Ok(RegisterPayload {
            first_name,
            last_name,
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
            phone,
            role,
            terms_agreed: self.terms_agreed.unwrap_or(false),
            profile_data: self.profile_data,
            photo: normalize(self.photo),
        })
    }
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<BackendResponse, ApiError> {
    let requested_role = request.role.clone();
    let payload = request.validate()?;

    if let Some(requested) = requested_role.as_deref() {
        if !requested.trim().eq_ignore_ascii_case(payload.role.as_str()) {
            tracing::info!(requested, role = payload.role.as_str(), "Registration role coerced");
        }
    }

    let call = BackendCall::post("/api/auth/register").json(&payload)?;
    let reply = state
        .backend
        .send(call)
        .await
        .map_err(|e| ApiError::from_backend(e, "Registration failed"))?;

    tracing::info!(role = payload.role.as_str(), "Account registered");
    Ok(reply)
}
