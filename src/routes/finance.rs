//! Finance records and tax declarations.
//!
//! Every call here demands an `application/json` reply from the backend;
//! anything else is treated as a failed call.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::AuthToken;
use crate::backend::{BackendCall, BackendResponse};
use crate::http::error::ApiError;
use crate::http::request::JsonBody;
use crate::http::server::AppState;
use crate::validation::{check_sub_path, normalize, RequiredFields, Validate, ValidationError};

const TAX_DECLARATIONS_PATH: &str = "/api/finance/tax-declarations";

fn admin_path(path: &str) -> Result<String, ApiError> {
    check_sub_path(path)?;
    Ok(format!("/api/admin/finance/{path}"))
}

/// `GET /api/admin/finance/{*path}`
pub async fn get_admin_record(
    State(state): State<AppState>,
    token: AuthToken,
    Path(path): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<BackendResponse, ApiError> {
    let call = BackendCall::get(admin_path(&path)?)
        .bearer(&token)
        .query_pairs(query)
        .strict_json();
    state
        .backend
        .send(call)
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to fetch finance data"))
}

/// `PUT /api/admin/finance/{*path}`
///
/// Finance records vary by resource, so the body is forwarded as an opaque
/// JSON object.
pub async fn update_admin_record(
    State(state): State<AppState>,
    token: AuthToken,
    Path(path): Path<String>,
    JsonBody(record): JsonBody<Map<String, Value>>,
) -> Result<BackendResponse, ApiError> {
    let target = admin_path(&path)?;
    if record.is_empty() {
        return Err(ApiError::Validation("Request body must not be empty".into()));
    }

    let call = BackendCall::put(target)
        .bearer(&token)
        .json(&record)?
        .strict_json();
    let reply = state
        .backend
        .send(call)
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to update finance data"))?;

    tracing::info!(resource = %path, "Finance record updated");
    Ok(reply)
}

/// Tax declaration as submitted by an employee.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxDeclarationRequest {
    pub financial_year: Option<String>,
    pub regime: Option<String>,
    pub declarations: Option<Vec<Value>>,
}

/// Tax declaration forwarded to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxDeclaration {
    pub financial_year: String,
    pub regime: String,
    pub declarations: Vec<Value>,
}

impl Validate for TaxDeclarationRequest {
    type Output = TaxDeclaration;

    fn validate(self) -> Result<TaxDeclaration, ValidationError> {
        let financial_year = normalize(self.financial_year);
        let regime = normalize(self.regime);

        RequiredFields::new()
            .check("financialYear", financial_year.as_ref())
            .check("regime", regime.as_ref())
            .finish()?;

        Ok(TaxDeclaration {
            financial_year: financial_year.unwrap_or_default(),
            regime: regime.unwrap_or_default(),
            declarations: self.declarations.unwrap_or_default(),
        })
    }
}

/// `GET /api/finance/tax-declarations`
pub async fn list_tax_declarations(
    State(state): State<AppState>,
    token: AuthToken,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<BackendResponse, ApiError> {
    let call = BackendCall::get(TAX_DECLARATIONS_PATH)
        .bearer(&token)
        .query_pairs(query)
        .strict_json();
    state
        .backend
        .send(call)
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to fetch tax declarations"))
}

/// `POST /api/finance/tax-declarations`
pub async fn submit_tax_declaration(
    State(state): State<AppState>,
    token: AuthToken,
    JsonBody(request): JsonBody<TaxDeclarationRequest>,
) -> Result<BackendResponse, ApiError> {
    let declaration = request.validate()?;

    let call = BackendCall::post(TAX_DECLARATIONS_PATH)
        .bearer(&token)
        .json(&declaration)?
        .strict_json();
    state
        .backend
        .send(call)
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to submit tax declaration"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn declaration_requires_year_and_regime() {
        let err = TaxDeclarationRequest::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: financialYear, regime");
    }

    #[test]
    fn declaration_items_forwarded() {
        let declaration = TaxDeclarationRequest {
            financial_year: Some(" 2024-25 ".into()),
            regime: Some("new".into()),
            declarations: Some(vec![json!({"section": "80C", "amount": 150000})]),
        }
        .validate()
        .unwrap();
        assert_eq!(declaration.financial_year, "2024-25");
        assert_eq!(declaration.declarations.len(), 1);
    }

    #[test]
    fn admin_path_is_confined() {
        assert_eq!(
            admin_path("payroll/2024-03").unwrap(),
            "/api/admin/finance/payroll/2024-03"
        );
        assert!(admin_path("../users").is_err());
    }
}
