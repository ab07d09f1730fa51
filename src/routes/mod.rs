//! Route dispatch.
//!
//! Routes:
//! - GET    /health
//! - POST   /api/auth/register
//! - GET    /api/candidate/profile
//! - POST   /api/candidate/profile
//! - GET    /api/admin/employees
//! - GET    /api/admin/employees/enhanced
//! - GET    /api/employees/{id}/profile/lock
//! - PUT    /api/employees/{id}/profile/lock
//! - POST   /api/employees/{id}/profile/photo
//! - DELETE /api/employees/{id}/profile/photo
//! - GET    /api/admin/finance/{*path}
//! - PUT    /api/admin/finance/{*path}
//! - GET    /api/finance/tax-declarations
//! - POST   /api/finance/tax-declarations
//! - GET    /api/dashboard/stats
//!
//! Each handler extracts the token first, then its body, so a missing
//! token is reported before any body problem.

pub mod auth;
pub mod candidate;
pub mod dashboard;
pub mod employees;
pub mod finance;

use axum::routing::{get, post};
use axum::Router;

use crate::http::error::ApiError;
use crate::http::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route(
            "/api/candidate/profile",
            get(candidate::get_profile).post(candidate::save_profile),
        )
        .route("/api/admin/employees", get(employees::list))
        .route("/api/admin/employees/enhanced", get(employees::list_enhanced))
        .route(
            "/api/employees/{id}/profile/lock",
            get(employees::get_lock).put(employees::set_lock),
        )
        .route(
            "/api/employees/{id}/profile/photo",
            post(employees::upload_photo).delete(employees::delete_photo),
        )
        .route(
            "/api/admin/finance/{*path}",
            get(finance::get_admin_record).put(finance::update_admin_record),
        )
        .route(
            "/api/finance/tax-declarations",
            get(finance::list_tax_declarations).post(finance::submit_tax_declaration),
        )
        .route("/api/dashboard/stats", get(dashboard::stats))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".into())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
