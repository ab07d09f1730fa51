//! Candidate profile.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::auth::AuthToken;
use crate::backend::{BackendCall, BackendResponse};
use crate::http::error::ApiError;
use crate::http::request::JsonBody;
use crate::http::server::AppState;
use crate::validation::{
    check_phone, loose_text, normalize, split_full_name, RequiredFields, Validate,
    ValidationError,
};

const PROFILE_PATH: &str = "/api/candidate/profile";

/// Profile form as submitted by a candidate.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub skills: Option<String>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub linkedin_url: Option<String>,
}

/// Candidate record forwarded to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub experience: String,
    pub skills: String,
    pub education: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

impl Validate for CandidateProfileRequest {
    type Output = CandidateProfile;

    fn validate(self) -> Result<CandidateProfile, ValidationError> {
        let full_name = normalize(self.full_name);
        let email = normalize(self.email);
        let phone = normalize(self.phone);
        let position = normalize(self.position);
        let experience = normalize(self.experience);
        let skills = normalize(self.skills);
        let education = normalize(self.education);

        RequiredFields::new()
            .check("fullName", full_name.as_ref())
            .check("email", email.as_ref())
            .check("phone", phone.as_ref())
            .check("position", position.as_ref())
            .check("experience", experience.as_ref())
            .check("skills", skills.as_ref())
            .check("education", education.as_ref())
            .finish()?;
        check_phone(phone.as_deref())?;

        let (first_name, last_name) = split_full_name(full_name.as_deref().unwrap_or_default());

        Ok(CandidateProfile {
            first_name,
            last_name,
            email: email.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
            position: position.unwrap_or_default(),
            experience: experience.unwrap_or_default(),
            skills: skills.unwrap_or_default(),
            education: education.unwrap_or_default(),
            location: normalize(self.location),
            summary: normalize(self.summary),
            linkedin_url: normalize(self.linkedin_url),
        })
    }
}

/// `GET /api/candidate/profile`
pub async fn get_profile(
    State(state): State<AppState>,
    token: AuthToken,
) -> Result<BackendResponse, ApiError> {
    state
        .backend
        .send(BackendCall::get(PROFILE_PATH).bearer(&token))
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to fetch candidate profile"))
}

/// `POST /api/candidate/profile`
pub async fn save_profile(
    State(state): State<AppState>,
    token: AuthToken,
    JsonBody(request): JsonBody<CandidateProfileRequest>,
) -> Result<BackendResponse, ApiError> {
    let profile = request.validate()?;

    let call = BackendCall::post(PROFILE_PATH).bearer(&token).json(&profile)?;
    state
        .backend
        .send(call)
        .await
        .map_err(|e| ApiError::from_backend(e, "Failed to save candidate profile"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> CandidateProfileRequest {
        CandidateProfileRequest {
            full_name: Some("Solo".into()),
            email: Some("solo@example.com".into()),
            phone: Some("(555) 123 4567".into()),
            position: Some("Backend Engineer".into()),
            experience: Some("5 years".into()),
            skills: Some("Rust, SQL".into()),
            education: Some("BSc".into()),
            ..CandidateProfileRequest::default()
        }
    }

    #[test]
    fn single_name_fills_both_parts() {
        let profile = complete().validate().unwrap();
        assert_eq!(profile.first_name, "Solo");
        assert_eq!(profile.last_name, "Solo");
    }

    #[test]
    fn experience_and_skills_accept_numbers_and_lists() {
        let request: CandidateProfileRequest = serde_json::from_value(serde_json::json!({
            "experience": 5,
            "skills": ["Rust", " SQL ", ""],
        }))
        .unwrap();
        assert_eq!(request.experience.as_deref(), Some("5"));
        assert_eq!(request.skills.as_deref(), Some("Rust, SQL"));

        let request: CandidateProfileRequest =
            serde_json::from_value(serde_json::json!({"skills": null})).unwrap();
        assert_eq!(request.skills, None);
        assert_eq!(request.experience, None);
    }

    #[test]
    fn empty_skill_list_counts_as_missing() {
        let err = CandidateProfileRequest {
            skills: Some(String::new()),
            ..complete()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: skills");
    }

    #[test]
    fn phone_checked_only_after_required_fields() {
        let err = CandidateProfileRequest {
            phone: Some("not-a-phone".into()),
            education: None,
            ..complete()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: education");

        let err = CandidateProfileRequest {
            phone: Some("not-a-phone".into()),
            ..complete()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidPhone);
    }
}
