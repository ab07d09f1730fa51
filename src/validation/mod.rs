//! Request validation.
//!
//! # Responsibilities
//! - Trim string fields before any check
//! - Collect every missing required field into one error
//! - Check phone numbers against a permissive pattern
//! - Reject path identifiers that could escape their backend route
//!
//! # Design Decisions
//! - Each route body is its own struct implementing [`Validate`], which
//!   turns the loose wire shape into a normalized, fully-populated value
//! - Phone format is only checked after required fields are present
//! - Authorization is checked earlier, by the token extractor

pub mod names;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub use names::{split_full_name, Role};

/// Validation failures reported to the caller as 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid phone number format")]
    InvalidPhone,

    #[error("Invalid {0}")]
    InvalidValue(&'static str),
}

/// Conversion from a raw request body into its validated form.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, ValidationError>;
}

/// Trim a string field; blank values become `None`.
pub fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Free-text form field that portals also send as a number or a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseText {
    Text(String),
    Number(serde_json::Number),
    List(Vec<String>),
}

/// Deserialize a free-text field given as a string, a number or a list of
/// strings. Lists are joined with `", "`.
pub fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<LooseText>::deserialize(deserializer)?.map(|value| match value {
            LooseText::Text(text) => text,
            LooseText::Number(number) => number.to_string(),
            LooseText::List(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    )
}

/// Collects missing fields in the order they are checked.
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<String>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as missing when `value` is absent or blank.
    pub fn check<T>(&mut self, name: &str, value: Option<&T>) -> &mut Self
    where
        T: IsBlank + ?Sized,
    {
        if value.map_or(true, IsBlank::is_blank) {
            self.missing.push(name.to_string());
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(std::mem::take(&mut self.missing)))
        }
    }
}

/// Emptiness test used by [`RequiredFields`].
pub trait IsBlank {
    fn is_blank(&self) -> bool;
}

impl IsBlank for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl IsBlank for String {
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl IsBlank for bool {
    fn is_blank(&self) -> bool {
        false
    }
}

static PHONE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9 +().\-]*[0-9][0-9 +().\-]*$").ok());

/// Digits with the usual separators: spaces, dashes, dots, parentheses and
/// plus signs. At least one digit is required.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(phone.trim()))
}

/// Check an optional phone number.
pub fn check_phone(phone: Option<&str>) -> Result<(), ValidationError> {
    match phone {
        Some(phone) if !is_valid_phone(phone) => Err(ValidationError::InvalidPhone),
        _ => Ok(()),
    }
}

/// Identifiers interpolated into backend paths.
pub fn check_path_id(id: &str) -> Result<(), ValidationError> {
    let valid = !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue("employee id"))
    }
}

/// Multi-segment sub-paths forwarded under a fixed prefix.
pub fn check_sub_path(path: &str) -> Result<(), ValidationError> {
    let valid = !path.is_empty()
        && path.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        });
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue("resource path"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_drops_blank() {
        assert_eq!(normalize(Some("  Jane ".into())), Some("Jane".into()));
        assert_eq!(normalize(Some("   ".into())), None);
        assert_eq!(normalize(None), None);
    }

    #[test]
    fn missing_fields_listed_in_check_order() {
        let email = Some("a@b.c".to_string());
        let blank = Some(" ".to_string());
        let err = RequiredFields::new()
            .check("fullName", None::<&String>)
            .check("email", email.as_ref())
            .check("phone", blank.as_ref())
            .check("skills", None::<&String>)
            .finish()
            .unwrap_err();

        assert_eq!(
            err,
            ValidationError::MissingFields(vec![
                "fullName".into(),
                "phone".into(),
                "skills".into()
            ])
        );
        assert_eq!(err.to_string(), "Missing required fields: fullName, phone, skills");
    }

    #[test]
    fn phone_pattern() {
        assert!(is_valid_phone("123-456-7890"));
        assert!(is_valid_phone("+1 (555) 010.2000"));
        assert!(!is_valid_phone("not-a-phone"));
        assert!(!is_valid_phone("---"));
        assert_eq!(check_phone(Some("not-a-phone")), Err(ValidationError::InvalidPhone));
        assert_eq!(check_phone(None), Ok(()));
    }

    #[test]
    fn path_ids() {
        assert!(check_path_id("emp_42-a").is_ok());
        assert!(check_path_id("../admin").is_err());
        assert!(check_path_id("").is_err());
    }

    #[test]
    fn sub_paths() {
        assert!(check_sub_path("payroll/2024-03").is_ok());
        assert!(check_sub_path("payroll/../users").is_err());
        assert!(check_sub_path("payroll//x").is_err());
    }
}
