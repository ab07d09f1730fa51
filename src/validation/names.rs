//! Name splitting and role coercion for account records.

use serde::{Deserialize, Serialize};

/// Split a full name into first and last name.
///
/// The first word is the first name and the rest is the last name. A
/// single word is used for both.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut words = full_name.split_whitespace();
    let first = words.next().unwrap_or_default().to_string();
    let rest = words.collect::<Vec<_>>().join(" ");
    if rest.is_empty() {
        (first.clone(), first)
    } else {
        (first, rest)
    }
}

/// Account roles accepted at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    #[default]
    Employee,
    Recruiter,
    Employer,
}

impl Role {
    /// Map a requested role onto the accepted set; anything unknown becomes
    /// [`Role::Employee`], the least privileged account type.
    pub fn coerce(requested: Option<&str>) -> Self {
        match requested.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("candidate") => Self::Candidate,
            Some("employee") => Self::Employee,
            Some("recruiter") => Self::Recruiter,
            Some("employer") => Self::Employer,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Employee => "employee",
            Self::Recruiter => "recruiter",
            Self::Employer => "employer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_word() {
        assert_eq!(
            split_full_name("Jane Doe Smith"),
            ("Jane".to_string(), "Doe Smith".to_string())
        );
        assert_eq!(
            split_full_name("  Ada   King  Lovelace "),
            ("Ada".to_string(), "King Lovelace".to_string())
        );
    }

    #[test]
    fn single_word_repeats() {
        assert_eq!(split_full_name("Solo"), ("Solo".to_string(), "Solo".to_string()));
    }

    #[test]
    fn unknown_role_becomes_employee() {
        assert_eq!(Role::coerce(Some("superuser")), Role::Employee);
        assert_eq!(Role::coerce(None), Role::Employee);
        assert_eq!(Role::coerce(Some(" Recruiter ")), Role::Recruiter);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Candidate).unwrap(), "\"candidate\"");
    }
}
