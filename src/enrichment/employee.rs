//! Employee list enrichment.
//!
//! Each employee record from the list endpoint is merged with the photo,
//! position and department from that employee's profile.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::auth::AuthToken;
use crate::backend::{BackendCall, BackendClient, BackendError};
use crate::enrichment::enrich_all;

pub const DEFAULT_POSITION: &str = "Employee";
pub const DEFAULT_DEPARTMENT: &str = "Engineering";

/// Keys a list payload may carry its employee array under.
const LIST_KEYS: [&str; 2] = ["employees", "data"];

/// Profile fields merged into an employee record. `None` means the profile
/// did not supply the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeSupplement {
    pub photo: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
}

impl EmployeeSupplement {
    /// Read the supplement from a profile response. The profile may be the
    /// body itself or nested under `profile` or `data`.
    pub fn from_profile(body: &Value) -> Self {
        let profile = ["profile", "data"]
            .iter()
            .find_map(|key| body.get(key).filter(|v| v.is_object()))
            .unwrap_or(body);

        let first = |keys: &[&str]| keys.iter().find_map(|key| text(profile.get(key)));
        Self {
            photo: first(&["photo", "profilePhoto", "photoUrl"]),
            position: first(&["position"]),
            department: first(&["department"]),
        }
    }

    /// Profile value, else the record's own value, else the default.
    fn merge_into(self, record: &mut Map<String, Value>) {
        let photo = self.photo.or_else(|| text(record.get("photo")));
        let position = self
            .position
            .or_else(|| text(record.get("position")))
            .unwrap_or_else(|| DEFAULT_POSITION.to_string());
        let department = self
            .department
            .or_else(|| text(record.get("department")))
            .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

        record.insert("photo".into(), photo.map_or(Value::Null, Value::String));
        record.insert("position".into(), Value::String(position));
        record.insert("department".into(), Value::String(department));
    }
}

/// Trimmed, non-blank string value.
fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Why a single employee could not be enriched.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("employee record has no id")]
    MissingId,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Identifier of an employee record: `id`, `_id` or `employeeId`, string or
/// number.
pub fn employee_id(record: &Value) -> Option<String> {
    ["id", "_id", "employeeId"]
        .iter()
        .find_map(|key| match record.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Merge a supplement into one employee. Non-object records pass through.
pub fn merge_employee(mut record: Value, supplement: EmployeeSupplement) -> Value {
    if let Some(fields) = record.as_object_mut() {
        supplement.merge_into(fields);
    }
    record
}

/// Fetch one employee's profile supplement.
pub async fn fetch_supplement(
    client: &BackendClient,
    token: &AuthToken,
    id: &str,
) -> Result<EmployeeSupplement, EnrichmentError> {
    let reply = client
        .send(BackendCall::get(format!("/api/employees/{id}/profile")).bearer(token))
        .await?;
    Ok(EmployeeSupplement::from_profile(&reply.body))
}

/// Enrich an employee list payload.
///
/// Accepts a bare array or an object holding the array under `employees`
/// or `data`; other fields (pagination, totals) are left untouched.
pub async fn enrich_employees(client: &BackendClient, token: &AuthToken, mut body: Value) -> Value {
    let list_key = match &body {
        Value::Object(fields) => LIST_KEYS
            .iter()
            .copied()
            .find(|key| fields.get(*key).is_some_and(Value::is_array)),
        _ => None,
    };

    let list = match list_key {
        Some(key) => body.get_mut(key).and_then(Value::as_array_mut),
        None => body.as_array_mut(),
    };
    let Some(list) = list else {
        tracing::debug!("Employee payload has no list to enrich");
        return body;
    };

    let employees = std::mem::take(list);
    let count = employees.len();
    *list = enrich_all(
        employees,
        |record| {
            let id = employee_id(record);
            let client = client.clone();
            let token = token.clone();
            async move {
                let id = id.ok_or(EnrichmentError::MissingId)?;
                fetch_supplement(&client, &token, &id).await
            }
        },
        merge_employee,
    )
    .await;

    tracing::debug!(count, "Employee list enriched");
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn supplement_reads_nested_profile() {
        let body = json!({
            "profile": {
                "profilePhoto": "https://cdn.example/p/7.jpg",
                "position": "Staff Engineer",
                "department": "Platform"
            }
        });
        assert_eq!(
            EmployeeSupplement::from_profile(&body),
            EmployeeSupplement {
                photo: Some("https://cdn.example/p/7.jpg".into()),
                position: Some("Staff Engineer".into()),
                department: Some("Platform".into()),
            }
        );
    }

    #[test]
    fn supplement_leaves_blank_fields_unset() {
        let s = EmployeeSupplement::from_profile(&json!({"position": "  "}));
        assert_eq!(s, EmployeeSupplement::default());
    }

    #[test]
    fn ids_from_strings_and_numbers() {
        assert_eq!(employee_id(&json!({"id": 12})), Some("12".into()));
        assert_eq!(employee_id(&json!({"_id": "a1"})), Some("a1".into()));
        assert_eq!(employee_id(&json!({"name": "x"})), None);
    }

    #[test]
    fn record_values_survive_a_missing_profile() {
        let merged = merge_employee(
            json!({"id": 2, "name": "Bob", "position": "Lead", "department": "Sales"}),
            EmployeeSupplement::default(),
        );
        assert_eq!(
            merged,
            json!({
                "id": 2,
                "name": "Bob",
                "photo": null,
                "position": "Lead",
                "department": "Sales"
            })
        );
    }

    #[test]
    fn defaults_fill_fields_the_record_lacks() {
        let merged = merge_employee(json!({"id": 1, "name": "Ana"}), EmployeeSupplement::default());
        assert_eq!(merged["position"], "Employee");
        assert_eq!(merged["department"], "Engineering");
        assert_eq!(merged["photo"], Value::Null);
    }

    #[test]
    fn profile_values_win_over_record() {
        let merged = merge_employee(
            json!({"id": 3, "position": "Intern", "department": "Sales", "photo": "/old.png"}),
            EmployeeSupplement {
                photo: None,
                position: Some("Analyst".into()),
                department: None,
            },
        );
        assert_eq!(merged["position"], "Analyst");
        assert_eq!(merged["department"], "Sales");
        assert_eq!(merged["photo"], "/old.png");
    }
}
