use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// The nine certificate fields staff fill in, as submitted.
///
/// Date-valued fields hold the `YYYY-MM-DD` strings the date pickers
/// produce; derivation into display text happens at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CavFormFields {
    #[schema(example = "Juan Dela Cruz")]
    pub full_legal_name: String,
    #[schema(example = "2025-02-25")]
    pub date_issued: String,
    #[schema(example = "Quezon City National High School")]
    pub school_name: String,
    #[schema(example = "14 Mabini St., Quezon City")]
    pub school_address: String,
    #[schema(example = "2019-2020")]
    pub school_year_completed: String,
    #[schema(example = "2020-04-03")]
    pub school_year_graduated: String,
    #[schema(example = "2025-02-10")]
    pub date_of_application: String,
    #[schema(example = "2025-02-20")]
    pub date_of_transmission: String,
    #[schema(example = "CAV-2025-0193")]
    pub control_no: String,
}

impl CavFormFields {
    /// Field mapping as (column key, value) pairs, in a fixed order.
    pub fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("full_legal_name", &self.full_legal_name),
            ("date_issued", &self.date_issued),
            ("school_name", &self.school_name),
            ("school_address", &self.school_address),
            ("school_year_completed", &self.school_year_completed),
            ("school_year_graduated", &self.school_year_graduated),
            ("date_of_application", &self.date_of_application),
            ("date_of_transmission", &self.date_of_transmission),
            ("control_no", &self.control_no),
        ]
    }
}

fn uuid_value(id: Option<Uuid>) -> Value {
    match id {
        Some(id) => Value::String(id.to_string()),
        None => Value::Null,
    }
}

/// Snapshot of a record's editable fields as a JSON mapping, the shape the
/// change-diff util and the audit trail work over.
pub fn field_snapshot(
    fields: &CavFormFields,
    prepared_by: Option<Uuid>,
    submitted_by: Option<Uuid>,
) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in fields.entries() {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    map.insert("prepared_by".to_string(), uuid_value(prepared_by));
    map.insert("submitted_by".to_string(), uuid_value(submitted_by));
    map
}

/// A stored CAV form record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CavForm {
    #[schema(example = "f1e2d3c4-b5a6-7890-1234-567890abcdef")]
    pub id: Uuid,
    pub full_legal_name: String,
    pub date_issued: String,
    pub school_name: String,
    pub school_address: String,
    pub school_year_completed: String,
    pub school_year_graduated: String,
    pub date_of_application: String,
    pub date_of_transmission: String,
    pub control_no: String,
    pub prepared_by: Option<Uuid>,
    pub submitted_by: Option<Uuid>,
    pub is_archived: bool,
    pub created_by: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CavForm {
    pub fn fields(&self) -> CavFormFields {
        CavFormFields {
            full_legal_name: self.full_legal_name.clone(),
            date_issued: self.date_issued.clone(),
            school_name: self.school_name.clone(),
            school_address: self.school_address.clone(),
            school_year_completed: self.school_year_completed.clone(),
            school_year_graduated: self.school_year_graduated.clone(),
            date_of_application: self.date_of_application.clone(),
            date_of_transmission: self.date_of_transmission.clone(),
            control_no: self.control_no.clone(),
        }
    }

    pub fn snapshot(&self) -> Map<String, Value> {
        field_snapshot(&self.fields(), self.prepared_by, self.submitted_by)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCavFormRequest {
    pub full_legal_name: String,
    pub date_issued: String,
    pub school_name: String,
    pub school_address: String,
    pub school_year_completed: String,
    pub school_year_graduated: String,
    pub date_of_application: String,
    pub date_of_transmission: String,
    pub control_no: String,
    pub prepared_by: Option<Uuid>,
    pub submitted_by: Option<Uuid>,
}

impl CreateCavFormRequest {
    pub fn fields(&self) -> CavFormFields {
        CavFormFields {
            full_legal_name: self.full_legal_name.clone(),
            date_issued: self.date_issued.clone(),
            school_name: self.school_name.clone(),
            school_address: self.school_address.clone(),
            school_year_completed: self.school_year_completed.clone(),
            school_year_graduated: self.school_year_graduated.clone(),
            date_of_application: self.date_of_application.clone(),
            date_of_transmission: self.date_of_transmission.clone(),
            control_no: self.control_no.clone(),
        }
    }

    pub fn snapshot(&self) -> Map<String, Value> {
        field_snapshot(&self.fields(), self.prepared_by, self.submitted_by)
    }
}

/// Full-record replacement payload; the edit form resubmits every field.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCavFormRequest {
    pub full_legal_name: String,
    pub date_issued: String,
    pub school_name: String,
    pub school_address: String,
    pub school_year_completed: String,
    pub school_year_graduated: String,
    pub date_of_application: String,
    pub date_of_transmission: String,
    pub control_no: String,
    pub prepared_by: Option<Uuid>,
    pub submitted_by: Option<Uuid>,
}

impl UpdateCavFormRequest {
    pub fn fields(&self) -> CavFormFields {
        CavFormFields {
            full_legal_name: self.full_legal_name.clone(),
            date_issued: self.date_issued.clone(),
            school_name: self.school_name.clone(),
            school_address: self.school_address.clone(),
            school_year_completed: self.school_year_completed.clone(),
            school_year_graduated: self.school_year_graduated.clone(),
            date_of_application: self.date_of_application.clone(),
            date_of_transmission: self.date_of_transmission.clone(),
            control_no: self.control_no.clone(),
        }
    }

    pub fn snapshot(&self) -> Map<String, Value> {
        field_snapshot(&self.fields(), self.prepared_by, self.submitted_by)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FailedDelete {
    pub id: Uuid,
    pub message: String,
}

/// Outcome of a bulk delete. Deletion is a sequential loop of single
/// deletes; a mid-loop failure leaves earlier ids deleted.
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkDeleteResponse {
    pub deleted: Vec<Uuid>,
    pub failed: Option<FailedDelete>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> CavFormFields {
        CavFormFields {
            full_legal_name: "Juan Dela Cruz".to_string(),
            date_issued: "2025-02-25".to_string(),
            school_name: "Quezon City National High School".to_string(),
            school_address: "14 Mabini St., Quezon City".to_string(),
            school_year_completed: "2019-2020".to_string(),
            school_year_graduated: "2020-04-03".to_string(),
            date_of_application: "2025-02-10".to_string(),
            date_of_transmission: "2025-02-20".to_string(),
            control_no: "CAV-2025-0193".to_string(),
        }
    }

    #[test]
    fn snapshot_has_all_editable_keys() {
        let snapshot = field_snapshot(&sample_fields(), None, None);
        assert_eq!(snapshot.len(), 11);
        assert_eq!(
            snapshot.get("full_legal_name"),
            Some(&Value::String("Juan Dela Cruz".to_string()))
        );
        assert_eq!(snapshot.get("prepared_by"), Some(&Value::Null));
    }

    #[test]
    fn snapshot_serializes_signatory_references() {
        let id = Uuid::new_v4();
        let snapshot = field_snapshot(&sample_fields(), Some(id), None);
        assert_eq!(
            snapshot.get("prepared_by"),
            Some(&Value::String(id.to_string()))
        );
    }

    #[test]
    fn create_request_deserializes() {
        let json = r#"{
            "full_legal_name": "Juan Dela Cruz",
            "date_issued": "2025-02-25",
            "school_name": "Quezon City National High School",
            "school_address": "14 Mabini St., Quezon City",
            "school_year_completed": "2019-2020",
            "school_year_graduated": "2020-04-03",
            "date_of_application": "2025-02-10",
            "date_of_transmission": "2025-02-20",
            "control_no": "CAV-2025-0193"
        }"#;

        let request: CreateCavFormRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.full_legal_name, "Juan Dela Cruz");
        assert!(request.prepared_by.is_none());
    }
}
