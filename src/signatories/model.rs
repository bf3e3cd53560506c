use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// A registrar official who can sign the "Prepared by" / "Submitted by"
/// blocks. Referenced from forms by id and looked up at render time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Signatory {
    pub id: Uuid,
    #[schema(example = "Maria L. Santos")]
    pub full_name: String,
    #[schema(example = "Registrar II")]
    pub position: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Signatory {
    /// Editable fields as a JSON mapping, for change-diff auditing.
    pub fn snapshot(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "full_name".to_string(),
            Value::String(self.full_name.clone()),
        );
        map.insert("position".to_string(), Value::String(self.position.clone()));
        map.insert("is_active".to_string(), Value::Bool(self.is_active));
        map
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSignatoryRequest {
    pub full_name: String,
    pub position: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSignatoryRequest {
    pub full_name: Option<String>,
    pub position: Option<String>,
}
