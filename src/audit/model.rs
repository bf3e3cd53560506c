use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

/// Record lifecycle actions captured in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Created,
    Updated,
    Archived,
    Restored,
    Deleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "created",
            AuditAction::Updated => "updated",
            AuditAction::Archived => "archived",
            AuditAction::Restored => "restored",
            AuditAction::Deleted => "deleted",
        }
    }
}

/// A persisted audit entry. Append-only; never updated after insert.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AuditEntry {
    pub id: i64,
    #[schema(example = "updated")]
    pub action: String,
    #[schema(example = "Updated CAV form for Juan Dela Cruz")]
    pub event: String,
    #[schema(example = "cav_forms")]
    pub table_name: String,
    pub record_id: String,
    pub user_id: Option<Uuid>,
    pub user_email: Option<String>,
    /// Changed fields before the mutation, if any.
    #[schema(value_type = Option<Object>)]
    pub old_data: Option<Value>,
    /// Changed fields after the mutation, if any.
    #[schema(value_type = Option<Object>)]
    pub new_data: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for one audit entry, with the acting user resolved.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub event: String,
    pub table_name: String,
    pub record_id: String,
    pub user_id: Uuid,
    pub user_email: String,
    pub old_data: Option<Value>,
    pub new_data: Option<Value>,
}
