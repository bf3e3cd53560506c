//! Fire-and-forget audit recording.
//!
//! Every mutating form operation attempts exactly one audit entry. The
//! attempt never affects the outcome of the operation that triggered it:
//! with no authenticated user the entry is silently skipped, and an insert
//! failure is logged and swallowed.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::model::{AuditAction, NewAuditEntry};
use crate::auth::model::AuthUser;
use crate::forms::diff::FieldMap;

pub const FORMS_TABLE: &str = "cav_forms";
pub const SIGNATORIES_TABLE: &str = "signatories";

/// Append-only sink the recorder writes to.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: NewAuditEntry) -> Result<(), String>;
}

/// Postgres-backed sink writing to the `audit_logs` table.
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn append(&self, entry: NewAuditEntry) -> Result<(), String> {
        sqlx::query(
            "INSERT INTO audit_logs \
             (action, event, table_name, record_id, user_id, user_email, old_data, new_data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(entry.action.as_str())
        .bind(&entry.event)
        .bind(&entry.table_name)
        .bind(&entry.record_id)
        .bind(entry.user_id)
        .bind(&entry.user_email)
        .bind(&entry.old_data)
        .bind(&entry.new_data)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
    }
}

/// Everything an audit entry needs except the acting user.
#[derive(Debug, Clone)]
pub struct AuditDraft {
    pub action: AuditAction,
    pub event: String,
    pub table_name: String,
    pub record_id: String,
    pub old_data: Option<Value>,
    pub new_data: Option<Value>,
}

impl AuditDraft {
    /// Draft an entry against the forms table.
    pub fn for_form(action: AuditAction, event: impl Into<String>, record_id: impl ToString) -> Self {
        Self {
            action,
            event: event.into(),
            table_name: FORMS_TABLE.to_string(),
            record_id: record_id.to_string(),
            old_data: None,
            new_data: None,
        }
    }

    pub fn on_table(mut self, table_name: &str) -> Self {
        self.table_name = table_name.to_string();
        self
    }

    /// Attach the change-diff output of an edit.
    pub fn with_changes(mut self, old_data: Option<FieldMap>, new_data: Option<FieldMap>) -> Self {
        self.old_data = old_data.map(Value::Object);
        self.new_data = new_data.map(Value::Object);
        self
    }

    /// Attach the full submitted mapping of a create.
    pub fn with_new_data(mut self, new_data: FieldMap) -> Self {
        self.new_data = Some(Value::Object(new_data));
        self
    }
}

/// Record one audit entry for the acting user.
///
/// No authenticated user means the mutation cannot be attributed; the
/// entry is skipped rather than treated as an error. Insert failures are
/// logged and swallowed so the caller's primary operation stands.
pub async fn record_audit(sink: &dyn AuditSink, identity: Option<&AuthUser>, draft: AuditDraft) {
    let Some(user) = identity else {
        log::debug!(
            "Audit entry skipped, no authenticated user: {} {}",
            draft.action.as_str(),
            draft.record_id
        );
        return;
    };

    let entry = NewAuditEntry {
        action: draft.action,
        event: draft.event,
        table_name: draft.table_name,
        record_id: draft.record_id,
        user_id: user.id,
        user_email: user.email.clone(),
        old_data: draft.old_data,
        new_data: draft.new_data,
    };

    if let Err(e) = sink.append(entry).await {
        log::error!("Audit insert failed: {}", e);
    }
}
