//! Audit trail reads
//!
//! Writes go through the `AuditSink` in `audit::recorder`; this side only
//! serves the audit page. Concurrent writers may interleave, so the
//! listing orders by timestamp rather than arrival.

use super::AppState;

use crate::audit::model::AuditEntry;

impl AppState {
    pub async fn list_audit_entries(&self) -> Result<Vec<AuditEntry>, sqlx::Error> {
        sqlx::query_as::<_, AuditEntry>(
            "SELECT id, action, event, table_name, record_id, user_id, user_email, \
             old_data, new_data, created_at \
             FROM audit_logs ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
    }
}
