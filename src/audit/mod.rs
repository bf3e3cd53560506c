//! Audit trail - append-only record of form lifecycle mutations.

pub mod handlers;
pub mod model;
pub mod recorder;

pub use model::{AuditAction, AuditEntry, NewAuditEntry};
pub use recorder::{record_audit, AuditDraft, AuditSink, PgAuditSink};
