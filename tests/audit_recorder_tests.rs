//! Audit recorder contract: attribution, silent skip, swallowed failures.

mod common;

use common::MockAuditSink;
use uuid::Uuid;

use cav_registrar_server::audit::recorder::FORMS_TABLE;
use cav_registrar_server::audit::{record_audit, AuditAction, AuditDraft};
use cav_registrar_server::auth::model::AuthUser;
use cav_registrar_server::forms::diff::FieldMap;

fn staff() -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: "staff@registrar.local".to_string(),
    }
}

#[tokio::test]
async fn entry_carries_the_acting_user() {
    let sink = MockAuditSink::new();
    let user = staff();

    record_audit(
        sink.as_ref(),
        Some(&user),
        AuditDraft::for_form(AuditAction::Created, "Created CAV form for Juan", "rec-1"),
    )
    .await;

    let entries = sink.recorded().await;
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.action, AuditAction::Created);
    assert_eq!(entry.event, "Created CAV form for Juan");
    assert_eq!(entry.table_name, FORMS_TABLE);
    assert_eq!(entry.record_id, "rec-1");
    assert_eq!(entry.user_id, user.id);
    assert_eq!(entry.user_email, user.email);
    assert!(entry.old_data.is_none());
    assert!(entry.new_data.is_none());
}

#[tokio::test]
async fn missing_identity_is_a_silent_no_op() {
    let sink = MockAuditSink::new();

    record_audit(
        sink.as_ref(),
        None,
        AuditDraft::for_form(AuditAction::Deleted, "Deleted archived form", "rec-2"),
    )
    .await;

    assert!(sink.recorded().await.is_empty());
}

#[tokio::test]
async fn sink_failure_is_swallowed() {
    let sink = MockAuditSink::failing();
    let user = staff();

    // Must not panic or propagate; the caller's operation already
    // succeeded by the time this runs.
    record_audit(
        sink.as_ref(),
        Some(&user),
        AuditDraft::for_form(AuditAction::Archived, "Archived CAV form", "rec-3"),
    )
    .await;

    assert!(sink.recorded().await.is_empty());
}

#[tokio::test]
async fn diff_output_lands_in_old_and_new_data() {
    let sink = MockAuditSink::new();
    let user = staff();

    let mut old = FieldMap::new();
    old.insert("school_address".into(), "Old Address".into());
    let mut new = FieldMap::new();
    new.insert("school_address".into(), "New Address".into());

    record_audit(
        sink.as_ref(),
        Some(&user),
        AuditDraft::for_form(AuditAction::Updated, "Updated CAV form for Juan", "rec-4")
            .with_changes(Some(old), Some(new)),
    )
    .await;

    let entries = sink.recorded().await;
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    let old_data = entry.old_data.as_ref().unwrap().as_object().unwrap();
    let new_data = entry.new_data.as_ref().unwrap().as_object().unwrap();
    assert_eq!(old_data.len(), 1);
    assert_eq!(old_data["school_address"], "Old Address");
    assert_eq!(new_data["school_address"], "New Address");
}
