//! Form lifecycle handlers.
//!
//! Each handler drives one lifecycle transition end to end: validate,
//! persist, then side effects (change-diff, audit entry). Validation and
//! persistence failures abort before any side effect runs; the audit
//! attempt is fire-and-forget and never affects the response.

use actix_web::{
    web::{self, Path},
    HttpRequest, HttpResponse, Responder,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::audit::{record_audit, AuditAction, AuditDraft};
use crate::auth::middleware::optional_user;
use crate::db::AppState;
use crate::forms::diff::changed_fields;
use crate::forms::models::{
    BulkDeleteRequest, BulkDeleteResponse, CavForm, CreateCavFormRequest, FailedDelete,
    UpdateCavFormRequest,
};
use crate::forms::validation::{missing_required_labels, ValidationFailure};
use crate::ErrorResponse;

#[utoipa::path(
    context_path = "/api",
    tag = "CAV Forms",
    get,
    path = "/cav-forms",
    responses(
        (status = 200, description = "Active form records, newest first", body = [CavForm]),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn list_forms(state: web::Data<AppState>) -> impl Responder {
    match state.list_forms(false).await {
        Ok(forms) => HttpResponse::Ok().json(forms),
        Err(e) => HttpResponse::InternalServerError()
            .json(ErrorResponse::internal_error(&e.to_string())),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "CAV Forms",
    get,
    path = "/cav-forms/archived",
    responses(
        (status = 200, description = "Archived form records, newest first", body = [CavForm]),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn list_archived_forms(state: web::Data<AppState>) -> impl Responder {
    match state.list_forms(true).await {
        Ok(forms) => HttpResponse::Ok().json(forms),
        Err(e) => HttpResponse::InternalServerError()
            .json(ErrorResponse::internal_error(&e.to_string())),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "CAV Forms",
    get,
    path = "/cav-forms/{id}",
    params(("id" = Uuid, Path, description = "Form record id")),
    responses(
        (status = 200, description = "Form record found", body = CavForm),
        (status = 404, description = "Form record not found", body = ErrorResponse)
    )
)]
pub async fn get_form(id: Path<Uuid>, state: web::Data<AppState>) -> impl Responder {
    match state.get_form(id.into_inner()).await {
        Ok(Some(form)) => HttpResponse::Ok().json(form),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::not_found("Form record not found")),
        Err(e) => HttpResponse::InternalServerError()
            .json(ErrorResponse::internal_error(&e.to_string())),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "CAV Forms",
    post,
    path = "/cav-forms",
    request_body = CreateCavFormRequest,
    responses(
        (status = 201, description = "Form record created", body = CavForm),
        (status = 400, description = "Missing required fields", body = ValidationFailure),
        (status = 500, description = "Persistence failed", body = ErrorResponse)
    )
)]
pub async fn create_form(
    req: HttpRequest,
    body: web::Json<CreateCavFormRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let user = optional_user(&req);
    let payload = body.into_inner();

    let missing = missing_required_labels(&payload.fields());
    if !missing.is_empty() {
        return HttpResponse::BadRequest().json(ValidationFailure::missing_fields(missing));
    }

    let created = match state
        .insert_form(&payload, user.as_ref().map(|u| u.id))
        .await
    {
        Ok(form) => form,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
    };

    record_audit(
        state.audit_sink.as_ref(),
        user.as_ref(),
        AuditDraft::for_form(
            AuditAction::Created,
            format!("Created CAV form for {}", created.full_legal_name),
            created.id,
        )
        .with_new_data(payload.snapshot()),
    )
    .await;

    HttpResponse::Created().json(created)
}

#[utoipa::path(
    context_path = "/api",
    tag = "CAV Forms",
    put,
    path = "/cav-forms/{id}",
    params(("id" = Uuid, Path, description = "Form record id")),
    request_body = UpdateCavFormRequest,
    responses(
        (status = 200, description = "Form record updated (or unchanged)", body = CavForm),
        (status = 400, description = "Missing required fields", body = ValidationFailure),
        (status = 404, description = "Form record not found", body = ErrorResponse),
        (status = 500, description = "Persistence failed", body = ErrorResponse)
    )
)]
pub async fn update_form(
    req: HttpRequest,
    id: Path<Uuid>,
    body: web::Json<UpdateCavFormRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let user = optional_user(&req);
    let form_id = id.into_inner();
    let payload = body.into_inner();

    let missing = missing_required_labels(&payload.fields());
    if !missing.is_empty() {
        return HttpResponse::BadRequest().json(ValidationFailure::missing_fields(missing));
    }

    let existing = match state.get_form(form_id).await {
        Ok(Some(form)) => form,
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(ErrorResponse::not_found("Form record not found"));
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
    };

    let (old_changed, new_changed) = changed_fields(&existing.snapshot(), &payload.snapshot());
    if new_changed.is_none() {
        // No-op edit: nothing is written, and no audit entry is produced.
        return HttpResponse::Ok().json(existing);
    }

    let updated = match state.update_form(form_id, &payload).await {
        Ok(Some(form)) => form,
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(ErrorResponse::not_found("Form record not found"));
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
    };

    record_audit(
        state.audit_sink.as_ref(),
        user.as_ref(),
        AuditDraft::for_form(
            AuditAction::Updated,
            format!("Updated CAV form for {}", updated.full_legal_name),
            updated.id,
        )
        .with_changes(old_changed, new_changed),
    )
    .await;

    HttpResponse::Ok().json(updated)
}

#[utoipa::path(
    context_path = "/api",
    tag = "CAV Forms",
    post,
    path = "/cav-forms/{id}/archive",
    params(("id" = Uuid, Path, description = "Form record id")),
    responses(
        (status = 200, description = "Form record archived", body = CavForm),
        (status = 404, description = "Form record not found", body = ErrorResponse),
        (status = 500, description = "Persistence failed", body = ErrorResponse)
    )
)]
pub async fn archive_form(
    req: HttpRequest,
    id: Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    set_archived(req, id.into_inner(), state, true).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "CAV Forms",
    post,
    path = "/cav-forms/{id}/restore",
    params(("id" = Uuid, Path, description = "Form record id")),
    responses(
        (status = 200, description = "Form record restored", body = CavForm),
        (status = 404, description = "Form record not found", body = ErrorResponse),
        (status = 500, description = "Persistence failed", body = ErrorResponse)
    )
)]
pub async fn restore_form(
    req: HttpRequest,
    id: Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    set_archived(req, id.into_inner(), state, false).await
}

async fn set_archived(
    req: HttpRequest,
    form_id: Uuid,
    state: web::Data<AppState>,
    archived: bool,
) -> HttpResponse {
    let user = optional_user(&req);

    let updated = match state.set_form_archived(form_id, archived).await {
        Ok(Some(form)) => form,
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(ErrorResponse::not_found("Form record not found"));
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
    };

    let (action, event) = if archived {
        (
            AuditAction::Archived,
            format!("Archived CAV form for {}", updated.full_legal_name),
        )
    } else {
        (
            AuditAction::Restored,
            format!("Restored archived form for {}", updated.full_legal_name),
        )
    };

    record_audit(
        state.audit_sink.as_ref(),
        user.as_ref(),
        AuditDraft::for_form(action, event, updated.id),
    )
    .await;

    HttpResponse::Ok().json(updated)
}

#[utoipa::path(
    context_path = "/api",
    tag = "CAV Forms",
    delete,
    path = "/cav-forms/{id}",
    params(("id" = Uuid, Path, description = "Form record id")),
    responses(
        (status = 204, description = "Form record deleted"),
        (status = 404, description = "Form record not found", body = ErrorResponse),
        (status = 500, description = "Persistence failed", body = ErrorResponse)
    )
)]
pub async fn delete_form(
    req: HttpRequest,
    id: Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    let user = optional_user(&req);
    match delete_one(&state, user.as_ref(), id.into_inner()).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse::not_found("Form record not found")),
        Err(e) => HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e)),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "CAV Forms",
    post,
    path = "/cav-forms/bulk-delete",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "All records deleted", body = BulkDeleteResponse),
        (status = 500, description = "Deletion stopped mid-loop", body = BulkDeleteResponse)
    )
)]
pub async fn bulk_delete_forms(
    req: HttpRequest,
    body: web::Json<BulkDeleteRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let user = optional_user(&req);
    let mut deleted = Vec::new();

    // Sequential loop of single deletes, each with its own audit attempt.
    // A mid-loop failure leaves earlier ids deleted and reports the rest
    // untouched.
    for id in &body.ids {
        match delete_one(&state, user.as_ref(), *id).await {
            Ok(true) => deleted.push(*id),
            Ok(false) => {
                log::warn!("Bulk delete skipped missing record {}", id);
            }
            Err(message) => {
                return HttpResponse::InternalServerError().json(BulkDeleteResponse {
                    deleted,
                    failed: Some(FailedDelete { id: *id, message }),
                });
            }
        }
    }

    HttpResponse::Ok().json(BulkDeleteResponse {
        deleted,
        failed: None,
    })
}

async fn delete_one(
    state: &AppState,
    user: Option<&crate::auth::model::AuthUser>,
    form_id: Uuid,
) -> Result<bool, String> {
    // Fetch first so the audit event can name the student.
    let full_name = match state.get_form(form_id).await {
        Ok(Some(form)) => form.full_legal_name,
        Ok(None) => return Ok(false),
        Err(e) => return Err(e.to_string()),
    };

    match state.delete_form(form_id).await {
        Ok(true) => {
            record_audit(
                state.audit_sink.as_ref(),
                user,
                AuditDraft::for_form(
                    AuditAction::Deleted,
                    format!("Deleted archived form for {}", full_name),
                    form_id,
                ),
            )
            .await;
            Ok(true)
        }
        Ok(false) => Ok(false),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DocumentQuery {
    /// Respond as an attachment instead of inline preview.
    pub download: Option<bool>,
}

#[utoipa::path(
    context_path = "/api",
    tag = "CAV Forms",
    get,
    path = "/cav-forms/{id}/document",
    params(
        ("id" = Uuid, Path, description = "Form record id"),
        DocumentQuery
    ),
    responses(
        (status = 200, description = "Rendered CAV document", content_type = "application/pdf"),
        (status = 404, description = "Form record not found", body = ErrorResponse),
        (status = 500, description = "Overlay generation failed", body = ErrorResponse)
    )
)]
pub async fn render_form_document(
    id: Path<Uuid>,
    query: web::Query<DocumentQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    let form = match state.get_form(id.into_inner()).await {
        Ok(Some(form)) => form,
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(ErrorResponse::not_found("Form record not found"));
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
    };

    let prepared_by = state.resolve_signatory_block(form.prepared_by).await;
    let submitted_by = state.resolve_signatory_block(form.submitted_by).await;

    let document = match state.overlay.generate(
        &form.fields(),
        prepared_by.as_ref(),
        submitted_by.as_ref(),
    ) {
        Ok(document) => document,
        Err(e) => {
            log::error!("Overlay generation failed for {}: {}", form.id, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
    };

    let disposition = if query.download.unwrap_or(false) {
        "attachment"
    } else {
        "inline"
    };

    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            format!("{}; filename=\"{}\"", disposition, document.filename),
        ))
        .body(document.pdf)
}
