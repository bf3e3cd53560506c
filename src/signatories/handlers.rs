use actix_web::{
    web::{self, Path},
    HttpRequest, HttpResponse, Responder,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::audit::recorder::SIGNATORIES_TABLE;
use crate::audit::{record_audit, AuditAction, AuditDraft};
use crate::auth::middleware::optional_user;
use crate::db::AppState;
use crate::forms::diff::changed_fields;
use crate::signatories::model::{CreateSignatoryRequest, Signatory, UpdateSignatoryRequest};
use crate::ErrorResponse;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SignatoryListQuery {
    /// Restrict to active signatories (the form selectors do this).
    pub active: Option<bool>,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Signatories",
    get,
    path = "/signatories",
    params(SignatoryListQuery),
    responses(
        (status = 200, description = "Signatory list", body = [Signatory]),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn list_signatories(
    query: web::Query<SignatoryListQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    match state.list_signatories(query.active.unwrap_or(false)).await {
        Ok(signatories) => HttpResponse::Ok().json(signatories),
        Err(e) => HttpResponse::InternalServerError()
            .json(ErrorResponse::internal_error(&e.to_string())),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Signatories",
    post,
    path = "/signatories",
    request_body = CreateSignatoryRequest,
    responses(
        (status = 201, description = "Signatory created", body = Signatory),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn create_signatory(
    req: HttpRequest,
    body: web::Json<CreateSignatoryRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let user = optional_user(&req);

    if body.full_name.trim().is_empty() || body.position.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(
            "Signatory name and position are required",
        ));
    }

    let created = match state.insert_signatory(&body).await {
        Ok(signatory) => signatory,
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
            format!("Added signatory {}", created.full_name),
            created.id,
        )
        .on_table(SIGNATORIES_TABLE)
        .with_new_data(created.snapshot()),
    )
    .await;

    HttpResponse::Created().json(created)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Signatories",
    put,
    path = "/signatories/{id}",
    params(("id" = Uuid, Path, description = "Signatory id")),
    request_body = UpdateSignatoryRequest,
    responses(
        (status = 200, description = "Signatory updated", body = Signatory),
        (status = 404, description = "Signatory not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn update_signatory(
    req: HttpRequest,
    id: Path<Uuid>,
    body: web::Json<UpdateSignatoryRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let user = optional_user(&req);
    let signatory_id = id.into_inner();

    let existing = match state.get_signatory(signatory_id).await {
        Ok(Some(signatory)) => signatory,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("Signatory not found"));
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
    };

    let updated = match state.update_signatory(signatory_id, &body).await {
        Ok(Some(signatory)) => signatory,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("Signatory not found"));
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
    };

    let (old_changed, new_changed) = changed_fields(&existing.snapshot(), &updated.snapshot());
    if new_changed.is_some() {
        record_audit(
            state.audit_sink.as_ref(),
            user.as_ref(),
            AuditDraft::for_form(
                AuditAction::Updated,
                format!("Updated signatory {}", updated.full_name),
                updated.id,
            )
            .on_table(SIGNATORIES_TABLE)
            .with_changes(old_changed, new_changed),
        )
        .await;
    }

    HttpResponse::Ok().json(updated)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Signatories",
    post,
    path = "/signatories/{id}/deactivate",
    params(("id" = Uuid, Path, description = "Signatory id")),
    responses(
        (status = 200, description = "Signatory deactivated", body = Signatory),
        (status = 404, description = "Signatory not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn deactivate_signatory(
    req: HttpRequest,
    id: Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    set_active(req, id.into_inner(), state, false).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "Signatories",
    post,
    path = "/signatories/{id}/activate",
    params(("id" = Uuid, Path, description = "Signatory id")),
    responses(
        (status = 200, description = "Signatory reactivated", body = Signatory),
        (status = 404, description = "Signatory not found", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn activate_signatory(
    req: HttpRequest,
    id: Path<Uuid>,
    state: web::Data<AppState>,
) -> impl Responder {
    set_active(req, id.into_inner(), state, true).await
}

async fn set_active(
    req: HttpRequest,
    signatory_id: Uuid,
    state: web::Data<AppState>,
    active: bool,
) -> HttpResponse {
    let user = optional_user(&req);

    let updated = match state.set_signatory_active(signatory_id, active).await {
        Ok(Some(signatory)) => signatory,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found("Signatory not found"));
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
    };

    let (action, event) = if active {
        (
            AuditAction::Restored,
            format!("Reactivated signatory {}", updated.full_name),
        )
    } else {
        (
            AuditAction::Archived,
            format!("Deactivated signatory {}", updated.full_name),
        )
    };

    record_audit(
        state.audit_sink.as_ref(),
        user.as_ref(),
        AuditDraft::for_form(action, event, updated.id).on_table(SIGNATORIES_TABLE),
    )
    .await;

    HttpResponse::Ok().json(updated)
}
