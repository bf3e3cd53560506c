use actix_web::{web, HttpResponse, Responder};

use crate::audit::model::AuditEntry;
use crate::db::AppState;

#[utoipa::path(
    context_path = "/api",
    tag = "Audit Trail",
    get,
    path = "/audit-logs",
    responses(
        (status = 200, description = "Audit entries, newest first", body = [AuditEntry]),
        (status = 500, description = "Internal Server Error", body = crate::ErrorResponse)
    )
)]
pub async fn list_audit_logs(state: web::Data<AppState>) -> impl Responder {
    match state.list_audit_entries().await {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => {
            log::error!("Failed to list audit entries: {}", e);
            HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error(&e.to_string()))
        }
    }
}
