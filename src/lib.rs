use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use chrono;
use dotenvy;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod audit;
pub mod auth;
pub mod db;
pub mod forms;
pub mod overlay;
pub mod signatories;

pub use crate::db::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

pub async fn run() -> std::io::Result<()> {
    unsafe {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::forms::handlers::list_forms,
            crate::forms::handlers::list_archived_forms,
            crate::forms::handlers::get_form,
            crate::forms::handlers::create_form,
            crate::forms::handlers::update_form,
            crate::forms::handlers::archive_form,
            crate::forms::handlers::restore_form,
            crate::forms::handlers::delete_form,
            crate::forms::handlers::bulk_delete_forms,
            crate::forms::handlers::render_form_document,
            crate::signatories::handlers::list_signatories,
            crate::signatories::handlers::create_signatory,
            crate::signatories::handlers::update_signatory,
            crate::signatories::handlers::deactivate_signatory,
            crate::signatories::handlers::activate_signatory,
            crate::audit::handlers::list_audit_logs,
            crate::auth::handlers::get_auth_status,
            crate::auth::handlers::login,
            crate::auth::handlers::refresh_token,
            crate::auth::handlers::create_staff,
            crate::auth::handlers::list_staff
        ),
        components(
            schemas(
                forms::models::CavForm,
                forms::models::CavFormFields,
                forms::models::CreateCavFormRequest,
                forms::models::UpdateCavFormRequest,
                forms::models::BulkDeleteRequest,
                forms::models::BulkDeleteResponse,
                forms::models::FailedDelete,
                forms::validation::ValidationFailure,
                signatories::model::Signatory,
                signatories::model::CreateSignatoryRequest,
                signatories::model::UpdateSignatoryRequest,
                audit::model::AuditAction,
                audit::model::AuditEntry,
                auth::model::LoginRequest,
                auth::model::TokenResponse,
                auth::model::RefreshRequest,
                auth::model::CreateStaffRequest,
                auth::model::StaffInfo,
                auth::model::AuthStatusResponse,
                ErrorResponse,
            )
        ),
        tags(
            (name = "CAV Forms", description = "Certification form lifecycle and document rendering."),
            (name = "Signatories", description = "Signatory registry endpoints."),
            (name = "Audit Trail", description = "Append-only audit trail reads."),
            (name = "Authentication", description = "Staff login and token endpoints.")
        ),
        servers(
            (url = "http://127.0.0.1:8080", description = "Localhost Staging server")
        )
    )]
    struct ApiDoc;

    dotenvy::dotenv().ok(); // Load .env file
    let app_state = match AppState::new().await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to start. Check SUPABASE_DATABASE_URL in .env, ensure the database is reachable and static/CAV_Template.pdf is present. Error: {}", e);
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("cav_registrar_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    log::info!("Starting server at http://0.0.0.0:8080");

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(
                web::scope("/api")
                    .configure(auth::handlers::config)
                    .service(
                        web::resource("/cav-forms")
                            .route(web::get().to(forms::handlers::list_forms))
                            .route(web::post().to(forms::handlers::create_form)),
                    )
                    .service(
                        web::resource("/cav-forms/archived")
                            .route(web::get().to(forms::handlers::list_archived_forms)),
                    )
                    .service(
                        web::resource("/cav-forms/bulk-delete")
                            .route(web::post().to(forms::handlers::bulk_delete_forms)),
                    )
                    .service(
                        web::resource("/cav-forms/{id}")
                            .route(web::get().to(forms::handlers::get_form))
                            .route(web::put().to(forms::handlers::update_form))
                            .route(web::delete().to(forms::handlers::delete_form)),
                    )
                    .service(
                        web::resource("/cav-forms/{id}/archive")
                            .route(web::post().to(forms::handlers::archive_form)),
                    )
                    .service(
                        web::resource("/cav-forms/{id}/restore")
                            .route(web::post().to(forms::handlers::restore_form)),
                    )
                    .service(
                        web::resource("/cav-forms/{id}/document")
                            .route(web::get().to(forms::handlers::render_form_document)),
                    )
                    .service(
                        web::resource("/signatories")
                            .route(web::get().to(signatories::handlers::list_signatories))
                            .route(web::post().to(signatories::handlers::create_signatory)),
                    )
                    .service(
                        web::resource("/signatories/{id}")
                            .route(web::put().to(signatories::handlers::update_signatory)),
                    )
                    .service(
                        web::resource("/signatories/{id}/deactivate")
                            .route(web::post().to(signatories::handlers::deactivate_signatory)),
                    )
                    .service(
                        web::resource("/signatories/{id}/activate")
                            .route(web::post().to(signatories::handlers::activate_signatory)),
                    )
                    .service(
                        web::resource("/audit-logs")
                            .route(web::get().to(audit::handlers::list_audit_logs)),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .backlog(8192)
    .max_connections(25000)
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
