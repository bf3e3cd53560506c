use actix_web::{web, HttpRequest, HttpResponse, Responder};
use bcrypt::{hash, verify, DEFAULT_COST};

use super::jwt::{
    generate_access_token, generate_refresh_token, get_access_token_expiry, validate_token,
};
use super::middleware::validate_request_token;
use super::model::{
    AuthStatusResponse, CreateStaffRequest, LoginRequest, RefreshRequest, StaffInfo, TokenResponse,
};
use crate::AppState;

const SETUP_EMAIL: &str = "admin@registrar.local";
const SETUP_PASSWORD: &str = "admin123";

/// Check if setup is required (no staff accounts exist)
#[utoipa::path(
    get,
    path = "/api/auth/status",
    tag = "Authentication",
    responses(
        (status = 200, description = "Auth status", body = AuthStatusResponse)
    )
)]
pub async fn get_auth_status(state: web::Data<AppState>) -> impl Responder {
    let count = state.get_staff_count().await.unwrap_or(0);
    HttpResponse::Ok().json(AuthStatusResponse {
        has_accounts: count > 0,
        setup_required: count == 0,
    })
}

/// Login endpoint
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    let account_count = state.get_staff_count().await.unwrap_or(0);

    // First-time setup mode: allow login with default credentials
    if account_count == 0 {
        if body.email == SETUP_EMAIL && body.password == SETUP_PASSWORD {
            let temp_id = "setup-mode";
            let access_token = match generate_access_token(temp_id, &body.email) {
                Ok(t) => t,
                Err(e) => {
                    log::error!("Failed to generate access token: {:?}", e);
                    return HttpResponse::InternalServerError().json(
                        crate::ErrorResponse::internal_error("Failed to generate token"),
                    );
                }
            };

            let refresh_token = match generate_refresh_token(temp_id, &body.email) {
                Ok(t) => t,
                Err(e) => {
                    log::error!("Failed to generate refresh token: {:?}", e);
                    return HttpResponse::InternalServerError().json(
                        crate::ErrorResponse::internal_error("Failed to generate token"),
                    );
                }
            };

            return HttpResponse::Ok().json(TokenResponse {
                access_token,
                refresh_token,
                token_type: "Bearer".to_string(),
                expires_in: get_access_token_expiry(),
                setup_mode: true,
            });
        } else {
            return HttpResponse::Unauthorized().json(crate::ErrorResponse::new(
                "Unauthorized",
                "Invalid credentials. Use the setup credentials for first-time setup.",
            ));
        }
    }

    // Normal login flow
    let account = match state.get_staff_by_email(&body.email).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(crate::ErrorResponse::new(
                "Unauthorized",
                "Invalid email or password",
            ));
        }
        Err(e) => {
            log::error!("Database error during login: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Login failed"));
        }
    };

    // Verify password
    let password_valid = verify(&body.password, &account.password_hash).unwrap_or(false);
    if !password_valid {
        return HttpResponse::Unauthorized().json(crate::ErrorResponse::new(
            "Unauthorized",
            "Invalid email or password",
        ));
    }

    // Generate tokens
    let account_id = account.id.to_string();
    let access_token = match generate_access_token(&account_id, &account.email) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to generate access token: {:?}", e);
            return HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Failed to generate token",
            ));
        }
    };

    let refresh_token = match generate_refresh_token(&account_id, &account.email) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to generate refresh token: {:?}", e);
            return HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Failed to generate token",
            ));
        }
    };

    // Store refresh token in database (invalidates any previous session)
    if let Err(e) = state
        .update_staff_refresh_token(&account.id, &refresh_token)
        .await
    {
        log::error!("Failed to store refresh token: {:?}", e);
        // Continue anyway, token is still valid
    }

    HttpResponse::Ok().json(TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: get_access_token_expiry(),
        setup_mode: false,
    })
}

/// Refresh access token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed", body = TokenResponse),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn refresh_token(
    state: web::Data<AppState>,
    body: web::Json<RefreshRequest>,
) -> impl Responder {
    // Validate refresh token
    let claims = match validate_token(&body.refresh_token) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Invalid refresh token: {:?}", e);
            return HttpResponse::Unauthorized().json(crate::ErrorResponse::new(
                "Unauthorized",
                "Invalid or expired refresh token",
            ));
        }
    };

    if claims.token_type != "refresh" {
        return HttpResponse::Unauthorized().json(crate::ErrorResponse::new(
            "Unauthorized",
            "Invalid token type",
        ));
    }

    // Check if this refresh token matches what's in database (single device session)
    let account = match state
        .get_staff_by_refresh_token(&body.refresh_token)
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(crate::ErrorResponse::new(
                "Unauthorized",
                "Session expired. Please login again.",
            ));
        }
        Err(e) => {
            log::error!("Database error during refresh: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Refresh failed"));
        }
    };

    // Generate new access token only (keep same refresh token)
    let account_id = account.id.to_string();
    let access_token = match generate_access_token(&account_id, &account.email) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to generate access token: {:?}", e);
            return HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Failed to generate token",
            ));
        }
    };

    HttpResponse::Ok().json(TokenResponse {
        access_token,
        refresh_token: body.refresh_token.clone(),
        token_type: "Bearer".to_string(),
        expires_in: get_access_token_expiry(),
        setup_mode: false,
    })
}

/// Create new staff account (protected)
#[utoipa::path(
    post,
    path = "/api/auth/staff",
    tag = "Authentication",
    request_body = CreateStaffRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Staff account created", body = StaffInfo),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_staff(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CreateStaffRequest>,
) -> impl Responder {
    if let Err(e) = validate_request_token(&req) {
        return e.error_response();
    }

    // Check if email already exists
    if let Ok(Some(_)) = state.get_staff_by_email(&body.email).await {
        return HttpResponse::Conflict().json(crate::ErrorResponse::new(
            "Conflict",
            "Email already registered",
        ));
    }

    // Hash password
    let password_hash = match hash(&body.password, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => {
            log::error!("Failed to hash password: {:?}", e);
            return HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Failed to create staff account",
            ));
        }
    };

    let account = match state
        .create_staff(&body.email, &password_hash, body.display_name.as_deref())
        .await
    {
        Ok(account) => account,
        Err(e) => {
            log::error!("Failed to create staff account: {:?}", e);
            return HttpResponse::InternalServerError().json(crate::ErrorResponse::internal_error(
                "Failed to create staff account",
            ));
        }
    };

    HttpResponse::Created().json(StaffInfo::from(account))
}

/// List all staff accounts (protected)
#[utoipa::path(
    get,
    path = "/api/auth/staff",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Staff list", body = Vec<StaffInfo>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_staff(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    if let Err(e) = validate_request_token(&req) {
        return e.error_response();
    }

    match state.get_all_staff().await {
        Ok(accounts) => {
            let infos: Vec<StaffInfo> = accounts.into_iter().map(StaffInfo::from).collect();
            HttpResponse::Ok().json(infos)
        }
        Err(e) => {
            log::error!("Failed to get staff accounts: {:?}", e);
            HttpResponse::InternalServerError()
                .json(crate::ErrorResponse::internal_error("Failed to get staff accounts"))
        }
    }
}

/// Configure auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/status", web::get().to(get_auth_status))
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh_token))
            .route("/staff", web::get().to(list_staff))
            .route("/staff", web::post().to(create_staff)),
    );
}
