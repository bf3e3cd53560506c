use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Registrar staff account stored in database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StaffAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Staff info for API responses (without sensitive data)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StaffInfo {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<StaffAccount> for StaffInfo {
    fn from(account: StaffAccount) -> Self {
        Self {
            id: account.id,
            email: account.email,
            display_name: account.display_name,
            created_at: account.created_at,
        }
    }
}

/// Login request payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token response after successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    /// True if this is first-time setup with default credentials
    pub setup_mode: bool,
}

/// Refresh token request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Create staff account request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStaffRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // staff account id
    pub email: String,
    pub exp: usize,         // expiration time
    pub iat: usize,         // issued at
    pub token_type: String, // "access" or "refresh"
}

/// Auth status response
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthStatusResponse {
    pub has_accounts: bool,
    pub setup_required: bool,
}

/// The acting user resolved from a request's bearer token.
///
/// Passed explicitly into the audit recorder so attribution never reads
/// ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}
