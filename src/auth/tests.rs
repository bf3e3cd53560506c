//! Unit tests for authentication module

use crate::auth::jwt::{generate_access_token, generate_refresh_token, validate_token};
use crate::auth::model::{Claims, LoginRequest, StaffAccount, StaffInfo, TokenResponse};
use uuid::Uuid;

#[test]
fn test_generate_and_validate_access_token() {
    let account_id = Uuid::new_v4().to_string();
    let email = "staff@registrar.local";

    let token =
        generate_access_token(&account_id, email).expect("Failed to generate access token");

    let claims = validate_token(&token).expect("Failed to validate token");

    assert_eq!(claims.sub, account_id);
    assert_eq!(claims.email, email);
    assert_eq!(claims.token_type, "access");
}

#[test]
fn test_generate_and_validate_refresh_token() {
    let account_id = Uuid::new_v4().to_string();
    let email = "staff@registrar.local";

    let token =
        generate_refresh_token(&account_id, email).expect("Failed to generate refresh token");

    let claims = validate_token(&token).expect("Failed to validate token");

    assert_eq!(claims.sub, account_id);
    assert_eq!(claims.email, email);
    assert_eq!(claims.token_type, "refresh");
}

#[test]
fn test_token_contains_correct_claims() {
    let token = generate_access_token("test-account-id", "staff@registrar.local")
        .expect("Failed to generate token");

    let claims = validate_token(&token).expect("Failed to validate token");

    assert!(!claims.sub.is_empty());
    assert!(!claims.email.is_empty());
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_invalid_token_returns_error() {
    let result = validate_token("invalid.token.here");
    assert!(result.is_err());
}

#[test]
fn test_staff_to_staff_info_conversion() {
    let account = StaffAccount {
        id: Uuid::new_v4(),
        email: "staff@registrar.local".to_string(),
        password_hash: "hashedpassword".to_string(),
        display_name: Some("Test Staff".to_string()),
        refresh_token: Some("refresh_token_here".to_string()),
        created_at: Some(chrono::Utc::now()),
        updated_at: Some(chrono::Utc::now()),
    };

    let info: StaffInfo = account.clone().into();

    assert_eq!(info.id, account.id);
    assert_eq!(info.email, account.email);
    assert_eq!(info.display_name, account.display_name);
    // StaffInfo should not contain sensitive fields like password_hash or refresh_token
}

#[test]
fn test_claims_clone() {
    let claims = Claims {
        sub: "test-id".to_string(),
        email: "staff@registrar.local".to_string(),
        exp: 12345,
        iat: 12340,
        token_type: "access".to_string(),
    };

    let cloned = claims.clone();

    assert_eq!(claims.sub, cloned.sub);
    assert_eq!(claims.email, cloned.email);
    assert_eq!(claims.exp, cloned.exp);
    assert_eq!(claims.iat, cloned.iat);
    assert_eq!(claims.token_type, cloned.token_type);
}

#[test]
fn test_login_request_deserialize() {
    let json = r#"{"email": "admin@registrar.local", "password": "admin123"}"#;
    let request: LoginRequest = serde_json::from_str(json).expect("Failed to deserialize");

    assert_eq!(request.email, "admin@registrar.local");
    assert_eq!(request.password, "admin123");
}

#[test]
fn test_token_response_serialize() {
    let response = TokenResponse {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 900,
        setup_mode: false,
    };

    let json = serde_json::to_string(&response).expect("Failed to serialize");

    assert!(json.contains("access_token"));
    assert!(json.contains("refresh_token"));
    assert!(json.contains("token_type"));
    assert!(json.contains("expires_in"));
    assert!(json.contains("setup_mode"));
}

#[test]
fn test_access_token_expiry_is_shorter_than_refresh() {
    let access_token = generate_access_token("test-id", "staff@registrar.local")
        .expect("Failed to generate access token");
    let refresh_token = generate_refresh_token("test-id", "staff@registrar.local")
        .expect("Failed to generate refresh token");

    let access_claims = validate_token(&access_token).expect("Failed to validate access token");
    let refresh_claims = validate_token(&refresh_token).expect("Failed to validate refresh token");

    // Refresh token should expire later than access token
    assert!(refresh_claims.exp > access_claims.exp);
}
