use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, HttpRequest};
use uuid::Uuid;

use super::jwt::validate_token;
use super::model::{AuthUser, Claims};

/// Extract token from Authorization header
fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| {
            if auth.starts_with("Bearer ") {
                Some(auth[7..].to_string())
            } else {
                None
            }
        })
}

/// Validate token from HttpRequest and return claims
pub fn validate_request_token(req: &HttpRequest) -> Result<Claims, Error> {
    let token =
        extract_token(req).ok_or_else(|| ErrorUnauthorized("Missing authorization token"))?;

    let claims = validate_token(&token).map_err(|e| {
        log::warn!("Token validation failed: {:?}", e);
        ErrorUnauthorized("Invalid or expired token")
    })?;

    if claims.token_type != "access" {
        return Err(ErrorUnauthorized("Invalid token type"));
    }

    Ok(claims)
}

/// Resolve the acting user from a request's bearer token.
pub fn authenticated_user(req: &HttpRequest) -> Result<AuthUser, Error> {
    let claims = validate_request_token(req)?;
    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ErrorUnauthorized("Token subject is not a staff account"))?;
    Ok(AuthUser {
        id,
        email: claims.email,
    })
}

/// Acting user for audit attribution, if the request carries a valid
/// token. Mutations proceed either way; an unattributable mutation just
/// skips its audit entry.
pub fn optional_user(req: &HttpRequest) -> Option<AuthUser> {
    authenticated_user(req).ok()
}
