//! Session authentication module.
//!
//! Passwords are hashed with argon2 (PHC strings in the `users` table);
//! sessions are JWTs carried in an HttpOnly cookie named `session`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: i64,

    /// Username, echoed into handlers for logging and display
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ApiError::Validation("Failed to hash password".to_string()))
}

/// Verifies a password against a stored PHC string.
///
/// A malformed stored hash verifies as false rather than erroring; the
/// login attempt simply fails.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Issues a signed session token for a user.
pub fn issue_token(config: &ServerConfig, user_id: i64, username: &str) -> Result<String, ApiError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(config.session_lifetime_secs);

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|_| ApiError::Unauthorized)
}

/// Validates a session token and returns its claims.
pub fn validate_token(config: &ServerConfig, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Builds the Set-Cookie value for a fresh session.
pub fn session_cookie(config: &ServerConfig, token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, config.session_lifetime_secs
    )
}

/// Builds the Set-Cookie value that clears the session.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Extracts the session token from the Cookie header, if present.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    for pair in cookies.split(';') {
        let pair = pair.trim();
        if let Some(value) = pair.strip_prefix(SESSION_COOKIE) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Returns the session claims if the request carries a valid cookie.
///
/// Used by routes that branch on authentication instead of requiring it
/// (e.g. `GET /` redirects either to the dashboard or to login).
pub fn session_from_headers(config: &ServerConfig, headers: &HeaderMap) -> Option<Claims> {
    let token = token_from_headers(headers)?;
    validate_token(config, &token)
}

/// The authenticated user, extracted from the session cookie.
///
/// Routes that take an `AuthUser` argument reject unauthenticated
/// requests with a redirect to `/login`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

/// Rejection for [`AuthUser`]: redirect to the login page.
#[derive(Debug)]
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims =
            session_from_headers(&state.config, &parts.headers).ok_or(AuthRedirect)?;

        Ok(AuthUser {
            id: claims.sub,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "secret123"));
        assert!(!verify_password(&hash, "wrong"));
        assert!(!verify_password("not-a-phc-string", "secret123"));
    }

    #[test]
    fn test_token_roundtrip() {
        let config = ServerConfig::for_tests();
        let token = issue_token(&config, 7, "cashier1").unwrap();

        let claims = validate_token(&config, &token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "cashier1");
        assert!(claims.exp > claims.iat);

        assert!(validate_token(&config, "garbage").is_none());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = ServerConfig::for_tests();
        let mut other = ServerConfig::for_tests();
        other.jwt_secret = "different".to_string();

        let token = issue_token(&config, 7, "cashier1").unwrap();
        assert!(validate_token(&other, &token).is_none());
    }

    #[test]
    fn test_cookie_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "theme=dark; session=abc.def.ghi; lang=en".parse().unwrap());
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));

        let mut empty = HeaderMap::new();
        empty.insert(COOKIE, "theme=dark".parse().unwrap());
        assert!(token_from_headers(&empty).is_none());
    }
}
