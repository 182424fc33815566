//! Login, registration, and logout.
//!
//! Login issues a JWT session cookie; registration validates the
//! username/password rules before touching the database. Failures
//! redirect back to the form with a status message.

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use shopbill_core::validation::{
    validate_password, validate_passwords_match, validate_username,
};

use crate::auth::{
    clear_session_cookie, hash_password, issue_token, session_cookie, session_from_headers,
    verify_password,
};
use crate::error::ApiResult;
use crate::routes::{flash_error, flash_success};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FlashQuery {
    pub status: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// `GET /` - straight to the dashboard when a session exists.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if session_from_headers(&state.config, &headers).is_some() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

/// `GET /login` - login page view model.
pub async fn login_page(Query(flash): Query<FlashQuery>) -> Json<serde_json::Value> {
    Json(json!({
        "page": "login",
        "status": flash.status,
        "message": flash.message,
    }))
}

/// `POST /login` - verify credentials and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<impl IntoResponse> {
    let user = state.db.users().find_by_username(&form.username).await?;

    let user = match user {
        Some(user) if verify_password(&user.password_hash, &form.password) => user,
        // Same message for unknown user and wrong password
        _ => {
            return Ok(
                flash_error("/login", "Invalid username or password").into_response()
            )
        }
    };

    let token = issue_token(&state.config, user.id, &user.username)?;
    let cookie = session_cookie(&state.config, &token);

    info!(username = %user.username, "User logged in");

    Ok((
        [(SET_COOKIE, cookie)],
        Redirect::to("/dashboard"),
    )
        .into_response())
}

/// `GET /register` - registration page view model.
pub async fn register_page(Query(flash): Query<FlashQuery>) -> Json<serde_json::Value> {
    Json(json!({
        "page": "register",
        "status": flash.status,
        "message": flash.message,
    }))
}

/// `POST /register` - validate, reject duplicates, create the account.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> ApiResult<Redirect> {
    let username = form.username.trim().to_string();
    if let Err(err) = validate_username(&username) {
        return Ok(flash_error("/register", &err.to_string()));
    }
    if let Err(err) = validate_password(&form.password) {
        return Ok(flash_error("/register", &err.to_string()));
    }
    if let Err(err) = validate_passwords_match(&form.password, &form.confirm_password) {
        return Ok(flash_error("/register", &err.to_string()));
    }

    if state.db.users().username_exists(&username).await? {
        return Ok(flash_error("/register", "Username already exists"));
    }

    let password_hash = hash_password(&form.password)?;
    let user_id = state.db.users().insert(&username, &password_hash).await?;

    info!(user_id, username = %username, "User registered");

    Ok(flash_success("/login", "Registration successful, please log in"))
}

/// `GET /logout` - clear the session cookie.
pub async fn logout() -> impl IntoResponse {
    ([(SET_COOKIE, clear_session_cookie())], Redirect::to("/login"))
}
