use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::db::accounts::hash_password;
use crate::error::CardError;
use crate::middleware::auth::{RequireSession, clear_session_cookie, session_cookie};
use crate::router::CardState;
use crate::types::AuthResult;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// POST /auth/register
pub async fn register(
    State(state): State<CardState>,
    Json(creds): Json<Credentials>,
) -> Result<Response, CardError> {
    let username = creds.username.trim();
    if username.is_empty() || creds.password.is_empty() {
        return Err(CardError::InvalidInput(
            "username and password are required".to_string(),
        ));
    }

    if state.accounts.lock().await.is_taken(username) {
        return Err(CardError::UsernameTaken);
    }

    let password = creds.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;
    if !state.accounts.lock().await.insert_hashed(username, hash)? {
        return Err(CardError::UsernameTaken);
    }
    Ok((StatusCode::CREATED, Json(json!({ "username": username }))).into_response())
}

/// POST /auth/login -> sets the session cookie on success.
pub async fn login(
    State(state): State<CardState>,
    jar: PrivateCookieJar,
    Json(creds): Json<Credentials>,
) -> Result<Response, CardError> {
    let check = state
        .accounts
        .lock()
        .await
        .login_check(creds.username.trim(), &creds.password);
    let password = creds.password;
    let result = tokio::task::spawn_blocking(move || check.finish(&password)).await?;

    match result {
        AuthResult::Authenticated(session) => {
            let cookie = session_cookie(&session, state.secure_cookie)?;
            Ok((jar.add(cookie), Json(session)).into_response())
        }
        AuthResult::Failed => Err(CardError::InvalidCredentials),
    }
}

/// POST /auth/logout
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    info!("session cleared");
    (jar.remove(clear_session_cookie()), StatusCode::NO_CONTENT)
}

/// GET /auth/me
pub async fn me(RequireSession(session): RequireSession) -> impl IntoResponse {
    Json(session)
}
