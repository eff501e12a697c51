use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use tracing::warn;

use crate::error::CardError;
use crate::types::Session;

pub const SESSION_COOKIE: &str = "cardkeep_session";

/// Read the session carried by the encrypted session cookie, if any.
pub fn session_from_jar(jar: &PrivateCookieJar) -> Option<Session> {
    let cookie = jar.get(SESSION_COOKIE)?;
    serde_json::from_str(cookie.value())
        .inspect_err(|e| warn!(error = %e, "discarding malformed session cookie"))
        .ok()
}

pub fn session_cookie(session: &Session, secure: bool) -> Result<Cookie<'static>, CardError> {
    let value = serde_json::to_string(session)?;
    Ok(Cookie::build(Cookie::new(SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build())
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Any logged-in caller.
#[derive(Debug, Clone)]
pub struct RequireSession(pub Session);

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        session_from_jar(&jar)
            .map(Self)
            .ok_or_else(|| CardError::Unauthorized.into_response())
    }
}

/// A logged-in administrator.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Session);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireSession(session) = RequireSession::from_request_parts(parts, state).await?;
        if !session.is_admin {
            return Err(CardError::Forbidden.into_response());
        }
        Ok(Self(session))
    }
}
