use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum CardError {
    /// Backing file exists but could not be read or parsed.
    #[error("failed to read {}: {reason}", path.display())]
    StorageRead { path: PathBuf, reason: String },

    #[error("failed to write {}: {reason}", path.display())]
    StorageWrite { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("spreadsheet export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("invalid cookie key: {0}")]
    CookieKey(String),

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("username already exists")]
    UsernameTaken,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("login required")]
    Unauthorized,

    #[error("administrator privileges required")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),
}

impl CardError {
    /// Whether a call to the extraction service is worth repeating.
    pub fn is_retryable(&self) -> bool {
        match self {
            CardError::Reqwest(e) => e.is_timeout() || e.is_connect(),
            CardError::UpstreamStatus(code) => code.is_server_error(),
            _ => false,
        }
    }
}

impl IntoResponse for CardError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            CardError::StorageRead { .. }
            | CardError::StorageWrite { .. }
            | CardError::Io(_)
            | CardError::Json(_)
            | CardError::PasswordHash(_)
            | CardError::Task(_)
            | CardError::Export(_)
            | CardError::CookieKey(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred.".to_string(),
            ),
            CardError::Reqwest(_) | CardError::UrlParse(_) => (
                StatusCode::BAD_GATEWAY,
                "BAD_GATEWAY",
                "Extraction service is unavailable.".to_string(),
            ),
            CardError::UpstreamStatus(_) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Extraction service returned an error.".to_string(),
            ),
            CardError::InvalidUpload(reason) => {
                (StatusCode::BAD_REQUEST, "INVALID_UPLOAD", reason.clone())
            }
            CardError::InvalidInput(reason) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", reason.clone())
            }
            CardError::UsernameTaken => (
                StatusCode::CONFLICT,
                "USERNAME_TAKEN",
                "Username already exists.".to_string(),
            ),
            CardError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password.".to_string(),
            ),
            CardError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Login required.".to_string(),
            ),
            CardError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Administrator privileges required.".to_string(),
            ),
            CardError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{what} not found."),
            ),
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = ApiErrorBody {
            code: code.to_string(),
            message,
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
