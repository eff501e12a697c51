use axum::{Json, extract::State};
use serde::Serialize;
use tracing::info;

use crate::error::CardError;
use crate::middleware::auth::RequireAdmin;
use crate::router::CardState;

#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    /// `false` when the backing file did not exist.
    pub deleted: bool,
}

/// DELETE /cards
pub async fn delete_cards(
    State(state): State<CardState>,
    RequireAdmin(session): RequireAdmin,
) -> Result<Json<DeleteOutcome>, CardError> {
    let deleted = state.records.lock().await.delete_all()?;
    info!(by = %session.username, deleted, "business card data cleared");
    Ok(Json(DeleteOutcome { deleted }))
}

/// DELETE /accounts
pub async fn delete_accounts(
    State(state): State<CardState>,
    RequireAdmin(session): RequireAdmin,
) -> Result<Json<DeleteOutcome>, CardError> {
    let deleted = state.accounts.lock().await.delete_all()?;
    info!(by = %session.username, deleted, "user data cleared");
    Ok(Json(DeleteOutcome { deleted }))
}
