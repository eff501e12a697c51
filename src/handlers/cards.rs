use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::path::Path as FsPath;
use tracing::{info, warn};

use crate::db::{BusinessCardRecord, CardFields};
use crate::error::CardError;
use crate::middleware::auth::RequireSession;
use crate::middleware::card_upload::CardUpload;
use crate::router::CardState;
use crate::service::export::{EXPORT_FILE_NAME, XLSX_CONTENT_TYPE, cards_to_xlsx};
use crate::service::images::ImageFormat;

/// GET /customer-types
pub async fn customer_types(
    State(state): State<CardState>,
    RequireSession(_): RequireSession,
) -> Json<Vec<String>> {
    Json(state.customer_types.to_vec())
}

/// POST /cards/extract -> editable fields prefilled by the extraction service.
pub async fn extract(
    State(state): State<CardState>,
    RequireSession(session): RequireSession,
    upload: CardUpload,
) -> Result<Json<CardFields>, CardError> {
    let image = upload.image;
    info!(user = %session.username, size = image.bytes.len(), "extracting card details");
    let extracted = state
        .extraction
        .extract(&image.bytes, image.format, &image.file_name)
        .await?;
    Ok(Json(extracted.into()))
}

/// POST /cards -> persist the image and the edited fields as a new record.
pub async fn create(
    State(state): State<CardState>,
    RequireSession(session): RequireSession,
    upload: CardUpload,
) -> Result<(StatusCode, Json<BusinessCardRecord>), CardError> {
    let CardUpload { image, fields } = upload;

    // The id is reserved, the image named and the record persisted under one
    // lock so two uploads can never share an image file.
    let mut records = state.records.lock().await;
    let id = records.next_id();
    let image_path = state.images.save(id, &image.bytes, image.format)?;
    let record = records
        .add(&session.username, fields, image_path.clone())
        .inspect_err(|_| state.images.discard(&image_path))?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /cards -> every record the caller may see.
pub async fn list(
    State(state): State<CardState>,
    RequireSession(session): RequireSession,
) -> Json<Vec<BusinessCardRecord>> {
    let records = state.records.lock().await;
    Json(records.visible_to(&session).cloned().collect())
}

/// GET /cards/export -> visible records as an Excel workbook.
pub async fn export(
    State(state): State<CardState>,
    RequireSession(session): RequireSession,
) -> Result<Response, CardError> {
    let workbook = {
        let records = state.records.lock().await;
        cards_to_xlsx(records.visible_to(&session))?
    };
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        workbook,
    )
        .into_response())
}

/// GET /cards/{id}/image
pub async fn image(
    State(state): State<CardState>,
    RequireSession(session): RequireSession,
    Path(id): Path<u64>,
) -> Result<Response, CardError> {
    let image_path = {
        let records = state.records.lock().await;
        records
            .get_visible(id, &session)
            .map(|r| r.image_path.clone())
            .ok_or_else(|| CardError::NotFound(format!("card {id}")))?
    };

    let Some(bytes) = state.images.read(&image_path)? else {
        warn!(id, path = %image_path, "no image found for card");
        return Err(CardError::NotFound(format!("image for card {id}")));
    };
    let content_type = ImageFormat::sniff(&bytes)
        .or_else(|| ImageFormat::from_path(FsPath::new(&image_path)))
        .map_or("application/octet-stream", ImageFormat::content_type);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
