use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    response::{IntoResponse, Response},
};

use crate::db::CardFields;
use crate::error::CardError;
use crate::service::images::ImageFormat;

const FILE_PART: &str = "file";

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Bytes,
    pub format: ImageFormat,
    pub file_name: String,
}

/// Multipart card submission: one `file` part holding the image plus any
/// number of text parts named after `CardFields` members.
pub struct CardUpload {
    pub image: UploadedImage,
    pub fields: CardFields,
}

impl<S> FromRequest<S> for CardUpload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let mut image = None;
        let mut fields = CardFields::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == FILE_PART {
                let file_name = field.file_name().unwrap_or("card").to_string();
                let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
                image = Some((bytes, file_name));
            } else {
                let value = field.text().await.map_err(IntoResponse::into_response)?;
                fields.set(&name, value);
            }
        }

        let (bytes, file_name) = image.ok_or_else(|| {
            CardError::InvalidUpload("missing `file` part".to_string()).into_response()
        })?;
        let format = ImageFormat::sniff(&bytes).ok_or_else(|| {
            CardError::InvalidUpload("expected a PNG, JPEG or WebP image".to_string())
                .into_response()
        })?;

        Ok(CardUpload {
            image: UploadedImage {
                bytes,
                format,
                file_name,
            },
            fields,
        })
    }
}
