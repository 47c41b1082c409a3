use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use inkdesk_application::AttachmentUpload;
use inkdesk_core::AppError;

use crate::error::ApiError;

/// Multipart field carrying an uploaded image.
pub(super) const FILE_FIELD: &str = "file";

pub(super) fn multipart_error(error: MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::Attachment("file is too large".to_owned()).into();
    }

    AppError::Validation(format!("malformed form submission: {}", error.body_text())).into()
}

/// Reads a file part. An empty part (no file chosen) counts as absent.
pub(super) async fn read_upload(field: Field<'_>) -> Result<Option<AttachmentUpload>, ApiError> {
    let file_name = field.file_name().map(ToOwned::to_owned);
    let content_type = field.content_type().map(ToOwned::to_owned);
    let bytes = field.bytes().await.map_err(multipart_error)?;

    if bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(AttachmentUpload {
        file_name,
        content_type,
        bytes: Vec::from(bytes),
    }))
}

/// Stores the first upload and rejects any further one.
pub(super) fn accept_single_upload(
    slot: &mut Option<AttachmentUpload>,
    upload: Option<AttachmentUpload>,
) -> Result<(), ApiError> {
    let Some(upload) = upload else {
        return Ok(());
    };

    if slot.is_some() {
        return Err(AppError::Attachment("only one file may be attached".to_owned()).into());
    }

    *slot = Some(upload);
    Ok(())
}
