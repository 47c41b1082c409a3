use axum::Json;
use axum::extract::{Extension, Multipart, Path, State};
use inkdesk_application::AttachmentUpload;
use inkdesk_core::{AppError, Identity};
use inkdesk_domain::ImageBucket;

use super::multipart::{FILE_FIELD, accept_single_upload, multipart_error, read_upload};
use crate::dto::{DeleteImageRequest, ImageListResponse, MessageResponse, UploadImageResponse};
use crate::error::ApiResult;
use crate::state::AppState;

const BUCKET_FIELD: &str = "bucket";

pub async fn list_images_handler(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
) -> ApiResult<Json<ImageListResponse>> {
    let bucket = bucket.parse::<ImageBucket>()?;
    let images = state.gallery_service.list(bucket).await?;

    Ok(Json(ImageListResponse {
        bucket: bucket.as_str().to_owned(),
        images,
    }))
}

pub async fn upload_image_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadImageResponse>> {
    let mut bucket = None;
    let mut upload: Option<AttachmentUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            FILE_FIELD => {
                let file = read_upload(field).await?;
                accept_single_upload(&mut upload, file)?;
            }
            BUCKET_FIELD => {
                let value = field.text().await.map_err(multipart_error)?;
                bucket = Some(value.trim().parse::<ImageBucket>()?);
            }
            _ => {}
        }
    }

    let bucket = bucket.ok_or_else(|| AppError::Validation("bucket is required".to_owned()))?;
    let upload = upload.ok_or_else(|| AppError::Attachment("no file uploaded".to_owned()))?;
    let url = state.gallery_service.upload(&identity, bucket, upload).await?;

    Ok(Json(UploadImageResponse {
        bucket: bucket.as_str().to_owned(),
        url,
    }))
}

pub async fn delete_image_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<DeleteImageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let bucket = payload.bucket.trim().parse::<ImageBucket>()?;
    state
        .gallery_service
        .delete(&identity, bucket, payload.name.trim())
        .await?;

    Ok(Json(MessageResponse::new("image deleted")))
}
