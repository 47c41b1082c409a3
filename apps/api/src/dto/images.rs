use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Public image URLs for one bucket, newest first.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/image-list-response.ts"
)]
pub struct ImageListResponse {
    pub bucket: String,
    pub images: Vec<String>,
}

/// Result of an admin image upload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/upload-image-response.ts"
)]
pub struct UploadImageResponse {
    pub bucket: String,
    pub url: String,
}

/// Incoming payload for admin image deletion.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/delete-image-request.ts"
)]
pub struct DeleteImageRequest {
    pub bucket: String,
    pub name: String,
}
