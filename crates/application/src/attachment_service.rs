//! Attachment handler for the optional inquiry reference image.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use inkdesk_core::{AppError, AppResult};
use inkdesk_domain::{ImageMediaType, storage_key, validate_image};
use tracing::warn;
use uuid::Uuid;

use crate::ObjectStore;
use crate::timeout::bounded;

/// Uploaded file as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    /// Client-supplied filename. Only its extension is ever consulted.
    pub file_name: Option<String>,
    /// Declared content type.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    /// Checks type, extension, and size without storing anything.
    pub fn check(&self) -> AppResult<ImageMediaType> {
        validate_image(
            self.file_name.as_deref(),
            self.content_type.as_deref(),
            self.bytes.len(),
        )
    }
}

/// Stores inquiry attachments in the upload bucket.
#[derive(Clone)]
pub struct AttachmentService {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    timeout: Duration,
}

impl AttachmentService {
    /// Creates a new attachment service writing into `bucket`.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>, timeout: Duration) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            timeout,
        }
    }

    /// Validates and stores the upload, returning its public URL.
    ///
    /// Any store failure or timeout is an `AppError::Attachment`.
    pub async fn store(&self, upload: AttachmentUpload) -> AppResult<String> {
        let media_type = upload.check()?;
        let key = storage_key(media_type, Utc::now(), Uuid::new_v4());

        bounded(
            self.timeout,
            self.store.put(
                self.bucket.as_str(),
                key.as_str(),
                upload.bytes,
                media_type.content_type(),
            ),
            || AppError::Attachment("attachment upload timed out".to_owned()),
        )
        .await
        .map_err(|error| {
            warn!(bucket = self.bucket.as_str(), key = key.as_str(), error = %error, "attachment upload failed");
            match error {
                AppError::Attachment(message) => AppError::Attachment(message),
                _ => AppError::Attachment("failed to store attachment".to_owned()),
            }
        })
    }
}

#[cfg(test)]
mod tests;
