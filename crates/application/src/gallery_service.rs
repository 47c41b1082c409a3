//! Public gallery and flash image collections.

use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use inkdesk_core::{AppError, AppResult, Identity, Role};
use inkdesk_domain::{ImageBucket, storage_key, validate_object_name};
use tracing::info;
use uuid::Uuid;

use crate::timeout::bounded;
use crate::{AttachmentUpload, IdentityService, ObjectStore};

/// Reads and manages images in the closed set of public buckets.
#[derive(Clone)]
pub struct GalleryService {
    store: Arc<dyn ObjectStore>,
    timeout: Duration,
}

impl GalleryService {
    /// Creates a new gallery service.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Lists public image URLs, newest first.
    ///
    /// Objects without a creation time sort after dated ones; keys are
    /// timestamp-prefixed so the name breaks ties in the same order.
    pub async fn list(&self, bucket: ImageBucket) -> AppResult<Vec<String>> {
        let mut objects = bounded(self.timeout, self.store.list(bucket.as_str()), || {
            AppError::Storage("object store timed out".to_owned())
        })
        .await?;

        objects.sort_by(|left, right| {
            (Reverse(left.created_at.is_some()), Reverse(left.created_at), Reverse(&left.name)).cmp(&(
                Reverse(right.created_at.is_some()),
                Reverse(right.created_at),
                Reverse(&right.name),
            ))
        });

        Ok(objects.into_iter().map(|object| object.url).collect())
    }

    /// Uploads an image into a bucket. Admin only.
    pub async fn upload(
        &self,
        actor: &Identity,
        bucket: ImageBucket,
        upload: AttachmentUpload,
    ) -> AppResult<String> {
        IdentityService::authorize(actor, Role::Admin)?;
        let media_type = upload.check()?;
        let key = storage_key(media_type, Utc::now(), Uuid::new_v4());

        let url = bounded(
            self.timeout,
            self.store.put(
                bucket.as_str(),
                key.as_str(),
                upload.bytes,
                media_type.content_type(),
            ),
            || AppError::Storage("object store timed out".to_owned()),
        )
        .await?;

        info!(bucket = bucket.as_str(), key = key.as_str(), actor = actor.subject(), "image uploaded");
        Ok(url)
    }

    /// Deletes an image from a bucket. Admin only.
    pub async fn delete(&self, actor: &Identity, bucket: ImageBucket, name: &str) -> AppResult<()> {
        IdentityService::authorize(actor, Role::Admin)?;
        let name = validate_object_name(name)?;

        bounded(self.timeout, self.store.delete(bucket.as_str(), name), || {
            AppError::Storage("object store timed out".to_owned())
        })
        .await?;

        info!(bucket = bucket.as_str(), key = name, actor = actor.subject(), "image deleted");
        Ok(())
    }
}
