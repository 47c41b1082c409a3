use async_trait::async_trait;
use chrono::{DateTime, Utc};
use inkdesk_core::AppResult;

/// One object listed from a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key inside the bucket.
    pub name: String,
    /// Public URL the object is served from.
    pub url: String,
    /// Creation time, when the store tracks it.
    pub created_at: Option<DateTime<Utc>>,
}

/// Port for the blob store holding attachments and gallery images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores bytes under `bucket/key` and returns the public URL.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String>;

    /// Lists the objects in a bucket in no particular order.
    async fn list(&self, bucket: &str) -> AppResult<Vec<StoredObject>>;

    /// Deletes one object. Returns `AppError::NotFound` when it does not exist.
    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()>;
}
