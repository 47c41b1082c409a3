//! Local filesystem object store for development.
//!
//! Objects live at `{root}/{bucket}/{key}` and are expected to be served
//! by a static file server under `{public_base_url}/{bucket}/{key}`.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use inkdesk_application::{ObjectStore, StoredObject};
use inkdesk_core::{AppError, AppResult};

const UPLOADING_SUFFIX: &str = ".uploading";

/// Filesystem-backed object store.
#[derive(Debug, Clone)]
pub struct FilesystemObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl FilesystemObjectStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{bucket}/{key}", self.public_base_url)
    }

    fn object_path(bucket: &str, key: &str, root: &std::path::Path) -> AppResult<PathBuf> {
        let is_plain = |segment: &str| {
            !segment.is_empty()
                && !segment.starts_with('.')
                && !segment.contains(['/', '\\'])
        };
        if !is_plain(bucket) || !is_plain(key) {
            return Err(AppError::Validation(format!(
                "invalid object path '{bucket}/{key}'"
            )));
        }

        Ok(root.join(bucket).join(key))
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> AppResult<String> {
        let object_path = Self::object_path(bucket, key, &self.root)?;
        let bucket_dir = self.root.join(bucket);
        tokio::fs::create_dir_all(&bucket_dir)
            .await
            .map_err(|error| AppError::Storage(format!("failed to create bucket dir: {error}")))?;

        let temp_path = bucket_dir.join(format!(".{key}{UPLOADING_SUFFIX}"));
        tokio::fs::write(&temp_path, bytes)
            .await
            .map_err(|error| AppError::Storage(format!("failed to write object: {error}")))?;
        tokio::fs::rename(&temp_path, &object_path)
            .await
            .map_err(|error| AppError::Storage(format!("failed to publish object: {error}")))?;

        Ok(self.public_url(bucket, key))
    }

    async fn list(&self, bucket: &str) -> AppResult<Vec<StoredObject>> {
        let bucket_dir = self.root.join(bucket);
        let mut entries = match tokio::fs::read_dir(&bucket_dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                return Err(AppError::Storage(format!(
                    "failed to read bucket '{bucket}': {error}"
                )));
            }
        };

        let mut objects = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|error| AppError::Storage(format!("failed to read bucket entry: {error}")))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            let metadata = entry
                .metadata()
                .await
                .map_err(|error| AppError::Storage(format!("failed to stat '{name}': {error}")))?;
            if !metadata.is_file() {
                continue;
            }

            objects.push(StoredObject {
                url: self.public_url(bucket, name.as_str()),
                created_at: metadata.modified().ok().map(DateTime::<Utc>::from),
                name,
            });
        }

        Ok(objects)
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        let object_path = Self::object_path(bucket, key, &self.root)?;
        match tokio::fs::remove_file(&object_path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Err(AppError::NotFound(format!(
                "image '{key}' does not exist in '{bucket}'"
            ))),
            Err(error) => Err(AppError::Storage(format!(
                "failed to delete object: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use inkdesk_application::ObjectStore;
    use inkdesk_core::AppError;
    use uuid::Uuid;

    use super::FilesystemObjectStore;

    fn scratch_store() -> (FilesystemObjectStore, std::path::PathBuf) {
        let root = std::env::temp_dir().join(format!("inkdesk-store-{}", Uuid::new_v4()));
        (
            FilesystemObjectStore::new(root.clone(), "http://localhost:3001/uploads/"),
            root,
        )
    }

    #[tokio::test]
    async fn put_list_delete_cycle() {
        let (store, root) = scratch_store();

        let url = store
            .put("gallery", "a.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap_or_default();
        assert_eq!(url, "http://localhost:3001/uploads/gallery/a.png");

        let listed = store.list("gallery").await.unwrap_or_default();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "a.png");
        assert!(listed[0].created_at.is_some());

        assert!(store.delete("gallery", "a.png").await.is_ok());
        assert!(matches!(
            store.delete("gallery", "a.png").await,
            Err(AppError::NotFound(_))
        ));

        let _ = tokio::fs::remove_dir_all(root).await;
    }

    #[tokio::test]
    async fn missing_bucket_lists_empty() {
        let (store, _root) = scratch_store();
        assert!(matches!(store.list("flash").await, Ok(objects) if objects.is_empty()));
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let (store, _root) = scratch_store();
        let result = store.put("gallery", "../escape.png", vec![1], "image/png").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
