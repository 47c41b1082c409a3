//! Object store adapter for a Supabase-compatible storage API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use inkdesk_application::{ObjectStore, StoredObject};
use inkdesk_core::{AppError, AppResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

const LIST_PAGE_SIZE: u32 = 1_000;

/// HTTP object store configuration.
#[derive(Clone)]
pub struct HttpObjectStoreConfig {
    /// Project base URL.
    pub base_url: String,
    /// Service key used for writes and listing.
    pub api_key: String,
}

/// Object store backed by the storage HTTP API.
#[derive(Clone)]
pub struct HttpObjectStore {
    http_client: reqwest::Client,
    config: HttpObjectStoreConfig,
}

#[derive(Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: u32,
    offset: u32,
    #[serde(rename = "sortBy")]
    sort_by: SortBy<'a>,
}

#[derive(Serialize)]
struct SortBy<'a> {
    column: &'a str,
    order: &'a str,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl HttpObjectStore {
    /// Creates a new HTTP object store.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: HttpObjectStoreConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn storage_url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(self.config.base_url.as_str())
            .map_err(|error| AppError::Internal(format!("invalid object store url: {error}")))?;
        url.path_segments_mut()
            .map_err(|()| AppError::Internal("object store url cannot be a base".to_owned()))?
            .pop_if_empty()
            .extend(["storage", "v1", "object"])
            .extend(segments);
        Ok(url)
    }

    fn public_url(&self, bucket: &str, key: &str) -> AppResult<String> {
        Ok(self
            .storage_url(&["public", bucket, key])?
            .to_string())
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String> {
        let response = self
            .http_client
            .post(self.storage_url(&[bucket, key])?)
            .bearer_auth(self.config.api_key.as_str())
            .header("apikey", self.config.api_key.as_str())
            .header("content-type", content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|error| AppError::Storage(format!("object upload failed: {error}")))?;

        if !response.status().is_success() {
            return Err(AppError::Storage(format!(
                "object store rejected upload to '{bucket}' with status {}",
                response.status()
            )));
        }

        self.public_url(bucket, key)
    }

    async fn list(&self, bucket: &str) -> AppResult<Vec<StoredObject>> {
        let response = self
            .http_client
            .post(self.storage_url(&["list", bucket])?)
            .bearer_auth(self.config.api_key.as_str())
            .header("apikey", self.config.api_key.as_str())
            .json(&ListRequest {
                prefix: "",
                limit: LIST_PAGE_SIZE,
                offset: 0,
                sort_by: SortBy {
                    column: "created_at",
                    order: "desc",
                },
            })
            .send()
            .await
            .map_err(|error| AppError::Storage(format!("object listing failed: {error}")))?;

        if !response.status().is_success() {
            return Err(AppError::Storage(format!(
                "object store rejected listing of '{bucket}' with status {}",
                response.status()
            )));
        }

        let listed: Vec<ListedObject> = response
            .json()
            .await
            .map_err(|error| AppError::Storage(format!("invalid object listing: {error}")))?;

        // Folder placeholders start with a dot and are not images.
        listed
            .into_iter()
            .filter(|object| !object.name.starts_with('.'))
            .map(|object| {
                Ok(StoredObject {
                    url: self.public_url(bucket, object.name.as_str())?,
                    name: object.name,
                    created_at: object.created_at,
                })
            })
            .collect()
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        let response = self
            .http_client
            .delete(self.storage_url(&[bucket, key])?)
            .bearer_auth(self.config.api_key.as_str())
            .header("apikey", self.config.api_key.as_str())
            .send()
            .await
            .map_err(|error| AppError::Storage(format!("object delete failed: {error}")))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!(
                "image '{key}' does not exist in '{bucket}'"
            ))),
            status => Err(AppError::Storage(format!(
                "object store rejected delete in '{bucket}' with status {status}"
            ))),
        }
    }
}
