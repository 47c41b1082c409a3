use std::sync::Arc;
use std::time::Duration;

use inkdesk_application::{BotVerifier, IdentityProvider, ObjectStore};
use inkdesk_core::{AppError, AppResult};
use inkdesk_infrastructure::{
    FilesystemObjectStore, HttpIdentityProvider, HttpIdentityProviderConfig, HttpObjectStore,
    HttpObjectStoreConfig, RecaptchaBotVerifier,
};

use crate::api_config::{ApiConfig, ObjectStoreConfig};

/// One pooled client shared by every HTTP collaborator.
pub(super) fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))
}

pub(super) fn build_identity_provider(
    http_client: &reqwest::Client,
    config: &ApiConfig,
) -> Arc<dyn IdentityProvider> {
    Arc::new(HttpIdentityProvider::new(
        http_client.clone(),
        HttpIdentityProviderConfig {
            base_url: config.identity_provider_url.clone(),
            api_key: config.identity_provider_api_key.clone(),
        },
    ))
}

pub(super) fn build_bot_verifier(
    http_client: &reqwest::Client,
    config: &ApiConfig,
) -> Arc<dyn BotVerifier> {
    Arc::new(RecaptchaBotVerifier::new(
        http_client.clone(),
        config.recaptcha_verify_url.clone(),
        config.recaptcha_secret.clone(),
    ))
}

pub(super) fn build_object_store(
    http_client: &reqwest::Client,
    config: &ApiConfig,
) -> Arc<dyn ObjectStore> {
    match &config.object_store {
        ObjectStoreConfig::Http { base_url, api_key } => Arc::new(HttpObjectStore::new(
            http_client.clone(),
            HttpObjectStoreConfig {
                base_url: base_url.clone(),
                api_key: api_key.clone(),
            },
        )),
        ObjectStoreConfig::Filesystem { root, public_url } => {
            Arc::new(FilesystemObjectStore::new(root.as_str(), public_url.as_str()))
        }
    }
}
