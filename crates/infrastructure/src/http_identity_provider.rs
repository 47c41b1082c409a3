//! Identity provider adapter for a GoTrue-compatible auth API
//! (`/auth/v1/user`, `/auth/v1/token`).

use async_trait::async_trait;
use inkdesk_application::{IdentityProvider, SignInSession};
use inkdesk_core::{AppError, AppResult, Identity, Role};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

/// HTTP identity provider configuration.
#[derive(Clone)]
pub struct HttpIdentityProviderConfig {
    /// Project base URL, e.g. `https://project.supabase.co`.
    pub base_url: String,
    /// API key sent in the `apikey` header.
    pub api_key: String,
}

/// Identity provider backed by a GoTrue-compatible HTTP API.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    http_client: reqwest::Client,
    config: HttpIdentityProviderConfig,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    app_metadata: AppMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: UserResponse,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

impl UserResponse {
    fn into_identity(self) -> Identity {
        // Only an explicit admin claim elevates; every other verified user is `user`.
        let role = match self.app_metadata.role.as_deref() {
            Some("admin") => Role::Admin,
            _ => Role::User,
        };
        Identity::verified(self.id, self.email, role)
    }
}

impl HttpIdentityProvider {
    /// Creates a new HTTP identity provider.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: HttpIdentityProviderConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn auth_url(&self, path: &str) -> AppResult<Url> {
        let base = Url::parse(self.config.base_url.as_str()).map_err(|error| {
            AppError::Internal(format!("invalid identity provider url: {error}"))
        })?;
        base.join(path).map_err(|error| {
            AppError::Internal(format!("invalid identity provider path '{path}': {error}"))
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_token(&self, token: &str) -> AppResult<Option<Identity>> {
        let response = self
            .http_client
            .get(self.auth_url("/auth/v1/user")?)
            .header("apikey", self.config.api_key.as_str())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("identity provider request failed: {error}"))
            })?;

        match response.status() {
            status if status.is_success() => {
                let user: UserResponse = response.json().await.map_err(|error| {
                    AppError::Internal(format!("invalid identity provider response: {error}"))
                })?;
                Ok(Some(user.into_identity()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(None),
            status => Err(AppError::Internal(format!(
                "identity provider returned status {status}"
            ))),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Option<SignInSession>> {
        let url = Url::parse_with_params(
            self.auth_url("/auth/v1/token")?.as_str(),
            [("grant_type", "password")],
        )
        .map_err(|error| AppError::Internal(format!("invalid identity provider url: {error}")))?;

        let response = self
            .http_client
            .post(url)
            .header("apikey", self.config.api_key.as_str())
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("identity provider request failed: {error}"))
            })?;

        match response.status() {
            status if status.is_success() => {
                let token: TokenResponse = response.json().await.map_err(|error| {
                    AppError::Internal(format!("invalid identity provider response: {error}"))
                })?;
                Ok(Some(SignInSession {
                    access_token: token.access_token,
                    expires_in_seconds: token.expires_in,
                    identity: token.user.into_identity(),
                }))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Ok(None),
            status => Err(AppError::Internal(format!(
                "identity provider returned status {status}"
            ))),
        }
    }
}
