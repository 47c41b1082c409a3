//! Identity gate: resolves bearer credentials to role-bearing identities.
//!
//! Every request is verified against the identity provider; results are
//! never cached so revocations take effect on the next request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use inkdesk_core::{AppError, AppResult, Identity, Role};
use tracing::warn;

use crate::timeout::bounded;

/// Session material returned by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInSession {
    /// Opaque bearer token issued by the provider.
    pub access_token: String,
    /// Token lifetime in seconds, when the provider reports it.
    pub expires_in_seconds: Option<i64>,
    /// Identity the token resolves to.
    pub identity: Identity,
}

/// Port for the external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies a bearer token. Returns `None` when the provider rejects it.
    async fn verify_token(&self, token: &str) -> AppResult<Option<Identity>>;

    /// Exchanges email and password for a session. Returns `None` on bad credentials.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Option<SignInSession>>;
}

/// Where a bearer credential was found on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `Authorization: Bearer <token>` header.
    Header,
    /// Token bound to the session cookie.
    Session,
    /// `access_token` query parameter.
    Query,
}

/// A bearer token and the transport it arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerCredential {
    token: String,
    source: CredentialSource,
}

impl BearerCredential {
    /// Picks the first usable token in precedence order: header, session, query.
    ///
    /// A header that is present but not a well-formed bearer value is skipped.
    #[must_use]
    pub fn select(
        authorization_header: Option<&str>,
        session_token: Option<&str>,
        query_token: Option<&str>,
    ) -> Option<Self> {
        let header_token = authorization_header.and_then(|value| {
            let (scheme, token) = value.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then_some(token)
        });

        [
            (header_token, CredentialSource::Header),
            (session_token, CredentialSource::Session),
            (query_token, CredentialSource::Query),
        ]
        .into_iter()
        .find_map(|(token, source)| {
            let token = token?.trim();
            (!token.is_empty()).then(|| Self {
                token: token.to_owned(),
                source,
            })
        })
    }

    /// Returns the raw token.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Returns the transport the token arrived on.
    #[must_use]
    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

/// Application service for identity resolution and role checks.
#[derive(Clone)]
pub struct IdentityService {
    provider: Arc<dyn IdentityProvider>,
    timeout: Duration,
}

impl IdentityService {
    /// Creates a new identity service.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Resolves a credential. Fails closed: anything unverifiable is anonymous.
    pub async fn resolve(&self, credential: Option<&BearerCredential>) -> Identity {
        let Some(credential) = credential else {
            return Identity::anonymous();
        };

        let verification = bounded(
            self.timeout,
            self.provider.verify_token(credential.token()),
            || AppError::Internal("identity provider timed out".to_owned()),
        )
        .await;

        match verification {
            Ok(Some(identity)) => identity,
            Ok(None) => Identity::anonymous(),
            Err(error) => {
                warn!(
                    source = ?credential.source(),
                    error = %error,
                    "identity provider verification failed; treating request as anonymous"
                );
                Identity::anonymous()
            }
        }
    }

    /// Resolves a credential and requires the resulting role to satisfy `required`.
    pub async fn require(
        &self,
        credential: Option<&BearerCredential>,
        required: Role,
    ) -> AppResult<Identity> {
        let identity = self.resolve(credential).await;
        Self::authorize(&identity, required)?;
        Ok(identity)
    }

    /// Checks an already resolved identity against a required role.
    ///
    /// Anonymous callers get `Unauthorized`; verified callers with an
    /// insufficient role get `Forbidden`.
    pub fn authorize(identity: &Identity, required: Role) -> AppResult<()> {
        if identity.role().satisfies(required) {
            return Ok(());
        }

        if identity.is_anonymous() {
            return Err(AppError::Unauthorized("authentication required".to_owned()));
        }

        Err(AppError::Forbidden(format!(
            "{} role required",
            required.as_str()
        )))
    }

    /// Signs in with email and password against the provider.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<SignInSession> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "email and password are required".to_owned(),
            ));
        }

        bounded(
            self.timeout,
            self.provider.sign_in(email.trim(), password),
            || AppError::Internal("identity provider timed out".to_owned()),
        )
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid email or password".to_owned()))
    }
}
