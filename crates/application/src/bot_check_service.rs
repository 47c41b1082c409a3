//! Bot check: human-interaction token verification with a score threshold.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use inkdesk_core::{AppError, AppResult};
use tracing::warn;

use crate::timeout::bounded;

/// Score threshold applied when none is configured.
pub const DEFAULT_MIN_BOT_SCORE: f64 = 0.5;

/// Provider answer for one token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotVerdict {
    /// Whether the provider accepted the token as well-formed and unexpired.
    pub success: bool,
    /// Human-likelihood in `[0, 1]`, when the provider reports one.
    pub score: Option<f64>,
}

/// Port for the bot-mitigation provider.
#[async_trait]
pub trait BotVerifier: Send + Sync {
    /// Verifies a token. Transport or provider failures are errors, not verdicts.
    async fn verify(&self, token: &str) -> AppResult<BotVerdict>;
}

/// Application service enforcing the bot check.
#[derive(Clone)]
pub struct BotCheckService {
    verifier: Arc<dyn BotVerifier>,
    min_score: f64,
    timeout: Duration,
}

impl BotCheckService {
    /// Creates a new bot check service.
    #[must_use]
    pub fn new(verifier: Arc<dyn BotVerifier>, min_score: f64, timeout: Duration) -> Self {
        Self {
            verifier,
            min_score,
            timeout,
        }
    }

    /// Verifies the token submitted with a form.
    ///
    /// A missing token is rejected without contacting the provider. A provider
    /// that fails or times out yields `VerificationUnavailable`; it is never a pass.
    pub async fn check(&self, token: Option<&str>) -> AppResult<()> {
        let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) else {
            return Err(AppError::Verification(
                "verification not completed".to_owned(),
            ));
        };

        let verdict = bounded(self.timeout, self.verifier.verify(token), || {
            AppError::VerificationUnavailable("bot verification timed out".to_owned())
        })
        .await
        .map_err(|error| match error {
            AppError::VerificationUnavailable(message) => {
                AppError::VerificationUnavailable(message)
            }
            other => AppError::VerificationUnavailable(other.to_string()),
        })?;

        if !verdict.success {
            return Err(AppError::Verification("verification failed".to_owned()));
        }

        match verdict.score {
            Some(score) if score >= self.min_score => Ok(()),
            Some(score) => {
                warn!(score, min_score = self.min_score, "bot check score below threshold");
                Err(AppError::Verification("verification failed".to_owned()))
            }
            None => Err(AppError::Verification("verification failed".to_owned())),
        }
    }
}
