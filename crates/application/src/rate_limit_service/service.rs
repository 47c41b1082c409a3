use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use inkdesk_core::{AppError, AppResult};
use inkdesk_domain::AbuseLogEntry;

use super::config::RateLimitRule;
use super::ports::RateLimitRepository;
use crate::AbuseLogRepository;
use crate::timeout::bounded;

/// Application service for rate limiting.
#[derive(Clone)]
pub struct RateLimitService {
    repository: Arc<dyn RateLimitRepository>,
    abuse_log: Arc<dyn AbuseLogRepository>,
    timeout: Duration,
}

impl RateLimitService {
    /// Creates a new rate limit service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RateLimitRepository>,
        abuse_log: Arc<dyn AbuseLogRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            repository,
            abuse_log,
            timeout,
        }
    }

    /// Checks whether the client is within the rate limit.
    ///
    /// Records the attempt and returns `Ok(())` if allowed. When the limit is
    /// exceeded, appends a "rate limit exceeded" entry to the abuse ledger and
    /// returns `AppError::RateLimited`. A failed ledger write is logged and
    /// does not turn the rejection into a different error.
    pub async fn check_rate_limit(&self, rule: &RateLimitRule, client_address: &str) -> AppResult<()> {
        let composite_key = format!("{}:{client_address}", rule.category);
        let info = bounded(
            self.timeout,
            self.repository
                .record_attempt(&composite_key, rule.window_seconds),
            || AppError::Storage("rate limit store timed out".to_owned()),
        )
        .await?;

        if info.attempt_count <= rule.max_attempts {
            return Ok(());
        }

        info!(
            client_address,
            category = rule.category.as_str(),
            attempt_count = info.attempt_count,
            window_started_at = %info.window_started_at,
            "rate limit exceeded"
        );

        if let Err(error) = bounded(
            self.timeout,
            self.abuse_log
                .append(AbuseLogEntry::rate_limit_exceeded(client_address)),
            || AppError::Storage("abuse log timed out".to_owned()),
        )
        .await
        {
            warn!(client_address, error = %error, "failed to append abuse log entry");
        }

        Err(AppError::RateLimited(
            "too many requests, please try again later".to_owned(),
        ))
    }

    /// Removes windows that have ended under every given rule.
    ///
    /// Only windows that started at least one longest-rule length ago are
    /// pruned, so a live window is never reset early.
    pub async fn cleanup(&self, rules: &[RateLimitRule]) -> AppResult<u64> {
        let Some(longest_window_seconds) = rules.iter().map(|rule| rule.window_seconds).max()
        else {
            return Ok(0);
        };

        let cutoff = Utc::now() - chrono::Duration::seconds(longest_window_seconds);
        bounded(
            self.timeout,
            self.repository.cleanup_expired(cutoff),
            || AppError::Storage("rate limit store timed out".to_owned()),
        )
        .await
    }
}
