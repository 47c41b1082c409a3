use std::time::Duration;

use inkdesk_application::{RateLimitRule, RateLimitService};
use tracing::{debug, error, info};

use crate::api_config::RateLimitStoreConfig;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Periodically prunes rate windows that have ended under every rule.
/// Redis expires its own keys.
pub fn spawn_rate_limit_cleanup(
    rate_limit_service: RateLimitService,
    store: RateLimitStoreConfig,
    rules: Vec<RateLimitRule>,
) {
    if store == RateLimitStoreConfig::Redis {
        info!("rate limit cleanup disabled (redis keys expire on their own)");
        return;
    }

    tokio::spawn(async move {
        info!(
            interval_seconds = CLEANUP_INTERVAL.as_secs(),
            "rate limit cleanup started"
        );

        loop {
            tokio::time::sleep(CLEANUP_INTERVAL).await;

            match rate_limit_service.cleanup(&rules).await {
                Ok(removed) => debug!(removed, "expired rate limit windows removed"),
                Err(error) => error!(error = %error, "rate limit cleanup failed"),
            }
        }
    });
}
