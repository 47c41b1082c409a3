use std::sync::Arc;

use inkdesk_application::RateLimitRepository;
use inkdesk_core::{AppError, AppResult};
use inkdesk_infrastructure::{
    InMemoryRateLimitRepository, PostgresRateLimitRepository, RedisRateLimitRepository,
};
use sqlx::PgPool;
use tracing::warn;

use crate::api_config::{ApiConfig, RateLimitStoreConfig};

pub(super) async fn build_rate_limit_repository(
    pool: &PgPool,
    config: &ApiConfig,
    redis_client: Option<redis::Client>,
) -> AppResult<Arc<dyn RateLimitRepository>> {
    let repository: Arc<dyn RateLimitRepository> = match config.rate_limit_store {
        RateLimitStoreConfig::Postgres => Arc::new(PostgresRateLimitRepository::new(pool.clone())),
        RateLimitStoreConfig::Redis => {
            let redis_client = redis_client.ok_or_else(|| {
                AppError::Validation("REDIS_URL is required when RATE_LIMIT_STORE=redis".to_owned())
            })?;
            Arc::new(RedisRateLimitRepository::connect(redis_client, "inkdesk:rate_limit").await?)
        }
        RateLimitStoreConfig::Memory => {
            warn!("in-process rate limit counters are only valid for single-instance deployments");
            Arc::new(InMemoryRateLimitRepository::new())
        }
    };

    Ok(repository)
}
