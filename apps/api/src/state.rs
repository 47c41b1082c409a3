use std::path::PathBuf;
use std::sync::Arc;

use inkdesk_application::{
    AdminQueryService, GalleryService, IdentityService, RateLimitService, SubmissionService,
};
use ipnet::IpNet;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub identity_service: IdentityService,
    pub submission_service: SubmissionService,
    pub admin_query_service: AdminQueryService,
    pub gallery_service: GalleryService,
    pub rate_limit_service: RateLimitService,
    pub trusted_proxies: Arc<[IpNet]>,
    pub frontend_url: String,
    pub submission_requires_auth: bool,
    pub postgres_pool: PgPool,
    pub health_targets: HealthTargets,
}

/// Backend holding the rate limit counters.
#[derive(Clone)]
pub enum RateLimitTarget {
    Postgres,
    Redis(redis::Client),
    Memory,
}

impl RateLimitTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Redis(_) => "redis",
            Self::Memory => "memory",
        }
    }
}

/// Dependencies probed by `/health` besides Postgres.
#[derive(Clone)]
pub struct HealthTargets {
    pub rate_limit_store: RateLimitTarget,
    /// Blob directory when images are stored on the local filesystem.
    pub blob_root: Option<PathBuf>,
}
