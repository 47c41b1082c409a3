use std::sync::Arc;
use std::time::Duration;

use inkdesk_application::{
    AbuseLogRepository, AdminQueryService, AttachmentService, BotCheckService, BotVerifier,
    EmailService, GalleryService, IdentityProvider, IdentityService, InquiryRepository,
    NotificationDispatcher, ObjectStore, RateLimitRepository, RateLimitRule, RateLimitService,
    StudioContact, SubmissionService,
};
use inkdesk_core::AppError;
use inkdesk_infrastructure::{PostgresAbuseLogRepository, PostgresInquiryRepository};
use ipnet::IpNet;
use sqlx::PgPool;

use crate::api_config::{ApiConfig, ObjectStoreConfig, RateLimitStoreConfig};
use crate::state::{AppState, HealthTargets, RateLimitTarget};

use super::email::build_email_service;
use super::redis::build_redis_client;

mod collaborators;
mod rate_limit;

/// Adapters behind every port the services depend on.
pub struct StatePorts {
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub bot_verifier: Arc<dyn BotVerifier>,
    pub object_store: Arc<dyn ObjectStore>,
    pub email_service: Arc<dyn EmailService>,
    pub inquiry_repository: Arc<dyn InquiryRepository>,
    pub abuse_log_repository: Arc<dyn AbuseLogRepository>,
    pub rate_limit_repository: Arc<dyn RateLimitRepository>,
}

/// Policy values the services are wired with.
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub frontend_url: String,
    pub trusted_proxies: Vec<IpNet>,
    pub submission_rate_limit: RateLimitRule,
    pub submission_requires_auth: bool,
    pub recaptcha_min_score: f64,
    pub inquiry_upload_bucket: String,
    pub studio: StudioContact,
    pub collaborator_timeout: Duration,
}

impl StateSettings {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            frontend_url: config.frontend_url.clone(),
            trusted_proxies: config.trusted_proxies.clone(),
            submission_rate_limit: config.submission_rate_limit.clone(),
            submission_requires_auth: config.submission_requires_auth,
            recaptcha_min_score: config.recaptcha_min_score,
            inquiry_upload_bucket: config.inquiry_upload_bucket.clone(),
            studio: StudioContact {
                address: config.studio_notification_address.clone(),
                name: config.studio_name.clone(),
            },
            collaborator_timeout: config.collaborator_timeout,
        }
    }
}

pub async fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let redis_client = config
        .redis_url
        .as_deref()
        .map(build_redis_client)
        .transpose()?;

    let http_client = collaborators::build_http_client(config.collaborator_timeout)?;
    let ports = StatePorts {
        identity_provider: collaborators::build_identity_provider(&http_client, config),
        bot_verifier: collaborators::build_bot_verifier(&http_client, config),
        object_store: collaborators::build_object_store(&http_client, config),
        email_service: build_email_service(config, &http_client)?,
        inquiry_repository: Arc::new(PostgresInquiryRepository::new(pool.clone())),
        abuse_log_repository: Arc::new(PostgresAbuseLogRepository::new(pool.clone())),
        rate_limit_repository: rate_limit::build_rate_limit_repository(
            &pool,
            config,
            redis_client.clone(),
        )
        .await?,
    };

    let rate_limit_store = match config.rate_limit_store {
        RateLimitStoreConfig::Postgres => RateLimitTarget::Postgres,
        RateLimitStoreConfig::Memory => RateLimitTarget::Memory,
        RateLimitStoreConfig::Redis => RateLimitTarget::Redis(redis_client.ok_or_else(|| {
            AppError::Validation("REDIS_URL is required when RATE_LIMIT_STORE=redis".to_owned())
        })?),
    };
    let blob_root = match &config.object_store {
        ObjectStoreConfig::Filesystem { root, .. } => Some(root.into()),
        ObjectStoreConfig::Http { .. } => None,
    };

    Ok(assemble_app_state(
        ports,
        StateSettings::from_config(config),
        pool,
        HealthTargets {
            rate_limit_store,
            blob_root,
        },
    ))
}

/// Wires services over the given adapters.
pub fn assemble_app_state(
    ports: StatePorts,
    settings: StateSettings,
    pool: PgPool,
    health_targets: HealthTargets,
) -> AppState {
    let timeout = settings.collaborator_timeout;
    let identity_service = IdentityService::new(ports.identity_provider, timeout);
    let rate_limit_service = RateLimitService::new(
        ports.rate_limit_repository,
        ports.abuse_log_repository.clone(),
        timeout,
    );
    let submission_service = SubmissionService::new(
        rate_limit_service.clone(),
        settings.submission_rate_limit,
        BotCheckService::new(ports.bot_verifier, settings.recaptcha_min_score, timeout),
        AttachmentService::new(
            ports.object_store.clone(),
            settings.inquiry_upload_bucket,
            timeout,
        ),
        ports.inquiry_repository.clone(),
        NotificationDispatcher::new(ports.email_service, settings.studio, timeout),
        timeout,
    );

    AppState {
        identity_service,
        submission_service,
        admin_query_service: AdminQueryService::new(
            ports.inquiry_repository,
            ports.abuse_log_repository,
            timeout,
        ),
        gallery_service: GalleryService::new(ports.object_store, timeout),
        rate_limit_service,
        trusted_proxies: settings.trusted_proxies.into(),
        frontend_url: settings.frontend_url,
        submission_requires_auth: settings.submission_requires_auth,
        postgres_pool: pool,
        health_targets,
    }
}
