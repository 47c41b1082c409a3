//! Inkdesk API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod client_address;
mod dto;
mod error;
mod handlers;
mod middleware;
mod rate_limit_cleanup;
mod state;

use std::net::SocketAddr;

use inkdesk_application::RateLimitRule;
use inkdesk_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_services::{build_app_state, build_postgres_session_layer, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let pool = connect_and_migrate(&config.database_url).await?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_layer = build_postgres_session_layer(pool.clone(), config.cookie_secure).await?;
    let app_state = build_app_state(pool, &config).await?;

    rate_limit_cleanup::spawn_rate_limit_cleanup(
        app_state.rate_limit_service.clone(),
        config.rate_limit_store,
        vec![
            config.submission_rate_limit.clone(),
            RateLimitRule::sign_in_default(),
        ],
    );

    let app = api_router::build_router(app_state, session_layer)?;
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "inkdesk-api listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
