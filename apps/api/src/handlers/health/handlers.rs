use super::checks::{check_object_store, check_postgres, check_rate_limit_store};
use super::*;

/// Ready when Postgres and the rate limit store answer and no probed store failed.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let targets = &state.health_targets;
    let postgres = check_postgres(&state.postgres_pool).await;
    let (rate_limit_store, object_store) = tokio::join!(
        check_rate_limit_store(&targets.rate_limit_store, &postgres),
        check_object_store(targets.blob_root.as_deref()),
    );

    let ready = postgres.is_ok() && rate_limit_store.is_ok() && !object_store.is_error();
    let http_status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status: if ready { "ok" } else { "degraded" },
            ready,
            postgres,
            rate_limit_store,
            object_store,
        }),
    )
}
