use redis::AsyncCommands;

use super::*;

pub(super) async fn check_postgres(pool: &sqlx::PgPool) -> HealthDependencyStatus {
    let probe = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool);

    match tokio::time::timeout(PROBE_TIMEOUT, probe).await {
        Ok(Ok(_)) => HealthDependencyStatus::ok("postgres"),
        Ok(Err(error)) => {
            HealthDependencyStatus::error("postgres", format!("postgres check failed: {error}"))
        }
        Err(_) => HealthDependencyStatus::error("postgres", "postgres check timed out"),
    }
}

/// Counters in Postgres share its health; Redis is pinged; memory is always up.
pub(super) async fn check_rate_limit_store(
    target: &RateLimitTarget,
    postgres: &HealthDependencyStatus,
) -> HealthDependencyStatus {
    let backend = target.as_str();
    match target {
        RateLimitTarget::Postgres if postgres.is_ok() => HealthDependencyStatus::ok(backend),
        RateLimitTarget::Postgres => {
            HealthDependencyStatus::error(backend, "rate limit counters live in postgres")
        }
        RateLimitTarget::Memory => HealthDependencyStatus {
            detail: Some("counters are local to this instance".to_owned()),
            ..HealthDependencyStatus::ok(backend)
        },
        RateLimitTarget::Redis(client) => {
            match tokio::time::timeout(PROBE_TIMEOUT, ping_redis(client)).await {
                Ok(Ok(())) => HealthDependencyStatus::ok(backend),
                Ok(Err(detail)) => HealthDependencyStatus::error(backend, detail),
                Err(_) => HealthDependencyStatus::error(backend, "redis ping timed out"),
            }
        }
    }
}

async fn ping_redis(client: &redis::Client) -> Result<(), String> {
    let mut connection = client
        .get_multiplexed_async_connection()
        .await
        .map_err(|error| format!("redis connection failed: {error}"))?;

    let reply = connection
        .ping::<String>()
        .await
        .map_err(|error| format!("redis ping failed: {error}"))?;

    if reply.eq_ignore_ascii_case("pong") {
        Ok(())
    } else {
        Err(format!("unexpected redis ping response: {reply}"))
    }
}

/// A filesystem blob root must be an existing directory. Remote storage is not probed.
pub(super) async fn check_object_store(blob_root: Option<&Path>) -> HealthDependencyStatus {
    let Some(root) = blob_root else {
        return HealthDependencyStatus::skipped("http", "remote storage is not probed");
    };

    match tokio::fs::metadata(root).await {
        Ok(metadata) if metadata.is_dir() => HealthDependencyStatus::ok("filesystem"),
        Ok(_) => HealthDependencyStatus::error(
            "filesystem",
            format!("blob root {} is not a directory", root.display()),
        ),
        Err(error) => HealthDependencyStatus::error(
            "filesystem",
            format!("blob root {} is unavailable: {error}", root.display()),
        ),
    }
}
