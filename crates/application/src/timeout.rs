use std::future::Future;
use std::time::Duration;

use inkdesk_core::{AppError, AppResult};

/// Runs a collaborator call under a deadline, mapping expiry through `on_timeout`.
pub(crate) async fn bounded<T, F>(
    limit: Duration,
    call: F,
    on_timeout: impl FnOnce() -> AppError,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout()),
    }
}
