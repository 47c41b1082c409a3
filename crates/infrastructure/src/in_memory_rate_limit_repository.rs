//! Process-local rate limit counters. Valid for single-instance deployments only.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use inkdesk_application::{AttemptInfo, RateLimitRepository};
use inkdesk_core::{AppError, AppResult};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy)]
struct RateWindow {
    started_at: DateTime<Utc>,
    count: i32,
}

/// In-memory implementation of the rate limit repository port.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitRepository {
    windows: Mutex<HashMap<String, RateWindow>>,
}

impl InMemoryRateLimitRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn record_attempt_at(
        &self,
        key: &str,
        window_duration_seconds: i64,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptInfo> {
        if window_duration_seconds <= 0 {
            return Err(AppError::Validation(
                "window_duration_seconds must be greater than zero".to_owned(),
            ));
        }

        let window_length = Duration::seconds(window_duration_seconds);
        let mut windows = self.windows.lock().await;
        let window = windows
            .entry(key.to_owned())
            .and_modify(|window| {
                if window.started_at + window_length <= now {
                    *window = RateWindow {
                        started_at: now,
                        count: 1,
                    };
                } else {
                    window.count = window.count.saturating_add(1);
                }
            })
            .or_insert(RateWindow {
                started_at: now,
                count: 1,
            });

        Ok(AttemptInfo {
            attempt_count: window.count,
            window_started_at: window.started_at,
        })
    }
}

#[async_trait]
impl RateLimitRepository for InMemoryRateLimitRepository {
    async fn record_attempt(
        &self,
        key: &str,
        window_duration_seconds: i64,
    ) -> AppResult<AttemptInfo> {
        self.record_attempt_at(key, window_duration_seconds, Utc::now())
            .await
    }

    async fn cleanup_expired(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let mut windows = self.windows.lock().await;
        let initial = windows.len();
        windows.retain(|_, window| window.started_at >= before);
        Ok((initial - windows.len()) as u64)
    }
}
