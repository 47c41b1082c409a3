use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use inkdesk_application::{AbuseLogRepository, PageQuery};
use inkdesk_core::{AppError, AppResult};
use inkdesk_domain::AbuseLogEntry;

/// PostgreSQL-backed append-only abuse ledger.
#[derive(Clone)]
pub struct PostgresAbuseLogRepository {
    pool: PgPool,
}

impl PostgresAbuseLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AbuseLogRow {
    client_address: String,
    reason: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl AbuseLogRepository for PostgresAbuseLogRepository {
    async fn append(&self, entry: AbuseLogEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO abuse_logs (client_address, reason, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(entry.client_address)
        .bind(entry.reason)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to append abuse log entry: {error}")))?;

        Ok(())
    }

    async fn list_recent(&self, query: PageQuery) -> AppResult<Vec<AbuseLogEntry>> {
        let rows = sqlx::query_as::<_, AbuseLogRow>(
            r#"
            SELECT client_address, reason, created_at
            FROM abuse_logs
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(query.limit as i64)
        .bind(query.offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to list abuse log entries: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| AbuseLogEntry {
                client_address: row.client_address,
                reason: row.reason,
                created_at: row.created_at,
            })
            .collect())
    }
}
