use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use inkdesk_application::{InquiryRepository, NewInquiry, PageQuery};
use inkdesk_core::{AppError, AppResult};
use inkdesk_domain::{InquiryId, InquiryRecord};

/// PostgreSQL-backed inquiry store.
#[derive(Clone)]
pub struct PostgresInquiryRepository {
    pool: PgPool,
}

impl PostgresInquiryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct InquiryRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    placement: String,
    size: String,
    description: String,
    date_from: NaiveDate,
    date_to: NaiveDate,
    attachment_url: Option<String>,
    submitter_subject: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<InquiryRow> for InquiryRecord {
    fn from(row: InquiryRow) -> Self {
        Self {
            id: InquiryId::from_uuid(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            placement: row.placement,
            size: row.size,
            description: row.description,
            date_from: row.date_from,
            date_to: row.date_to,
            attachment_url: row.attachment_url,
            submitter_subject: row.submitter_subject,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl InquiryRepository for PostgresInquiryRepository {
    async fn insert(&self, inquiry: NewInquiry) -> AppResult<InquiryRecord> {
        let availability = inquiry.inquiry.availability();
        let row = sqlx::query_as::<_, InquiryRow>(
            r#"
            INSERT INTO inquiries (
                id,
                first_name,
                last_name,
                email,
                phone,
                placement,
                size,
                description,
                date_from,
                date_to,
                attachment_url,
                submitter_subject
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id,
                first_name,
                last_name,
                email,
                phone,
                placement,
                size,
                description,
                date_from,
                date_to,
                attachment_url,
                submitter_subject,
                created_at
            "#,
        )
        .bind(InquiryId::new().as_uuid())
        .bind(inquiry.inquiry.first_name())
        .bind(inquiry.inquiry.last_name())
        .bind(inquiry.inquiry.email().as_str())
        .bind(inquiry.inquiry.phone())
        .bind(inquiry.inquiry.placement())
        .bind(inquiry.inquiry.size())
        .bind(inquiry.inquiry.description())
        .bind(availability.from())
        .bind(availability.to())
        .bind(inquiry.attachment_url.as_deref())
        .bind(inquiry.submitter_subject.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to insert inquiry: {error}")))?;

        Ok(row.into())
    }

    async fn list_recent(&self, query: PageQuery) -> AppResult<Vec<InquiryRecord>> {
        let rows = sqlx::query_as::<_, InquiryRow>(
            r#"
            SELECT
                id,
                first_name,
                last_name,
                email,
                phone,
                placement,
                size,
                description,
                date_from,
                date_to,
                attachment_url,
                submitter_subject,
                created_at
            FROM inquiries
            ORDER BY created_at DESC, sequence DESC
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(query.limit as i64)
        .bind(query.offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to list inquiries: {error}")))?;

        Ok(rows.into_iter().map(InquiryRecord::from).collect())
    }
}
