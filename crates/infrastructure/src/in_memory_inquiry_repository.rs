use async_trait::async_trait;
use chrono::Utc;
use inkdesk_application::{InquiryRepository, NewInquiry, PageQuery};
use inkdesk_core::AppResult;
use inkdesk_domain::{InquiryId, InquiryRecord};
use tokio::sync::RwLock;

/// In-memory inquiry store for local development and tests.
#[derive(Debug, Default)]
pub struct InMemoryInquiryRepository {
    records: RwLock<Vec<InquiryRecord>>,
}

impl InMemoryInquiryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InquiryRepository for InMemoryInquiryRepository {
    async fn insert(&self, inquiry: NewInquiry) -> AppResult<InquiryRecord> {
        let mut records = self.records.write().await;
        // Keep created_at monotonic even if the wall clock steps back.
        let created_at = records
            .last()
            .map(|last| last.created_at.max(Utc::now()))
            .unwrap_or_else(Utc::now);
        let record = inquiry.into_record(InquiryId::new(), created_at);
        records.push(record.clone());
        Ok(record)
    }

    async fn list_recent(&self, query: PageQuery) -> AppResult<Vec<InquiryRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}
