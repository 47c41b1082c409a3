use async_trait::async_trait;
use inkdesk_application::{AbuseLogRepository, PageQuery};
use inkdesk_core::AppResult;
use inkdesk_domain::AbuseLogEntry;
use tokio::sync::RwLock;

/// In-memory abuse ledger for local development and tests.
#[derive(Debug, Default)]
pub struct InMemoryAbuseLogRepository {
    entries: RwLock<Vec<AbuseLogEntry>>,
}

impl InMemoryAbuseLogRepository {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AbuseLogRepository for InMemoryAbuseLogRepository {
    async fn append(&self, entry: AbuseLogEntry) -> AppResult<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn list_recent(&self, query: PageQuery) -> AppResult<Vec<AbuseLogEntry>> {
        Ok(self
            .entries
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
