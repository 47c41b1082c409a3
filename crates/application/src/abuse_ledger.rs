use async_trait::async_trait;
use inkdesk_core::AppResult;
use inkdesk_domain::AbuseLogEntry;

use crate::PageQuery;

/// Repository port for the append-only abuse ledger.
#[async_trait]
pub trait AbuseLogRepository: Send + Sync {
    /// Appends one entry. Entries are never updated or removed.
    async fn append(&self, entry: AbuseLogEntry) -> AppResult<()>;

    /// Lists entries newest first.
    async fn list_recent(&self, query: PageQuery) -> AppResult<Vec<AbuseLogEntry>>;
}
