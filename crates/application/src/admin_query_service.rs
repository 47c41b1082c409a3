use std::sync::Arc;
use std::time::Duration;

use inkdesk_core::{AppError, AppResult, Identity, Role};
use inkdesk_domain::{AbuseLogEntry, InquiryRecord};

use crate::timeout::bounded;
use crate::{AbuseLogRepository, IdentityService, InquiryRepository, PageQuery};

/// Admin-only read access to stored inquiries and the abuse ledger.
#[derive(Clone)]
pub struct AdminQueryService {
    inquiry_repository: Arc<dyn InquiryRepository>,
    abuse_log_repository: Arc<dyn AbuseLogRepository>,
    timeout: Duration,
}

impl AdminQueryService {
    /// Creates a new admin query service.
    #[must_use]
    pub fn new(
        inquiry_repository: Arc<dyn InquiryRepository>,
        abuse_log_repository: Arc<dyn AbuseLogRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            inquiry_repository,
            abuse_log_repository,
            timeout,
        }
    }

    /// Lists stored inquiries newest first.
    pub async fn list_inquiries(
        &self,
        actor: &Identity,
        query: PageQuery,
    ) -> AppResult<Vec<InquiryRecord>> {
        IdentityService::authorize(actor, Role::Admin)?;
        bounded(
            self.timeout,
            self.inquiry_repository.list_recent(query),
            || AppError::Storage("inquiry store timed out".to_owned()),
        )
        .await
    }

    /// Lists abuse ledger entries newest first.
    pub async fn list_abuse_logs(
        &self,
        actor: &Identity,
        query: PageQuery,
    ) -> AppResult<Vec<AbuseLogEntry>> {
        IdentityService::authorize(actor, Role::Admin)?;
        bounded(
            self.timeout,
            self.abuse_log_repository.list_recent(query),
            || AppError::Storage("abuse log timed out".to_owned()),
        )
        .await
    }
}
