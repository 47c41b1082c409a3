use async_trait::async_trait;
use chrono::{DateTime, Utc};
use inkdesk_core::AppResult;
use inkdesk_domain::{Inquiry, InquiryId, InquiryRecord};

use crate::PageQuery;

/// Validated inquiry plus the data resolved by earlier pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInquiry {
    /// Sanitized inquiry.
    pub inquiry: Inquiry,
    /// Public URL of the stored reference image.
    pub attachment_url: Option<String>,
    /// Identity subject of an authenticated submitter.
    pub submitter_subject: Option<String>,
}

impl NewInquiry {
    /// Builds the persisted read model with store-assigned identity and time.
    #[must_use]
    pub fn into_record(self, id: InquiryId, created_at: DateTime<Utc>) -> InquiryRecord {
        let availability = self.inquiry.availability();
        InquiryRecord {
            id,
            first_name: self.inquiry.first_name().to_owned(),
            last_name: self.inquiry.last_name().to_owned(),
            email: self.inquiry.email().as_str().to_owned(),
            phone: self.inquiry.phone().map(ToOwned::to_owned),
            placement: self.inquiry.placement().to_owned(),
            size: self.inquiry.size().to_owned(),
            description: self.inquiry.description().to_owned(),
            date_from: availability.from(),
            date_to: availability.to(),
            attachment_url: self.attachment_url,
            submitter_subject: self.submitter_subject,
            created_at,
        }
    }
}

/// Repository port for stored inquiries.
#[async_trait]
pub trait InquiryRepository: Send + Sync {
    /// Inserts one inquiry in a single all-or-nothing write.
    async fn insert(&self, inquiry: NewInquiry) -> AppResult<InquiryRecord>;

    /// Lists inquiries newest first.
    async fn list_recent(&self, query: PageQuery) -> AppResult<Vec<InquiryRecord>>;
}
