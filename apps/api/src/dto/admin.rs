use inkdesk_application::PageQuery;
use inkdesk_domain::{AbuseLogEntry, InquiryRecord};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Paging parameters for admin listings.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/page-params.ts"
)]
pub struct PageParams {
    #[ts(optional)]
    pub limit: Option<usize>,
    #[ts(optional)]
    pub offset: Option<usize>,
}

impl From<PageParams> for PageQuery {
    fn from(value: PageParams) -> Self {
        let defaults = PageQuery::default();
        PageQuery::new(
            value.limit.unwrap_or(defaults.limit),
            value.offset.unwrap_or(defaults.offset),
        )
    }
}

/// API representation of a stored inquiry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/inquiry-response.ts"
)]
pub struct InquiryResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub placement: String,
    pub size: String,
    pub description: String,
    pub date_from: String,
    pub date_to: String,
    pub attachment_url: Option<String>,
    pub submitter_subject: Option<String>,
    pub created_at: String,
}

/// API representation of an abuse ledger entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/abuse-log-response.ts"
)]
pub struct AbuseLogResponse {
    pub client_address: String,
    pub reason: String,
    pub created_at: String,
}

impl From<InquiryRecord> for InquiryResponse {
    fn from(value: InquiryRecord) -> Self {
        Self {
            id: value.id.to_string(),
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            placement: value.placement,
            size: value.size,
            description: value.description,
            date_from: value.date_from.to_string(),
            date_to: value.date_to.to_string(),
            attachment_url: value.attachment_url,
            submitter_subject: value.submitter_subject,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

impl From<AbuseLogEntry> for AbuseLogResponse {
    fn from(value: AbuseLogEntry) -> Self {
        Self {
            client_address: value.client_address,
            reason: value.reason,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
