//! Application services and ports.

#![forbid(unsafe_code)]

mod abuse_ledger;
mod admin_query_service;
mod attachment_service;
mod bot_check_service;
mod gallery_service;
mod identity_service;
mod inquiry_ports;
mod notification_service;
mod object_store;
mod paging;
mod rate_limit_service;
mod submission_service;
mod timeout;

#[cfg(test)]
mod test_support;

pub use abuse_ledger::AbuseLogRepository;
pub use admin_query_service::AdminQueryService;
pub use attachment_service::{AttachmentService, AttachmentUpload};
pub use bot_check_service::{BotCheckService, BotVerdict, BotVerifier, DEFAULT_MIN_BOT_SCORE};
pub use gallery_service::GalleryService;
pub use identity_service::{
    BearerCredential, CredentialSource, IdentityProvider, IdentityService, SignInSession,
};
pub use inquiry_ports::{InquiryRepository, NewInquiry};
pub use notification_service::{
    DeliveryStatus, EmailService, NotificationDispatcher, NotificationReport, StudioContact,
};
pub use object_store::{ObjectStore, StoredObject};
pub use paging::PageQuery;
pub use rate_limit_service::{AttemptInfo, RateLimitRepository, RateLimitRule, RateLimitService};
pub use submission_service::{
    Admission, SUBMISSION_SUCCESS_MESSAGE, SubmissionOutcome, SubmissionRequest, SubmissionService,
    SubmissionStage,
};
