//! Inquiry submission pipeline.
//!
//! Stages run strictly in order and any rejection short-circuits the rest:
//! rate check, bot check, validation, attachment, storage, notification.
//! The rate check is split out as [`SubmissionService::admit`] so a transport
//! can reject a client before reading its request body. Success is reported
//! only after the inquiry is stored; notification outcomes never change the
//! result.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use inkdesk_core::{AppError, AppResult, Identity};
use inkdesk_domain::{InquiryForm, InquiryRecord};
use tracing::{debug, info, warn};

use crate::timeout::bounded;
use crate::{
    AttachmentService, AttachmentUpload, BotCheckService, InquiryRepository, NewInquiry,
    NotificationDispatcher, NotificationReport, RateLimitRule, RateLimitService,
};

/// Response message for an accepted inquiry.
pub const SUBMISSION_SUCCESS_MESSAGE: &str = "Inquiry submitted successfully!";

/// Pipeline progress, used for stage-transition logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    /// Request accepted by the transport.
    Received,
    /// Client is within its rate window.
    RateChecked,
    /// Bot check passed.
    BotVerified,
    /// Form validated and sanitized.
    Validated,
    /// Attachment stored, or none was sent.
    AttachmentResolved,
    /// Inquiry persisted.
    Stored,
    /// Notifications attempted.
    Notified,
}

impl SubmissionStage {
    /// Returns a stable label for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::RateChecked => "rate_checked",
            Self::BotVerified => "bot_verified",
            Self::Validated => "validated",
            Self::AttachmentResolved => "attachment_resolved",
            Self::Stored => "stored",
            Self::Notified => "notified",
        }
    }
}

/// Proof that a client passed the rate check. Only [`SubmissionService::admit`]
/// creates one.
#[derive(Debug)]
pub struct Admission {
    client_address: String,
}

impl Admission {
    /// Client address the admission was granted to.
    #[must_use]
    pub fn client_address(&self) -> &str {
        self.client_address.as_str()
    }
}

/// One inquiry submission as extracted from the transport.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    /// Identity resolved by the identity gate.
    pub identity: Identity,
    /// Bot-mitigation token, if the client sent one.
    pub bot_token: Option<String>,
    /// Raw form fields.
    pub form: InquiryForm,
    /// Optional reference image.
    pub attachment: Option<AttachmentUpload>,
}

/// Result of an accepted submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    /// Stored inquiry.
    pub record: InquiryRecord,
    /// Delivery outcome of both notifications.
    pub notifications: NotificationReport,
}

/// Application service running the submission pipeline.
#[derive(Clone)]
pub struct SubmissionService {
    rate_limit_service: RateLimitService,
    rate_limit_rule: RateLimitRule,
    bot_check_service: BotCheckService,
    attachment_service: AttachmentService,
    inquiry_repository: Arc<dyn InquiryRepository>,
    notification_dispatcher: NotificationDispatcher,
    storage_timeout: Duration,
}

impl SubmissionService {
    /// Creates a new submission service.
    #[must_use]
    pub fn new(
        rate_limit_service: RateLimitService,
        rate_limit_rule: RateLimitRule,
        bot_check_service: BotCheckService,
        attachment_service: AttachmentService,
        inquiry_repository: Arc<dyn InquiryRepository>,
        notification_dispatcher: NotificationDispatcher,
        storage_timeout: Duration,
    ) -> Self {
        Self {
            rate_limit_service,
            rate_limit_rule,
            bot_check_service,
            attachment_service,
            inquiry_repository,
            notification_dispatcher,
            storage_timeout,
        }
    }

    /// Counts the attempt against the client's rate window.
    pub async fn admit(&self, client_address: impl Into<String>) -> AppResult<Admission> {
        let client_address = client_address.into();
        advance(&client_address, SubmissionStage::Received);

        self.rate_limit_service
            .check_rate_limit(&self.rate_limit_rule, &client_address)
            .await?;
        advance(&client_address, SubmissionStage::RateChecked);

        Ok(Admission { client_address })
    }

    /// Runs an admitted submission through the remaining stages.
    pub async fn submit(
        &self,
        admission: Admission,
        request: SubmissionRequest,
    ) -> AppResult<SubmissionOutcome> {
        let SubmissionRequest {
            identity,
            bot_token,
            form,
            attachment,
        } = request;
        let client_address = admission.client_address();

        self.bot_check_service
            .check(bot_token.as_deref())
            .await
            .inspect_err(|error| reject(client_address, SubmissionStage::RateChecked, error))?;
        advance(client_address, SubmissionStage::BotVerified);

        let inquiry = form
            .validate(Utc::now().date_naive())
            .inspect_err(|error| reject(client_address, SubmissionStage::BotVerified, error))?;
        advance(client_address, SubmissionStage::Validated);

        let attachment_url = match attachment {
            Some(upload) => Some(
                self.attachment_service
                    .store(upload)
                    .await
                    .inspect_err(|error| reject(client_address, SubmissionStage::Validated, error))?,
            ),
            None => None,
        };
        advance(client_address, SubmissionStage::AttachmentResolved);

        let record = bounded(
            self.storage_timeout,
            self.inquiry_repository.insert(NewInquiry {
                inquiry,
                attachment_url,
                submitter_subject: identity.subject().map(ToOwned::to_owned),
            }),
            || AppError::Storage("inquiry store timed out".to_owned()),
        )
        .await
        .map_err(|error| {
            warn!(client_address, error = %error, "failed to store inquiry");
            match error {
                AppError::Storage(message) => AppError::Storage(message),
                other => AppError::Storage(other.to_string()),
            }
        })?;
        advance(client_address, SubmissionStage::Stored);

        let notifications = self.notification_dispatcher.notify(&record).await;
        advance(client_address, SubmissionStage::Notified);

        info!(
            inquiry_id = %record.id,
            studio_notified = notifications.studio.is_sent(),
            customer_notified = notifications.customer.is_sent(),
            "inquiry accepted"
        );

        Ok(SubmissionOutcome {
            record,
            notifications,
        })
    }
}

fn advance(client_address: &str, stage: SubmissionStage) {
    debug!(client_address, stage = stage.as_str(), "submission stage reached");
}

fn reject(client_address: &str, stage: SubmissionStage, error: &AppError) {
    info!(client_address, after_stage = stage.as_str(), error = %error, "submission rejected");
}

#[cfg(test)]
mod tests;
