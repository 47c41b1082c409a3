//! Notification dispatcher: studio notification and customer acknowledgment.
//!
//! Both messages are sent concurrently once the inquiry is stored. Delivery
//! is best-effort: failures are logged and reported, never propagated.

mod messages;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use inkdesk_core::{AppError, AppResult};
use inkdesk_domain::InquiryRecord;
use tracing::{debug, warn};

use crate::timeout::bounded;

pub(crate) use messages::{OutgoingEmail, customer_acknowledgment, studio_notification};

/// Port for sending email.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends a plain-text email with an optional HTML alternative.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()>;
}

/// Studio operator inbox and display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioContact {
    /// Operator inbox receiving new inquiries.
    pub address: String,
    /// Studio name used in the acknowledgment.
    pub name: String,
}

/// Outcome of one send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The provider accepted the message.
    Sent,
    /// The send failed or timed out.
    Failed(String),
}

impl DeliveryStatus {
    /// Whether the provider accepted the message.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Per-recipient delivery outcomes for one inquiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationReport {
    /// Studio notification outcome.
    pub studio: DeliveryStatus,
    /// Customer acknowledgment outcome.
    pub customer: DeliveryStatus,
}

/// Sends the two inquiry emails.
#[derive(Clone)]
pub struct NotificationDispatcher {
    email_service: Arc<dyn EmailService>,
    studio: StudioContact,
    timeout: Duration,
}

impl NotificationDispatcher {
    /// Creates a new notification dispatcher.
    #[must_use]
    pub fn new(email_service: Arc<dyn EmailService>, studio: StudioContact, timeout: Duration) -> Self {
        Self {
            email_service,
            studio,
            timeout,
        }
    }

    /// Sends both messages concurrently and reports each outcome.
    pub async fn notify(&self, record: &InquiryRecord) -> NotificationReport {
        let studio_message = studio_notification(record, self.studio.address.as_str());
        let customer_message = customer_acknowledgment(record, self.studio.name.as_str());

        let (studio, customer) = tokio::join!(
            self.deliver("studio", &studio_message),
            self.deliver("customer", &customer_message),
        );

        NotificationReport { studio, customer }
    }

    async fn deliver(&self, recipient_kind: &'static str, message: &OutgoingEmail) -> DeliveryStatus {
        let result = bounded(
            self.timeout,
            self.email_service.send_email(
                message.to.as_str(),
                message.subject.as_str(),
                message.text_body.as_str(),
                Some(message.html_body.as_str()),
            ),
            || AppError::Notification("email provider timed out".to_owned()),
        )
        .await;

        match result {
            Ok(()) => {
                debug!(recipient_kind, "notification sent");
                DeliveryStatus::Sent
            }
            Err(error) => {
                warn!(recipient_kind, error = %error, "notification delivery failed");
                DeliveryStatus::Failed(error.to_string())
            }
        }
    }
}
