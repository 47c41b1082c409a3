//! Email delivery through the Resend HTTP API.

use async_trait::async_trait;
use inkdesk_application::EmailService;
use inkdesk_core::{AppError, AppResult};
use serde::Serialize;

/// Default Resend API base URL.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// Resend adapter configuration.
#[derive(Clone)]
pub struct ResendEmailConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// API base URL.
    pub api_url: String,
    /// Sender address, optionally with a display name.
    pub from_address: String,
}

/// Email service posting messages to Resend.
#[derive(Clone)]
pub struct ResendEmailService {
    http_client: reqwest::Client,
    config: ResendEmailConfig,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
}

impl ResendEmailService {
    /// Creates a new Resend email service.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: ResendEmailConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl EmailService for ResendEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(self.config.api_key.as_str())
            .json(&SendEmailRequest {
                from: self.config.from_address.as_str(),
                to: [to],
                subject,
                text: text_body,
                html: html_body,
            })
            .send()
            .await
            .map_err(|error| AppError::Notification(format!("resend request failed: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "resend rejected message with status {status}: {detail}"
            )));
        }

        Ok(())
    }
}
