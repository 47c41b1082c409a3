//! reCAPTCHA v3 `siteverify` adapter for the bot check port.

use async_trait::async_trait;
use inkdesk_application::{BotVerdict, BotVerifier};
use inkdesk_core::{AppError, AppResult};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use url::form_urlencoded;

/// Google's verification endpoint.
pub const DEFAULT_RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

// Error codes that describe our configuration rather than the visitor's token.
const CONFIGURATION_ERROR_CODES: [&str; 2] = ["missing-input-secret", "invalid-input-secret"];

/// Bot verifier backed by reCAPTCHA.
#[derive(Clone)]
pub struct RecaptchaBotVerifier {
    http_client: reqwest::Client,
    verify_url: String,
    secret: String,
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

impl RecaptchaBotVerifier {
    /// Creates a verifier posting to `verify_url` with the given site secret.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        verify_url: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            verify_url: verify_url.into(),
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl BotVerifier for RecaptchaBotVerifier {
    async fn verify(&self, token: &str) -> AppResult<BotVerdict> {
        // Credentials travel in the body so they never appear in a logged URL.
        let response = self
            .http_client
            .post(self.verify_url.as_str())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(verification_form(&self.secret, token))
            .send()
            .await
            .map_err(|error| {
                AppError::VerificationUnavailable(format!(
                    "verification request failed: {}",
                    error.without_url()
                ))
            })?;

        if !response.status().is_success() {
            return Err(AppError::VerificationUnavailable(format!(
                "verification provider returned status {}",
                response.status()
            )));
        }

        let body: SiteVerifyResponse = response.json().await.map_err(|error| {
            AppError::VerificationUnavailable(format!(
                "invalid verification response: {}",
                error.without_url()
            ))
        })?;

        verdict_from(body)
    }
}

fn verification_form(secret: &str, token: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("secret", secret)
        .append_pair("response", token)
        .finish()
}

fn verdict_from(body: SiteVerifyResponse) -> AppResult<BotVerdict> {
    if let Some(code) = body
        .error_codes
        .iter()
        .find(|code| CONFIGURATION_ERROR_CODES.contains(&code.as_str()))
    {
        return Err(AppError::VerificationUnavailable(format!(
            "verification provider rejected configuration: {code}"
        )));
    }

    Ok(BotVerdict {
        success: body.success,
        score: body.score,
    })
}

#[cfg(test)]
mod tests {
    use inkdesk_application::BotVerifier;
    use inkdesk_core::AppError;

    use super::{RecaptchaBotVerifier, SiteVerifyResponse, verdict_from, verification_form};

    fn parse(json: &str) -> SiteVerifyResponse {
        match serde_json::from_str(json) {
            Ok(body) => body,
            Err(error) => panic!("fixture should parse: {error}"),
        }
    }

    #[test]
    fn scored_success_is_passed_through() {
        let verdict = verdict_from(parse(r#"{"success":true,"score":0.7,"action":"submit"}"#));
        assert!(matches!(verdict, Ok(verdict) if verdict.success && verdict.score == Some(0.7)));
    }

    #[test]
    fn bad_visitor_token_is_a_failed_verdict() {
        let verdict = verdict_from(parse(
            r#"{"success":false,"error-codes":["invalid-input-response"]}"#,
        ));
        assert!(matches!(verdict, Ok(verdict) if !verdict.success && verdict.score.is_none()));
    }

    #[test]
    fn bad_secret_is_provider_unavailability() {
        let verdict = verdict_from(parse(
            r#"{"success":false,"error-codes":["invalid-input-secret"]}"#,
        ));
        assert!(matches!(verdict, Err(AppError::VerificationUnavailable(_))));
    }

    #[test]
    fn credentials_are_form_encoded() {
        assert_eq!(
            verification_form("site secret", "tok&en"),
            "secret=site+secret&response=tok%26en"
        );
    }

    #[tokio::test]
    async fn unreachable_provider_error_omits_credentials() {
        let verifier = RecaptchaBotVerifier::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9/siteverify",
            "site-secret-123",
        );

        let Err(AppError::VerificationUnavailable(message)) =
            verifier.verify("visitor-token").await
        else {
            panic!("expected the provider to be unavailable");
        };
        assert!(!message.contains("site-secret-123"));
        assert!(!message.contains("visitor-token"));
    }
}
