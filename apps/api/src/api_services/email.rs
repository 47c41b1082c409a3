use std::sync::Arc;

use inkdesk_application::EmailService;
use inkdesk_core::AppError;
use inkdesk_infrastructure::{
    ConsoleEmailService, ResendEmailConfig, ResendEmailService, SmtpEmailConfig, SmtpEmailService,
};

use crate::api_config::{ApiConfig, EmailProviderConfig};

pub(super) fn build_email_service(
    config: &ApiConfig,
    http_client: &reqwest::Client,
) -> Result<Arc<dyn EmailService>, AppError> {
    let service: Arc<dyn EmailService> = match &config.email_provider {
        EmailProviderConfig::Console => Arc::new(ConsoleEmailService::new()),
        EmailProviderConfig::Smtp { smtp, from_address } => {
            let smtp_config = SmtpEmailConfig {
                host: smtp.host.clone(),
                port: smtp.port,
                username: smtp.username.clone(),
                password: smtp.password.clone(),
                from_address: from_address.clone(),
            };
            Arc::new(SmtpEmailService::new(smtp_config)?)
        }
        EmailProviderConfig::Resend {
            resend,
            from_address,
        } => Arc::new(ResendEmailService::new(
            http_client.clone(),
            ResendEmailConfig {
                api_key: resend.api_key.clone(),
                api_url: resend.api_url.clone(),
                from_address: from_address.clone(),
            },
        )),
    };

    Ok(service)
}
