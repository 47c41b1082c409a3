//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_email_service;
mod filesystem_object_store;
mod http_identity_provider;
mod http_object_store;
mod in_memory_abuse_log_repository;
mod in_memory_inquiry_repository;
mod in_memory_rate_limit_repository;
mod postgres_abuse_log_repository;
mod postgres_inquiry_repository;
mod postgres_rate_limit_repository;
mod recaptcha_bot_verifier;
mod redis_rate_limit_repository;
mod resend_email_service;
mod smtp_email_service;

pub use console_email_service::ConsoleEmailService;
pub use filesystem_object_store::FilesystemObjectStore;
pub use http_identity_provider::{HttpIdentityProvider, HttpIdentityProviderConfig};
pub use http_object_store::{HttpObjectStore, HttpObjectStoreConfig};
pub use in_memory_abuse_log_repository::InMemoryAbuseLogRepository;
pub use in_memory_inquiry_repository::InMemoryInquiryRepository;
pub use in_memory_rate_limit_repository::InMemoryRateLimitRepository;
pub use postgres_abuse_log_repository::PostgresAbuseLogRepository;
pub use postgres_inquiry_repository::PostgresInquiryRepository;
pub use postgres_rate_limit_repository::PostgresRateLimitRepository;
pub use recaptcha_bot_verifier::{DEFAULT_RECAPTCHA_VERIFY_URL, RecaptchaBotVerifier};
pub use redis_rate_limit_repository::RedisRateLimitRepository;
pub use resend_email_service::{DEFAULT_RESEND_API_URL, ResendEmailConfig, ResendEmailService};
pub use smtp_email_service::{SmtpEmailConfig, SmtpEmailService};
