use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use inkdesk_application::{DEFAULT_MIN_BOT_SCORE, RateLimitRule};
use inkdesk_core::AppError;
use inkdesk_infrastructure::{DEFAULT_RECAPTCHA_VERIFY_URL, DEFAULT_RESEND_API_URL};
use ipnet::IpNet;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStoreConfig {
    Postgres,
    Redis,
    Memory,
}

#[derive(Debug, Clone)]
pub struct SmtpRuntimeConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ResendRuntimeConfig {
    pub api_key: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub enum EmailProviderConfig {
    Console,
    Smtp {
        smtp: SmtpRuntimeConfig,
        from_address: String,
    },
    Resend {
        resend: ResendRuntimeConfig,
        from_address: String,
    },
}

#[derive(Debug, Clone)]
pub enum ObjectStoreConfig {
    Http { base_url: String, api_key: String },
    Filesystem { root: String, public_url: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub trusted_proxies: Vec<IpNet>,
    pub rate_limit_store: RateLimitStoreConfig,
    pub redis_url: Option<String>,
    pub submission_rate_limit: RateLimitRule,
    pub submission_requires_auth: bool,
    pub recaptcha_secret: String,
    pub recaptcha_verify_url: String,
    pub recaptcha_min_score: f64,
    pub identity_provider_url: String,
    pub identity_provider_api_key: String,
    pub object_store: ObjectStoreConfig,
    pub inquiry_upload_bucket: String,
    pub email_provider: EmailProviderConfig,
    pub studio_notification_address: String,
    pub studio_name: String,
    pub collaborator_timeout: Duration,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let cookie_secure = parse_flag(
            "SESSION_COOKIE_SECURE",
            env::var("SESSION_COOKIE_SECURE").ok().as_deref(),
            false,
        )?;
        let trusted_proxies =
            parse_trusted_proxies(env::var("TRUSTED_PROXIES").unwrap_or_default().as_str())?;

        let rate_limit_store = match env::var("RATE_LIMIT_STORE")
            .unwrap_or_else(|_| "postgres".to_owned())
            .as_str()
        {
            "postgres" => RateLimitStoreConfig::Postgres,
            "redis" => RateLimitStoreConfig::Redis,
            "memory" => RateLimitStoreConfig::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "RATE_LIMIT_STORE must be 'postgres', 'redis', or 'memory', got '{other}'"
                )));
            }
        };
        let redis_url = optional_env("REDIS_URL");
        if rate_limit_store == RateLimitStoreConfig::Redis && redis_url.is_none() {
            return Err(AppError::Validation(
                "REDIS_URL is required when RATE_LIMIT_STORE=redis".to_owned(),
            ));
        }

        let submission_rate_limit = RateLimitRule::new(
            "submit_form",
            parse_number("SUBMISSION_RATE_LIMIT_MAX", optional_env("SUBMISSION_RATE_LIMIT_MAX"), 2)?,
            parse_number(
                "SUBMISSION_RATE_LIMIT_WINDOW_SECONDS",
                optional_env("SUBMISSION_RATE_LIMIT_WINDOW_SECONDS"),
                3600,
            )?,
        );
        if submission_rate_limit.window_seconds <= 0 {
            return Err(AppError::Validation(
                "SUBMISSION_RATE_LIMIT_WINDOW_SECONDS must be greater than zero".to_owned(),
            ));
        }
        let submission_requires_auth = parse_flag(
            "SUBMISSION_REQUIRES_AUTH",
            env::var("SUBMISSION_REQUIRES_AUTH").ok().as_deref(),
            false,
        )?;

        let recaptcha_min_score = parse_number(
            "RECAPTCHA_MIN_SCORE",
            optional_env("RECAPTCHA_MIN_SCORE"),
            DEFAULT_MIN_BOT_SCORE,
        )?;
        if !(0.0..=1.0).contains(&recaptcha_min_score) {
            return Err(AppError::Validation(
                "RECAPTCHA_MIN_SCORE must be between 0 and 1".to_owned(),
            ));
        }

        let object_store = match env::var("OBJECT_STORE")
            .unwrap_or_else(|_| "http".to_owned())
            .as_str()
        {
            "http" => ObjectStoreConfig::Http {
                base_url: required_non_empty_env("OBJECT_STORE_URL")?,
                api_key: required_non_empty_env("OBJECT_STORE_API_KEY")?,
            },
            "filesystem" => ObjectStoreConfig::Filesystem {
                root: required_non_empty_env("OBJECT_STORE_ROOT")?,
                public_url: required_non_empty_env("OBJECT_STORE_PUBLIC_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "OBJECT_STORE must be either 'http' or 'filesystem', got '{other}'"
                )));
            }
        };

        let email_provider = match env::var("EMAIL_PROVIDER")
            .unwrap_or_else(|_| "console".to_owned())
            .as_str()
        {
            "console" => EmailProviderConfig::Console,
            "smtp" => {
                let port = required_non_empty_env("SMTP_PORT")?
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid SMTP_PORT: {error}")))?;
                EmailProviderConfig::Smtp {
                    smtp: SmtpRuntimeConfig {
                        host: required_non_empty_env("SMTP_HOST")?,
                        port,
                        username: required_non_empty_env("SMTP_USERNAME")?,
                        password: required_non_empty_env("SMTP_PASSWORD")?,
                    },
                    from_address: required_non_empty_env("EMAIL_FROM_ADDRESS")?,
                }
            }
            "resend" => EmailProviderConfig::Resend {
                resend: ResendRuntimeConfig {
                    api_key: required_non_empty_env("RESEND_API_KEY")?,
                    api_url: optional_env("RESEND_API_URL")
                        .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_owned()),
                },
                from_address: required_non_empty_env("EMAIL_FROM_ADDRESS")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "EMAIL_PROVIDER must be 'console', 'smtp', or 'resend', got '{other}'"
                )));
            }
        };

        let collaborator_timeout = Duration::from_millis(parse_number(
            "COLLABORATOR_TIMEOUT_MS",
            optional_env("COLLABORATOR_TIMEOUT_MS"),
            10_000_u64,
        )?);

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
            trusted_proxies,
            rate_limit_store,
            redis_url,
            submission_rate_limit,
            submission_requires_auth,
            recaptcha_secret: required_non_empty_env("RECAPTCHA_SECRET")?,
            recaptcha_verify_url: optional_env("RECAPTCHA_VERIFY_URL")
                .unwrap_or_else(|| DEFAULT_RECAPTCHA_VERIFY_URL.to_owned()),
            recaptcha_min_score,
            identity_provider_url: required_non_empty_env("IDENTITY_PROVIDER_URL")?,
            identity_provider_api_key: required_non_empty_env("IDENTITY_PROVIDER_API_KEY")?,
            object_store,
            inquiry_upload_bucket: optional_env("INQUIRY_UPLOAD_BUCKET")
                .unwrap_or_else(|| "inquiry-uploads".to_owned()),
            email_provider,
            studio_notification_address: required_non_empty_env("STUDIO_NOTIFICATION_ADDRESS")?,
            studio_name: optional_env("STUDIO_NAME").unwrap_or_else(|| "the studio".to_owned()),
            collaborator_timeout,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Parses a comma-separated list of CIDR blocks or bare addresses.
pub fn parse_trusted_proxies(value: &str) -> Result<Vec<IpNet>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<IpNet>()
                .or_else(|_| entry.parse::<IpAddr>().map(IpNet::from))
                .map_err(|error| {
                    AppError::Validation(format!("invalid TRUSTED_PROXIES entry '{entry}': {error}"))
                })
        })
        .collect()
}

fn parse_flag(name: &str, value: Option<&str>, default: bool) -> Result<bool, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) if value.eq_ignore_ascii_case("true") || value == "1" => Ok(true),
        Some(value) if value.eq_ignore_ascii_case("false") || value == "0" => Ok(false),
        Some(other) => Err(AppError::Validation(format!(
            "{name} must be 'true' or 'false', got '{other}'"
        ))),
    }
}

fn parse_number<T>(name: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
    })
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
