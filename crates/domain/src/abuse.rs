use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason recorded when a client exhausts its submission window.
pub const RATE_LIMIT_EXCEEDED_REASON: &str = "rate limit exceeded";

/// One append-only policy violation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbuseLogEntry {
    /// Address the offending request came from.
    pub client_address: String,
    /// Free-text classification of the violation.
    pub reason: String,
    /// Time the violation was recorded.
    pub created_at: DateTime<Utc>,
}

impl AbuseLogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(client_address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            client_address: client_address.into(),
            reason: reason.into(),
            created_at: Utc::now(),
        }
    }

    /// Creates the entry written when a submission window is exhausted.
    #[must_use]
    pub fn rate_limit_exceeded(client_address: impl Into<String>) -> Self {
        Self::new(client_address, RATE_LIMIT_EXCEEDED_REASON)
    }
}
