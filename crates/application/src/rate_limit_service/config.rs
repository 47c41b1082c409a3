/// Configuration for a rate limit rule.
#[derive(Debug, Clone)]
pub struct RateLimitRule {
    /// The route or category name, e.g. `"submit_form"`.
    pub category: String,
    /// Maximum number of attempts allowed in the window.
    pub max_attempts: i32,
    /// Window duration in seconds.
    pub window_seconds: i64,
}

impl RateLimitRule {
    /// Creates a new rate limit rule.
    #[must_use]
    pub fn new(category: impl Into<String>, max_attempts: i32, window_seconds: i64) -> Self {
        Self {
            category: category.into(),
            max_attempts,
            window_seconds,
        }
    }

    /// Default inquiry rule: two submissions per client per hour.
    #[must_use]
    pub fn submission_default() -> Self {
        Self::new("submit_form", 2, 60 * 60)
    }

    /// Sign-in rule: ten attempts per client per fifteen minutes.
    #[must_use]
    pub fn sign_in_default() -> Self {
        Self::new("sign_in", 10, 15 * 60)
    }
}
