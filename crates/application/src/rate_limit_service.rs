//! Fixed-window submission rate limiting.
//!
//! Each key owns a window that starts on its first attempt and lasts
//! `window_seconds`. Attempts are counted atomically by the repository; the
//! attempt that pushes the count past `max_attempts` and every later one in
//! the same window are rejected and recorded in the abuse ledger. A client
//! may still submit `max_attempts` times at the end of one window and again
//! right after rollover; that burst is inherent to fixed windows.

mod config;
mod ports;
mod service;

pub use config::RateLimitRule;
pub use ports::{AttemptInfo, RateLimitRepository};
pub use service::RateLimitService;
