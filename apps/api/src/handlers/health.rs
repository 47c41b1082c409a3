use std::path::Path;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{HealthDependencyStatus, HealthResponse};
use crate::state::{AppState, RateLimitTarget};

mod checks;
mod handlers;

pub use handlers::health_handler;

/// Upper bound on each dependency probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
