use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
    pub rate_limit_store: HealthDependencyStatus,
    pub object_store: HealthDependencyStatus,
}

/// One runtime dependency health status.
///
/// `status` is `ok`, `error`, or `skipped` for dependencies that are not probed.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub backend: &'static str,
    pub detail: Option<String>,
}

impl HealthDependencyStatus {
    pub fn ok(backend: &'static str) -> Self {
        Self {
            status: "ok",
            backend,
            detail: None,
        }
    }

    pub fn error(backend: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status: "error",
            backend,
            detail: Some(detail.into()),
        }
    }

    pub fn skipped(backend: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status: "skipped",
            backend,
            detail: Some(detail.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

/// Plain `{ message }` response.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/message-response.ts"
)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
