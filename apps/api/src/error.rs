use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inkdesk_core::AppError;
use tracing::error;

mod types;

pub use types::ErrorResponse;

const INTERNAL_ERROR_MESSAGE: &str = "something went wrong, please try again later";

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            AppError::Validation(_)
            | AppError::InvalidFields(_)
            | AppError::Attachment(_)
            | AppError::Verification(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::VerificationUnavailable(_)
            | AppError::Storage(_)
            | AppError::Notification(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let payload = match self.0 {
            AppError::InvalidFields(errors) => ErrorResponse::with_field_errors(
                "please correct the highlighted fields".to_owned(),
                &errors,
            ),
            AppError::Validation(message)
            | AppError::Attachment(message)
            | AppError::Verification(message)
            | AppError::NotFound(message)
            | AppError::Unauthorized(message)
            | AppError::Forbidden(message)
            | AppError::RateLimited(message) => ErrorResponse::new(message),
            internal => {
                // 500 details stay in the logs.
                error!(error = %internal, "request failed");
                ErrorResponse::new(INTERNAL_ERROR_MESSAGE.to_owned())
            }
        };

        (status, Json(payload)).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
