mod admin;
mod common;
mod images;
mod session;

pub use admin::{AbuseLogResponse, InquiryResponse, PageParams};
pub use common::{HealthDependencyStatus, HealthResponse, MessageResponse};
pub use images::{DeleteImageRequest, ImageListResponse, UploadImageResponse};
pub use session::{IdentityResponse, SignInRequest, SignInResponse};
