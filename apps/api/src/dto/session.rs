use inkdesk_core::Identity;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for email/password sign-in.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/sign-in-request.ts"
)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Resolved caller identity.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/identity-response.ts"
)]
pub struct IdentityResponse {
    pub subject: Option<String>,
    pub email: Option<String>,
    /// One of `anonymous`, `user`, `admin`.
    pub role: String,
}

/// Sign-in result. The token is also bound to the session cookie.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/sign-in-response.ts"
)]
pub struct SignInResponse {
    pub identity: IdentityResponse,
    pub access_token: String,
    pub expires_in_seconds: Option<i64>,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            subject: identity.subject().map(ToOwned::to_owned),
            email: identity.email().map(ToOwned::to_owned),
            role: identity.role().as_str().to_owned(),
        }
    }
}
