use axum::Json;
use axum::extract::{Extension, State};
use inkdesk_application::RateLimitRule;
use inkdesk_core::{AppError, Identity};
use tower_sessions::Session;

use crate::client_address::ClientAddress;
use crate::dto::{IdentityResponse, MessageResponse, SignInRequest, SignInResponse};
use crate::error::ApiResult;
use crate::middleware::SESSION_ACCESS_TOKEN_KEY;
use crate::state::AppState;

pub async fn sign_in_handler(
    State(state): State<AppState>,
    ClientAddress(client_address): ClientAddress,
    session: Session,
    Json(payload): Json<SignInRequest>,
) -> ApiResult<Json<SignInResponse>> {
    state
        .rate_limit_service
        .check_rate_limit(&RateLimitRule::sign_in_default(), &client_address)
        .await?;

    let signed_in = state
        .identity_service
        .sign_in(&payload.email, &payload.password)
        .await?;

    // Fresh session id on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;
    session
        .insert(SESSION_ACCESS_TOKEN_KEY, &signed_in.access_token)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session token: {error}")))?;

    Ok(Json(SignInResponse {
        identity: IdentityResponse::from(&signed_in.identity),
        access_token: signed_in.access_token,
        expires_in_seconds: signed_in.expires_in_seconds,
    }))
}

pub async fn sign_out_handler(session: Session) -> ApiResult<Json<MessageResponse>> {
    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(Json(MessageResponse::new("signed out")))
}

pub async fn me_handler(Extension(identity): Extension<Identity>) -> Json<IdentityResponse> {
    Json(IdentityResponse::from(&identity))
}
