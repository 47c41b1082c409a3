use axum::extract::{Query, Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, Uri, header};
use axum::middleware::Next;
use axum::response::Response;
use inkdesk_application::{BearerCredential, IdentityService};
use inkdesk_core::{AppError, Identity, Role};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::ApiResult;
use crate::state::AppState;

/// Session key holding the identity provider access token.
pub const SESSION_ACCESS_TOKEN_KEY: &str = "access_token";

#[derive(Debug, Default, Deserialize)]
struct AccessTokenQuery {
    access_token: Option<String>,
}

/// Resolves the caller and stores the [`Identity`] in request extensions.
///
/// Never rejects: unverifiable callers continue as anonymous.
pub async fn resolve_identity(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = identify(&state, &session, request.headers(), request.uri()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Requires a verified `user` (or `admin`) identity.
pub async fn require_user(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    require_role(&state, &session, request, next, Role::User).await
}

/// Requires a verified `admin` identity.
pub async fn require_admin(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    require_role(&state, &session, request, next, Role::Admin).await
}

/// Applies the user gate to submissions only when the deployment enables it.
pub async fn gate_submission(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let required = if state.submission_requires_auth {
        Role::User
    } else {
        Role::Anonymous
    };

    require_role(&state, &session, request, next, required).await
}

async fn require_role(
    state: &AppState,
    session: &Session,
    mut request: Request,
    next: Next,
    required: Role,
) -> ApiResult<Response> {
    let identity = identify(state, session, request.headers(), request.uri()).await?;
    IdentityService::authorize(&identity, required)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

async fn identify(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
    uri: &Uri,
) -> ApiResult<Identity> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let session_token = session
        .get::<String>(SESSION_ACCESS_TOKEN_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session token: {error}")))?;
    let query = Query::<AccessTokenQuery>::try_from_uri(uri)
        .map(|Query(query)| query)
        .unwrap_or_default();

    let credential = BearerCredential::select(
        authorization,
        session_token.as_deref(),
        query.access_token.as_deref(),
    );

    Ok(state.identity_service.resolve(credential.as_ref()).await)
}

/// Blocks state-changing requests that do not originate from the frontend.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if headers
            .get("sec-fetch-site")
            .is_some_and(|fetch_site| fetch_site == HeaderValue::from_static("cross-site"))
        {
            return Err(AppError::Forbidden("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url.trim_end_matches('/');
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer
            .strip_prefix(allowed_origin)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Forbidden("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
