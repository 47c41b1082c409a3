use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use inkdesk_core::AppError;
use inkdesk_domain::MAX_ATTACHMENT_BYTES;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

/// Room for the text fields around a maximum-size image.
const MAX_REQUEST_BODY_BYTES: usize = MAX_ATTACHMENT_BYTES + 1024 * 1024;

pub fn build_router<Store>(
    app_state: AppState,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let submission_routes = Router::new()
        .route(
            "/submit-form",
            post(handlers::submission::submit_form_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::gate_submission,
        ));

    let admin_routes = Router::new()
        .route(
            "/auth/api/inquiries",
            get(handlers::admin::list_inquiries_handler),
        )
        .route(
            "/auth/api/abuse-logs",
            get(handlers::admin::list_abuse_logs_handler),
        )
        .route(
            "/auth/api/upload-image",
            post(handlers::images::upload_image_handler),
        )
        .route(
            "/auth/api/delete-image",
            delete(handlers::images::delete_image_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_admin,
        ));

    let identity_routes = Router::new()
        .route("/auth/me", get(handlers::session::me_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::resolve_identity,
        ));

    let cors_layer = cors::build_cors_layer(&app_state.frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/images/{bucket}",
            get(handlers::images::list_images_handler),
        )
        .route("/sign-in", post(handlers::session::sign_in_handler))
        .route("/sign-out", post(handlers::session::sign_out_handler))
        .merge(submission_routes)
        .merge(admin_routes)
        .merge(identity_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}

#[cfg(test)]
mod tests;
