use axum::Json;
use axum::extract::{Extension, Query, State};
use inkdesk_core::Identity;

use crate::dto::{AbuseLogResponse, InquiryResponse, PageParams};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_inquiries_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Vec<InquiryResponse>>> {
    let inquiries = state
        .admin_query_service
        .list_inquiries(&identity, params.into())
        .await?;

    Ok(Json(inquiries.into_iter().map(InquiryResponse::from).collect()))
}

pub async fn list_abuse_logs_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Vec<AbuseLogResponse>>> {
    let entries = state
        .admin_query_service
        .list_abuse_logs(&identity, params.into())
        .await?;

    Ok(Json(entries.into_iter().map(AbuseLogResponse::from).collect()))
}
