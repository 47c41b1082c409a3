use axum::Json;
use axum::extract::{Extension, Multipart, State};
use inkdesk_application::{AttachmentUpload, SUBMISSION_SUCCESS_MESSAGE, SubmissionRequest};
use inkdesk_core::Identity;
use inkdesk_domain::{InquiryForm, fields};

use super::multipart::{FILE_FIELD, accept_single_upload, multipart_error, read_upload};
use crate::client_address::ClientAddress;
use crate::dto::MessageResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Multipart field carrying the bot-mitigation token.
const BOT_TOKEN_FIELD: &str = "g-recaptcha-response";

#[derive(Default)]
struct SubmissionFields {
    form: InquiryForm,
    bot_token: Option<String>,
    attachment: Option<AttachmentUpload>,
}

pub async fn submit_form_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ClientAddress(client_address): ClientAddress,
    multipart: Multipart,
) -> ApiResult<Json<MessageResponse>> {
    // Rate-limited clients are refused before the body is read.
    let admission = state.submission_service.admit(client_address).await?;
    let submission = read_submission(multipart).await?;

    state
        .submission_service
        .submit(
            admission,
            SubmissionRequest {
                identity,
                bot_token: submission.bot_token,
                form: submission.form,
                attachment: submission.attachment,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new(SUBMISSION_SUCCESS_MESSAGE)))
}

async fn read_submission(mut multipart: Multipart) -> ApiResult<SubmissionFields> {
    let mut submission = SubmissionFields::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_owned();
        if name == FILE_FIELD {
            let upload = read_upload(field).await?;
            accept_single_upload(&mut submission.attachment, upload)?;
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        let form = &mut submission.form;
        match name.as_str() {
            fields::PLACEMENT => form.placement = value,
            fields::SIZE => form.size = value,
            fields::DESCRIPTION => form.description = value,
            fields::FIRST_NAME => form.first_name = value,
            fields::LAST_NAME => form.last_name = value,
            fields::EMAIL => form.email = value,
            fields::PHONE => form.phone = value,
            fields::DATE_FROM => form.date_from = value,
            fields::DATE_TO => form.date_to = value,
            BOT_TOKEN_FIELD => submission.bot_token = Some(value),
            _ => {}
        }
    }

    Ok(submission)
}
