use std::collections::BTreeMap;

use inkdesk_core::FieldErrors;
use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    errors: Option<BTreeMap<String, String>>,
}

impl ErrorResponse {
    pub(super) fn new(message: String) -> Self {
        Self {
            message,
            errors: None,
        }
    }

    pub(super) fn with_field_errors(message: String, errors: &FieldErrors) -> Self {
        Self {
            message,
            errors: Some(
                errors
                    .iter()
                    .map(|(field, message)| (field.to_owned(), message.to_owned()))
                    .collect(),
            ),
        }
    }
}
