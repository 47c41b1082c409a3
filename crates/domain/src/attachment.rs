//! Reference image policy shared by inquiry attachments and gallery uploads.

use chrono::{DateTime, Utc};
use inkdesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest accepted image, 5 MiB.
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Image media types accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMediaType {
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
}

impl ImageMediaType {
    /// Parses a declared content type, ignoring parameters and case.
    #[must_use]
    pub fn from_content_type(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("image/jpeg") {
            Some(Self::Jpeg)
        } else if essence.eq_ignore_ascii_case("image/png") {
            Some(Self::Png)
        } else {
            None
        }
    }

    /// Returns the canonical content type.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Returns the canonical file extension, without the dot.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    fn accepts_extension(&self, extension: &str) -> bool {
        match self {
            Self::Jpeg => matches!(extension, "jpg" | "jpeg"),
            Self::Png => extension == "png",
        }
    }
}

/// Checks declared type, filename extension, and size of an uploaded image.
pub fn validate_image(
    file_name: Option<&str>,
    content_type: Option<&str>,
    size_bytes: usize,
) -> AppResult<ImageMediaType> {
    let media_type = content_type
        .and_then(ImageMediaType::from_content_type)
        .ok_or_else(|| AppError::Attachment("invalid file type".to_owned()))?;

    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, extension)| extension.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if !media_type.accepts_extension(extension.as_str()) {
        return Err(AppError::Attachment("invalid file type".to_owned()));
    }

    if size_bytes == 0 {
        return Err(AppError::Attachment("file is empty".to_owned()));
    }

    if size_bytes > MAX_ATTACHMENT_BYTES {
        return Err(AppError::Attachment(
            "file exceeds the 5 MiB upload limit".to_owned(),
        ));
    }

    Ok(media_type)
}

/// Builds a collision-resistant object key: UTC timestamp, random UUID, canonical extension.
#[must_use]
pub fn storage_key(media_type: ImageMediaType, now: DateTime<Utc>, unique: Uuid) -> String {
    format!(
        "{}-{}.{}",
        now.format("%Y%m%dT%H%M%S%3fZ"),
        unique.simple(),
        media_type.extension()
    )
}

/// Checks that an object name addresses a single object inside a bucket.
pub fn validate_object_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    let is_plain = !name.is_empty()
        && name.len() <= 200
        && !name.starts_with('.')
        && name
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || matches!(character, '.' | '-' | '_'));

    if is_plain {
        Ok(name)
    } else {
        Err(AppError::Validation(format!("invalid image name '{name}'")))
    }
}
