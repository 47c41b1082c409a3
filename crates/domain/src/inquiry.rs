//! Tattoo inquiry validation and sanitization.
//!
//! An [`InquiryForm`] carries the raw transport fields exactly as the visitor
//! submitted them. [`InquiryForm::validate`] trims, checks, and escapes every
//! field and produces a clean [`Inquiry`]. All violations are collected into
//! one [`FieldErrors`] value keyed by transport field name so the client can
//! highlight every offending input at once.

use chrono::{DateTime, NaiveDate, Utc};
use inkdesk_core::{AppResult, FieldErrors};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EmailAddress;

/// Longest availability window a visitor may request, in days.
pub const MAX_AVAILABILITY_DAYS: i64 = 60;

const MAX_NAME_CHARS: usize = 100;
const MAX_PLACEMENT_CHARS: usize = 200;
const MAX_SIZE_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 5_000;
const MAX_PHONE_CHARS: usize = 40;

const INVALID_DATE_FORMAT: &str = "invalid date format";
const INVALID_DATE_RANGE: &str = "invalid date range";

/// Transport field names used as keys in validation errors.
pub mod fields {
    /// Body placement.
    pub const PLACEMENT: &str = "placement";
    /// Requested size.
    pub const SIZE: &str = "size";
    /// Free-text description.
    pub const DESCRIPTION: &str = "desc";
    /// Given name.
    pub const FIRST_NAME: &str = "firstName";
    /// Family name.
    pub const LAST_NAME: &str = "lastName";
    /// Contact email.
    pub const EMAIL: &str = "email";
    /// Optional phone number.
    pub const PHONE: &str = "phone";
    /// First available day.
    pub const DATE_FROM: &str = "dateFrom";
    /// Last available day.
    pub const DATE_TO: &str = "dateTo";
}

/// Unique identifier for a stored inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InquiryId(Uuid);

impl InquiryId {
    /// Creates a new random inquiry identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an inquiry identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for InquiryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InquiryId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Raw inquiry fields as submitted. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InquiryForm {
    /// Body placement.
    pub placement: String,
    /// Requested size, e.g. `3x5`.
    pub size: String,
    /// Free-text description of the piece.
    pub description: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Optional phone number.
    pub phone: String,
    /// First available day, `YYYY-MM-DD`.
    pub date_from: String,
    /// Last available day, `YYYY-MM-DD`.
    pub date_to: String,
}

/// Inclusive range of calendar days the customer is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl AvailabilityWindow {
    /// First available day.
    #[must_use]
    pub fn from(&self) -> NaiveDate {
        self.from
    }

    /// Last available day.
    #[must_use]
    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Number of days between the first and last available day.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.to - self.from).num_days()
    }
}

/// Validated, sanitized inquiry ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inquiry {
    first_name: String,
    last_name: String,
    email: EmailAddress,
    phone: Option<String>,
    placement: String,
    size: String,
    description: String,
    availability: AvailabilityWindow,
}

impl Inquiry {
    /// Escaped given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Escaped family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Validated contact address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Normalized phone number, if one was given.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Escaped body placement.
    #[must_use]
    pub fn placement(&self) -> &str {
        self.placement.as_str()
    }

    /// Normalized or escaped size.
    #[must_use]
    pub fn size(&self) -> &str {
        self.size.as_str()
    }

    /// Escaped description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Requested availability window.
    #[must_use]
    pub fn availability(&self) -> AvailabilityWindow {
        self.availability
    }
}

/// Persisted inquiry read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryRecord {
    /// Unique identifier.
    pub id: InquiryId,
    /// Escaped given name.
    pub first_name: String,
    /// Escaped family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Normalized phone number.
    pub phone: Option<String>,
    /// Escaped body placement.
    pub placement: String,
    /// Normalized or escaped size.
    pub size: String,
    /// Escaped description.
    pub description: String,
    /// First available day.
    pub date_from: NaiveDate,
    /// Last available day.
    pub date_to: NaiveDate,
    /// Public URL of the reference image, if one was uploaded.
    pub attachment_url: Option<String>,
    /// Subject of the authenticated submitter, if any.
    pub submitter_subject: Option<String>,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}

impl InquiryForm {
    /// Validates and sanitizes the form against the current calendar day.
    ///
    /// Returns `AppError::InvalidFields` carrying every violation found.
    pub fn validate(self, today: NaiveDate) -> AppResult<Inquiry> {
        let mut errors = FieldErrors::new();

        let first_name = required_text(
            &mut errors,
            fields::FIRST_NAME,
            &self.first_name,
            MAX_NAME_CHARS,
        );
        let last_name = required_text(
            &mut errors,
            fields::LAST_NAME,
            &self.last_name,
            MAX_NAME_CHARS,
        );
        let placement = required_text(
            &mut errors,
            fields::PLACEMENT,
            &self.placement,
            MAX_PLACEMENT_CHARS,
        );
        let size = required_text(&mut errors, fields::SIZE, &self.size, MAX_SIZE_CHARS)
            .map(|size| normalize_size(&size).unwrap_or(size));
        let description = required_text(
            &mut errors,
            fields::DESCRIPTION,
            &self.description,
            MAX_DESCRIPTION_CHARS,
        );

        let email = match self.email.trim() {
            "" => {
                errors.add(fields::EMAIL, format!("{} is required", fields::EMAIL));
                None
            }
            value => match EmailAddress::new(value) {
                Ok(email) => Some(email),
                Err(_) => {
                    errors.add(fields::EMAIL, "enter a valid email address");
                    None
                }
            },
        };

        let phone = normalize_phone(&self.phone);
        if phone
            .as_deref()
            .is_some_and(|phone| phone.chars().count() > MAX_PHONE_CHARS)
        {
            errors.add(
                fields::PHONE,
                format!("{} must not exceed {MAX_PHONE_CHARS} characters", fields::PHONE),
            );
        }

        let availability = validate_availability(&mut errors, &self.date_from, &self.date_to, today);

        match (
            first_name,
            last_name,
            placement,
            size,
            description,
            email,
            availability,
        ) {
            (
                Some(first_name),
                Some(last_name),
                Some(placement),
                Some(size),
                Some(description),
                Some(email),
                Some(availability),
            ) if errors.is_empty() => Ok(Inquiry {
                first_name,
                last_name,
                email,
                phone,
                placement,
                size,
                description,
                availability,
            }),
            _ => Err(inkdesk_core::AppError::InvalidFields(errors)),
        }
    }
}

/// Escapes `&`, `<` and `>` so text cannot inject markup into email bodies.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }

    escaped
}

fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    max_chars: usize,
) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, format!("{field} is required"));
        return None;
    }

    if trimmed.chars().count() > max_chars {
        errors.add(field, format!("{field} must not exceed {max_chars} characters"));
        return None;
    }

    Some(escape_html(trimmed))
}

fn normalize_phone(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        Some(escape_html(trimmed))
    } else {
        Some(digits)
    }
}

/// Recognizes `W x H` with an optional inch unit and rewrites it as `WxH inches`.
fn normalize_size(value: &str) -> Option<String> {
    let lowered = value.trim().to_lowercase();
    let without_unit = ["inches", "inch", "in", "\""]
        .iter()
        .find_map(|unit| lowered.strip_suffix(unit))
        .unwrap_or(lowered.as_str())
        .trim();

    let (width, height) = without_unit
        .split_once(['x', '×', '*'])
        .map(|(width, height)| (width.trim(), height.trim()))?;

    if is_positive_number(width) && is_positive_number(height) {
        Some(format!("{width}x{height} inches"))
    } else {
        None
    }
}

fn is_positive_number(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|character| character.is_ascii_digit() || character == '.')
        && value.parse::<f64>().is_ok_and(|number| number > 0.0)
}

fn validate_availability(
    errors: &mut FieldErrors,
    date_from: &str,
    date_to: &str,
    today: NaiveDate,
) -> Option<AvailabilityWindow> {
    let from = parse_date(date_from);
    let to = parse_date(date_to);

    if from.is_none() {
        errors.add(fields::DATE_FROM, INVALID_DATE_FORMAT);
    }
    if to.is_none() {
        errors.add(fields::DATE_TO, INVALID_DATE_FORMAT);
    }

    let (from, to) = (from?, to?);
    let mut valid = true;

    if from < today {
        errors.add(fields::DATE_FROM, INVALID_DATE_RANGE);
        valid = false;
    }

    if to < from || (to - from).num_days() > MAX_AVAILABILITY_DAYS {
        errors.add(fields::DATE_TO, INVALID_DATE_RANGE);
        valid = false;
    }

    valid.then_some(AvailabilityWindow { from, to })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
