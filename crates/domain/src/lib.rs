//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod abuse;
mod attachment;
mod email;
mod image_bucket;
mod inquiry;

pub use abuse::{AbuseLogEntry, RATE_LIMIT_EXCEEDED_REASON};
pub use attachment::{
    ImageMediaType, MAX_ATTACHMENT_BYTES, storage_key, validate_image, validate_object_name,
};
pub use email::EmailAddress;
pub use image_bucket::ImageBucket;
pub use inquiry::{
    AvailabilityWindow, Inquiry, InquiryForm, InquiryId, InquiryRecord, MAX_AVAILABILITY_DAYS,
    escape_html, fields,
};
