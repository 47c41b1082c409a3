use inkdesk_domain::{InquiryRecord, escape_html};

/// Fully rendered message ready for the email port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OutgoingEmail {
    pub(crate) to: String,
    pub(crate) subject: String,
    pub(crate) text_body: String,
    pub(crate) html_body: String,
}

// Record text fields are escaped at validation time and are inserted as is.

pub(crate) fn studio_notification(record: &InquiryRecord, studio_address: &str) -> OutgoingEmail {
    let phone = record.phone.as_deref().unwrap_or("N/A");
    let availability = format!("{} to {}", record.date_from, record.date_to);
    let attachment_text = record.attachment_url.as_deref().unwrap_or("none");
    let attachment_html = record.attachment_url.as_deref().map_or_else(
        || "none".to_owned(),
        |url| {
            let url = escape_html(url);
            format!("<a href=\"{url}\">{url}</a>")
        },
    );

    let text_body = format!(
        "New tattoo inquiry\n\n\
         Name: {first} {last}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Placement: {placement}\n\
         Size: {size}\n\
         Description: {description}\n\
         Availability: {availability}\n\
         Reference image: {attachment_text}\n",
        first = record.first_name,
        last = record.last_name,
        email = record.email,
        placement = record.placement,
        size = record.size,
        description = record.description,
    );

    let html_body = format!(
        "<h2>New tattoo inquiry</h2>\
         <p><strong>Name:</strong> {first} {last}</p>\
         <p><strong>Email:</strong> {email}</p>\
         <p><strong>Phone:</strong> {phone}</p>\
         <p><strong>Placement:</strong> {placement}</p>\
         <p><strong>Size:</strong> {size}</p>\
         <p><strong>Description:</strong> {description}</p>\
         <p><strong>Availability:</strong> {availability}</p>\
         <p><strong>Reference image:</strong> {attachment_html}</p>",
        first = record.first_name,
        last = record.last_name,
        email = escape_html(record.email.as_str()),
        placement = record.placement,
        size = record.size,
        description = record.description,
    );

    OutgoingEmail {
        to: studio_address.to_owned(),
        subject: format!("New Inquiry from {} {}", record.first_name, record.last_name),
        text_body,
        html_body,
    }
}

pub(crate) fn customer_acknowledgment(record: &InquiryRecord, studio_name: &str) -> OutgoingEmail {
    let studio_name_html = escape_html(studio_name);
    let text_body = format!(
        "Hi {first},\n\n\
         Thanks for reaching out to {studio_name}. We received your inquiry for a \
         {size} piece on your {placement} and will get back to you soon.\n\n\
         Requested availability: {from} to {to}\n",
        first = record.first_name,
        size = record.size,
        placement = record.placement,
        from = record.date_from,
        to = record.date_to,
    );
    let html_body = format!(
        "<p>Hi {first},</p>\
         <p>Thanks for reaching out to {studio_name_html}. We received your inquiry for a \
         {size} piece on your {placement} and will get back to you soon.</p>\
         <p>Requested availability: {from} to {to}</p>",
        first = record.first_name,
        size = record.size,
        placement = record.placement,
        from = record.date_from,
        to = record.date_to,
    );

    OutgoingEmail {
        to: record.email.clone(),
        subject: format!("We received your inquiry, {}", record.first_name),
        text_body,
        html_body,
    }
}
