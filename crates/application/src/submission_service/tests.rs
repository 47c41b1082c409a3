use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use inkdesk_core::{AppError, AppResult, Identity, Role};
use inkdesk_domain::InquiryForm;

use super::{SubmissionOutcome, SubmissionRequest, SubmissionService};
use crate::test_support::{
    BotBehavior, CountingRateLimitRepository, RecordingAbuseLog, RecordingEmailService,
    RecordingInquiryRepository, RecordingObjectStore, ScriptedBotVerifier,
};
use crate::{
    AttachmentService, AttachmentUpload, BotCheckService, DEFAULT_MIN_BOT_SCORE,
    NotificationDispatcher, RateLimitRule, RateLimitService, StudioContact,
};

struct Harness {
    service: SubmissionService,
    abuse_log: Arc<RecordingAbuseLog>,
    bot: Arc<ScriptedBotVerifier>,
    store: Arc<RecordingObjectStore>,
    inquiries: Arc<RecordingInquiryRepository>,
    email: Arc<RecordingEmailService>,
}

#[derive(Default)]
struct Faults {
    low_score: bool,
    object_store: bool,
    inquiry_store: bool,
    email: bool,
}

fn harness(faults: Faults) -> Harness {
    let timeout = Duration::from_secs(5);
    let abuse_log = Arc::new(RecordingAbuseLog::default());
    let bot = Arc::new(ScriptedBotVerifier::new(BotBehavior::Score(if faults.low_score {
        0.1
    } else {
        0.9
    })));
    let store = Arc::new(RecordingObjectStore {
        fail: faults.object_store,
        ..RecordingObjectStore::default()
    });
    let inquiries = Arc::new(RecordingInquiryRepository {
        fail: faults.inquiry_store,
        ..RecordingInquiryRepository::default()
    });
    let email = Arc::new(RecordingEmailService {
        fail: faults.email,
        ..RecordingEmailService::default()
    });

    let service = SubmissionService::new(
        RateLimitService::new(
            Arc::new(CountingRateLimitRepository::default()),
            abuse_log.clone(),
            timeout,
        ),
        RateLimitRule::submission_default(),
        BotCheckService::new(bot.clone(), DEFAULT_MIN_BOT_SCORE, timeout),
        AttachmentService::new(store.clone(), "inquiry-uploads", timeout),
        inquiries.clone(),
        NotificationDispatcher::new(
            email.clone(),
            StudioContact {
                address: "studio@example.com".to_owned(),
                name: "Black Lantern".to_owned(),
            },
            timeout,
        ),
        timeout,
    );

    Harness {
        service,
        abuse_log,
        bot,
        store,
        inquiries,
        email,
    }
}

impl Harness {
    async fn submit(&self, request: SubmissionRequest) -> AppResult<SubmissionOutcome> {
        let admission = self.service.admit("203.0.113.9").await?;
        self.service.submit(admission, request).await
    }
}

fn raven_form() -> InquiryForm {
    let tomorrow = Utc::now().date_naive() + ChronoDuration::days(1);
    InquiryForm {
        placement: "forearm".to_owned(),
        size: "3x5".to_owned(),
        description: "raven".to_owned(),
        first_name: "Ann".to_owned(),
        last_name: "Lee".to_owned(),
        email: "ann@example.com".to_owned(),
        phone: String::new(),
        date_from: tomorrow.format("%Y-%m-%d").to_string(),
        date_to: (tomorrow + ChronoDuration::days(3)).format("%Y-%m-%d").to_string(),
    }
}

fn request(form: InquiryForm, attachment: Option<AttachmentUpload>) -> SubmissionRequest {
    SubmissionRequest {
        identity: Identity::anonymous(),
        bot_token: Some("bot-token".to_owned()),
        form,
        attachment,
    }
}

#[tokio::test]
async fn raven_inquiry_is_stored_and_both_emails_attempted() {
    let harness = harness(Faults::default());

    let Ok(outcome) = harness.submit(request(raven_form(), None)).await else {
        panic!("submission should succeed");
    };

    assert_eq!(outcome.record.first_name, "Ann");
    assert_eq!(outcome.record.size, "3x5 inches");
    assert_eq!(outcome.record.attachment_url, None);
    assert_eq!(harness.inquiries.records.lock().await.len(), 1);
    assert_eq!(*harness.email.attempts.lock().await, 2);
    assert!(outcome.notifications.studio.is_sent());
    assert!(outcome.notifications.customer.is_sent());
}

#[tokio::test]
async fn markup_in_description_is_stored_escaped() {
    let harness = harness(Faults::default());
    let form = InquiryForm {
        description: "<b>hi</b>".to_owned(),
        ..raven_form()
    };

    let Ok(outcome) = harness.submit(request(form, None)).await else {
        panic!("submission should succeed");
    };
    assert_eq!(outcome.record.description, "&lt;b&gt;hi&lt;/b&gt;");
}

#[tokio::test]
async fn authenticated_submitter_is_recorded() {
    let harness = harness(Faults::default());
    let mut submission = request(raven_form(), None);
    submission.identity = Identity::verified("user-42", None, Role::User);

    let Ok(outcome) = harness.submit(submission).await else {
        panic!("submission should succeed");
    };
    assert_eq!(outcome.record.submitter_subject.as_deref(), Some("user-42"));
}

#[tokio::test]
async fn attachment_url_is_stored_with_inquiry() {
    let harness = harness(Faults::default());
    let upload = AttachmentUpload {
        file_name: Some("raven.jpg".to_owned()),
        content_type: Some("image/jpeg".to_owned()),
        bytes: vec![1, 2, 3],
    };

    let Ok(outcome) = harness.submit(request(raven_form(), Some(upload))).await else {
        panic!("submission should succeed");
    };

    let url = outcome.record.attachment_url.unwrap_or_default();
    assert!(url.starts_with("https://cdn.test/inquiry-uploads/"));
    assert!(url.ends_with(".jpg"));
    assert_eq!(harness.store.objects.lock().await.len(), 1);
}

#[tokio::test]
async fn pdf_is_rejected_before_storage_or_email() {
    let harness = harness(Faults::default());
    let upload = AttachmentUpload {
        file_name: Some("brief.pdf".to_owned()),
        content_type: Some("application/pdf".to_owned()),
        bytes: vec![1, 2, 3],
    };

    let result = harness.submit(request(raven_form(), Some(upload))).await;

    assert!(matches!(result, Err(AppError::Attachment(_))));
    assert!(harness.store.objects.lock().await.is_empty());
    assert!(harness.inquiries.records.lock().await.is_empty());
    assert_eq!(*harness.email.attempts.lock().await, 0);
}

#[tokio::test]
async fn attachment_upload_failure_aborts_submission() {
    let harness = harness(Faults {
        object_store: true,
        ..Faults::default()
    });
    let upload = AttachmentUpload {
        file_name: Some("raven.png".to_owned()),
        content_type: Some("image/png".to_owned()),
        bytes: vec![1, 2, 3],
    };

    let result = harness.submit(request(raven_form(), Some(upload))).await;

    assert!(matches!(result, Err(AppError::Attachment(_))));
    assert!(harness.inquiries.records.lock().await.is_empty());
}

#[tokio::test]
async fn email_failures_do_not_fail_a_stored_submission() {
    let harness = harness(Faults {
        email: true,
        ..Faults::default()
    });

    let Ok(outcome) = harness.submit(request(raven_form(), None)).await else {
        panic!("submission should succeed despite email failures");
    };

    assert!(!outcome.notifications.studio.is_sent());
    assert!(!outcome.notifications.customer.is_sent());
    assert_eq!(harness.inquiries.records.lock().await.len(), 1);
    assert_eq!(*harness.email.attempts.lock().await, 2);
}

#[tokio::test]
async fn storage_failure_sends_no_email() {
    let harness = harness(Faults {
        inquiry_store: true,
        ..Faults::default()
    });

    let result = harness.submit(request(raven_form(), None)).await;

    assert!(matches!(result, Err(AppError::Storage(_))));
    assert_eq!(*harness.email.attempts.lock().await, 0);
}

#[tokio::test]
async fn invalid_form_reports_every_field() {
    let harness = harness(Faults::default());
    let form = InquiryForm {
        email: "not-an-email".to_owned(),
        placement: "  ".to_owned(),
        ..raven_form()
    };

    let result = harness.submit(request(form, None)).await;

    let Err(AppError::InvalidFields(errors)) = result else {
        panic!("expected field errors");
    };
    assert!(errors.contains("email"));
    assert!(errors.contains("placement"));
    assert!(harness.inquiries.records.lock().await.is_empty());
}

#[tokio::test]
async fn low_bot_score_stops_before_validation() {
    let harness = harness(Faults {
        low_score: true,
        ..Faults::default()
    });

    let result = harness.submit(request(InquiryForm::default(), None)).await;

    assert!(matches!(result, Err(AppError::Verification(_))));
    assert_eq!(harness.bot.calls.lock().await.len(), 1);
}

#[tokio::test]
async fn third_submission_is_rate_limited_before_bot_check() {
    let harness = harness(Faults::default());

    for _ in 0..2 {
        assert!(harness.submit(request(raven_form(), None)).await.is_ok());
    }
    let third = harness.submit(request(raven_form(), None)).await;

    assert!(matches!(third, Err(AppError::RateLimited(_))));
    assert_eq!(harness.abuse_log.entries.lock().await.len(), 1);
    assert_eq!(harness.bot.calls.lock().await.len(), 2);
    assert_eq!(harness.inquiries.records.lock().await.len(), 2);
}

#[tokio::test]
async fn rate_limited_client_is_refused_admission() {
    let harness = harness(Faults::default());

    for _ in 0..2 {
        assert!(harness.service.admit("198.51.100.20").await.is_ok());
    }
    let third = harness.service.admit("198.51.100.20").await;

    assert!(matches!(third, Err(AppError::RateLimited(_))));
    assert_eq!(harness.abuse_log.entries.lock().await.len(), 1);
    assert!(harness.bot.calls.lock().await.is_empty());
}
