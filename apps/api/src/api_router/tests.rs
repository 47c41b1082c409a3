use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use inkdesk_application::{
    AbuseLogRepository, BotVerdict, BotVerifier, EmailService, IdentityProvider,
    InquiryRepository, ObjectStore, PageQuery, RateLimitRule, SignInSession, StoredObject,
    StudioContact,
};
use inkdesk_core::{AppError, AppResult, Identity, Role};
use inkdesk_infrastructure::{
    InMemoryAbuseLogRepository, InMemoryInquiryRepository, InMemoryRateLimitRepository,
};
use ipnet::IpNet;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use super::build_router;
use crate::api_services::{StatePorts, StateSettings, assemble_app_state};
use crate::state::{HealthTargets, RateLimitTarget};

const FRONTEND_URL: &str = "http://localhost:3000";
const BOUNDARY: &str = "inkdesk-test-boundary";
const ADMIN_TOKEN: &str = "admin-token";
const USER_TOKEN: &str = "user-token";
const ADMIN_EMAIL: &str = "ink@studio.test";
const ADMIN_PASSWORD: &str = "correct horse battery staple";

struct StaticIdentityProvider;

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_token(&self, token: &str) -> AppResult<Option<Identity>> {
        Ok(match token {
            ADMIN_TOKEN => Some(admin_identity()),
            USER_TOKEN => Some(Identity::verified("user-1", None, Role::User)),
            _ => None,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Option<SignInSession>> {
        Ok((email == ADMIN_EMAIL && password == ADMIN_PASSWORD).then(|| SignInSession {
            access_token: ADMIN_TOKEN.to_owned(),
            expires_in_seconds: Some(3600),
            identity: admin_identity(),
        }))
    }
}

fn admin_identity() -> Identity {
    Identity::verified("admin-1", Some(ADMIN_EMAIL.to_owned()), Role::Admin)
}

struct ScoringBotVerifier;

#[async_trait]
impl BotVerifier for ScoringBotVerifier {
    async fn verify(&self, token: &str) -> AppResult<BotVerdict> {
        let score = if token == "bot-token" { 0.1 } else { 0.9 };
        Ok(BotVerdict {
            success: true,
            score: Some(score),
        })
    }
}

#[derive(Default)]
struct RecordingObjectStore {
    objects: Mutex<Vec<(String, String)>>,
}

impl RecordingObjectStore {
    fn count(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> AppResult<String> {
        if let Ok(mut objects) = self.objects.lock() {
            objects.push((bucket.to_owned(), key.to_owned()));
        }
        Ok(format!("https://cdn.test/{bucket}/{key}"))
    }

    async fn list(&self, bucket: &str) -> AppResult<Vec<StoredObject>> {
        let objects = self
            .objects
            .lock()
            .map_err(|_| AppError::Storage("poisoned".to_owned()))?;

        Ok(objects
            .iter()
            .filter(|(object_bucket, _)| object_bucket == bucket)
            .map(|(_, key)| StoredObject {
                name: key.clone(),
                url: format!("https://cdn.test/{bucket}/{key}"),
                created_at: None,
            })
            .collect())
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| AppError::Storage("poisoned".to_owned()))?;
        let before = objects.len();
        objects.retain(|(object_bucket, object_key)| object_bucket != bucket || object_key != key);

        if objects.len() == before {
            return Err(AppError::NotFound(format!("object '{key}' not found")));
        }
        Ok(())
    }
}

#[derive(Default)]
struct CountingEmailService {
    attempts: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl EmailService for CountingEmailService {
    async fn send_email(
        &self,
        to: &str,
        _subject: &str,
        _text_body: &str,
        _html_body: Option<&str>,
    ) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Notification(format!("mailbox {to} unavailable")));
        }
        Ok(())
    }
}

#[derive(Default)]
struct HarnessOptions {
    submission_requires_auth: bool,
    trusted_proxies: Vec<IpNet>,
    failing_email: bool,
    blob_root: Option<PathBuf>,
}

struct Harness {
    router: Router,
    inquiries: Arc<InMemoryInquiryRepository>,
    abuse_logs: Arc<InMemoryAbuseLogRepository>,
    objects: Arc<RecordingObjectStore>,
    emails: Arc<CountingEmailService>,
}

impl Harness {
    fn new() -> Self {
        Self::with_options(HarnessOptions::default())
    }

    fn with_options(options: HarnessOptions) -> Self {
        let inquiries = Arc::new(InMemoryInquiryRepository::new());
        let abuse_logs = Arc::new(InMemoryAbuseLogRepository::new());
        let objects = Arc::new(RecordingObjectStore::default());
        let emails = Arc::new(CountingEmailService {
            attempts: AtomicUsize::new(0),
            fail: options.failing_email,
        });

        let ports = StatePorts {
            identity_provider: Arc::new(StaticIdentityProvider),
            bot_verifier: Arc::new(ScoringBotVerifier),
            object_store: objects.clone(),
            email_service: emails.clone(),
            inquiry_repository: inquiries.clone(),
            abuse_log_repository: abuse_logs.clone(),
            rate_limit_repository: Arc::new(InMemoryRateLimitRepository::new()),
        };
        let settings = StateSettings {
            frontend_url: FRONTEND_URL.to_owned(),
            trusted_proxies: options.trusted_proxies,
            submission_rate_limit: RateLimitRule::submission_default(),
            submission_requires_auth: options.submission_requires_auth,
            recaptcha_min_score: 0.5,
            inquiry_upload_bucket: "inquiry-uploads".to_owned(),
            studio: StudioContact {
                address: "studio@studio.test".to_owned(),
                name: "Raven Ink".to_owned(),
            },
            collaborator_timeout: Duration::from_secs(5),
        };

        // Nothing listens on port 1, so any database access fails fast.
        let Ok(pool) = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy("postgres://inkdesk@127.0.0.1:1/inkdesk")
        else {
            panic!("lazy pool options should parse");
        };
        let health_targets = HealthTargets {
            rate_limit_store: RateLimitTarget::Memory,
            blob_root: options.blob_root,
        };
        let state = assemble_app_state(ports, settings, pool, health_targets);

        let Ok(router) = build_router(state, SessionManagerLayer::new(MemoryStore::default()))
        else {
            panic!("router should build");
        };
        let router = router.layer(axum::Extension(ConnectInfo(SocketAddr::from((
            [198, 51, 100, 7],
            40_000,
        )))));

        Self {
            router,
            inquiries,
            abuse_logs,
            objects,
            emails,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {})
    }

    async fn stored_inquiries(&self) -> usize {
        self.inquiries
            .list_recent(PageQuery::default())
            .await
            .map(|records| records.len())
            .unwrap_or_default()
    }

    async fn abuse_entries(&self) -> Vec<String> {
        self.abuse_logs
            .list_recent(PageQuery::default())
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|entry| format!("{} {}", entry.client_address, entry.reason))
            .collect()
    }

    fn email_attempts(&self) -> usize {
        self.emails.attempts.load(Ordering::SeqCst)
    }
}

struct FilePart<'a> {
    field: &'a str,
    file_name: &'a str,
    content_type: &'a str,
    bytes: &'a [u8],
}

fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn raven_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("placement", "forearm"),
        ("size", "3x5"),
        ("desc", "raven"),
        ("firstName", "Ann"),
        ("lastName", "Lee"),
        ("email", "ann@example.com"),
        ("phone", ""),
        ("dateFrom", "2099-03-02"),
        ("dateTo", "2099-03-05"),
        ("g-recaptcha-response", "human-token"),
    ]
}

fn with_field(
    mut fields: Vec<(&'static str, &'static str)>,
    name: &'static str,
    value: &'static str,
) -> Vec<(&'static str, &'static str)> {
    fields.retain(|(field, _)| *field != name);
    fields.push((name, value));
    fields
}

fn multipart_request(uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::ORIGIN, FRONTEND_URL)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
}

fn submission(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Request<Body> {
    multipart_request("/submit-form")
        .body(Body::from(multipart_body(fields, file)))
        .unwrap_or_default()
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap_or_default()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    serde_json::from_slice(&bytes).unwrap_or_default()
}

#[tokio::test]
async fn raven_inquiry_is_stored_and_both_notifications_attempted() {
    let harness = Harness::new();

    let response = harness.send(submission(&raven_fields(), None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["message"],
        "Inquiry submitted successfully!"
    );
    assert_eq!(harness.stored_inquiries().await, 1);
    assert_eq!(harness.email_attempts(), 2);
}

#[tokio::test]
async fn third_submission_in_window_is_rate_limited_and_logged() {
    let harness = Harness::new();

    for _ in 0..2 {
        let response = harness.send(submission(&raven_fields(), None)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = harness.send(submission(&raven_fields(), None)).await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        harness.abuse_entries().await,
        vec!["198.51.100.7 rate limit exceeded".to_owned()]
    );
    assert_eq!(harness.stored_inquiries().await, 2);
}

#[tokio::test]
async fn rate_limited_client_is_refused_before_the_body_is_read() {
    let harness = Harness::new();

    for _ in 0..2 {
        let response = harness.send(submission(&raven_fields(), None)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // A body that would fail multipart parsing if it were read.
    let request = multipart_request("/submit-form")
        .body(Body::from("this is not a multipart body"))
        .unwrap_or_default();
    let response = harness.send(request).await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(harness.abuse_entries().await.len(), 1);
}

#[tokio::test]
async fn forwarded_for_from_untrusted_peer_does_not_split_the_counter() {
    let harness = Harness::new();

    for spoofed in ["203.0.113.1", "203.0.113.2", "203.0.113.3"] {
        let body = multipart_body(&raven_fields(), None);
        let request = multipart_request("/submit-form")
            .header("x-forwarded-for", spoofed)
            .body(Body::from(body))
            .unwrap_or_default();
        harness.send(request).await;
    }

    assert_eq!(harness.stored_inquiries().await, 2);
    assert_eq!(harness.abuse_entries().await.len(), 1);
}

#[tokio::test]
async fn forwarded_for_from_trusted_proxy_identifies_each_client() {
    let Ok(proxy) = "198.51.100.0/24".parse::<IpNet>() else {
        panic!("valid network");
    };
    let harness = Harness::with_options(HarnessOptions {
        trusted_proxies: vec![proxy],
        ..HarnessOptions::default()
    });

    for client in ["203.0.113.1", "203.0.113.2", "203.0.113.3"] {
        let body = multipart_body(&raven_fields(), None);
        let request = multipart_request("/submit-form")
            .header("x-forwarded-for", client)
            .body(Body::from(body))
            .unwrap_or_default();
        assert_eq!(harness.send(request).await.status(), StatusCode::OK);
    }

    assert_eq!(harness.stored_inquiries().await, 3);
    assert!(harness.abuse_entries().await.is_empty());
}

#[tokio::test]
async fn missing_bot_token_is_rejected_before_storage() {
    let harness = Harness::new();
    let fields: Vec<_> = raven_fields()
        .into_iter()
        .filter(|(name, _)| *name != "g-recaptcha-response")
        .collect();

    let response = harness.send(submission(&fields, None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "verification not completed");
    assert_eq!(harness.stored_inquiries().await, 0);
    assert_eq!(harness.email_attempts(), 0);
}

#[tokio::test]
async fn low_bot_score_is_rejected() {
    let harness = Harness::new();
    let fields = with_field(raven_fields(), "g-recaptcha-response", "bot-token");

    let response = harness.send(submission(&fields, None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.stored_inquiries().await, 0);
}

#[tokio::test]
async fn field_errors_are_reported_together() {
    let harness = Harness::new();
    let fields = with_field(
        with_field(raven_fields(), "email", "ann at example"),
        "dateTo",
        "2099-03-01",
    );

    let response = harness.send(submission(&fields, None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["errors"]["email"].is_string());
    assert_eq!(body["errors"]["dateTo"], "invalid date range");
    assert_eq!(harness.stored_inquiries().await, 0);
}

#[tokio::test]
async fn pdf_attachment_is_rejected_before_storage_or_email() {
    let harness = Harness::new();

    let response = harness
        .send(submission(
            &raven_fields(),
            Some(FilePart {
                field: "file",
                file_name: "sketch.pdf",
                content_type: "application/pdf",
                bytes: b"%PDF-1.7",
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "invalid file type");
    assert_eq!(harness.objects.count(), 0);
    assert_eq!(harness.stored_inquiries().await, 0);
    assert_eq!(harness.email_attempts(), 0);
}

#[tokio::test]
async fn png_attachment_is_uploaded_and_linked() {
    let harness = Harness::new();

    let response = harness
        .send(submission(
            &raven_fields(),
            Some(FilePart {
                field: "file",
                file_name: "reference.png",
                content_type: "image/png",
                bytes: b"\x89PNG\r\n\x1a\n",
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(harness.objects.count(), 1);
    let records = harness
        .inquiries
        .list_recent(PageQuery::default())
        .await
        .unwrap_or_default();
    assert!(
        records[0]
            .attachment_url
            .as_deref()
            .is_some_and(|url| url.starts_with("https://cdn.test/inquiry-uploads/")
                && url.ends_with(".png"))
    );
}

#[tokio::test]
async fn failing_email_still_reports_success_after_storage() {
    let harness = Harness::with_options(HarnessOptions {
        failing_email: true,
        ..HarnessOptions::default()
    });

    let response = harness.send(submission(&raven_fields(), None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(harness.stored_inquiries().await, 1);
    assert_eq!(harness.email_attempts(), 2);
}

#[tokio::test]
async fn cross_site_submission_is_blocked() {
    let harness = Harness::new();
    let body = multipart_body(&raven_fields(), None);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/submit-form")
        .header(header::ORIGIN, "https://evil.test")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap_or_default();

    let response = harness.send(request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(harness.stored_inquiries().await, 0);
}

#[tokio::test]
async fn gated_submission_requires_a_verified_user() {
    let harness = Harness::with_options(HarnessOptions {
        submission_requires_auth: true,
        ..HarnessOptions::default()
    });

    let anonymous = harness.send(submission(&raven_fields(), None)).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let body = multipart_body(&raven_fields(), None);
    let request = multipart_request("/submit-form")
        .header(header::AUTHORIZATION, format!("Bearer {USER_TOKEN}"))
        .body(Body::from(body))
        .unwrap_or_default();
    assert_eq!(harness.send(request).await.status(), StatusCode::OK);

    let records = harness
        .inquiries
        .list_recent(PageQuery::default())
        .await
        .unwrap_or_default();
    assert_eq!(records[0].submitter_subject.as_deref(), Some("user-1"));
}

#[tokio::test]
async fn admin_inquiry_list_enforces_roles() {
    let harness = Harness::new();
    let fields = with_field(raven_fields(), "desc", "<b>hi</b>");
    harness.send(submission(&fields, None)).await;

    let anonymous = harness.send(get("/auth/api/inquiries", None)).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let user = harness
        .send(get("/auth/api/inquiries", Some(USER_TOKEN)))
        .await;
    assert_eq!(user.status(), StatusCode::FORBIDDEN);

    let admin = harness
        .send(get("/auth/api/inquiries", Some(ADMIN_TOKEN)))
        .await;
    assert_eq!(admin.status(), StatusCode::OK);
    let body = json_body(admin).await;
    assert_eq!(body[0]["description"], "&lt;b&gt;hi&lt;/b&gt;");
    assert_eq!(body[0]["size"], "3x5 inches");
}

#[tokio::test]
async fn query_token_is_accepted_for_admin_reads() {
    let harness = Harness::new();

    let response = harness
        .send(get(
            &format!("/auth/api/abuse-logs?access_token={ADMIN_TOKEN}&limit=10"),
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, Value::Array(Vec::new()));
}

#[tokio::test]
async fn sign_in_binds_the_token_to_the_session_cookie() {
    let harness = Harness::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/sign-in")
        .header(header::ORIGIN, FRONTEND_URL)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }).to_string(),
        ))
        .unwrap_or_default();

    let response = harness.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(ToOwned::to_owned)
        .unwrap_or_default();
    assert!(!cookie.is_empty());
    assert_eq!(json_body(response).await["identity"]["role"], "admin");

    let request = Request::builder()
        .uri("/auth/api/inquiries")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap_or_default();
    assert_eq!(harness.send(request).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn sign_in_with_bad_credentials_is_unauthorized() {
    let harness = Harness::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/sign-in")
        .header(header::ORIGIN, FRONTEND_URL)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "email": ADMIN_EMAIL, "password": "nope" }).to_string(),
        ))
        .unwrap_or_default();

    let response = harness.send(request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn me_reports_anonymous_and_verified_callers() {
    let harness = Harness::new();

    let anonymous = json_body(harness.send(get("/auth/me", None)).await).await;
    assert_eq!(anonymous["role"], "anonymous");

    let admin = json_body(harness.send(get("/auth/me", Some(ADMIN_TOKEN))).await).await;
    assert_eq!(admin["role"], "admin");
    assert_eq!(admin["subject"], "admin-1");
}

#[tokio::test]
async fn gallery_upload_list_and_delete_round_trip() {
    let harness = Harness::new();
    let body = multipart_body(
        &[("bucket", "flash")],
        Some(FilePart {
            field: "file",
            file_name: "swallow.jpg",
            content_type: "image/jpeg",
            bytes: b"\xff\xd8\xff\xe0",
        }),
    );
    let request = multipart_request("/auth/api/upload-image")
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
        .body(Body::from(body))
        .unwrap_or_default();

    let uploaded = harness.send(request).await;
    assert_eq!(uploaded.status(), StatusCode::OK);
    let url = json_body(uploaded).await["url"]
        .as_str()
        .map(ToOwned::to_owned)
        .unwrap_or_default();

    let listed = json_body(harness.send(get("/api/images/flash", None)).await).await;
    assert_eq!(listed["images"], Value::Array(vec![Value::String(url.clone())]));
    let gallery = json_body(harness.send(get("/api/images/gallery", None)).await).await;
    assert_eq!(gallery["images"], Value::Array(Vec::new()));

    let name = url.rsplit('/').next().unwrap_or_default().to_owned();
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/auth/api/delete-image")
        .header(header::ORIGIN, FRONTEND_URL)
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "bucket": "flash", "name": name }).to_string(),
        ))
        .unwrap_or_default();
    assert_eq!(harness.send(request).await.status(), StatusCode::OK);
    assert_eq!(harness.objects.count(), 0);
}

#[tokio::test]
async fn gallery_upload_requires_admin() {
    let harness = Harness::new();
    let body = multipart_body(&[("bucket", "gallery")], None);
    let request = multipart_request("/auth/api/upload-image")
        .header(header::AUTHORIZATION, format!("Bearer {USER_TOKEN}"))
        .body(Body::from(body))
        .unwrap_or_default();

    assert_eq!(harness.send(request).await.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_bucket_is_not_found() {
    let harness = Harness::new();

    let response = harness.send(get("/api/images/portraits", None)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_is_degraded_when_postgres_and_blob_root_are_unavailable() {
    let harness = Harness::with_options(HarnessOptions {
        blob_root: Some(std::env::temp_dir().join("inkdesk-router-missing-blob-root")),
        ..HarnessOptions::default()
    });

    let response = harness.send(get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["ready"], false);
    assert_eq!(body["postgres"]["status"], "error");
    assert_eq!(body["rate_limit_store"]["backend"], "memory");
    assert_eq!(body["rate_limit_store"]["status"], "ok");
    assert_eq!(body["object_store"]["backend"], "filesystem");
    assert_eq!(body["object_store"]["status"], "error");
}

#[tokio::test]
async fn health_skips_remote_object_storage() {
    let harness = Harness::new();

    let response = harness.send(get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["object_store"]["backend"], "http");
    assert_eq!(body["object_store"]["status"], "skipped");
}
