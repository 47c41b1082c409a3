//! Port fakes shared by the service tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use inkdesk_core::{AppError, AppResult};
use inkdesk_domain::{AbuseLogEntry, InquiryId, InquiryRecord};

use crate::{
    AbuseLogRepository, AttemptInfo, BotVerdict, BotVerifier, EmailService, InquiryRepository,
    NewInquiry, ObjectStore, PageQuery, RateLimitRepository, StoredObject,
};

/// Sleeps far past any collaborator timeout used in tests.
async fn stall() {
    tokio::time::sleep(Duration::from_secs(600)).await;
}

#[derive(Default)]
pub(crate) struct CountingRateLimitRepository {
    pub(crate) counts: Mutex<HashMap<String, i32>>,
    pub(crate) stall: bool,
}

#[async_trait]
impl RateLimitRepository for CountingRateLimitRepository {
    async fn record_attempt(
        &self,
        key: &str,
        _window_duration_seconds: i64,
    ) -> AppResult<AttemptInfo> {
        if self.stall {
            stall().await;
        }
        let mut counts = self.counts.lock().await;
        let count = counts.entry(key.to_owned()).or_insert(0);
        *count += 1;
        Ok(AttemptInfo {
            attempt_count: *count,
            window_started_at: Utc::now(),
        })
    }

    async fn cleanup_expired(&self, _before: DateTime<Utc>) -> AppResult<u64> {
        Ok(0)
    }
}

#[derive(Default)]
pub(crate) struct RecordingAbuseLog {
    pub(crate) entries: Mutex<Vec<AbuseLogEntry>>,
    pub(crate) fail: bool,
    pub(crate) stall: bool,
}

#[async_trait]
impl AbuseLogRepository for RecordingAbuseLog {
    async fn append(&self, entry: AbuseLogEntry) -> AppResult<()> {
        if self.stall {
            stall().await;
        }
        if self.fail {
            return Err(AppError::Storage("abuse log unavailable".to_owned()));
        }
        self.entries.lock().await.push(entry);
        Ok(())
    }

    async fn list_recent(&self, query: PageQuery) -> AppResult<Vec<AbuseLogEntry>> {
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .rev()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

pub(crate) enum BotBehavior {
    Score(f64),
    Malformed,
    Unreachable,
    Hang,
}

pub(crate) struct ScriptedBotVerifier {
    pub(crate) behavior: BotBehavior,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl ScriptedBotVerifier {
    pub(crate) fn new(behavior: BotBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BotVerifier for ScriptedBotVerifier {
    async fn verify(&self, token: &str) -> AppResult<BotVerdict> {
        self.calls.lock().await.push(token.to_owned());
        match self.behavior {
            BotBehavior::Score(score) => Ok(BotVerdict {
                success: true,
                score: Some(score),
            }),
            BotBehavior::Malformed => Ok(BotVerdict {
                success: false,
                score: None,
            }),
            BotBehavior::Unreachable => Err(AppError::VerificationUnavailable(
                "connection refused".to_owned(),
            )),
            BotBehavior::Hang => {
                stall().await;
                Ok(BotVerdict {
                    success: true,
                    score: Some(1.0),
                })
            }
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingObjectStore {
    pub(crate) objects: Mutex<Vec<(String, String, String, usize)>>,
    pub(crate) fail: bool,
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String> {
        if self.fail {
            return Err(AppError::Internal("object store unavailable".to_owned()));
        }
        self.objects.lock().await.push((
            bucket.to_owned(),
            key.to_owned(),
            content_type.to_owned(),
            bytes.len(),
        ));
        Ok(format!("https://cdn.test/{bucket}/{key}"))
    }

    async fn list(&self, bucket: &str) -> AppResult<Vec<StoredObject>> {
        Ok(self
            .objects
            .lock()
            .await
            .iter()
            .filter(|(stored_bucket, ..)| stored_bucket == bucket)
            .map(|(stored_bucket, key, ..)| StoredObject {
                name: key.clone(),
                url: format!("https://cdn.test/{stored_bucket}/{key}"),
                created_at: None,
            })
            .collect())
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        let mut objects = self.objects.lock().await;
        let before = objects.len();
        objects.retain(|(stored_bucket, stored_key, ..)| {
            !(stored_bucket == bucket && stored_key == key)
        });
        if objects.len() == before {
            return Err(AppError::NotFound(format!("image '{key}' does not exist")));
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingInquiryRepository {
    pub(crate) records: Mutex<Vec<InquiryRecord>>,
    pub(crate) fail: bool,
    pub(crate) stall: bool,
}

#[async_trait]
impl InquiryRepository for RecordingInquiryRepository {
    async fn insert(&self, inquiry: NewInquiry) -> AppResult<InquiryRecord> {
        if self.fail {
            return Err(AppError::Storage("database unavailable".to_owned()));
        }
        let record = inquiry.into_record(InquiryId::new(), Utc::now());
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list_recent(&self, query: PageQuery) -> AppResult<Vec<InquiryRecord>> {
        if self.stall {
            stall().await;
        }
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .rev()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct RecordingEmailService {
    pub(crate) sent: Mutex<Vec<(String, String, String, Option<String>)>>,
    pub(crate) attempts: Mutex<usize>,
    pub(crate) fail: bool,
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        *self.attempts.lock().await += 1;
        if self.fail {
            return Err(AppError::Notification("smtp relay refused".to_owned()));
        }
        self.sent.lock().await.push((
            to.to_owned(),
            subject.to_owned(),
            text_body.to_owned(),
            html_body.map(ToOwned::to_owned),
        ));
        Ok(())
    }
}
