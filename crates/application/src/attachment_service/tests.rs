use std::sync::Arc;
use std::time::Duration;

use inkdesk_core::AppError;

use super::{AttachmentService, AttachmentUpload};
use crate::test_support::RecordingObjectStore;

fn upload(file_name: &str, content_type: &str, len: usize) -> AttachmentUpload {
    AttachmentUpload {
        file_name: Some(file_name.to_owned()),
        content_type: Some(content_type.to_owned()),
        bytes: vec![0xAB; len],
    }
}

#[tokio::test]
async fn stores_under_generated_key_not_client_filename() {
    let store = Arc::new(RecordingObjectStore::default());
    let service = AttachmentService::new(store.clone(), "inquiry-uploads", Duration::from_secs(5));

    let url = service
        .store(upload("../../etc/raven sketch.PNG", "image/png", 42))
        .await
        .unwrap_or_default();

    let objects = store.objects.lock().await;
    assert_eq!(objects.len(), 1);
    let (bucket, key, content_type, size) = &objects[0];
    assert_eq!(bucket, "inquiry-uploads");
    assert!(key.ends_with(".png"));
    assert!(!key.contains("raven"));
    assert!(!key.contains('/'));
    assert_eq!(content_type, "image/png");
    assert_eq!(*size, 42);
    assert_eq!(url, format!("https://cdn.test/inquiry-uploads/{key}"));
}

#[tokio::test]
async fn rejects_pdf_before_touching_the_store() {
    let store = Arc::new(RecordingObjectStore::default());
    let service = AttachmentService::new(store.clone(), "inquiry-uploads", Duration::from_secs(5));

    let result = service
        .store(upload("brief.pdf", "application/pdf", 42))
        .await;

    assert!(matches!(result, Err(AppError::Attachment(ref message)) if message == "invalid file type"));
    assert!(store.objects.lock().await.is_empty());
}

#[tokio::test]
async fn store_failure_aborts_as_attachment_error() {
    let store = Arc::new(RecordingObjectStore {
        fail: true,
        ..RecordingObjectStore::default()
    });
    let service = AttachmentService::new(store, "inquiry-uploads", Duration::from_secs(5));

    let result = service.store(upload("ref.jpg", "image/jpeg", 42)).await;
    assert!(matches!(result, Err(AppError::Attachment(_))));
}
