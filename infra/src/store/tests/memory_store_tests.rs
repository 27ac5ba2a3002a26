//! Unit tests for the in-memory document store

use chrono::Utc;

use mp_core::domain::entities::{Document, StoredValue, VerificationRecord};
use mp_core::services::DocumentStoreTrait;

use crate::store::MemoryDocumentStore;

#[tokio::test]
async fn test_set_resolves_server_timestamp() {
    let store = MemoryDocumentStore::new();
    let before = Utc::now();

    let write = store
        .set("verification_codes", "user@example.com", VerificationRecord::document_for("482913"))
        .await
        .unwrap();
    assert!(write.update_time >= before);

    let stored = store.get("verification_codes", "user@example.com").await.unwrap().unwrap();
    assert_eq!(stored.get("timestamp"), Some(&StoredValue::Timestamp(write.update_time)));
    assert_eq!(stored.get("code").and_then(|v| v.as_str()), Some("482913"));
}

#[tokio::test]
async fn test_set_overwrites_whole_document() {
    let store = MemoryDocumentStore::new();

    store
        .set("c", "k", Document::new().with_string("a", "1").with_string("b", "2"))
        .await
        .unwrap();
    store.set("c", "k", Document::new().with_string("a", "3")).await.unwrap();

    let stored = store.get("c", "k").await.unwrap().unwrap();
    assert_eq!(stored.fields.len(), 1);
    assert_eq!(stored.get("a").and_then(|v| v.as_str()), Some("3"));
    assert_eq!(store.count("c"), 1);
}

#[tokio::test]
async fn test_collections_are_separate() {
    let store = MemoryDocumentStore::new();
    store.set("a", "k", Document::new().with_string("x", "1")).await.unwrap();

    assert!(store.get("b", "k").await.unwrap().is_none());
    assert_eq!(store.count("a"), 1);
    assert_eq!(store.count("b"), 0);
}

#[tokio::test]
async fn test_health_check() {
    let store = MemoryDocumentStore::new();
    assert!(store.health_check().await.is_ok());
    assert_eq!(store.provider_name(), "memory");
}
