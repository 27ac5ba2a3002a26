//! Unit tests for Firestore request and response mapping

use chrono::{TimeZone, Utc};
use serde_json::json;

use mp_core::domain::entities::{Document, StoredValue, VerificationRecord};
use mp_core::errors::StoreError;
use mp_core::services::DocumentStoreTrait;
use mp_shared::config::{FirestoreAuth, FirestoreConfig, SecretRef};
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::store::firestore_store::{commit_body, parse_commit_response, parse_document, validate_document_id};
use crate::store::FirestoreDocumentStore;
use crate::InfrastructureError;

const NAME: &str = "projects/ma-plante/databases/(default)/documents/verification_codes/user@example.com";

#[test]
fn test_commit_body_for_verification_record() {
    let body = commit_body(NAME, &VerificationRecord::document_for("482913"));

    assert_eq!(
        body,
        json!({
            "writes": [{
                "update": {
                    "name": NAME,
                    "fields": { "code": { "stringValue": "482913" } }
                },
                "updateTransforms": [{
                    "fieldPath": "timestamp",
                    "setToServerValue": "REQUEST_TIME"
                }]
            }]
        })
    );
}

#[test]
fn test_commit_body_without_transforms() {
    let body = commit_body(NAME, &Document::new().with_string("code", "1"));
    assert!(body["writes"][0].get("updateTransforms").is_none());
}

#[test]
fn test_commit_body_quotes_field_paths() {
    let body = commit_body(NAME, &Document::new().with_server_timestamp("issued-at"));
    assert_eq!(body["writes"][0]["updateTransforms"][0]["fieldPath"], "`issued-at`");
}

#[test]
fn test_parse_commit_response() {
    let body = r#"{
        "writeResults": [{ "updateTime": "2025-03-14T09:26:53.589793Z", "transformResults": [{ "timestampValue": "2025-03-14T09:26:53.589793Z" }] }],
        "commitTime": "2025-03-14T09:26:53.589793Z"
    }"#;

    let time = parse_commit_response(body).unwrap();
    assert_eq!(time, Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap() + chrono::Duration::microseconds(589_793));
}

#[test]
fn test_parse_commit_response_prefers_transform_result() {
    let body = r#"{
        "writeResults": [{ "updateTime": "2025-03-14T09:26:53.700000Z", "transformResults": [{ "timestampValue": "2025-03-14T09:26:53.589793Z" }] }],
        "commitTime": "2025-03-14T09:26:53.700000Z"
    }"#;

    let time = parse_commit_response(body).unwrap();
    assert_eq!(time, Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap() + chrono::Duration::microseconds(589_793));
}

#[test]
fn test_parse_commit_response_without_transform() {
    let body = r#"{
        "writeResults": [{ "updateTime": "2025-03-14T09:26:53Z" }],
        "commitTime": "2025-03-14T09:26:54Z"
    }"#;

    let time = parse_commit_response(body).unwrap();
    assert_eq!(time, Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 54).unwrap());
}

#[test]
fn test_parse_commit_response_missing_time() {
    assert!(matches!(parse_commit_response("{}"), Err(StoreError::Serialization(_))));
}

#[test]
fn test_parse_document() {
    let body = format!(
        r#"{{
            "name": "{}",
            "fields": {{
                "code": {{ "stringValue": "482913" }},
                "timestamp": {{ "timestampValue": "2025-03-14T09:26:53Z" }}
            }},
            "createTime": "2025-03-14T09:26:53Z",
            "updateTime": "2025-03-14T09:26:53Z"
        }}"#,
        NAME
    );

    let stored = parse_document("user@example.com", &body).unwrap();
    let time = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();

    assert_eq!(stored.update_time, time);
    assert_eq!(stored.get("code"), Some(&StoredValue::String("482913".to_string())));
    assert_eq!(stored.get("timestamp"), Some(&StoredValue::Timestamp(time)));

    let record = VerificationRecord::from_stored("user@example.com", &stored).unwrap();
    assert_eq!(record.code, "482913");
}

#[test]
fn test_parse_document_unsupported_value() {
    let body = r#"{ "fields": { "count": { "integerValue": "3" } }, "updateTime": "2025-03-14T09:26:53Z" }"#;

    match parse_document("user@example.com", body) {
        Err(StoreError::InvalidDocument { key, reason }) => {
            assert_eq!(key, "user@example.com");
            assert!(reason.contains("count"));
        }
        other => panic!("Expected invalid document, got {:?}", other),
    }
}

#[test]
fn test_validate_document_id() {
    assert!(validate_document_id("user@example.com").is_ok());
    assert!(validate_document_id("__user__@example.com").is_ok());

    for key in ["", "a/b@example.com", ".", "..", "__id__", &"x".repeat(1501)] {
        assert!(
            matches!(validate_document_id(key), Err(StoreError::InvalidDocument { .. })),
            "accepted {:?}",
            key
        );
    }
}

fn static_config(base_url: &str, token_var: &str) -> FirestoreConfig {
    FirestoreConfig {
        project_id: "ma-plante".to_string(),
        base_url: base_url.to_string(),
        auth: FirestoreAuth::Static {
            token: SecretRef::from_env_var(token_var),
        },
        ..FirestoreConfig::default()
    }
}

fn metadata_config(server: &MockServer) -> FirestoreConfig {
    FirestoreConfig {
        project_id: "ma-plante".to_string(),
        base_url: server.uri(),
        auth: FirestoreAuth::Metadata {
            token_url: format!("{}/token", server.uri()),
        },
        ..FirestoreConfig::default()
    }
}

fn token_response(token: &str, expires_in: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": token,
        "expires_in": expires_in,
        "token_type": "Bearer",
    }))
}

fn commit_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "writeResults": [{
            "updateTime": "2025-03-14T09:26:54Z",
            "transformResults": [{ "timestampValue": "2025-03-14T09:26:53Z" }]
        }],
        "commitTime": "2025-03-14T09:26:54Z"
    }))
}

#[test]
fn test_document_name() {
    std::env::set_var("MAPLANTE_TEST_FIRESTORE_TOKEN", "token");
    let store = FirestoreDocumentStore::new(&static_config(
        "https://firestore.googleapis.com/v1",
        "MAPLANTE_TEST_FIRESTORE_TOKEN",
    ))
    .unwrap();

    assert_eq!(store.document_name("verification_codes", "user@example.com").unwrap(), NAME);
    assert!(matches!(
        store.document_name("verification_codes", "a/b@example.com"),
        Err(StoreError::InvalidDocument { .. })
    ));
}

#[test]
fn test_static_token_must_be_set() {
    let config = static_config("https://firestore.googleapis.com/v1", "MAPLANTE_TEST_UNSET_FIRESTORE_TOKEN");
    assert!(matches!(FirestoreDocumentStore::new(&config), Err(InfrastructureError::Secret(_))));
}

#[tokio::test]
async fn test_set_reports_transform_time_and_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/token"))
        .and(header("Metadata-Flavor", "Google"))
        .respond_with(token_response("ya29.first", 3599))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"/documents:commit$"))
        .and(header("authorization", "Bearer ya29.first"))
        .respond_with(commit_response())
        .expect(2)
        .mount(&server)
        .await;

    let store = FirestoreDocumentStore::new(&metadata_config(&server)).unwrap();
    let first = store
        .set("verification_codes", "user@example.com", VerificationRecord::document_for("482913"))
        .await
        .unwrap();
    store
        .set("verification_codes", "user@example.com", VerificationRecord::document_for("104857"))
        .await
        .unwrap();

    assert_eq!(first.update_time, Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap());
}

#[tokio::test]
async fn test_expiring_token_is_fetched_again() {
    let server = MockServer::start().await;
    // Inside the refresh margin, so every request needs a new token
    Mock::given(method("GET"))
        .and(path("/token"))
        .respond_with(token_response("ya29.short", 30))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"/documents:commit$"))
        .and(header("authorization", "Bearer ya29.short"))
        .respond_with(commit_response())
        .expect(2)
        .mount(&server)
        .await;

    let store = FirestoreDocumentStore::new(&metadata_config(&server)).unwrap();
    for code in ["482913", "104857"] {
        store
            .set("verification_codes", "user@example.com", VerificationRecord::document_for(code))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_metadata_failure_is_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = FirestoreDocumentStore::new(&metadata_config(&server)).unwrap();
    assert!(matches!(store.health_check().await, Err(StoreError::Backend(_))));

    let result = store
        .set("verification_codes", "user@example.com", VerificationRecord::document_for("482913"))
        .await;
    assert!(matches!(result, Err(StoreError::Backend(_))));
}

#[tokio::test]
async fn test_slash_in_key_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(commit_response())
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    std::env::set_var("MAPLANTE_TEST_FIRESTORE_SLASH_TOKEN", "token");
    let store = FirestoreDocumentStore::new(&static_config(&server.uri(), "MAPLANTE_TEST_FIRESTORE_SLASH_TOKEN")).unwrap();

    let set = store
        .set("verification_codes", "a/b@example.com", VerificationRecord::document_for("482913"))
        .await;
    let get = store.get("verification_codes", "a/b@example.com").await;

    assert!(matches!(set, Err(StoreError::InvalidDocument { .. })));
    assert!(matches!(get, Err(StoreError::InvalidDocument { .. })));
}

#[tokio::test]
async fn test_get_missing_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"/documents/verification_codes/user@example.com$"))
        .and(header("authorization", "Bearer emulator"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    std::env::set_var("MAPLANTE_TEST_FIRESTORE_GET_TOKEN", "emulator");
    let store = FirestoreDocumentStore::new(&static_config(&server.uri(), "MAPLANTE_TEST_FIRESTORE_GET_TOKEN")).unwrap();

    assert!(store.get("verification_codes", "user@example.com").await.unwrap().is_none());
}
