//! Firestore document store over the REST API
//!
//! Writes go through `documents:commit` so server timestamp fields can be
//! filled by a `REQUEST_TIME` transform in the same atomic write. The write's
//! reported time is the transform result, which is the value stored in those
//! fields; `commitTime` is only used when the write has no transform.
//!
//! Document ids are used verbatim in both the resource name and the URL, so
//! keys Firestore cannot hold as a single id (containing `/`, `.` or `..`,
//! `__reserved__`) are rejected instead of addressing another path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use mp_core::domain::entities::{Document, FieldValue, StoredDocument, StoredValue, WriteResult};
use mp_core::errors::StoreError;
use mp_core::services::DocumentStoreTrait;
use mp_shared::config::FirestoreConfig;

use super::firestore_auth::TokenSource;
use crate::InfrastructureError;

/// Firestore limit on a document id
const MAX_DOCUMENT_ID_BYTES: usize = 1500;

/// Document store backed by Cloud Firestore
#[derive(Clone)]
pub struct FirestoreDocumentStore {
    client: Client,
    base_url: String,
    /// `projects/{project}/databases/{database}`
    database_path: String,
    tokens: Arc<TokenSource>,
}

impl FirestoreDocumentStore {
    pub fn new(config: &FirestoreConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let tokens = TokenSource::from_config(&config.auth, client.clone())?;

        tracing::info!(
            project_id = %config.project_id,
            database_id = %config.database_id,
            auth = ?tokens,
            "Firestore document store configured"
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            database_path: format!("projects/{}/databases/{}", config.project_id, config.database_id),
            tokens: Arc::new(tokens),
        })
    }

    /// Full resource name of a document
    pub fn document_name(&self, collection: &str, key: &str) -> Result<String, StoreError> {
        validate_document_id(key)?;
        Ok(format!("{}/documents/{}/{}", self.database_path, collection, key))
    }

    fn commit_url(&self) -> String {
        format!("{}/{}/documents:commit", self.base_url, self.database_path)
    }

    fn document_url(&self, collection: &str, key: &str) -> Result<Url, StoreError> {
        validate_document_id(key)?;
        let mut url = Url::parse(&self.base_url).map_err(|e| StoreError::Backend(format!("Invalid Firestore URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Backend("Firestore URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(self.database_path.split('/'))
            .push("documents")
            .push(collection)
            .push(key);
        Ok(url)
    }
}

/// Reject keys that Firestore would not treat as a single document id
pub(crate) fn validate_document_id(key: &str) -> Result<(), StoreError> {
    let reason = if key.is_empty() {
        Some("document id is empty")
    } else if key.contains('/') {
        Some("document id contains '/'")
    } else if key == "." || key == ".." {
        Some("document id is '.' or '..'")
    } else if key.len() >= 4 && key.starts_with("__") && key.ends_with("__") {
        Some("document id is reserved")
    } else if key.len() > MAX_DOCUMENT_ID_BYTES {
        Some("document id is longer than 1500 bytes")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidDocument {
            key: key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Request body of a commit writing `document` at `name`
pub(crate) fn commit_body(name: &str, document: &Document) -> Value {
    let mut fields = Map::new();
    let mut transforms = Vec::new();

    for (field, value) in document.fields() {
        match value {
            FieldValue::String(s) => {
                fields.insert(field.clone(), json!({ "stringValue": s }));
            }
            FieldValue::ServerTimestamp => transforms.push(json!({
                "fieldPath": field_path(field),
                "setToServerValue": "REQUEST_TIME",
            })),
        }
    }

    let mut write = json!({
        "update": {
            "name": name,
            "fields": fields,
        }
    });
    if !transforms.is_empty() {
        write["updateTransforms"] = Value::Array(transforms);
    }

    json!({ "writes": [write] })
}

/// Quote a field name unless it is a simple identifier
fn field_path(field: &str) -> String {
    let simple = field
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false)
        && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if simple {
        field.to_string()
    } else {
        format!("`{}`", field.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    #[serde(default)]
    write_results: Vec<CommitWriteResult>,
    commit_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitWriteResult {
    #[serde(default)]
    transform_results: Vec<Value>,
}

/// Time stored by the single write of a commit.
///
/// The first `REQUEST_TIME` transform result when there is one, otherwise
/// the commit time.
pub(crate) fn parse_commit_response(body: &str) -> Result<DateTime<Utc>, StoreError> {
    let response: CommitResponse = serde_json::from_str(body)?;

    let transformed = response
        .write_results
        .first()
        .and_then(|write| write.transform_results.first())
        .and_then(|result| result.get("timestampValue"))
        .and_then(Value::as_str);

    match transformed {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|time| time.with_timezone(&Utc))
            .map_err(|e| StoreError::Serialization(format!("bad transform timestamp: {}", e))),
        None => Ok(response.commit_time),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirestoreDocument {
    #[serde(default)]
    fields: HashMap<String, Value>,
    update_time: DateTime<Utc>,
}

/// Convert a Firestore document resource into a stored document
pub(crate) fn parse_document(key: &str, body: &str) -> Result<StoredDocument, StoreError> {
    let document: FirestoreDocument = serde_json::from_str(body)?;
    let mut fields = BTreeMap::new();

    for (name, value) in document.fields {
        let stored = if let Some(s) = value.get("stringValue").and_then(Value::as_str) {
            StoredValue::String(s.to_string())
        } else if let Some(t) = value.get("timestampValue").and_then(Value::as_str) {
            let time = DateTime::parse_from_rfc3339(t).map_err(|e| StoreError::InvalidDocument {
                key: key.to_string(),
                reason: format!("bad timestamp in '{}': {}", name, e),
            })?;
            StoredValue::Timestamp(time.with_timezone(&Utc))
        } else {
            return Err(StoreError::InvalidDocument {
                key: key.to_string(),
                reason: format!("unsupported value type in '{}'", name),
            });
        };
        fields.insert(name, stored);
    }

    Ok(StoredDocument {
        fields,
        update_time: document.update_time,
    })
}

fn backend(e: reqwest::Error) -> StoreError {
    StoreError::Backend(format!("Firestore request failed: {}", e))
}

async fn error_status(response: reqwest::Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    StoreError::Backend(format!("Firestore returned {}: {}", status, body))
}

#[async_trait]
impl DocumentStoreTrait for FirestoreDocumentStore {
    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<WriteResult, StoreError> {
        let body = commit_body(&self.document_name(collection, key)?, &document);
        let token = self.tokens.bearer().await?;

        let response = self
            .client
            .post(self.commit_url())
            .bearer_auth(token.expose())
            .json(&body)
            .send()
            .await
            .map_err(backend)?;

        if !response.status().is_success() {
            return Err(error_status(response).await);
        }

        let text = response.text().await.map_err(backend)?;
        Ok(WriteResult {
            update_time: parse_commit_response(&text)?,
        })
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError> {
        let url = self.document_url(collection, key)?;
        let token = self.tokens.bearer().await?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(backend)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_status(response).await);
        }

        let text = response.text().await.map_err(backend)?;
        parse_document(key, &text).map(Some)
    }

    /// Obtain a bearer token; no document is read
    async fn health_check(&self) -> Result<(), StoreError> {
        self.tokens.bearer().await.map(|_| ())
    }

    fn provider_name(&self) -> &str {
        "firestore"
    }
}
