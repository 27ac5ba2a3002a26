//! MySQL document store
//!
//! Documents live in a generic `documents` table, one row per
//! `(collection, doc_key)` with the resolved fields as JSON. Server
//! timestamps come from `UTC_TIMESTAMP(6)`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::types::Json;
use sqlx::Row;
use std::collections::BTreeMap;

use mp_core::domain::entities::{Document, StoredDocument, StoredValue, WriteResult};
use mp_core::errors::StoreError;
use mp_core::services::DocumentStoreTrait;

use crate::database::DatabasePool;

const UPSERT_DOCUMENT: &str = r#"
    INSERT INTO documents (collection, doc_key, fields, update_time)
    VALUES (?, ?, ?, ?)
    ON DUPLICATE KEY UPDATE fields = VALUES(fields), update_time = VALUES(update_time)
"#;

const SELECT_DOCUMENT: &str = r#"
    SELECT fields, update_time
    FROM documents
    WHERE collection = ? AND doc_key = ?
"#;

/// Document store backed by MySQL
#[derive(Clone)]
pub struct MySqlDocumentStore {
    pool: DatabasePool,
}

impl MySqlDocumentStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("MySQL: {}", e))
}

#[async_trait]
impl DocumentStoreTrait for MySqlDocumentStore {
    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<WriteResult, StoreError> {
        let mut tx = self.pool.pool().begin().await.map_err(backend)?;

        let now: NaiveDateTime = sqlx::query_scalar("SELECT UTC_TIMESTAMP(6)")
            .fetch_one(&mut *tx)
            .await
            .map_err(backend)?;
        let stored = document.resolve(DateTime::from_naive_utc_and_offset(now, Utc));

        sqlx::query(UPSERT_DOCUMENT)
            .bind(collection)
            .bind(key)
            .bind(Json(&stored.fields))
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        tx.commit().await.map_err(backend)?;

        Ok(WriteResult {
            update_time: stored.update_time,
        })
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError> {
        let row = sqlx::query(SELECT_DOCUMENT)
            .bind(collection)
            .bind(key)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(backend)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Json(fields): Json<BTreeMap<String, StoredValue>> = row
            .try_get("fields")
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let update_time: NaiveDateTime = row.try_get("update_time").map_err(backend)?;

        Ok(Some(StoredDocument {
            fields,
            update_time: DateTime::from_naive_utc_and_offset(update_time, Utc),
        }))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        match self.pool.health_check().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(StoreError::Backend("MySQL: unexpected SELECT 1 result".to_string())),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    fn provider_name(&self) -> &str {
        "mysql"
    }
}
