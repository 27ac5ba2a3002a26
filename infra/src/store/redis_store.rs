//! Redis document store
//!
//! Each document is a JSON value at `{prefix}:{collection}:{key}`. Server
//! timestamps come from the Redis `TIME` command.

use async_trait::async_trait;

use mp_core::domain::entities::{Document, StoredDocument, WriteResult};
use mp_core::errors::StoreError;
use mp_core::services::DocumentStoreTrait;

use crate::cache::RedisClient;

/// Document store backed by Redis string values
#[derive(Clone)]
pub struct RedisDocumentStore {
    client: RedisClient,
}

impl RedisDocumentStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

fn backend(e: redis::RedisError) -> StoreError {
    StoreError::Backend(format!("Redis: {}", e))
}

#[async_trait]
impl DocumentStoreTrait for RedisDocumentStore {
    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<WriteResult, StoreError> {
        let server_time = self.client.server_time().await.map_err(backend)?;
        let stored = document.resolve(server_time);
        let payload = serde_json::to_string(&stored)?;

        self.client
            .set(&self.client.document_key(collection, key), &payload)
            .await
            .map_err(backend)?;

        Ok(WriteResult {
            update_time: stored.update_time,
        })
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError> {
        let payload = self
            .client
            .get(&self.client.document_key(collection, key))
            .await
            .map_err(backend)?;

        payload
            .map(|raw| serde_json::from_str::<StoredDocument>(&raw).map_err(StoreError::from))
            .transpose()
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        match self.client.health_check().await.map_err(backend)? {
            true => Ok(()),
            false => Err(StoreError::Backend("Redis: unexpected PING reply".to_string())),
        }
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}
