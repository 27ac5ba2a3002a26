//! In-memory document store
//!
//! Process-local store for development and tests. The process clock stands
//! in for the server clock.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use mp_core::domain::entities::{Document, StoredDocument, WriteResult};
use mp_core::errors::StoreError;
use mp_core::services::DocumentStoreTrait;

type DocumentMap = HashMap<(String, String), StoredDocument>;

/// Document store holding everything in a shared map
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<Mutex<DocumentMap>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`
    pub fn count(&self, collection: &str) -> usize {
        self.documents
            .lock()
            .map(|docs| docs.keys().filter(|(c, _)| c == collection).count())
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, DocumentMap>, StoreError> {
        self.documents
            .lock()
            .map_err(|_| StoreError::Backend("In-memory store poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStoreTrait for MemoryDocumentStore {
    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<WriteResult, StoreError> {
        let mut documents = self.lock()?;
        // Clock read under the lock keeps update times ordered with writes
        let stored = document.resolve(Utc::now());
        let update_time = stored.update_time;
        documents.insert((collection.to_string(), key.to_string()), stored);

        tracing::debug!(collection, provider = "memory", "Document written");
        Ok(WriteResult { update_time })
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError> {
        let documents = self.lock()?;
        Ok(documents.get(&(collection.to_string(), key.to_string())).cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}
