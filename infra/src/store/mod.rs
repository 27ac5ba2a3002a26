//! Document Store Module
//!
//! Implementations of the document store holding verification records:
//!
//! - **Firestore**: REST `documents:commit` with server timestamp transforms
//! - **MySQL**: generic `documents` table through SQLx
//! - **Redis**: one JSON value per document
//! - **Memory**: process-local map for development and tests

pub mod firestore_auth;
pub mod firestore_store;
pub mod memory_store;
pub mod mysql_store;
pub mod redis_store;

pub use firestore_store::FirestoreDocumentStore;
pub use memory_store::MemoryDocumentStore;
pub use mysql_store::MySqlDocumentStore;
pub use redis_store::RedisDocumentStore;

#[cfg(test)]
mod tests;

use mp_core::services::DocumentStoreTrait;
use mp_shared::config::{StoreConfig, StoreProvider};

use crate::cache::RedisClient;
use crate::database::DatabasePool;
use crate::InfrastructureError;

/// Create a document store based on configuration
///
/// Connects to the selected backend. The MySQL store applies pending
/// migrations before it is returned.
pub async fn create_document_store(
    config: &StoreConfig,
) -> Result<Box<dyn DocumentStoreTrait>, InfrastructureError> {
    tracing::info!(provider = config.provider.as_str(), collection = %config.collection, "Creating document store");

    let store: Box<dyn DocumentStoreTrait> = match config.provider {
        StoreProvider::Memory => Box::new(MemoryDocumentStore::new()),
        StoreProvider::Firestore => Box::new(FirestoreDocumentStore::new(&config.firestore)?),
        StoreProvider::Mysql => {
            let pool = DatabasePool::new(&config.mysql).await?;
            pool.run_migrations().await?;
            Box::new(MySqlDocumentStore::new(pool))
        }
        StoreProvider::Redis => {
            let client = RedisClient::new(&config.redis).await?;
            Box::new(RedisDocumentStore::new(client))
        }
    };

    Ok(store)
}
