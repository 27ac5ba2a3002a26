//! Traits for mail transport and document store integration

use async_trait::async_trait;

use crate::domain::entities::{Document, StoredDocument, WriteResult};
use crate::domain::value_objects::OutboundMessage;
use crate::errors::{MailError, StoreError};

use super::types::DispatchReceipt;

/// Trait for mail transport integration
#[async_trait]
pub trait MailTransportTrait: Send + Sync {
    /// Send a single message
    async fn send(&self, message: &OutboundMessage) -> Result<DispatchReceipt, MailError>;
    /// Check that the provider currently accepts connections
    async fn health_check(&self) -> Result<(), MailError>;
    /// Name of the underlying provider, for logs and health output
    fn provider_name(&self) -> &str;
}

/// Trait for document store integration
#[async_trait]
pub trait DocumentStoreTrait: Send + Sync {
    /// Create or fully overwrite the document at `collection/key`.
    ///
    /// Server timestamp sentinels are resolved against the store's clock.
    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<WriteResult, StoreError>;
    /// Read the document at `collection/key`
    async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError>;
    /// Check that the backend is reachable with the configured credentials
    async fn health_check(&self) -> Result<(), StoreError>;
    /// Name of the underlying provider, for logs and health output
    fn provider_name(&self) -> &str;
}

#[async_trait]
impl<T: MailTransportTrait + ?Sized> MailTransportTrait for Box<T> {
    async fn send(&self, message: &OutboundMessage) -> Result<DispatchReceipt, MailError> {
        (**self).send(message).await
    }

    async fn health_check(&self) -> Result<(), MailError> {
        (**self).health_check().await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

#[async_trait]
impl<T: DocumentStoreTrait + ?Sized> DocumentStoreTrait for Box<T> {
    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<WriteResult, StoreError> {
        (**self).set(collection, key, document).await
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError> {
        (**self).get(collection, key).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        (**self).health_check().await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}
