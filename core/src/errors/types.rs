//! Collaborator error types for mail delivery and document storage
//!
//! These errors carry the distinguishing detail of a failure for logs. They
//! never reach callers directly; the issuance service wraps them in
//! `IssuanceError`, which exposes a single error kind.

use thiserror::Error;

/// Mail transport errors
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Mail transport failure: {0}")]
    Transport(String),

    #[error("Message rejected by provider: {0}")]
    Rejected(String),
}

/// Document store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document store backend error: {0}")]
    Backend(String),

    #[error("Document serialization error: {0}")]
    Serialization(String),

    #[error("Invalid document at {key}: {reason}")]
    InvalidDocument { key: String, reason: String },
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Serialization(error.to_string())
    }
}
