//! Verification record entity for email-based verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::{Document, StoredDocument};
use crate::errors::StoreError;

/// Field holding the verification code
pub const CODE_FIELD: &str = "code";

/// Field holding the server-assigned issuance time
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Verification record, stored at the document keyed by the email address.
///
/// At most one record exists per email; issuing a new code overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Email address the code was sent to (document key)
    pub email: String,

    /// Opaque, caller-supplied verification code
    pub code: String,

    /// Server time at which the record was written
    pub issued_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Document written for a newly issued code.
    ///
    /// The issuance time is left to the store's clock.
    pub fn document_for(code: &str) -> Document {
        Document::new()
            .with_string(CODE_FIELD, code)
            .with_server_timestamp(TIMESTAMP_FIELD)
    }

    /// Rebuild a record from the document stored under `email`
    pub fn from_stored(email: &str, document: &StoredDocument) -> Result<Self, StoreError> {
        let code = document
            .get(CODE_FIELD)
            .and_then(|v| v.as_str())
            .ok_or_else(|| StoreError::InvalidDocument {
                key: email.to_string(),
                reason: format!("missing string field '{}'", CODE_FIELD),
            })?;

        let issued_at = document
            .get(TIMESTAMP_FIELD)
            .and_then(|v| v.as_timestamp())
            .ok_or_else(|| StoreError::InvalidDocument {
                key: email.to_string(),
                reason: format!("missing timestamp field '{}'", TIMESTAMP_FIELD),
            })?;

        Ok(Self {
            email: email.to_string(),
            code: code.to_string(),
            issued_at,
        })
    }
}
