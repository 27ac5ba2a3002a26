//! Result types for the issuance service

use chrono::{DateTime, Utc};
use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Receipt returned by a mail transport once a message is accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    /// Provider-assigned message identifier
    pub message_id: String,
}

/// Result of issuing a verification code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCodeResult {
    /// Always true; failures are reported as errors
    pub success: bool,
    /// Identifier of the dispatched email
    pub message_id: String,
    /// Server time recorded with the code
    pub issued_at: DateTime<Utc>,
}

/// Outcome of probing one collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Provider name of the checked collaborator
    pub provider: String,
    /// Error text when the check failed
    pub error: Option<String>,
    pub elapsed: Duration,
}

impl CheckOutcome {
    pub fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Health of the issuer's collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerHealth {
    pub mail: CheckOutcome,
    pub store: CheckOutcome,
}

impl IssuerHealth {
    /// Both collaborators answered
    pub fn is_healthy(&self) -> bool {
        self.mail.is_healthy() && self.store.is_healthy()
    }
}
