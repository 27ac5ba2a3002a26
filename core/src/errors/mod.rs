//! Domain-specific error types and error handling.

mod types;


pub use types::{MailError, StoreError};

use thiserror::Error;

/// Message shown to callers whenever issuance fails. Never includes the code.
pub const ISSUANCE_FAILURE_MESSAGE: &str = "Erreur lors de l'envoi du code";

/// Error kinds visible at the invocation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Internal => "internal",
        }
    }
}

/// Verification code issuance errors
///
/// Both variants collapse to [`ErrorKind::Internal`] for callers.
#[derive(Error, Debug)]
pub enum IssuanceError {
    /// The email could not be sent; nothing was written
    #[error("Failed to dispatch verification email: {0}")]
    MailDispatch(#[source] MailError),

    /// The email was sent but the record could not be written
    #[error("Failed to store verification record: {0}")]
    Storage(#[source] StoreError),
}

impl IssuanceError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }

    /// Generic caller-facing message, identical for every failure
    pub fn user_message(&self) -> &'static str {
        ISSUANCE_FAILURE_MESSAGE
    }

    /// Whether the recipient may already hold a code that was never stored
    pub fn email_was_sent(&self) -> bool {
        matches!(self, IssuanceError::Storage(_))
    }
}

pub type IssuanceResult<T> = Result<T, IssuanceError>;
