//! Callable-function envelopes
//!
//! Requests carry their payload under `data`. Successful responses carry the
//! handler result under `result`; failures carry `error` with an upper-case
//! status and a human-readable message.

use serde::{Deserialize, Serialize};

/// Incoming callable request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallableRequest<T> {
    pub data: T,
}

/// Successful callable response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallableResult<T> {
    pub result: T,
}

impl<T> CallableResult<T> {
    pub fn new(result: T) -> Self {
        Self { result }
    }
}

/// Error status of a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallableStatus {
    Internal,
}

impl CallableStatus {
    /// HTTP status code carrying this error
    pub fn http_status(&self) -> u16 {
        match self {
            CallableStatus::Internal => 500,
        }
    }

    /// Lower-case error kind, as exposed to client SDKs
    pub fn kind(&self) -> &'static str {
        match self {
            CallableStatus::Internal => "internal",
        }
    }
}

/// Error details of a failed call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableError {
    pub status: CallableStatus,
    pub message: String,
}

/// Body of a failed call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableErrorBody {
    pub error: CallableError,
}

impl CallableErrorBody {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: CallableError {
                status: CallableStatus::Internal,
                message: message.into(),
            },
        }
    }
}
