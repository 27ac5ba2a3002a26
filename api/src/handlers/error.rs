//! Callable error responses
//!
//! Every failure of the callable endpoint, including malformed payloads, is
//! reported as the `INTERNAL` status with a localized generic message.

use actix_web::{error::JsonPayloadError, http::header, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use std::fmt;

use mp_core::errors::{ErrorKind, IssuanceError};
use mp_shared::{CallableErrorBody, CallableStatus, Language};

use crate::i18n;

/// Error returned by the callable endpoint
#[derive(Debug)]
pub struct CallableApiError {
    status: CallableStatus,
    language: Language,
}

impl CallableApiError {
    pub fn internal(language: Language) -> Self {
        Self {
            status: CallableStatus::Internal,
            language,
        }
    }

    pub fn status(&self) -> CallableStatus {
        self.status
    }

    pub fn message(&self) -> String {
        match self.status {
            CallableStatus::Internal => i18n::internal_error_message(self.language),
        }
    }

    /// Map an issuance failure; the detail stays in the logs
    pub fn from_issuance(error: &IssuanceError, language: Language) -> Self {
        match error.kind() {
            ErrorKind::Internal => Self::internal(language),
        }
    }
}

impl fmt::Display for CallableApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status.kind(), self.message())
    }
}

impl ResponseError for CallableApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(CallableErrorBody::internal(self.message()))
    }
}

/// Preferred language of the caller, French when unspecified
pub fn extract_language(req: &HttpRequest) -> Language {
    req.headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

/// Turn JSON extractor failures into callable errors
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(
        path = %req.path(),
        error = %err,
        event = "malformed_callable_payload",
        "Rejected malformed callable payload"
    );
    CallableApiError::internal(extract_language(req)).into()
}
