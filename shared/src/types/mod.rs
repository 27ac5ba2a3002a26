//! Type definitions module
//!
//! - `callable` - Callable-function request/response envelopes
//! - `language` - Language negotiation for user-facing messages
//! - `response` - Health check responses

pub mod callable;
pub mod language;
pub mod response;

pub use callable::{CallableError, CallableErrorBody, CallableRequest, CallableResult, CallableStatus};
pub use language::Language;
pub use response::{HealthResponse, HealthStatus, ServiceHealth};
