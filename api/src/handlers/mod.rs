//! Error handling for the callable protocol

pub mod error;

pub use error::{extract_language, json_error_handler, CallableApiError};
