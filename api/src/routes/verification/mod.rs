//! Verification code route handlers

pub mod send_code;

pub use send_code::{send_verification_code, AppState};
