//! # Ma Plante API
//!
//! HTTP surface of the verification code issuer, speaking the callable
//! function protocol: `{"data": ...}` in, `{"result": ...}` or
//! `{"error": {"status", "message"}}` out.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod routes;
pub mod telemetry;
