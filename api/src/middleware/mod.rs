//! Middleware for CORS and transport security

pub mod cors;
pub mod security;
