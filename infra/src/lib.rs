//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Ma Plante backend.
//! It provides the concrete collaborators of the verification code issuer.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Mail**: SMTP transport (lettre) and a mock transport for development
//! - **Store**: document stores backed by Firestore, MySQL, Redis or memory
//! - **Database**: MySQL connection pool using SQLx
//! - **Cache**: Redis connection management
//!
//! Providers are picked at runtime from `AppConfig` through
//! [`mail::create_mail_transport`] and [`store::create_document_store`].

// Re-export core types for convenience
pub use mp_core::errors::*;

/// Database module - MySQL connection pool using SQLx
pub mod database;

/// Cache module - Redis connection management
pub mod cache;

/// Mail transport module - SMTP and mock transports
pub mod mail;

/// Document store module - Firestore, MySQL, Redis and in-memory stores
pub mod store;

use mp_shared::config::SecretError;

/// Infrastructure-specific error types
///
/// Raised while constructing collaborators; runtime failures use the core
/// `MailError` and `StoreError` types.
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis connection error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP client error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credential could not be resolved
    #[error("Secret error: {0}")]
    Secret(#[from] SecretError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail transport error
    #[error("Mail transport error: {0}")]
    Mail(String),
}
