//! Shared configuration and common types for the Ma Plante server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and layered loading
//! - Secret references for credentials kept out of configuration files
//! - Callable-function envelope and health response types
//! - Utility functions (email masking for logs)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, FirestoreConfig,
    LoggingConfig, MailConfig, MailProvider, RedisConfig, Secret, SecretError, SecretRef,
    ServerConfig, SmtpConfig, SmtpSecurity, StoreConfig, StoreProvider,
};
pub use types::{CallableError, CallableErrorBody, CallableRequest, CallableResult, CallableStatus, HealthResponse, HealthStatus, Language, ServiceHealth};
pub use utils::email::mask_email;
