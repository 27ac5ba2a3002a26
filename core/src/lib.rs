//! # Ma Plante Core
//!
//! Core business logic and domain layer for the Ma Plante backend.
//! This crate contains the verification record and document model, the
//! collaborator traits for mail delivery and document storage, the error
//! taxonomy, and the verification code issuance service.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
