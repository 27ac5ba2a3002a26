//! Domain entities representing stored objects.

pub mod document;
pub mod verification_record;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use document::{Document, FieldValue, StoredDocument, StoredValue, WriteResult};
pub use verification_record::{VerificationRecord, CODE_FIELD, TIMESTAMP_FIELD};
