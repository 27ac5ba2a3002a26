//! Configuration for the issuance service

use mp_shared::config::{MailConfig, StoreConfig, DEFAULT_COLLECTION};

use crate::domain::value_objects::MessageTemplate;

/// Configuration for the verification code issuer
#[derive(Debug, Clone)]
pub struct VerificationIssuerConfig {
    /// Collection holding one record per email
    pub collection: String,
    /// Sender address of the verification email
    pub from_address: String,
    pub template: MessageTemplate,
}

impl VerificationIssuerConfig {
    pub fn new(mail: &MailConfig, store: &StoreConfig) -> Self {
        Self {
            collection: store.collection.clone(),
            from_address: mail.from_address.clone(),
            template: MessageTemplate::from(&mail.template),
        }
    }
}

impl Default for VerificationIssuerConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            from_address: MailConfig::default().from_address,
            template: MessageTemplate::default(),
        }
    }
}
