//! Main issuance service implementation

use std::sync::Arc;
use std::time::Instant;

use mp_shared::mask_email;

use crate::domain::entities::VerificationRecord;
use crate::errors::{IssuanceError, IssuanceResult};

use super::config::VerificationIssuerConfig;
use super::traits::{DocumentStoreTrait, MailTransportTrait};
use super::types::{IssueCodeResult, IssuerHealth, CheckOutcome};

/// Service emailing verification codes and recording them per address
pub struct VerificationCodeIssuer<M: MailTransportTrait, D: DocumentStoreTrait> {
    /// Mail transport for the verification email
    mail_transport: Arc<M>,
    /// Document store holding one record per email
    document_store: Arc<D>,
    config: VerificationIssuerConfig,
}

impl<M: MailTransportTrait, D: DocumentStoreTrait> VerificationCodeIssuer<M, D> {
    /// Create a new issuer
    ///
    /// # Arguments
    ///
    /// * `mail_transport` - Mail transport implementation
    /// * `document_store` - Document store implementation
    /// * `config` - Collection, sender and message template
    pub fn new(mail_transport: Arc<M>, document_store: Arc<D>, config: VerificationIssuerConfig) -> Self {
        Self {
            mail_transport,
            document_store,
            config,
        }
    }

    /// Email `code` to `email`, then record it under `email`
    ///
    /// This method:
    /// 1. Renders the verification email from the template
    /// 2. Sends it through the mail transport
    /// 3. Overwrites the record for `email` with the code and the store's time
    ///
    /// Neither argument is validated. A mail failure returns before anything
    /// is written. A storage failure after a successful send is returned as
    /// an error even though the email went out.
    pub async fn issue_code(&self, email: &str, code: &str) -> IssuanceResult<IssueCodeResult> {
        let masked = mask_email(email);
        let message = self
            .config
            .template
            .render(&self.config.from_address, email, code);

        let receipt = match self.mail_transport.send(&message).await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(
                    email = %masked,
                    provider = self.mail_transport.provider_name(),
                    error = %e,
                    event = "mail_dispatch_failed",
                    "Failed to send verification email"
                );
                return Err(IssuanceError::MailDispatch(e));
            }
        };

        tracing::info!(
            email = %masked,
            provider = self.mail_transport.provider_name(),
            message_id = %receipt.message_id,
            event = "verification_code_dispatched",
            "Verification email sent"
        );

        let document = VerificationRecord::document_for(code);
        let write = match self
            .document_store
            .set(&self.config.collection, email, document)
            .await
        {
            Ok(write) => write,
            Err(e) => {
                tracing::error!(
                    email = %masked,
                    collection = %self.config.collection,
                    provider = self.document_store.provider_name(),
                    message_id = %receipt.message_id,
                    error = %e,
                    event = "mail_sent_without_record",
                    "Verification email delivered but the code could not be stored"
                );
                return Err(IssuanceError::Storage(e));
            }
        };

        tracing::info!(
            email = %masked,
            collection = %self.config.collection,
            issued_at = %write.update_time,
            event = "verification_record_stored",
            "Verification code recorded"
        );

        Ok(IssueCodeResult {
            success: true,
            message_id: receipt.message_id,
            issued_at: write.update_time,
        })
    }

    /// Check the mail transport, then the document store.
    ///
    /// Failures are logged and reported, never returned as errors.
    pub async fn check_health(&self) -> IssuerHealth {
        let started = Instant::now();
        let mail_error = self.mail_transport.health_check().await.err().map(|e| e.to_string());
        let mail = CheckOutcome {
            provider: self.mail_provider().to_string(),
            error: mail_error,
            elapsed: started.elapsed(),
        };

        let started = Instant::now();
        let store_error = self.document_store.health_check().await.err().map(|e| e.to_string());
        let store = CheckOutcome {
            provider: self.store_provider().to_string(),
            error: store_error,
            elapsed: started.elapsed(),
        };

        for outcome in [&mail, &store] {
            if let Some(error) = &outcome.error {
                tracing::warn!(
                    provider = %outcome.provider,
                    error = %error,
                    event = "collaborator_unhealthy",
                    "Health check failed"
                );
            }
        }

        IssuerHealth { mail, store }
    }

    pub fn mail_provider(&self) -> &str {
        self.mail_transport.provider_name()
    }

    pub fn store_provider(&self) -> &str {
        self.document_store.provider_name()
    }
}
