//! Mail Transport Module
//!
//! Implementations of the mail transport used to deliver verification codes:
//!
//! - **SMTP**: pooled async relay through lettre (production)
//! - **Mock**: in-memory outbox with optional console output (development)

pub mod mock_mail;
pub mod smtp_mail;

pub use mock_mail::MockMailTransport;
pub use smtp_mail::SmtpMailTransport;

#[cfg(test)]
mod tests;

use mp_core::services::MailTransportTrait;
use mp_shared::config::{AppConfig, MailProvider};

use crate::InfrastructureError;

/// Create a mail transport based on configuration
///
/// The mock transport prints messages to the console in development only.
/// A misconfigured SMTP transport is an error rather than a silent fallback,
/// since codes would never reach their recipients.
pub fn create_mail_transport(config: &AppConfig) -> Result<Box<dyn MailTransportTrait>, InfrastructureError> {
    let mail = &config.mail;
    match mail.provider {
        MailProvider::Mock => {
            if config.environment.is_production() {
                tracing::warn!("Mock mail transport in production: no email will be delivered");
            }
            Ok(Box::new(MockMailTransport::with_options(
                config.environment.is_development(),
                false,
            )))
        }
        MailProvider::Smtp => match SmtpMailTransport::new(&mail.smtp) {
            Ok(transport) => Ok(Box::new(transport)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize SMTP mail transport");
                Err(e)
            }
        },
    }
}
