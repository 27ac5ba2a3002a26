//! SMTP mail transport built on lettre
//!
//! Sends plain-text messages through a pooled async SMTP session. The relay
//! password is resolved from its secret reference at construction.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::PoolConfig;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use uuid::Uuid;

use mp_core::domain::value_objects::OutboundMessage;
use mp_core::errors::MailError;
use mp_core::services::{DispatchReceipt, MailTransportTrait};
use mp_shared::config::{SmtpConfig, SmtpSecurity};
use mp_shared::mask_email;

use crate::InfrastructureError;

/// Mail transport relaying through an SMTP server
#[derive(Clone)]
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailTransport {
    /// Build the transport. No connection is opened until the first send.
    pub fn new(config: &SmtpConfig) -> Result<Self, InfrastructureError> {
        let builder = match config.security {
            SmtpSecurity::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host),
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host),
            SmtpSecurity::Plain => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)),
        }
        .map_err(|e| InfrastructureError::Mail(format!("Invalid SMTP relay {}: {}", config.host, e)))?;

        let mut builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .pool_config(PoolConfig::new().max_size(config.pool_max_size));

        if config.requires_auth() {
            let password = config.password.resolve()?;
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                password.expose().to_string(),
            ));
        }

        tracing::info!(
            host = %config.host,
            port = config.port,
            security = ?config.security,
            authenticated = config.requires_auth(),
            "SMTP mail transport configured"
        );

        Ok(Self {
            transport: builder.build(),
            host: config.host.clone(),
        })
    }
}

/// Build a lettre message with a generated Message-ID
pub(crate) fn build_message(message: &OutboundMessage) -> Result<(Message, String), MailError> {
    let from: Mailbox = message.from.parse().map_err(|e: lettre::address::AddressError| {
        MailError::InvalidAddress {
            address: message.from.clone(),
            reason: e.to_string(),
        }
    })?;
    let to: Mailbox = message.to.parse().map_err(|e: lettre::address::AddressError| {
        MailError::InvalidAddress {
            address: mask_email(&message.to),
            reason: e.to_string(),
        }
    })?;

    let domain = from.email.domain().to_string();
    let message_id = format!("<{}@{}>", Uuid::new_v4(), domain);

    let email = Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .message_id(Some(message_id.clone()))
        .header(ContentType::TEXT_PLAIN)
        .body(message.text.clone())
        .map_err(|e| MailError::Build(e.to_string()))?;

    Ok((email, message_id))
}

#[async_trait]
impl MailTransportTrait for SmtpMailTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<DispatchReceipt, MailError> {
        let (email, message_id) = build_message(message)?;

        match self.transport.send(email).await {
            Ok(response) => {
                tracing::debug!(
                    host = %self.host,
                    code = %response.code(),
                    message_id = %message_id,
                    "SMTP relay accepted message"
                );
                Ok(DispatchReceipt { message_id })
            }
            Err(e) if e.is_permanent() => Err(MailError::Rejected(e.to_string())),
            Err(e) => Err(MailError::Transport(e.to_string())),
        }
    }

    /// Open a session and check the relay answers `NOOP`
    async fn health_check(&self) -> Result<(), MailError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Transport(format!("SMTP relay {} refused NOOP", self.host))),
            Err(e) => Err(MailError::Transport(e.to_string())),
        }
    }

    fn provider_name(&self) -> &str {
        "smtp"
    }
}
