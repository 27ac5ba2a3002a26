//! Mock Mail Transport Implementation
//!
//! A mock implementation of the mail transport for development and testing.
//! Messages are recorded in memory and logged instead of being sent.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use mp_core::domain::value_objects::OutboundMessage;
use mp_core::errors::MailError;
use mp_core::services::{DispatchReceipt, MailTransportTrait};
use mp_shared::mask_email;

/// Mock mail transport for development and testing
///
/// This implementation:
/// - Records every accepted message in an outbox
/// - Optionally prints messages to the console
/// - Generates mock message IDs
/// - Can simulate a provider rejection
#[derive(Clone, Default)]
pub struct MockMailTransport {
    /// Messages accepted so far
    outbox: Arc<Mutex<Vec<OutboundMessage>>>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
    /// Whether to print messages to console
    console_output: bool,
}

impl MockMailTransport {
    /// Create a new mock transport that only records messages
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transport with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            outbox: Arc::new(Mutex::new(Vec::new())),
            simulate_failure,
            console_output,
        }
    }

    /// Mock transport rejecting every message
    pub fn failing() -> Self {
        Self::with_options(false, true)
    }

    /// Messages accepted so far
    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.outbox.lock().map(|outbox| outbox.clone()).unwrap_or_default()
    }

    /// Get the total number of messages sent
    pub fn message_count(&self) -> usize {
        self.outbox.lock().map(|outbox| outbox.len()).unwrap_or(0)
    }

    /// Clear the outbox
    pub fn reset(&self) {
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.clear();
        }
    }
}

#[async_trait]
impl MailTransportTrait for MockMailTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<DispatchReceipt, MailError> {
        let masked = mask_email(&message.to);

        if self.simulate_failure {
            warn!(provider = "mock", to = %masked, "Mock mail transport simulating rejection");
            return Err(MailError::Rejected("Simulated mail rejection".to_string()));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = {
            let mut outbox = self
                .outbox
                .lock()
                .map_err(|_| MailError::Transport("Mock outbox poisoned".to_string()))?;
            outbox.push(message.clone());
            outbox.len()
        };

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK MAIL TRANSPORT - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("From: {}", message.from);
            println!("To: {}", message.to);
            println!("Subject: {}", message.subject);
            println!("Message ID: {}", message_id);
            println!("{}", message.text);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "mail_transport",
            provider = "mock",
            to = %masked,
            message_id = %message_id,
            body_length = message.text.len(),
            "Mail accepted (mock)"
        );

        Ok(DispatchReceipt { message_id })
    }

    async fn health_check(&self) -> Result<(), MailError> {
        if self.simulate_failure {
            return Err(MailError::Transport("Simulated relay outage".to_string()));
        }
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
