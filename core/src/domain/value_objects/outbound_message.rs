//! Outbound verification email

use mp_shared::config::{MessageTemplateConfig, CODE_PLACEHOLDER};
use serde::{Deserialize, Serialize};

/// Email handed to a mail transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    /// Plain-text body
    pub text: String,
}

/// Subject and body of the verification email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    subject: String,
    body: String,
}

impl MessageTemplate {
    /// `body` should contain the `{code}` placeholder
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Build the message for `to`, embedding `code` verbatim
    pub fn render(&self, from: &str, to: &str, code: &str) -> OutboundMessage {
        OutboundMessage {
            from: from.to_string(),
            to: to.to_string(),
            subject: self.subject.clone(),
            text: self.body.replace(CODE_PLACEHOLDER, code),
        }
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::from(&MessageTemplateConfig::default())
    }
}

impl From<&MessageTemplateConfig> for MessageTemplate {
    fn from(config: &MessageTemplateConfig) -> Self {
        Self::new(config.subject.clone(), config.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_template() {
        let message = MessageTemplate::default().render("no-reply@ma-plante.app", "user@example.com", "482913");

        assert_eq!(message.from, "no-reply@ma-plante.app");
        assert_eq!(message.to, "user@example.com");
        assert_eq!(message.subject, "Ton code de vérification - Ma Plante");
        assert_eq!(message.text, "Voici ton code de vérification pour Ma Plante : 482913");
    }

    #[test]
    fn test_code_embedded_verbatim() {
        let template = MessageTemplate::new("Code", "[{code}] / {code}");
        let message = template.render("a@b.c", "d@e.f", "$1 {x}");
        assert_eq!(message.text, "[$1 {x}] / $1 {x}");
    }
}
