//! Localized caller-facing messages
//!
//! Messages are embedded from `i18n/messages.toml` at compile time.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

use mp_core::errors::ISSUANCE_FAILURE_MESSAGE;
use mp_shared::Language;

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedMessage {
    pub code: String,
    pub fr: String,
    pub en: String,
}

impl LocalizedMessage {
    pub fn text(&self, lang: Language) -> &str {
        match lang {
            Language::French => &self.fr,
            Language::English => &self.en,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Messages {
    #[serde(default)]
    pub callable: HashMap<String, LocalizedMessage>,
}

const EMBEDDED_MESSAGES: &str = include_str!("../../i18n/messages.toml");

pub static MESSAGES: Lazy<Messages> = Lazy::new(|| match toml::from_str(EMBEDDED_MESSAGES) {
    Ok(messages) => messages,
    Err(e) => {
        tracing::error!(error = %e, "Failed to parse embedded messages");
        Messages::default()
    }
});

/// Message for a callable status key such as `internal`
pub fn get_message(key: &str, lang: Language) -> Option<&'static str> {
    MESSAGES.callable.get(key).map(|msg| msg.text(lang))
}

/// Message returned whenever issuance fails
pub fn internal_error_message(lang: Language) -> String {
    get_message("internal", lang)
        .unwrap_or(ISSUANCE_FAILURE_MESSAGE)
        .to_string()
}
