//! Mail transport configuration

use serde::{Deserialize, Serialize};

use super::secret::SecretRef;

/// Placeholder substituted with the verification code in the message body
pub const CODE_PLACEHOLDER: &str = "{code}";

/// Mail transport provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    /// Logs messages instead of delivering them
    #[default]
    Mock,
    /// Delivers messages through an SMTP relay
    Smtp,
}

impl MailProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            MailProvider::Mock => "mock",
            MailProvider::Smtp => "smtp",
        }
    }
}

/// Mail configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Which transport to use
    #[serde(default)]
    pub provider: MailProvider,

    /// Sender address of verification emails
    pub from_address: String,

    /// SMTP relay settings (used when `provider = "smtp"`)
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Subject and body of the verification email
    #[serde(default)]
    pub template: MessageTemplateConfig,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: MailProvider::default(),
            from_address: String::from("no-reply@ma-plante.app"),
            smtp: SmtpConfig::default(),
            template: MessageTemplateConfig::default(),
        }
    }
}

/// Connection security for the SMTP relay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (port 587)
    #[default]
    Starttls,
    /// Implicit TLS (port 465)
    Tls,
    /// No encryption, for local relays only
    Plain,
}

/// SMTP relay configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub security: SmtpSecurity,

    /// Login user; empty disables authentication
    #[serde(default)]
    pub username: String,

    /// Where to find the password (app password for Gmail accounts)
    #[serde(default = "default_smtp_password")]
    pub password: SecretRef,

    /// Timeout for a single SMTP exchange in seconds
    #[serde(default = "default_smtp_timeout")]
    pub timeout_secs: u64,

    /// Maximum pooled SMTP sessions
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::from("smtp.gmail.com"),
            port: default_smtp_port(),
            security: SmtpSecurity::default(),
            username: String::new(),
            password: default_smtp_password(),
            timeout_secs: default_smtp_timeout(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl SmtpConfig {
    pub fn requires_auth(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Verification email template
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageTemplateConfig {
    pub subject: String,

    /// Body text; `{code}` is replaced with the verification code
    pub body: String,
}

impl Default for MessageTemplateConfig {
    fn default() -> Self {
        Self {
            subject: String::from("Ton code de vérification - Ma Plante"),
            body: format!("Voici ton code de vérification pour Ma Plante : {}", CODE_PLACEHOLDER),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_password() -> SecretRef {
    SecretRef::from_env_var("SMTP_PASSWORD")
}

fn default_smtp_timeout() -> u64 {
    30
}

fn default_pool_max_size() -> u32 {
    4
}
