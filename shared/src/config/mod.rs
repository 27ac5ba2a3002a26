//! Configuration module
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Environment detection and logging configuration
//! - `mail` - Mail transport and verification email template
//! - `secret` - References to credentials held outside configuration files
//! - `server` - HTTP server and CORS configuration
//! - `store` - Document store backends
//!
//! Values are layered: compiled defaults for the environment, then an optional
//! `config.<environment>.toml`, then `MAPLANTE__SECTION__KEY` variables.

pub mod environment;
pub mod mail;
pub mod secret;
pub mod server;
pub mod store;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// Re-export commonly used types
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use mail::{MailConfig, MailProvider, MessageTemplateConfig, SmtpConfig, SmtpSecurity, CODE_PLACEHOLDER};
pub use secret::{Secret, SecretError, SecretRef};
pub use server::{CorsConfig, ServerConfig};
pub use store::{
    DatabaseConfig, FirestoreAuth, FirestoreConfig, RedisConfig, StoreConfig, StoreProvider, DEFAULT_COLLECTION,
    GCE_METADATA_TOKEN_URL,
};

/// Prefix of environment variables overriding configuration values
pub const ENV_PREFIX: &str = "MAPLANTE";

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Mail transport configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Compiled defaults for an environment
    pub fn for_environment(environment: Environment) -> Self {
        // HTTPS enforcement stays opt-in: the server speaks plain HTTP and
        // needs `trusted_proxies` to recognise TLS terminated upstream.
        let (server, cors) = match environment {
            Environment::Production | Environment::Staging => (ServerConfig::default(), CorsConfig::default()),
            Environment::Development => (ServerConfig::new("127.0.0.1", 8080), CorsConfig::development()),
        };

        Self {
            environment,
            server,
            cors,
            logging: LoggingConfig::for_environment(environment),
            mail: MailConfig::default(),
            store: StoreConfig::default(),
        }
    }

    /// Load configuration for the environment named by `ENVIRONMENT`
    pub fn load() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        Self::load_from(environment, Path::new(environment.config_file()))
    }

    /// Load configuration from defaults, `file` (if present) and the process environment
    pub fn load_from(environment: Environment, file: &Path) -> Result<Self, ConfigError> {
        let defaults = Self::for_environment(environment);

        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&defaults)?)
            .add_source(::config::File::from(file).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        config.environment = environment;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.enforce_https && self.server.trusted_proxies.is_empty() {
            return Err(ConfigError::invalid(
                "server.trusted_proxies",
                "enforce_https needs at least one TLS-terminating proxy",
            ));
        }
        if self.store.collection.trim().is_empty() {
            return Err(ConfigError::invalid("store.collection", "must not be empty"));
        }
        if self.store.collection.contains('/') {
            return Err(ConfigError::invalid("store.collection", "must not contain '/'"));
        }
        if !self.mail.from_address.contains('@') {
            return Err(ConfigError::invalid("mail.from_address", "must be an email address"));
        }
        if !self.mail.template.body.contains(CODE_PLACEHOLDER) {
            return Err(ConfigError::invalid(
                "mail.template.body",
                format!("must contain the {} placeholder", CODE_PLACEHOLDER),
            ));
        }

        if self.mail.provider == MailProvider::Smtp {
            let smtp = &self.mail.smtp;
            if smtp.host.trim().is_empty() {
                return Err(ConfigError::invalid("mail.smtp.host", "required for the smtp provider"));
            }
            if smtp.requires_auth() && !smtp.password.is_set() {
                return Err(ConfigError::invalid(
                    "mail.smtp.password",
                    "a username is set but no password reference is configured",
                ));
            }
        }

        match self.store.provider {
            StoreProvider::Firestore if self.store.firestore.project_id.trim().is_empty() => {
                Err(ConfigError::invalid("store.firestore.project_id", "required for the firestore provider"))
            }
            StoreProvider::Mysql if !self.store.mysql.url.is_set() => {
                Err(ConfigError::invalid("store.mysql.url", "required for the mysql provider"))
            }
            StoreProvider::Redis if !self.store.redis.url.is_set() => {
                Err(ConfigError::invalid("store.redis.url", "required for the redis provider"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_config_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mp-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_are_valid() {
        for env in [Environment::Development, Environment::Staging, Environment::Production] {
            let config = AppConfig::for_environment(env);
            assert!(config.validate().is_ok(), "defaults for {} should validate", env);
        }
    }

    #[test]
    fn test_production_defaults_accept_plain_http() {
        let config = AppConfig::for_environment(Environment::Production);
        assert!(!config.server.enforce_https);
        assert!(!config.cors.allow_any_origin);
    }

    #[test]
    fn test_validate_https_requires_trusted_proxy() {
        let mut config = AppConfig::for_environment(Environment::Production);
        config.server.enforce_https = true;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "server.trusted_proxies", .. })
        ));

        config.server.trusted_proxies = vec!["10.0.0.1".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load_from(
            Environment::Development,
            Path::new("/nonexistent/config.development.toml"),
        )
        .unwrap();
        assert_eq!(config.store.collection, DEFAULT_COLLECTION);
        assert_eq!(config.mail.provider, MailProvider::Mock);
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_config_file(
            r#"
            [mail]
            provider = "smtp"
            from_address = "ma.plante@example.com"

            [mail.smtp]
            host = "smtp.example.com"
            username = "ma.plante@example.com"
            password = { file = "/run/secrets/smtp_password" }

            [store]
            provider = "firestore"
            collection = "codes"

            [store.firestore]
            project_id = "ma-plante"
            "#,
        );

        let config = AppConfig::load_from(Environment::Staging, &path).unwrap();
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.mail.provider, MailProvider::Smtp);
        assert_eq!(config.mail.smtp.port, 587);
        assert_eq!(
            config.mail.smtp.password.file,
            Some(PathBuf::from("/run/secrets/smtp_password"))
        );
        assert_eq!(config.store.provider, StoreProvider::Firestore);
        assert_eq!(config.store.collection, "codes");
        assert_eq!(config.store.firestore.project_id, "ma-plante");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_inline_password_rejected() {
        let path = temp_config_file(
            r#"
            [mail.smtp]
            host = "smtp.example.com"
            password = "tonmotdepasse"
            "#,
        );

        assert!(AppConfig::load_from(Environment::Development, &path).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("MAPLANTE__SERVER__PORT", "9191");
        let config = AppConfig::load_from(
            Environment::Development,
            Path::new("/nonexistent/config.development.toml"),
        )
        .unwrap();
        std::env::remove_var("MAPLANTE__SERVER__PORT");
        assert_eq!(config.server.port, 9191);
    }

    #[test]
    fn test_validate_smtp_requires_host() {
        let mut config = AppConfig::default();
        config.mail.provider = MailProvider::Smtp;
        config.mail.smtp.host = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "mail.smtp.host", .. })
        ));
    }

    #[test]
    fn test_validate_smtp_username_requires_password() {
        let mut config = AppConfig::default();
        config.mail.provider = MailProvider::Smtp;
        config.mail.smtp.username = "ma.plante@example.com".to_string();
        config.mail.smtp.password = SecretRef::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "mail.smtp.password", .. })
        ));
    }

    #[test]
    fn test_validate_template_placeholder() {
        let mut config = AppConfig::default();
        config.mail.template.body = "Bonjour".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_firestore_project() {
        let mut config = AppConfig::default();
        config.store.provider = StoreProvider::Firestore;
        assert!(config.validate().is_err());
        config.store.firestore.project_id = "ma-plante".to_string();
        assert!(config.validate().is_ok());
    }
}
