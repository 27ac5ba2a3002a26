//! Deployment environment and logging settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Variables consulted, in order, to pick the environment
pub const ENVIRONMENT_VARS: [&str; 3] = ["ENVIRONMENT", "ENV", "RUST_ENV"];

/// Deployment environment of the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn name(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    pub fn is_development(&self) -> bool {
        *self == Environment::Development
    }

    /// First of [`ENVIRONMENT_VARS`] that is set and parses; development otherwise
    pub fn from_env() -> Self {
        ENVIRONMENT_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// `config.<name>.toml`, read from the working directory
    pub fn config_file(&self) -> &'static str {
        match self {
            Environment::Development => "config.development.toml",
            Environment::Staging => "config.staging.toml",
            Environment::Production => "config.production.toml",
        }
    }

    /// `.env.<name>`, loaded before the plain `.env`
    pub fn env_file(&self) -> &'static str {
        match self {
            Environment::Development => ".env.development",
            Environment::Staging => ".env.staging",
            Environment::Production => ".env.production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// ANSI colors for pretty and compact output
    #[serde(default = "default_colored")]
    pub colored: bool,

    /// Attach file and line to each event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_development() {
            return Self {
                level: String::from("info,mp_core=debug,mp_infra=debug,mp_api=debug"),
                format: LogFormat::Pretty,
                colored: true,
                source_location: true,
            };
        }

        Self {
            level: String::from("info"),
            format: LogFormat::Json,
            colored: false,
            source_location: false,
        }
    }
}

fn default_colored() -> bool {
    true
}
