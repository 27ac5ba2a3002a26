//! Secret references
//!
//! Credentials never live in configuration files. A [`SecretRef`] only names
//! where the value can be found (an environment variable or a mounted secret
//! file such as `/run/secrets/smtp_password`), and is resolved once at startup
//! into a [`Secret`] whose `Debug` output is redacted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving a secret reference
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secret environment variable {var} is not set")]
    MissingEnv { var: String },

    #[error("Failed to read secret file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Secret {name} resolved to an empty value")]
    Empty { name: String },

    #[error("Secret reference names neither an environment variable nor a file")]
    Unset,
}

/// Location of a secret value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretRef {
    /// Environment variable holding the value
    #[serde(default)]
    pub env: Option<String>,

    /// File holding the value (takes precedence over `env`)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl SecretRef {
    /// Reference a secret stored in an environment variable
    pub fn from_env_var(var: impl Into<String>) -> Self {
        Self {
            env: Some(var.into()),
            file: None,
        }
    }

    /// Reference a secret stored in a file
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            env: None,
            file: Some(path.into()),
        }
    }

    /// Whether this reference points anywhere at all
    pub fn is_set(&self) -> bool {
        self.env.is_some() || self.file.is_some()
    }

    /// Resolve the secret value.
    ///
    /// A configured file wins over the environment variable. Trailing line
    /// breaks are stripped from file contents.
    pub fn resolve(&self) -> Result<Secret, SecretError> {
        if let Some(path) = &self.file {
            let raw = std::fs::read_to_string(path).map_err(|source| SecretError::File {
                path: path.clone(),
                source,
            })?;
            let value = raw.trim_end_matches(|c| c == '\n' || c == '\r').to_string();
            return Secret::non_empty(value, path.display().to_string());
        }

        if let Some(var) = &self.env {
            let value = std::env::var(var).map_err(|_| SecretError::MissingEnv { var: var.clone() })?;
            return Secret::non_empty(value, var.clone());
        }

        Err(SecretError::Unset)
    }
}

/// A resolved secret value
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw value. Call sites should hand it straight to a client.
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn non_empty(value: String, name: String) -> Result<Self, SecretError> {
        if value.trim().is_empty() {
            Err(SecretError::Empty { name })
        } else {
            Ok(Self(value))
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}
