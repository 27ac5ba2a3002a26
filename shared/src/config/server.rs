//! HTTP listener and CORS settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Callable payloads are two short strings; anything larger is rejected
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 16 * 1024;

/// HTTP listener settings for the callable endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// actix workers; 0 keeps actix's default of one per core
    #[serde(default)]
    pub workers: usize,

    /// Keep-alive in seconds
    #[serde(default = "default_keep_alive")]
    pub keep_alive: u64,

    /// Limit applied by the JSON extractor
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,

    /// Reject requests that did not arrive over HTTPS
    #[serde(default)]
    pub enforce_https: bool,

    /// Peer addresses whose forwarding headers are believed
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", 8080)
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            workers: 0,
            keep_alive: default_keep_alive(),
            max_payload_size: default_max_payload_size(),
            enforce_https: false,
            trusted_proxies: Vec::new(),
        }
    }

    /// `host:port` for `HttpServer::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn keep_alive_duration(&self) -> Duration {
        Duration::from_secs(self.keep_alive)
    }
}

/// Origins allowed to call the endpoint from a browser
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Development only
    #[serde(default)]
    pub allow_any_origin: bool,

    #[serde(default)]
    pub allowed_origins: Vec<String>,

    #[serde(default)]
    pub allow_credentials: bool,

    /// Preflight cache lifetime in seconds
    #[serde(default = "default_max_age")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::with_origins(Vec::new())
    }
}

impl CorsConfig {
    /// Explicit origin list, no credentials
    pub fn with_origins(origins: Vec<String>) -> Self {
        Self {
            allow_any_origin: false,
            allowed_origins: origins,
            allow_credentials: false,
            max_age: default_max_age(),
        }
    }

    /// Any origin, credentials allowed, short preflight cache
    pub fn development() -> Self {
        Self {
            allow_any_origin: true,
            allowed_origins: Vec::new(),
            allow_credentials: true,
            max_age: 600,
        }
    }
}

fn default_keep_alive() -> u64 {
    75
}

fn default_max_payload_size() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

fn default_max_age() -> usize {
    86400
}
