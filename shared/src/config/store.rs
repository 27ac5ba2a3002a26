//! Document store configuration

use serde::{Deserialize, Serialize};

use super::secret::SecretRef;

/// Collection holding one verification document per email address
pub const DEFAULT_COLLECTION: &str = "verification_codes";

/// Document store provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    /// Process-local map, lost on restart
    #[default]
    Memory,
    /// Cloud Firestore via its REST API
    Firestore,
    /// MySQL `documents` table
    Mysql,
    /// Redis, one JSON value per document
    Redis,
}

impl StoreProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreProvider::Memory => "memory",
            StoreProvider::Firestore => "firestore",
            StoreProvider::Mysql => "mysql",
            StoreProvider::Redis => "redis",
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub provider: StoreProvider,

    /// Collection the verification records are written to
    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default)]
    pub firestore: FirestoreConfig,

    #[serde(default)]
    pub mysql: DatabaseConfig,

    #[serde(default)]
    pub redis: RedisConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: StoreProvider::default(),
            collection: default_collection(),
            firestore: FirestoreConfig::default(),
            mysql: DatabaseConfig::default(),
            redis: RedisConfig::default(),
        }
    }
}

/// Firestore REST configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirestoreConfig {
    #[serde(default)]
    pub project_id: String,

    #[serde(default = "default_database_id")]
    pub database_id: String,

    /// API root, overridable for the Firestore emulator
    #[serde(default = "default_firestore_base_url")]
    pub base_url: String,

    /// Where OAuth2 bearer tokens come from
    #[serde(default)]
    pub auth: FirestoreAuth,

    #[serde(default = "default_firestore_timeout")]
    pub timeout_secs: u64,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database_id: default_database_id(),
            base_url: default_firestore_base_url(),
            auth: FirestoreAuth::default(),
            timeout_secs: default_firestore_timeout(),
        }
    }
}

/// Token endpoint of the GCE / Cloud Run metadata server
pub const GCE_METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Source of Firestore access tokens
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FirestoreAuth {
    /// Service account of the runtime, refreshed before expiry
    Metadata {
        #[serde(default = "default_metadata_token_url")]
        token_url: String,
    },
    /// Fixed bearer token, for the emulator
    Static { token: SecretRef },
}

impl Default for FirestoreAuth {
    fn default() -> Self {
        FirestoreAuth::Metadata {
            token_url: default_metadata_token_url(),
        }
    }
}

/// MySQL connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Connection URL, which embeds the database password
    #[serde(default = "default_database_url")]
    pub url: SecretRef,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,

    /// Maximum lifetime of a connection in seconds
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
            max_lifetime: default_max_lifetime(),
        }
    }
}

impl DatabaseConfig {
    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Redis connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    /// Connection URL (may embed a password)
    #[serde(default = "default_redis_url")]
    pub url: SecretRef,

    /// Prefix of every document key, `{prefix}:{collection}:{key}`
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Connection attempts before giving up at startup
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,

    /// Initial delay between connection attempts, doubled each time
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
            connect_retries: default_connect_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_database_id() -> String {
    String::from("(default)")
}

fn default_firestore_base_url() -> String {
    String::from("https://firestore.googleapis.com/v1")
}

fn default_metadata_token_url() -> String {
    String::from(GCE_METADATA_TOKEN_URL)
}

fn default_firestore_timeout() -> u64 {
    30
}

fn default_database_url() -> SecretRef {
    SecretRef::from_env_var("DATABASE_URL")
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_max_lifetime() -> u64 {
    1800
}

fn default_redis_url() -> SecretRef {
    SecretRef::from_env_var("REDIS_URL")
}

fn default_key_prefix() -> String {
    String::from("maplante")
}

fn default_connect_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}
