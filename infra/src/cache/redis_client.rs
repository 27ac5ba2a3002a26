//! Redis client implementation
//!
//! Wraps a multiplexed async connection with exponential-backoff connect
//! retries. The connection URL is a credential and is resolved from its
//! secret reference.

use chrono::{DateTime, TimeZone, Utc};
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisResult};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use mp_shared::config::RedisConfig;

use crate::InfrastructureError;

/// Upper bound of the delay between connect attempts
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// Redis client with retry logic
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Prefix of every key written through this client
    key_prefix: String,
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// # Arguments
    /// * `config` - Redis configuration settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Redis client or error
    pub async fn new(config: &RedisConfig) -> Result<Self, InfrastructureError> {
        let url = config.url.resolve()?;
        info!(url = %mask_url(url.expose()), "Creating Redis client");

        let client = Client::open(url.expose()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e.category()))
        })?;

        let connection =
            Self::create_connection_with_retry(client, config.connect_retries.max(1), config.retry_delay_ms).await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Clone of the multiplexed connection
    pub fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    /// Full key for `collection/key`
    pub fn document_key(&self, collection: &str, key: &str) -> String {
        document_key(&self.key_prefix, collection, key)
    }

    /// Current time of the Redis server
    pub async fn server_time(&self) -> RedisResult<DateTime<Utc>> {
        let mut conn = self.connection();
        let (secs, micros): (i64, i64) = redis::cmd("TIME").query_async(&mut conn).await?;
        Ok(time_from_parts(secs, micros))
    }

    pub async fn get(&self, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.connection();
        conn.get(key).await
    }

    pub async fn set(&self, key: &str, value: &str) -> RedisResult<()> {
        let mut conn = self.connection();
        conn.set(key, value).await
    }

    /// Check that the server answers PING
    pub async fn health_check(&self) -> RedisResult<bool> {
        let mut conn = self.connection();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

pub(crate) fn document_key(prefix: &str, collection: &str, key: &str) -> String {
    if prefix.is_empty() {
        format!("{}:{}", collection, key)
    } else {
        format!("{}:{}:{}", prefix, collection, key)
    }
}

pub(crate) fn next_delay(delay: u64) -> u64 {
    (delay.saturating_mul(2)).min(MAX_RETRY_DELAY_MS)
}

/// Convert a `TIME` reply (seconds, microseconds) to a UTC timestamp
pub(crate) fn time_from_parts(secs: i64, micros: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, (micros.clamp(0, 999_999) * 1000) as u32)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
