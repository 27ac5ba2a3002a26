//! MySQL pool for the document store
//!
//! The connection URL carries the password, so it is resolved from its
//! secret reference here and never logged or echoed in errors.

use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    ConnectOptions, MySqlPool,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::log::LevelFilter;

use mp_shared::config::DatabaseConfig;

use crate::InfrastructureError;

/// Statements slower than this are logged at warn
const SLOW_STATEMENT: Duration = Duration::from_millis(500);

/// Shared MySQL pool
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Resolve the URL secret and open the pool.
    ///
    /// Connections are checked before each acquire, so a restarted server
    /// does not surface as a failed issuance.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, InfrastructureError> {
        let url = config.url.resolve()?;
        let options = Self::connect_options(url.expose())?;

        tracing::info!(
            host = options.get_host(),
            database = ?options.get_database(),
            max_connections = config.max_connections,
            "Opening MySQL pool"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .test_before_acquire(true)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, event = "mysql_connect_failed", "Failed to open MySQL pool");
                InfrastructureError::Database(e)
            })?;

        Ok(Self { pool })
    }

    pub(crate) fn connect_options(url: &str) -> Result<MySqlConnectOptions, InfrastructureError> {
        let options = MySqlConnectOptions::from_str(url)
            .map_err(|_| InfrastructureError::Config("Invalid database URL".to_string()))?;

        Ok(options
            .log_statements(LevelFilter::Trace)
            .log_slow_statements(LevelFilter::Warn, SLOW_STATEMENT))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Round-trip `SELECT 1`
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let value: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(value == 1)
    }

    /// Apply pending migrations from `infra/migrations`
    pub async fn run_migrations(&self) -> Result<(), InfrastructureError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!(event = "migrations_applied", "Document table is up to date");
        Ok(())
    }
}
