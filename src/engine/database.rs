//! Database connectivity for setup checks

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

use crate::common::config::DatabaseConfig;
use crate::common::{Error, Result};

/// How long to keep retrying an unreachable server before giving up
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only handle to the database the engine runs against
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Build connection options from configuration
    pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.dbname)
            .username(&config.user);

        if !config.password.is_empty() {
            options = options.password(&config.password);
        }

        if !config.sslmode.is_empty() {
            let mode: PgSslMode = config.sslmode.parse().map_err(|_| {
                Error::ConfigInvalid(format!("invalid sslmode '{}'", config.sslmode))
            })?;
            options = options.ssl_mode(mode);
        }

        Ok(options)
    }

    /// Open a connection and verify it responds
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = Self::connect_options(config)?;

        tracing::debug!(
            host = %config.host,
            port = config.port,
            dbname = %config.dbname,
            "Connecting to database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(CONNECT_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(Error::DatabaseConnect)?;

        let db = Self { pool };
        db.ping().await?;
        Ok(db)
    }

    /// Check that the connection is alive
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::DatabaseConnect)?;
        Ok(())
    }

    /// Server version string as reported by `version()`
    pub async fn server_version(&self) -> Result<String> {
        let version: String = sqlx::query_scalar("SELECT version()")
            .fetch_one(&self.pool)
            .await?;
        Ok(version)
    }

    /// Number of tables in the `public` schema
    pub async fn public_table_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'public'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
