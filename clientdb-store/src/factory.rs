//! Connection factory over a lazily created sqlx `PgPool`.
//!
//! Building a factory performs no I/O. The pool is opened on the first
//! acquisition, and every connection handed out is returned to the pool when
//! its guard is dropped.

use std::time::Duration;

use clientdb_core::{ConnectionDescriptor, Settings};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::OnceCell;
use tracing::info;

/// Default maximum connections for the pool.
/// Kept low for single-user tooling.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default time to wait for a free or new connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool sizing and timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

/// Produces scoped, exclusively-owned PostgreSQL connections.
pub struct ConnectionFactory {
    descriptor: ConnectionDescriptor,
    config: PoolConfig,
    pool: OnceCell<PgPool>,
}

/// Build a factory with the default [`PoolConfig`].
///
/// Does not check that the database is reachable; that happens on first use.
pub fn build_connection_factory(settings: &Settings) -> ConnectionFactory {
    ConnectionFactory::with_pool_config(settings, PoolConfig::default())
}

impl ConnectionFactory {
    pub fn with_pool_config(settings: &Settings, config: PoolConfig) -> Self {
        Self {
            descriptor: ConnectionDescriptor::from_settings(settings),
            config,
            pool: OnceCell::new(),
        }
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    pub fn pool_config(&self) -> PoolConfig {
        self.config
    }

    /// Structured connect options, equivalent to the descriptor's URL form
    /// without any need to percent-encode credentials.
    pub fn connect_options(&self) -> PgConnectOptions {
        let d = &self.descriptor;
        PgConnectOptions::new()
            .host(d.host())
            .port(d.port())
            .username(d.user())
            .password(d.password())
            .database(d.database_name())
    }

    /// The underlying pool, opening it on first call.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the first connection cannot be established,
    /// or a configuration error if the pool would hold no connections.
    pub async fn pool(&self) -> Result<&PgPool, sqlx::Error> {
        if self.config.max_connections == 0 {
            return Err(sqlx::Error::Configuration(
                "max_connections must be at least 1".into(),
            ));
        }
        self.pool
            .get_or_try_init(|| async {
                info!(
                    "opening connection pool to {} (max {} connections)",
                    self.descriptor.redacted(),
                    self.config.max_connections
                );
                PgPoolOptions::new()
                    .max_connections(self.config.max_connections)
                    .acquire_timeout(self.config.acquire_timeout)
                    .connect_with(self.connect_options())
                    .await
            })
            .await
    }

    /// Acquire a connection for one unit of work.
    ///
    /// The connection goes back to the pool when the returned guard is
    /// dropped, whichever way the caller exits.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, sqlx::Error> {
        self.pool().await?.acquire().await
    }

    /// Begin a transaction. Rolled back on drop unless committed.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool().await?.begin().await
    }

    /// Whether the pool has been opened yet.
    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }

    /// Close the pool if it was ever opened.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }
}
