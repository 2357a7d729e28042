//! SQLite context provider and configuration.

use std::fmt::Debug;
use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use serde::{Deserialize, Serialize};

use crate::core::ContextProvider;
use crate::error::{BackendError, PersistenceError, PersistenceResult};

use super::BACKEND_NAME;
use super::context::SqliteContext;

/// Configuration for the SQLite adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of idle connections.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in milliseconds.
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,

    /// Enable WAL mode for better concurrency.
    #[serde(default = "default_true")]
    pub enable_wal: bool,

    /// Enable foreign key constraints.
    #[serde(default = "default_true")]
    pub enable_foreign_keys: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout_ms() -> u64 {
    30000
}

fn default_busy_timeout_ms() -> u32 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout_ms: default_connection_timeout_ms(),
            busy_timeout_ms: default_busy_timeout_ms(),
            enable_wal: true,
            enable_foreign_keys: true,
        }
    }
}

pub(super) fn connection_error(e: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Backend(BackendError::ConnectionFailed {
        backend_name: BACKEND_NAME.to_string(),
        message: e.to_string(),
    })
}

/// Hands out one [`SqliteContext`] per query from a connection pool.
///
/// An in-memory database lives inside a single connection, so the pool of an
/// in-memory provider holds exactly one connection that is never recycled;
/// contexts on it run one at a time.
pub struct SqliteContextProvider {
    pool: Pool<SqliteConnectionManager>,
    config: SqliteConfig,
    is_memory: bool,
}

impl Debug for SqliteContextProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteContextProvider")
            .field("config", &self.config)
            .field("is_memory", &self.is_memory)
            .field("pool_size", &self.pool.state().connections)
            .finish()
    }
}

impl SqliteContextProvider {
    /// Creates a provider over a fresh in-memory database.
    pub fn in_memory() -> PersistenceResult<Self> {
        Self::with_config(":memory:", SqliteConfig::default())
    }

    /// Opens or creates a file-based database.
    pub fn open<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        Self::with_config(path, SqliteConfig::default())
    }

    /// Creates a provider with custom configuration.
    pub fn with_config<P: AsRef<Path>>(path: P, config: SqliteConfig) -> PersistenceResult<Self> {
        let is_memory = path.as_ref().to_string_lossy() == ":memory:";

        let busy_timeout = Duration::from_millis(u64::from(config.busy_timeout_ms));
        let enable_foreign_keys = config.enable_foreign_keys;
        let enable_wal = config.enable_wal && !is_memory;

        let manager = if is_memory {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(path.as_ref())
        }
        .with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            if enable_foreign_keys {
                conn.pragma_update(None, "foreign_keys", true)?;
            }
            if enable_wal {
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                    row.get::<_, String>(0)
                })?;
            }
            Ok(())
        });

        let builder = Pool::builder().connection_timeout(Duration::from_millis(
            config.connection_timeout_ms,
        ));
        let builder = if is_memory {
            builder
                .max_size(1)
                .min_idle(Some(1))
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            builder
                .max_size(config.max_connections)
                .min_idle(Some(config.min_connections))
        };
        let pool = builder.build(manager).map_err(connection_error)?;

        tracing::debug!(
            path = %path.as_ref().display(),
            is_memory,
            "sqlite connection pool created"
        );

        Ok(Self {
            pool,
            config,
            is_memory,
        })
    }

    /// Runs schema DDL (one or more `;`-separated statements).
    pub fn init_schema(&self, ddl: &str) -> PersistenceResult<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(ddl).map_err(super::query_error)?;
        tracing::info!("sqlite schema initialized");
        Ok(())
    }

    /// Get a connection from the pool.
    pub(crate) fn get_connection(&self) -> PersistenceResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(connection_error)
    }

    /// Returns whether this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        self.is_memory
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }
}

impl ContextProvider for SqliteContextProvider {
    type Context = SqliteContext;

    fn begin(&self) -> PersistenceResult<SqliteContext> {
        SqliteContext::begin(self.get_connection()?)
    }

    fn commit(&self, context: SqliteContext) -> PersistenceResult<()> {
        context.commit()
    }

    fn rollback(&self, context: SqliteContext) -> PersistenceResult<()> {
        context.rollback()
    }
}
