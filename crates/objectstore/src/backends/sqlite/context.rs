//! Transactional execution context for the SQLite adapter.

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::error::{PersistenceResult, TransactionError};

/// A pooled connection with an open transaction.
///
/// The transaction starts with `BEGIN IMMEDIATE`, so the write lock is taken
/// up front. A context dropped while still active is rolled back.
pub struct SqliteContext {
    conn: PooledConnection<SqliteConnectionManager>,
    active: bool,
}

impl std::fmt::Debug for SqliteContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteContext")
            .field("active", &self.active)
            .finish()
    }
}

impl SqliteContext {
    pub(super) fn begin(conn: PooledConnection<SqliteConnectionManager>) -> PersistenceResult<Self> {
        conn.execute_batch("BEGIN IMMEDIATE").map_err(|e| TransactionError::BeginFailed {
            reason: e.to_string(),
        })?;

        Ok(Self { conn, active: true })
    }

    /// Returns the connection running this context's transaction.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns whether the transaction is still open.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(super) fn commit(mut self) -> PersistenceResult<()> {
        if !self.active {
            return Err(TransactionError::Inactive.into());
        }
        self.conn.execute_batch("COMMIT").map_err(|e| TransactionError::CommitFailed {
            reason: e.to_string(),
        })?;
        self.active = false;
        Ok(())
    }

    pub(super) fn rollback(mut self) -> PersistenceResult<()> {
        if !self.active {
            return Err(TransactionError::Inactive.into());
        }
        self.active = false;
        self.conn.execute_batch("ROLLBACK").map_err(|e| {
            TransactionError::RollbackFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl Drop for SqliteContext {
    fn drop(&mut self) {
        if self.active {
            tracing::warn!("sqlite context dropped while active, rolling back");
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                tracing::warn!(error = %e, "rollback on drop failed");
            }
        }
    }
}
