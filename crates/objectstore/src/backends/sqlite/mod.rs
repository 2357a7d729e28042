//! SQLite storage adapter.
//!
//! Supports in-memory databases (great for testing) and file-based databases.
//! Each query runs in a [`SqliteContext`]: a pooled connection holding a
//! `BEGIN IMMEDIATE` transaction that the data store commits or rolls back.
//!
//! # Example
//!
//! ```
//! use helios_objectstore::backends::sqlite::{SqliteContextProvider, SqliteEntity, SqliteTable};
//! use helios_objectstore::core::{ContextProvider, TransactionalDataStore};
//! use helios_objectstore::entity::EntityStore;
//! use rusqlite::types::Value;
//!
//! #[derive(Debug, PartialEq)]
//! struct CounterRow {
//!     id: i64,
//!     hits: i64,
//! }
//!
//! impl SqliteEntity for CounterRow {
//!     type Id = i64;
//!     const TABLE: &'static str = "counters";
//!     const ID_COLUMN: &'static str = "id";
//!     const COLUMNS: &'static [&'static str] = &["hits"];
//!
//!     fn id(&self) -> i64 {
//!         self.id
//!     }
//!     fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
//!         Ok(CounterRow { id: row.get(0)?, hits: row.get(1)? })
//!     }
//!     fn to_values(&self) -> Vec<Value> {
//!         vec![Value::Integer(self.hits)]
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = SqliteContextProvider::in_memory()?;
//! provider.init_schema("CREATE TABLE counters (id INTEGER PRIMARY KEY, hits INTEGER NOT NULL)")?;
//!
//! let table = SqliteTable::<CounterRow>::new();
//! let mut ctx = provider.begin()?;
//! table.persist(&CounterRow { id: 1, hits: 0 }, &mut ctx)?;
//! provider.commit(ctx)?;
//!
//! let data_store = TransactionalDataStore::new(provider);
//! # let _ = data_store;
//! # Ok(())
//! # }
//! ```
//!
//! # Keyset Paging
//!
//! Paged finds translate each window fetch into a keyset predicate plus
//! `ORDER BY ... LIMIT`, so a page costs one indexed range scan no matter
//! how deep it is. Index the sort columns together with the id column.

mod backend;
mod context;
mod keyset;
mod table;

pub use backend::{SqliteConfig, SqliteContextProvider};
pub use context::SqliteContext;
pub use table::{SqlFilter, SqlSortColumn, SqliteEntity, SqliteTable};

use rusqlite::ErrorCode;

use crate::error::{BackendError, PersistenceError};

const BACKEND_NAME: &str = "sqlite";

/// Maps a statement failure, keeping constraint violations and storage
/// faults distinct.
fn query_error(e: rusqlite::Error) -> PersistenceError {
    let backend_name = BACKEND_NAME.to_string();
    let error = match e.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => BackendError::Constraint {
            backend_name,
            message: e.to_string(),
        },
        Some(
            ErrorCode::DatabaseCorrupt
            | ErrorCode::NotADatabase
            | ErrorCode::SystemIoFailure
            | ErrorCode::OutOfMemory,
        ) => BackendError::Internal {
            backend_name,
            message: e.to_string(),
            source: Some(Box::new(e)),
        },
        _ => match e {
            rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..) => BackendError::Serialization {
                message: e.to_string(),
            },
            _ => BackendError::Query {
                backend_name,
                message: e.to_string(),
            },
        },
    };
    PersistenceError::Backend(error)
}
