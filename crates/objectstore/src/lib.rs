//! Helios Object Store
//!
//! This crate provides a storage-agnostic persistence layer for identifiable
//! domain objects. Application code talks to DAOs in terms of domain objects;
//! the DAOs translate to and from storage entities, and a data store runs
//! every operation inside its own transactional context.
//!
//! # Features
//!
//! - **DAO capabilities**: key-value access, filtered finds, mark-based paging
//! - **Queries**: every operation is a value bound to its operands, executed
//!   by a [`DataStore`](core::DataStore)
//! - **Update strategies**: pluggable read/write consistency checks
//! - **Keyset pagination**: stable next/previous pages keyed by the last
//!   element seen, never by offset
//! - **Adapters**: in-memory and SQLite (feature `sqlite`, default)
//!
//! # Architecture
//!
//! - [`types`] - Identifiable objects, sort specifications, mark pages
//! - [`error`] - Error types for all operations
//! - [`core`] - Converter, update strategy, query, data store and DAO traits
//! - [`queries`] - Query values for each DAO operation
//! - [`store`] - Facade running DAO operations through a data store
//! - [`paging`] - The mark-page algorithm over keyset windows
//! - [`entity`] - Reference DAO over entity stores
//! - [`backends`] - Storage adapters
//!
//! # Quick Start
//!
//! ```
//! use helios_objectstore::types::{MarkPageRequest, Navigation};
//!
//! // First page of 20 elements
//! let request = MarkPageRequest::<u32>::first(20);
//! assert_eq!(request.size(), 20);
//! assert_eq!(request.navigation(), Navigation::Next);
//! assert!(request.mark().is_none());
//! ```
//!
//! See [`backends::memory`] for a complete object store over the in-memory
//! adapter.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod backends;
pub mod core;
pub mod entity;
pub mod error;
pub mod paging;
pub mod queries;
pub mod store;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{PersistenceError, PersistenceResult};
pub use store::ObjectStore;
pub use types::{Identifiable, MarkPage, MarkPageRequest, Sort, SortOrder};

// Re-export core traits
pub use core::{
    ContextProvider, Converter, DataStore, FilterDao, KeyValueDao, MarkPageDao, Query,
    TransactionalDataStore, UpdateStrategy,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
