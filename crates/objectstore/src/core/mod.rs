//! Core traits and abstractions.
//!
//! - [`Converter`] - pure mapping between representations
//! - [`UpdateStrategy`] - read/write consistency gate
//! - [`Query`] - a unit of work bound to its operands
//! - [`DataStore`] / [`ContextProvider`] - context lifecycle around a query
//! - [`KeyValueDao`], [`FilterDao`], [`MarkPageDao`] - DAO capabilities
//!
//! # Execution Model
//!
//! ```text
//! application ──► Query (operands + DAO) ──► DataStore::execute
//!                                                 │ begin context
//!                                                 ▼
//!                                      Query::execute(&mut context)
//!                                                 │
//!                                                 ▼
//!                                  DAO ──► Converter / UpdateStrategy
//!                                                 │
//!                                                 ▼
//!                                      commit / rollback context
//! ```
//!
//! # Example: Implementing a DAO
//!
//! ```
//! use std::collections::HashMap;
//!
//! use helios_objectstore::core::KeyValueDao;
//! use helios_objectstore::error::{PersistenceError, PersistenceResult};
//! use helios_objectstore::types::Identifiable;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Port {
//!     id: u16,
//!     speed: u32,
//! }
//!
//! impl Identifiable for Port {
//!     type Id = u16;
//!     fn identifier(&self) -> &u16 {
//!         &self.id
//!     }
//! }
//!
//! /// A DAO whose context is the map itself.
//! struct PortDao;
//!
//! impl KeyValueDao<Port, HashMap<u16, Port>> for PortDao {
//!     fn add(&self, port: &Port, ctx: &mut HashMap<u16, Port>) -> PersistenceResult<Port> {
//!         ctx.insert(port.id, port.clone());
//!         Ok(port.clone())
//!     }
//!
//!     fn update(&self, port: &Port, ctx: &mut HashMap<u16, Port>) -> PersistenceResult<Port> {
//!         let stored = ctx
//!             .get_mut(&port.id)
//!             .ok_or_else(|| PersistenceError::not_found(&port.id))?;
//!         *stored = port.clone();
//!         Ok(port.clone())
//!     }
//!
//!     fn delete(&self, id: &u16, ctx: &mut HashMap<u16, Port>) -> PersistenceResult<()> {
//!         ctx.remove(id).map(|_| ()).ok_or_else(|| PersistenceError::not_found(id))
//!     }
//!
//!     fn get(&self, id: &u16, ctx: &mut HashMap<u16, Port>) -> PersistenceResult<Option<Port>> {
//!         Ok(ctx.get(id).cloned())
//!     }
//!
//!     fn get_all(&self, ctx: &mut HashMap<u16, Port>) -> PersistenceResult<Vec<Port>> {
//!         Ok(ctx.values().cloned().collect())
//!     }
//!
//!     fn size(&self, ctx: &mut HashMap<u16, Port>) -> PersistenceResult<u64> {
//!         Ok(ctx.len() as u64)
//!     }
//!
//!     fn clear(&self, ctx: &mut HashMap<u16, Port>) -> PersistenceResult<()> {
//!         ctx.clear();
//!         Ok(())
//!     }
//! }
//!
//! let mut ctx = HashMap::new();
//! PortDao.add(&Port { id: 1, speed: 1000 }, &mut ctx).unwrap();
//! assert!(PortDao.exist(&1, &mut ctx).unwrap());
//! assert!(PortDao.update(&Port { id: 2, speed: 10 }, &mut ctx).unwrap_err().is_not_found());
//! ```

pub mod converter;
pub mod dao;
pub mod data_store;
pub mod query;
pub mod update_strategy;

// Re-export main types
pub use converter::Converter;
pub use dao::{FilterDao, KeyValueDao, MarkPageDao};
pub use data_store::{ContextProvider, DataStore, TransactionalDataStore};
pub use query::Query;
pub use update_strategy::{CompositeUpdateStrategy, PermissiveUpdateStrategy, UpdateStrategy};
