//! Storage adapter implementations.
//!
//! Each adapter supplies a [`ContextProvider`](crate::core::ContextProvider)
//! and an entity store implementing the primitives of
//! [`crate::entity`], so [`EntityDao`](crate::entity::EntityDao) works on top
//! of it unchanged.
//!
//! # Available Backends
//!
//! | Backend | Feature | Filter | Sort attribute |
//! |---------|---------|--------|----------------|
//! | Memory | (always) | `MemoryFilter<E>` | `EntitySortKey<E>` |
//! | SQLite | `sqlite` | `SqlFilter` | `SqlSortColumn` |

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;
