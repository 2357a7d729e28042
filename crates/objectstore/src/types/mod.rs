//! Core types shared by every layer of the object store.
//!
//! - [`Identifiable`] - the identity capability of domain objects
//! - [`Sort`], [`SortOrder`], [`SortValue`], [`Sortable`] - ordering
//! - [`MarkPageRequest`], [`MarkPage`], [`Navigation`] - mark-based pagination

mod identifiable;
mod pagination;
mod sort;

pub use identifiable::Identifiable;
pub use pagination::{MarkPage, MarkPageRequest, Navigation};
pub use sort::{Sort, SortOrder, SortValue, Sortable};
