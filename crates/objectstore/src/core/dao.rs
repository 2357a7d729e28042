//! DAO capability traits.
//!
//! A DAO translates operations on domain objects into operations on the
//! underlying store. Capabilities are split into small orthogonal traits so
//! each adapter implements exactly what its store supports:
//!
//! ```text
//! KeyValueDao   add / update / delete / get / exist / get_all / size / clear
//! FilterDao     find / count / delete_matching
//! MarkPageDao   find_page
//! ```
//!
//! Every operation receives the execution context of the query it runs in.
//! DAOs are stateless (or synchronized by the store they wrap), so a single
//! instance is shared by all concurrent executions.

use crate::error::PersistenceResult;
use crate::types::{Identifiable, MarkPage, MarkPageRequest, Sort};

/// Key-value access to identifiable objects.
pub trait KeyValueDao<T: Identifiable, C> {
    /// Stores a new object and returns it as read back from the store.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::Backend` - if the store rejects the write (for
    ///   example, a duplicate id)
    fn add(&self, object: &T, context: &mut C) -> PersistenceResult<T>;

    /// Applies `object` onto the stored object with the same id.
    ///
    /// The stored state is fetched fresh on every call, so validation always
    /// sees the current persisted state.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::NotFound` - if nothing is stored under the id
    /// * `PersistenceError::Validation` - if the update strategy rejects it
    fn update(&self, object: &T, context: &mut C) -> PersistenceResult<T>;

    /// Deletes the object stored under `id`.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::NotFound` - if nothing is stored under the id
    fn delete(&self, id: &T::Id, context: &mut C) -> PersistenceResult<()>;

    /// Reads the object stored under `id`.
    ///
    /// Returns `None` if nothing is stored under the id; a missing object is
    /// not an error here.
    fn get(&self, id: &T::Id, context: &mut C) -> PersistenceResult<Option<T>>;

    /// Returns whether an object is stored under `id`.
    fn exist(&self, id: &T::Id, context: &mut C) -> PersistenceResult<bool> {
        Ok(self.get(id, context)?.is_some())
    }

    /// Reads every stored object.
    fn get_all(&self, context: &mut C) -> PersistenceResult<Vec<T>>;

    /// Returns the number of stored objects.
    fn size(&self, context: &mut C) -> PersistenceResult<u64>;

    /// Deletes every stored object.
    fn clear(&self, context: &mut C) -> PersistenceResult<()>;
}

/// Filtered access to identifiable objects.
///
/// `F` is the filter type and `S` the sort attribute type understood by the
/// implementation.
pub trait FilterDao<T: Identifiable, F, S, C> {
    /// Returns every object matching `filter`, ordered by `sort` and then by
    /// id.
    fn find(&self, filter: &F, sort: &[Sort<S>], context: &mut C) -> PersistenceResult<Vec<T>>;

    /// Returns the number of objects matching `filter`.
    fn count(&self, filter: &F, context: &mut C) -> PersistenceResult<u64>;

    /// Deletes every object matching `filter` and returns how many were
    /// deleted.
    fn delete_matching(&self, filter: &F, context: &mut C) -> PersistenceResult<u64>;
}

/// Mark-based paged access to identifiable objects.
pub trait MarkPageDao<T: Identifiable, F, S, C> {
    /// Returns the page of objects matching `filter` described by `request`.
    ///
    /// An empty page (not an error) is returned when nothing matches.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::Validation(InvalidPageSize)` - if the request
    ///   size is zero
    fn find_page(
        &self,
        filter: &F,
        sort: &[Sort<S>],
        request: MarkPageRequest<T>,
        context: &mut C,
    ) -> PersistenceResult<MarkPage<T>>;
}
