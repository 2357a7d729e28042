//! The unit of work executed by a [`DataStore`](super::DataStore).

use crate::error::PersistenceResult;

/// A single unit of persistence work.
///
/// A query binds every operand it needs (the object to add, the filter and
/// page request, the DAO to delegate to) when it is constructed, so that
/// [`execute`](Query::execute) only needs the execution context. This lets a
/// data store wrap any kind of operation in the same context lifecycle.
///
/// Queries are consumed by execution. Concrete queries for the standard DAO
/// operations live in [`crate::queries`]; closures taking the context are
/// queries too, which is how several DAO calls are composed into one
/// transaction:
///
/// ```
/// use helios_objectstore::core::Query;
/// use helios_objectstore::error::PersistenceResult;
///
/// let query = |log: &mut Vec<String>| -> PersistenceResult<usize> {
///     log.push("first".to_string());
///     log.push("second".to_string());
///     Ok(log.len())
/// };
///
/// let mut context = Vec::new();
/// assert_eq!(query.execute(&mut context).unwrap(), 2);
/// ```
pub trait Query<C> {
    /// The value produced by the query.
    type Output;

    /// Executes the query within `context`.
    ///
    /// # Errors
    ///
    /// Any [`PersistenceError`](crate::error::PersistenceError) raised by the
    /// DAO or the storage adapter.
    fn execute(self, context: &mut C) -> PersistenceResult<Self::Output>;
}

impl<C, R, F> Query<C> for F
where
    F: FnOnce(&mut C) -> PersistenceResult<R>,
{
    type Output = R;

    fn execute(self, context: &mut C) -> PersistenceResult<R> {
        self(context)
    }
}
