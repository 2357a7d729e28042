//! Query execution and context lifecycle.
//!
//! A [`DataStore`] is the only component that creates and disposes execution
//! contexts. Queries and DAOs receive a context; they never open, commit or
//! roll one back themselves.
//!
//! [`TransactionalDataStore`] implements the standard lifecycle on top of a
//! [`ContextProvider`]:
//!
//! ```text
//! begin ──► query.execute(&mut context) ──► Ok  ──► commit
//!                                      └──► Err ──► rollback (original error wins)
//! ```

use crate::error::PersistenceResult;

use super::query::Query;

/// Executes queries, each inside its own execution context.
pub trait DataStore {
    /// The execution context handed to queries.
    type Context;

    /// Executes `query` inside a freshly acquired context.
    ///
    /// # Errors
    ///
    /// The error of the query itself, or a transaction error if the context
    /// could not be acquired or committed.
    fn execute<Q>(&self, query: Q) -> PersistenceResult<Q::Output>
    where
        Q: Query<Self::Context>;
}

impl<D: DataStore + ?Sized> DataStore for &D {
    type Context = D::Context;

    fn execute<Q>(&self, query: Q) -> PersistenceResult<Q::Output>
    where
        Q: Query<Self::Context>,
    {
        (**self).execute(query)
    }
}

impl<D: DataStore + ?Sized> DataStore for std::sync::Arc<D> {
    type Context = D::Context;

    fn execute<Q>(&self, query: Q) -> PersistenceResult<Q::Output>
    where
        Q: Query<Self::Context>,
    {
        (**self).execute(query)
    }
}

/// Supplies and disposes execution contexts.
///
/// Implementations must make the outcome of a context externally visible
/// exactly once: either every change made through it is committed, or none
/// is. A context dropped without `commit` or `rollback` must be rolled back.
pub trait ContextProvider: Send + Sync {
    /// The context type.
    type Context;

    /// Acquires a context and starts its transaction.
    fn begin(&self) -> PersistenceResult<Self::Context>;

    /// Commits and releases the context.
    fn commit(&self, context: Self::Context) -> PersistenceResult<()>;

    /// Rolls back and releases the context.
    fn rollback(&self, context: Self::Context) -> PersistenceResult<()>;
}

/// A data store that runs each query inside one transaction.
#[derive(Debug, Clone)]
pub struct TransactionalDataStore<P> {
    provider: P,
}

impl<P: ContextProvider> TransactionalDataStore<P> {
    /// Creates a data store over `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns the context provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: ContextProvider> DataStore for TransactionalDataStore<P> {
    type Context = P::Context;

    fn execute<Q>(&self, query: Q) -> PersistenceResult<Q::Output>
    where
        Q: Query<Self::Context>,
    {
        let mut context = self.provider.begin()?;
        tracing::debug!("context acquired");

        match query.execute(&mut context) {
            Ok(output) => {
                self.provider.commit(context)?;
                tracing::debug!("context committed");
                Ok(output)
            }
            Err(error) => {
                if let Err(rollback_error) = self.provider.rollback(context) {
                    tracing::warn!(
                        error = %error,
                        rollback_error = %rollback_error,
                        "rollback failed after query error"
                    );
                } else {
                    tracing::debug!(error = %error, "context rolled back");
                }
                Err(error)
            }
        }
    }
}
