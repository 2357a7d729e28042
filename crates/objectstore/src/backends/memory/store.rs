//! Entity primitives over a [`MemoryContext`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::entity::{EntityKeysetSource, EntityQuery, EntityStore};
use crate::error::{BackendError, PersistenceResult};
use crate::paging::{KeysetOrdering, MarkKey, Seek, select_window};
use crate::types::{Sort, SortValue};

use super::table::{MemoryContext, MemoryRecord};

const BACKEND_NAME: &str = "memory";

/// A sort attribute that can be evaluated on an in-memory record.
pub trait EntitySortKey<E> {
    /// Returns the value of this attribute for `entity`.
    fn sort_value(&self, entity: &E) -> SortValue;
}

/// Predicate selecting records of an in-memory table.
pub struct MemoryFilter<E> {
    predicate: Option<Arc<dyn Fn(&E) -> bool + Send + Sync>>,
}

impl<E> MemoryFilter<E> {
    /// A filter matching every record.
    pub fn all() -> Self {
        Self { predicate: None }
    }

    /// A filter matching the records for which `predicate` holds.
    pub fn new(predicate: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Some(Arc::new(predicate)),
        }
    }

    /// Returns whether `entity` matches.
    pub fn matches(&self, entity: &E) -> bool {
        self.predicate.as_ref().is_none_or(|p| p(entity))
    }
}

impl<E> Clone for MemoryFilter<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
        }
    }
}

impl<E> Default for MemoryFilter<E> {
    fn default() -> Self {
        Self::all()
    }
}

impl<E> fmt::Debug for MemoryFilter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFilter")
            .field("matches_all", &self.predicate.is_none())
            .finish()
    }
}

/// Entity store over [`MemoryContext`]s of `E`.
///
/// The store itself holds no rows; every call works on the context it is
/// given.
pub struct MemoryStore<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E> MemoryStore<E> {
    /// Creates the store.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for MemoryStore<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for MemoryStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MemoryStore")
    }
}

fn keyed<'a, E, S>(
    context: &'a MemoryContext<E>,
    filter: &'a MemoryFilter<E>,
    sort: &'a [Sort<S>],
) -> impl Iterator<Item = (MarkKey<E::Key>, &'a E)>
where
    E: MemoryRecord,
    S: EntitySortKey<E>,
{
    context
        .rows()
        .values()
        .filter(|entity| filter.matches(entity))
        .map(|entity| {
            let values = sort
                .iter()
                .map(|s| s.attribute.sort_value(entity))
                .collect();
            (MarkKey::new(values, entity.key()), entity)
        })
}

impl<E: MemoryRecord> EntityStore<E, MemoryContext<E>> for MemoryStore<E> {
    type Id = E::Key;

    fn persist(&self, entity: &E, context: &mut MemoryContext<E>) -> PersistenceResult<()> {
        let key = entity.key();
        if context.rows().contains_key(&key) {
            return Err(BackendError::Constraint {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("duplicate key {:?}", key),
            }
            .into());
        }
        context.put(entity.clone());
        Ok(())
    }

    fn fetch(&self, id: &E::Key, context: &mut MemoryContext<E>) -> PersistenceResult<Option<E>> {
        Ok(context.rows().get(id).cloned())
    }

    fn store(&self, entity: &E, context: &mut MemoryContext<E>) -> PersistenceResult<()> {
        context.put(entity.clone());
        Ok(())
    }

    fn remove(&self, entity: &E, context: &mut MemoryContext<E>) -> PersistenceResult<()> {
        context.delete(&entity.key());
        Ok(())
    }

    fn contains(&self, id: &E::Key, context: &mut MemoryContext<E>) -> PersistenceResult<bool> {
        Ok(context.rows().contains_key(id))
    }

    fn load_all(&self, context: &mut MemoryContext<E>) -> PersistenceResult<Vec<E>> {
        Ok(context.rows().values().cloned().collect())
    }

    fn count(&self, context: &mut MemoryContext<E>) -> PersistenceResult<u64> {
        Ok(context.rows().len() as u64)
    }

    fn remove_all(&self, context: &mut MemoryContext<E>) -> PersistenceResult<u64> {
        Ok(context.delete_where(|_| true))
    }
}

impl<E, S> EntityQuery<E, MemoryFilter<E>, S, MemoryContext<E>> for MemoryStore<E>
where
    E: MemoryRecord,
    S: EntitySortKey<E>,
{
    fn select(
        &self,
        filter: &MemoryFilter<E>,
        sort: &[Sort<S>],
        context: &mut MemoryContext<E>,
    ) -> PersistenceResult<Vec<E>> {
        let ordering = KeysetOrdering::new(sort);
        let everything = Seek::forward(None, usize::MAX);
        Ok(select_window(keyed(context, filter, sort), &ordering, &everything)
            .into_iter()
            .cloned()
            .collect())
    }

    fn count_matching(
        &self,
        filter: &MemoryFilter<E>,
        context: &mut MemoryContext<E>,
    ) -> PersistenceResult<u64> {
        Ok(context.rows().values().filter(|e| filter.matches(e)).count() as u64)
    }

    fn remove_matching(
        &self,
        filter: &MemoryFilter<E>,
        context: &mut MemoryContext<E>,
    ) -> PersistenceResult<u64> {
        Ok(context.delete_where(|e| filter.matches(e)))
    }
}

impl<E, S> EntityKeysetSource<E, MemoryFilter<E>, S, MemoryContext<E>> for MemoryStore<E>
where
    E: MemoryRecord,
    S: EntitySortKey<E>,
{
    fn fetch_entities(
        &self,
        filter: &MemoryFilter<E>,
        sort: &[Sort<S>],
        seek: &Seek<E::Key>,
        context: &mut MemoryContext<E>,
    ) -> PersistenceResult<Vec<E>> {
        let ordering = KeysetOrdering::new(sort);
        Ok(select_window(keyed(context, filter, sort), &ordering, seek)
            .into_iter()
            .cloned()
            .collect())
    }
}
