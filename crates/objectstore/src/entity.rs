//! Entity-backed reference DAO.
//!
//! [`EntityDao`] implements the DAO capabilities for any store that can
//! persist entities, by wiring together three collaborators:
//!
//! - an [`EntityStore`] providing entity CRUD primitives (plus, optionally,
//!   [`EntityQuery`] for filtered access and [`EntityKeysetSource`] for
//!   paging);
//! - an [`EntityMapping`] translating between entities and domain objects;
//! - an optional [`UpdateStrategy`] gating reads and writes.
//!
//! The domain object is what the application sees; the entity, whose
//! attributes are native storage types, never leaves the persistence layer.
//! A change in column layout therefore never leaks into the domain model.
//!
//! # Id Consistency
//!
//! Every conversion from entity to object checks that the object's
//! identifier equals the entity's id. A mismatch means the mapping is broken,
//! so it panics instead of returning an error.
//!
//! # Missing Update Strategy
//!
//! Without an update strategy every read and write is accepted.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::{Converter, FilterDao, KeyValueDao, MarkPageDao, UpdateStrategy};
use crate::error::{PersistenceError, PersistenceResult};
use crate::paging::{KeysetSource, Seek, find_mark_page};
use crate::types::{Identifiable, MarkPage, MarkPageRequest, Sort, Sortable};

/// Entity CRUD primitives of a storage adapter.
pub trait EntityStore<E, C> {
    /// Entity id type.
    type Id;

    /// Inserts a new entity.
    fn persist(&self, entity: &E, context: &mut C) -> PersistenceResult<()>;

    /// Loads the entity with `id`.
    fn fetch(&self, id: &Self::Id, context: &mut C) -> PersistenceResult<Option<E>>;

    /// Writes back an existing entity.
    fn store(&self, entity: &E, context: &mut C) -> PersistenceResult<()>;

    /// Deletes an entity.
    fn remove(&self, entity: &E, context: &mut C) -> PersistenceResult<()>;

    /// Returns whether an entity with `id` exists.
    fn contains(&self, id: &Self::Id, context: &mut C) -> PersistenceResult<bool>;

    /// Loads every entity.
    fn load_all(&self, context: &mut C) -> PersistenceResult<Vec<E>>;

    /// Counts every entity.
    fn count(&self, context: &mut C) -> PersistenceResult<u64>;

    /// Deletes every entity and returns how many were deleted.
    fn remove_all(&self, context: &mut C) -> PersistenceResult<u64>;
}

/// Filtered entity access.
pub trait EntityQuery<E, F, S, C>: EntityStore<E, C> {
    /// Loads entities matching `filter`, ordered by `sort` then id.
    fn select(&self, filter: &F, sort: &[Sort<S>], context: &mut C) -> PersistenceResult<Vec<E>>;

    /// Counts entities matching `filter`.
    fn count_matching(&self, filter: &F, context: &mut C) -> PersistenceResult<u64>;

    /// Deletes entities matching `filter` and returns how many were deleted.
    fn remove_matching(&self, filter: &F, context: &mut C) -> PersistenceResult<u64>;
}

/// Ordered range fetch over entities, the primitive behind paging.
///
/// Same contract as [`KeysetSource::fetch_window`], over entities.
pub trait EntityKeysetSource<E, F, S, C>: EntityStore<E, C> {
    /// Loads the entity window described by `seek`.
    fn fetch_entities(
        &self,
        filter: &F,
        sort: &[Sort<S>],
        seek: &Seek<Self::Id>,
        context: &mut C,
    ) -> PersistenceResult<Vec<E>>;
}

/// Translation between an entity and its domain object.
///
/// [`Converter::convert`] turns an entity into its domain object. The
/// mapping holds no state.
pub trait EntityMapping<E, T: Identifiable>: Converter<E, T> {
    /// Returns the id of `entity`.
    fn id_of(&self, entity: &E) -> T::Id;

    /// Creates a new entity holding the data of `object`.
    fn create(&self, object: &T) -> E;

    /// Applies the data of `source` onto `target` in place.
    fn conform(&self, target: &mut E, source: &T);
}

/// Reference DAO over an entity store.
pub struct EntityDao<E, T, O, M> {
    store: O,
    mapping: M,
    update_strategy: Option<Arc<dyn UpdateStrategy<E, T>>>,
    _marker: PhantomData<fn(E) -> T>,
}

impl<E, T, O, M> EntityDao<E, T, O, M>
where
    T: Identifiable,
    M: EntityMapping<E, T>,
{
    /// Creates a DAO without an update strategy.
    pub fn new(store: O, mapping: M) -> Self {
        Self {
            store,
            mapping,
            update_strategy: None,
            _marker: PhantomData,
        }
    }

    /// Sets the update strategy.
    pub fn with_update_strategy<U>(mut self, strategy: U) -> Self
    where
        U: UpdateStrategy<E, T> + 'static,
    {
        self.update_strategy = Some(Arc::new(strategy));
        self
    }

    /// Sets a shared update strategy.
    pub fn with_shared_update_strategy(mut self, strategy: Arc<dyn UpdateStrategy<E, T>>) -> Self {
        self.update_strategy = Some(strategy);
        self
    }

    /// Returns the entity store.
    pub fn store(&self) -> &O {
        &self.store
    }

    /// Returns the mapping.
    pub fn mapping(&self) -> &M {
        &self.mapping
    }

    /// Returns the update strategy, if any.
    pub fn update_strategy(&self) -> Option<&Arc<dyn UpdateStrategy<E, T>>> {
        self.update_strategy.as_ref()
    }

    /// Converts an entity into its domain object.
    ///
    /// # Panics
    ///
    /// If the converted object's identifier differs from the entity's id.
    ///
    /// # Errors
    ///
    /// * `PersistenceError::Validation` - if the update strategy rejects the read
    pub fn convert(&self, entity: &E) -> PersistenceResult<T> {
        let object = self.mapping.convert(entity);
        let id = self.mapping.id_of(entity);
        assert!(
            &id == object.identifier(),
            "invalid id: source={:?}, target={:?}",
            id,
            object.identifier()
        );

        if let Some(strategy) = &self.update_strategy {
            strategy.validate_read(entity, &object)?;
        }
        Ok(object)
    }

    fn convert_all(&self, entities: &[E]) -> PersistenceResult<Vec<T>> {
        entities.iter().map(|e| self.convert(e)).collect()
    }
}

impl<E, T, O, M> fmt::Debug for EntityDao<E, T, O, M>
where
    O: fmt::Debug,
    M: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDao")
            .field("store", &self.store)
            .field("mapping", &self.mapping)
            .field("has_update_strategy", &self.update_strategy.is_some())
            .finish()
    }
}

impl<E, T, O, M, C> KeyValueDao<T, C> for EntityDao<E, T, O, M>
where
    T: Identifiable,
    O: EntityStore<E, C, Id = T::Id>,
    M: EntityMapping<E, T>,
{
    fn add(&self, object: &T, context: &mut C) -> PersistenceResult<T> {
        let entity = self.mapping.create(object);
        self.store.persist(&entity, context)?;
        self.convert(&entity)
    }

    fn update(&self, object: &T, context: &mut C) -> PersistenceResult<T> {
        let id = object.identifier();
        let Some(mut entity) = self.store.fetch(id, context)? else {
            return Err(PersistenceError::not_found(id));
        };

        if let Some(strategy) = &self.update_strategy {
            strategy.validate_write(&entity, object)?;
        }

        self.mapping.conform(&mut entity, object);
        self.store.store(&entity, context)?;
        self.convert(&entity)
    }

    fn delete(&self, id: &T::Id, context: &mut C) -> PersistenceResult<()> {
        match self.store.fetch(id, context)? {
            Some(entity) => self.store.remove(&entity, context),
            None => Err(PersistenceError::not_found(id)),
        }
    }

    fn get(&self, id: &T::Id, context: &mut C) -> PersistenceResult<Option<T>> {
        self.store
            .fetch(id, context)?
            .map(|entity| self.convert(&entity))
            .transpose()
    }

    fn exist(&self, id: &T::Id, context: &mut C) -> PersistenceResult<bool> {
        self.store.contains(id, context)
    }

    fn get_all(&self, context: &mut C) -> PersistenceResult<Vec<T>> {
        let entities = self.store.load_all(context)?;
        self.convert_all(&entities)
    }

    fn size(&self, context: &mut C) -> PersistenceResult<u64> {
        self.store.count(context)
    }

    fn clear(&self, context: &mut C) -> PersistenceResult<()> {
        let removed = self.store.remove_all(context)?;
        tracing::debug!(removed, "cleared entity store");
        Ok(())
    }
}

impl<E, T, O, M, F, S, C> FilterDao<T, F, S, C> for EntityDao<E, T, O, M>
where
    T: Identifiable,
    O: EntityQuery<E, F, S, C, Id = T::Id>,
    M: EntityMapping<E, T>,
{
    fn find(&self, filter: &F, sort: &[Sort<S>], context: &mut C) -> PersistenceResult<Vec<T>> {
        let entities = self.store.select(filter, sort, context)?;
        self.convert_all(&entities)
    }

    fn count(&self, filter: &F, context: &mut C) -> PersistenceResult<u64> {
        self.store.count_matching(filter, context)
    }

    fn delete_matching(&self, filter: &F, context: &mut C) -> PersistenceResult<u64> {
        self.store.remove_matching(filter, context)
    }
}

impl<E, T, O, M, F, S, C> KeysetSource<T, F, S, C> for EntityDao<E, T, O, M>
where
    T: Identifiable,
    O: EntityKeysetSource<E, F, S, C, Id = T::Id>,
    M: EntityMapping<E, T>,
{
    fn fetch_window(
        &self,
        filter: &F,
        sort: &[Sort<S>],
        seek: &Seek<T::Id>,
        context: &mut C,
    ) -> PersistenceResult<Vec<T>> {
        let entities = self.store.fetch_entities(filter, sort, seek, context)?;
        self.convert_all(&entities)
    }
}

impl<E, T, O, M, F, S, C> MarkPageDao<T, F, S, C> for EntityDao<E, T, O, M>
where
    T: Identifiable + Sortable<S>,
    O: EntityKeysetSource<E, F, S, C, Id = T::Id>,
    M: EntityMapping<E, T>,
{
    fn find_page(
        &self,
        filter: &F,
        sort: &[Sort<S>],
        request: MarkPageRequest<T>,
        context: &mut C,
    ) -> PersistenceResult<MarkPage<T>> {
        find_mark_page(self, filter, sort, request, context)
    }
}
