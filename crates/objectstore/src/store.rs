//! Object store facade.
//!
//! [`ObjectStore`] pairs a [`DataStore`] with a DAO so that each call runs
//! as one query in its own context:
//!
//! ```ignore
//! let store = ObjectStore::new(data_store, dao);
//! let device = store.add(device)?;
//! let page = store.find_page(filter, sort, MarkPageRequest::first(20))?;
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::core::{DataStore, FilterDao, KeyValueDao, MarkPageDao};
use crate::error::PersistenceResult;
use crate::queries;
use crate::types::{Identifiable, MarkPage, MarkPageRequest, Sort};

/// Runs every DAO operation through a data store.
pub struct ObjectStore<T, DS, D> {
    data_store: DS,
    dao: D,
    _marker: PhantomData<fn() -> T>,
}

impl<T, DS, D> ObjectStore<T, DS, D>
where
    T: Identifiable,
    DS: DataStore,
{
    /// Creates an object store.
    pub fn new(data_store: DS, dao: D) -> Self {
        Self {
            data_store,
            dao,
            _marker: PhantomData,
        }
    }

    /// Returns the data store.
    pub fn data_store(&self) -> &DS {
        &self.data_store
    }

    /// Returns the DAO.
    pub fn dao(&self) -> &D {
        &self.dao
    }
}

impl<T, DS, D> ObjectStore<T, DS, D>
where
    T: Identifiable,
    DS: DataStore,
    D: KeyValueDao<T, DS::Context>,
{
    /// Stores a new object.
    pub fn add(&self, object: T) -> PersistenceResult<T> {
        self.data_store.execute(queries::add(object, &self.dao))
    }

    /// Updates the stored object with the id of `object`.
    pub fn update(&self, object: T) -> PersistenceResult<T> {
        self.data_store.execute(queries::update(object, &self.dao))
    }

    /// Deletes the object stored under `id`.
    pub fn delete(&self, id: T::Id) -> PersistenceResult<()> {
        self.data_store.execute(queries::delete::<T, _>(id, &self.dao))
    }

    /// Reads the object stored under `id`.
    pub fn get(&self, id: T::Id) -> PersistenceResult<Option<T>> {
        self.data_store.execute(queries::get::<T, _>(id, &self.dao))
    }

    /// Returns whether an object is stored under `id`.
    pub fn exist(&self, id: T::Id) -> PersistenceResult<bool> {
        self.data_store.execute(queries::exist::<T, _>(id, &self.dao))
    }

    /// Reads every stored object.
    pub fn get_all(&self) -> PersistenceResult<Vec<T>> {
        self.data_store.execute(queries::get_all::<T, _>(&self.dao))
    }

    /// Returns the number of stored objects.
    pub fn size(&self) -> PersistenceResult<u64> {
        self.data_store.execute(queries::size::<T, _>(&self.dao))
    }

    /// Deletes every stored object.
    pub fn clear(&self) -> PersistenceResult<()> {
        self.data_store.execute(queries::clear::<T, _>(&self.dao))
    }

    /// Returns every object matching `filter`, ordered by `sort`.
    pub fn find<F, S>(&self, filter: F, sort: Vec<Sort<S>>) -> PersistenceResult<Vec<T>>
    where
        D: FilterDao<T, F, S, DS::Context>,
    {
        self.data_store
            .execute(queries::find::<T, _, _, _>(filter, sort, &self.dao))
    }

    /// Returns the number of objects matching `filter`.
    pub fn count<F, S>(&self, filter: F) -> PersistenceResult<u64>
    where
        D: FilterDao<T, F, S, DS::Context>,
    {
        self.data_store
            .execute(queries::count::<T, F, S, _>(filter, &self.dao))
    }

    /// Deletes every object matching `filter`.
    pub fn delete_matching<F, S>(&self, filter: F) -> PersistenceResult<u64>
    where
        D: FilterDao<T, F, S, DS::Context>,
    {
        self.data_store
            .execute(queries::delete_matching::<T, F, S, _>(filter, &self.dao))
    }

    /// Returns the page of objects matching `filter` described by `request`.
    pub fn find_page<F, S>(
        &self,
        filter: F,
        sort: Vec<Sort<S>>,
        request: MarkPageRequest<T>,
    ) -> PersistenceResult<MarkPage<T>>
    where
        D: MarkPageDao<T, F, S, DS::Context>,
    {
        self.data_store
            .execute(queries::paged_find(filter, sort, request, &self.dao))
    }
}

impl<T, DS: fmt::Debug, D: fmt::Debug> fmt::Debug for ObjectStore<T, DS, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStore")
            .field("data_store", &self.data_store)
            .field("dao", &self.dao)
            .finish()
    }
}
