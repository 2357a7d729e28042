//! Queries for the standard DAO operations.
//!
//! Each factory function binds the operands of one DAO call and returns a
//! [`Query`] that a [`DataStore`](crate::core::DataStore) can execute:
//!
//! ```ignore
//! use helios_objectstore::core::DataStore;
//! use helios_objectstore::queries;
//!
//! let stored = data_store.execute(queries::add(device, &dao))?;
//! let page = data_store.execute(queries::paged_find(filter, sort, request, &dao))?;
//! ```
//!
//! Queries borrow the DAO and own every other operand.

use std::marker::PhantomData;

use crate::core::{FilterDao, KeyValueDao, MarkPageDao, Query};
use crate::error::PersistenceResult;
use crate::types::{Identifiable, MarkPage, MarkPageRequest, Sort};

/// Adds an object.
#[derive(Debug)]
pub struct AddQuery<'a, T, D: ?Sized> {
    object: T,
    dao: &'a D,
}

/// Creates a query adding `object`.
pub fn add<T, D: ?Sized>(object: T, dao: &D) -> AddQuery<'_, T, D> {
    AddQuery { object, dao }
}

impl<T, D, C> Query<C> for AddQuery<'_, T, D>
where
    T: Identifiable,
    D: KeyValueDao<T, C> + ?Sized,
{
    type Output = T;

    fn execute(self, context: &mut C) -> PersistenceResult<T> {
        self.dao.add(&self.object, context)
    }
}

/// Updates an object.
#[derive(Debug)]
pub struct UpdateQuery<'a, T, D: ?Sized> {
    object: T,
    dao: &'a D,
}

/// Creates a query updating the stored object with the id of `object`.
pub fn update<T, D: ?Sized>(object: T, dao: &D) -> UpdateQuery<'_, T, D> {
    UpdateQuery { object, dao }
}

impl<T, D, C> Query<C> for UpdateQuery<'_, T, D>
where
    T: Identifiable,
    D: KeyValueDao<T, C> + ?Sized,
{
    type Output = T;

    fn execute(self, context: &mut C) -> PersistenceResult<T> {
        self.dao.update(&self.object, context)
    }
}

/// Deletes an object by id.
#[derive(Debug)]
pub struct DeleteQuery<'a, T: Identifiable, D: ?Sized> {
    id: T::Id,
    dao: &'a D,
}

/// Creates a query deleting the object stored under `id`.
pub fn delete<T: Identifiable, D: ?Sized>(id: T::Id, dao: &D) -> DeleteQuery<'_, T, D> {
    DeleteQuery { id, dao }
}

impl<T, D, C> Query<C> for DeleteQuery<'_, T, D>
where
    T: Identifiable,
    D: KeyValueDao<T, C> + ?Sized,
{
    type Output = ();

    fn execute(self, context: &mut C) -> PersistenceResult<()> {
        self.dao.delete(&self.id, context)
    }
}

/// Reads an object by id.
#[derive(Debug)]
pub struct GetQuery<'a, T: Identifiable, D: ?Sized> {
    id: T::Id,
    dao: &'a D,
}

/// Creates a query reading the object stored under `id`.
pub fn get<T: Identifiable, D: ?Sized>(id: T::Id, dao: &D) -> GetQuery<'_, T, D> {
    GetQuery { id, dao }
}

impl<T, D, C> Query<C> for GetQuery<'_, T, D>
where
    T: Identifiable,
    D: KeyValueDao<T, C> + ?Sized,
{
    type Output = Option<T>;

    fn execute(self, context: &mut C) -> PersistenceResult<Option<T>> {
        self.dao.get(&self.id, context)
    }
}

/// Checks whether an object exists.
#[derive(Debug)]
pub struct ExistQuery<'a, T: Identifiable, D: ?Sized> {
    id: T::Id,
    dao: &'a D,
}

/// Creates a query checking whether an object is stored under `id`.
pub fn exist<T: Identifiable, D: ?Sized>(id: T::Id, dao: &D) -> ExistQuery<'_, T, D> {
    ExistQuery { id, dao }
}

impl<T, D, C> Query<C> for ExistQuery<'_, T, D>
where
    T: Identifiable,
    D: KeyValueDao<T, C> + ?Sized,
{
    type Output = bool;

    fn execute(self, context: &mut C) -> PersistenceResult<bool> {
        self.dao.exist(&self.id, context)
    }
}

/// Reads every object.
#[derive(Debug)]
pub struct GetAllQuery<'a, T, D: ?Sized> {
    dao: &'a D,
    _marker: PhantomData<fn() -> T>,
}

/// Creates a query reading every stored object.
pub fn get_all<T, D: ?Sized>(dao: &D) -> GetAllQuery<'_, T, D> {
    GetAllQuery {
        dao,
        _marker: PhantomData,
    }
}

impl<T, D, C> Query<C> for GetAllQuery<'_, T, D>
where
    T: Identifiable,
    D: KeyValueDao<T, C> + ?Sized,
{
    type Output = Vec<T>;

    fn execute(self, context: &mut C) -> PersistenceResult<Vec<T>> {
        self.dao.get_all(context)
    }
}

/// Counts every object.
#[derive(Debug)]
pub struct SizeQuery<'a, T, D: ?Sized> {
    dao: &'a D,
    _marker: PhantomData<fn() -> T>,
}

/// Creates a query counting every stored object.
pub fn size<T, D: ?Sized>(dao: &D) -> SizeQuery<'_, T, D> {
    SizeQuery {
        dao,
        _marker: PhantomData,
    }
}

impl<T, D, C> Query<C> for SizeQuery<'_, T, D>
where
    T: Identifiable,
    D: KeyValueDao<T, C> + ?Sized,
{
    type Output = u64;

    fn execute(self, context: &mut C) -> PersistenceResult<u64> {
        self.dao.size(context)
    }
}

/// Deletes every object.
#[derive(Debug)]
pub struct ClearQuery<'a, T, D: ?Sized> {
    dao: &'a D,
    _marker: PhantomData<fn() -> T>,
}

/// Creates a query deleting every stored object.
pub fn clear<T, D: ?Sized>(dao: &D) -> ClearQuery<'_, T, D> {
    ClearQuery {
        dao,
        _marker: PhantomData,
    }
}

impl<T, D, C> Query<C> for ClearQuery<'_, T, D>
where
    T: Identifiable,
    D: KeyValueDao<T, C> + ?Sized,
{
    type Output = ();

    fn execute(self, context: &mut C) -> PersistenceResult<()> {
        self.dao.clear(context)
    }
}

/// Finds objects matching a filter.
#[derive(Debug)]
pub struct FindQuery<'a, T, F, S, D: ?Sized> {
    filter: F,
    sort: Vec<Sort<S>>,
    dao: &'a D,
    _marker: PhantomData<fn() -> T>,
}

/// Creates a query finding every object matching `filter`, ordered by `sort`.
pub fn find<T, F, S, D: ?Sized>(filter: F, sort: Vec<Sort<S>>, dao: &D) -> FindQuery<'_, T, F, S, D> {
    FindQuery {
        filter,
        sort,
        dao,
        _marker: PhantomData,
    }
}

impl<T, F, S, D, C> Query<C> for FindQuery<'_, T, F, S, D>
where
    T: Identifiable,
    D: FilterDao<T, F, S, C> + ?Sized,
{
    type Output = Vec<T>;

    fn execute(self, context: &mut C) -> PersistenceResult<Vec<T>> {
        self.dao.find(&self.filter, &self.sort, context)
    }
}

/// Counts objects matching a filter.
#[derive(Debug)]
pub struct CountQuery<'a, T, F, S, D: ?Sized> {
    filter: F,
    dao: &'a D,
    _marker: PhantomData<fn() -> (T, S)>,
}

/// Creates a query counting the objects matching `filter`.
pub fn count<T, F, S, D: ?Sized>(filter: F, dao: &D) -> CountQuery<'_, T, F, S, D> {
    CountQuery {
        filter,
        dao,
        _marker: PhantomData,
    }
}

impl<T, F, S, D, C> Query<C> for CountQuery<'_, T, F, S, D>
where
    T: Identifiable,
    D: FilterDao<T, F, S, C> + ?Sized,
{
    type Output = u64;

    fn execute(self, context: &mut C) -> PersistenceResult<u64> {
        self.dao.count(&self.filter, context)
    }
}

/// Deletes objects matching a filter.
#[derive(Debug)]
pub struct DeleteMatchingQuery<'a, T, F, S, D: ?Sized> {
    filter: F,
    dao: &'a D,
    _marker: PhantomData<fn() -> (T, S)>,
}

/// Creates a query deleting every object matching `filter`.
pub fn delete_matching<T, F, S, D: ?Sized>(filter: F, dao: &D) -> DeleteMatchingQuery<'_, T, F, S, D> {
    DeleteMatchingQuery {
        filter,
        dao,
        _marker: PhantomData,
    }
}

impl<T, F, S, D, C> Query<C> for DeleteMatchingQuery<'_, T, F, S, D>
where
    T: Identifiable,
    D: FilterDao<T, F, S, C> + ?Sized,
{
    type Output = u64;

    fn execute(self, context: &mut C) -> PersistenceResult<u64> {
        self.dao.delete_matching(&self.filter, context)
    }
}

/// Finds one page of objects matching a filter.
#[derive(Debug)]
pub struct PagedFindQuery<'a, T, F, S, D: ?Sized> {
    filter: F,
    sort: Vec<Sort<S>>,
    request: MarkPageRequest<T>,
    dao: &'a D,
}

/// Creates a query finding the page of objects described by `request`.
pub fn paged_find<T, F, S, D: ?Sized>(
    filter: F,
    sort: Vec<Sort<S>>,
    request: MarkPageRequest<T>,
    dao: &D,
) -> PagedFindQuery<'_, T, F, S, D> {
    PagedFindQuery {
        filter,
        sort,
        request,
        dao,
    }
}

impl<T, F, S, D, C> Query<C> for PagedFindQuery<'_, T, F, S, D>
where
    T: Identifiable,
    D: MarkPageDao<T, F, S, C> + ?Sized,
{
    type Output = MarkPage<T>;

    fn execute(self, context: &mut C) -> PersistenceResult<MarkPage<T>> {
        self.dao
            .find_page(&self.filter, &self.sort, self.request, context)
    }
}
