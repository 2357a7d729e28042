//! Entity primitives over one SQLite table.

use std::fmt;
use std::marker::PhantomData;

use rusqlite::types::Value;
use rusqlite::{OptionalExtension, Row, params_from_iter};

use crate::entity::{EntityKeysetSource, EntityQuery, EntityStore};
use crate::error::PersistenceResult;
use crate::paging::Seek;
use crate::types::Sort;

use super::context::SqliteContext;
use super::keyset::{keyset_clause, order_by};
use super::query_error;

/// An entity stored as one row of a SQLite table.
///
/// Rows are read with the id column first, followed by [`COLUMNS`] in
/// declaration order; [`from_row`] must read them in that order.
///
/// [`COLUMNS`]: SqliteEntity::COLUMNS
/// [`from_row`]: SqliteEntity::from_row
pub trait SqliteEntity: Sized {
    /// Id type, bound as a statement parameter.
    type Id: Clone + Into<Value>;

    /// Table name.
    const TABLE: &'static str;

    /// Primary key column.
    const ID_COLUMN: &'static str;

    /// Every other column.
    const COLUMNS: &'static [&'static str];

    /// Returns the id of this entity.
    fn id(&self) -> Self::Id;

    /// Reads an entity from a row (id at index 0, then `COLUMNS`).
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Returns the values of `COLUMNS`, in order.
    fn to_values(&self) -> Vec<Value>;
}

/// A sort attribute backed by a column.
pub trait SqlSortColumn {
    /// Column name (or SQL expression) to order by.
    fn column(&self) -> &str;
}

/// A `WHERE` condition with anonymous `?` parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlFilter {
    clause: Option<String>,
    params: Vec<Value>,
}

impl SqlFilter {
    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches rows satisfying `clause`, binding `params` to its `?`s.
    pub fn new(clause: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            clause: Some(clause.into()),
            params,
        }
    }

    /// Returns the condition, if any.
    pub fn clause(&self) -> Option<&str> {
        self.clause.as_deref()
    }

    /// Returns the parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Entity store over the table of `E`.
pub struct SqliteTable<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E> SqliteTable<E> {
    /// Creates the store.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E> Default for SqliteTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for SqliteTable<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: SqliteEntity> fmt::Debug for SqliteTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteTable").field("table", &E::TABLE).finish()
    }
}

impl<E: SqliteEntity> SqliteTable<E> {
    fn select_list() -> String {
        std::iter::once(E::ID_COLUMN)
            .chain(E::COLUMNS.iter().copied())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn query(context: &SqliteContext, sql: &str, params: Vec<Value>) -> PersistenceResult<Vec<E>> {
        tracing::trace!(sql, "sqlite select");
        let mut stmt = context.connection().prepare(sql).map_err(query_error)?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| E::from_row(row))
            .map_err(query_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(query_error)
    }

    fn execute(context: &SqliteContext, sql: &str, params: Vec<Value>) -> PersistenceResult<u64> {
        tracing::trace!(sql, "sqlite execute");
        let changed = context
            .connection()
            .execute(sql, params_from_iter(params))
            .map_err(query_error)?;
        Ok(changed as u64)
    }

    fn where_clause(filter: &SqlFilter) -> String {
        filter
            .clause()
            .map(|c| format!(" WHERE ({})", c))
            .unwrap_or_default()
    }
}

impl<E: SqliteEntity> EntityStore<E, SqliteContext> for SqliteTable<E> {
    type Id = E::Id;

    fn persist(&self, entity: &E, context: &mut SqliteContext) -> PersistenceResult<()> {
        let placeholders = vec!["?"; E::COLUMNS.len() + 1].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            Self::select_list(),
            placeholders
        );
        let mut params: Vec<Value> = vec![entity.id().into()];
        params.extend(entity.to_values());
        Self::execute(context, &sql, params).map(|_| ())
    }

    fn fetch(&self, id: &E::Id, context: &mut SqliteContext) -> PersistenceResult<Option<E>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            Self::select_list(),
            E::TABLE,
            E::ID_COLUMN
        );
        let id: Value = id.clone().into();
        context
            .connection()
            .query_row(&sql, [id], |row| E::from_row(row))
            .optional()
            .map_err(query_error)
    }

    fn store(&self, entity: &E, context: &mut SqliteContext) -> PersistenceResult<()> {
        let assignments = E::COLUMNS
            .iter()
            .map(|c| format!("{} = ?", c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            E::TABLE,
            assignments,
            E::ID_COLUMN
        );
        let mut params = entity.to_values();
        params.push(entity.id().into());
        Self::execute(context, &sql, params).map(|_| ())
    }

    fn remove(&self, entity: &E, context: &mut SqliteContext) -> PersistenceResult<()> {
        let sql = format!("DELETE FROM {} WHERE {} = ?", E::TABLE, E::ID_COLUMN);
        Self::execute(context, &sql, vec![entity.id().into()]).map(|_| ())
    }

    fn contains(&self, id: &E::Id, context: &mut SqliteContext) -> PersistenceResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
            E::TABLE,
            E::ID_COLUMN
        );
        let id: Value = id.clone().into();
        context
            .connection()
            .query_row(&sql, [id], |row| row.get(0))
            .map_err(query_error)
    }

    fn load_all(&self, context: &mut SqliteContext) -> PersistenceResult<Vec<E>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            Self::select_list(),
            E::TABLE,
            E::ID_COLUMN
        );
        Self::query(context, &sql, Vec::new())
    }

    fn count(&self, context: &mut SqliteContext) -> PersistenceResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
        let n: i64 = context
            .connection()
            .query_row(&sql, [], |row| row.get(0))
            .map_err(query_error)?;
        Ok(n as u64)
    }

    fn remove_all(&self, context: &mut SqliteContext) -> PersistenceResult<u64> {
        Self::execute(context, &format!("DELETE FROM {}", E::TABLE), Vec::new())
    }
}

impl<E, S> EntityQuery<E, SqlFilter, S, SqliteContext> for SqliteTable<E>
where
    E: SqliteEntity,
    S: SqlSortColumn,
{
    fn select(
        &self,
        filter: &SqlFilter,
        sort: &[Sort<S>],
        context: &mut SqliteContext,
    ) -> PersistenceResult<Vec<E>> {
        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY {}",
            Self::select_list(),
            E::TABLE,
            Self::where_clause(filter),
            order_by(sort, E::ID_COLUMN, crate::paging::SeekDirection::Forward)
        );
        Self::query(context, &sql, filter.params().to_vec())
    }

    fn count_matching(&self, filter: &SqlFilter, context: &mut SqliteContext) -> PersistenceResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}{}", E::TABLE, Self::where_clause(filter));
        let n: i64 = context
            .connection()
            .query_row(&sql, params_from_iter(filter.params()), |row| row.get(0))
            .map_err(query_error)?;
        Ok(n as u64)
    }

    fn remove_matching(&self, filter: &SqlFilter, context: &mut SqliteContext) -> PersistenceResult<u64> {
        let sql = format!("DELETE FROM {}{}", E::TABLE, Self::where_clause(filter));
        Self::execute(context, &sql, filter.params().to_vec())
    }
}

impl<E, S> EntityKeysetSource<E, SqlFilter, S, SqliteContext> for SqliteTable<E>
where
    E: SqliteEntity,
    S: SqlSortColumn,
{
    fn fetch_entities(
        &self,
        filter: &SqlFilter,
        sort: &[Sort<S>],
        seek: &Seek<E::Id>,
        context: &mut SqliteContext,
    ) -> PersistenceResult<Vec<E>> {
        let keyset = keyset_clause(sort, E::ID_COLUMN, seek);

        let conditions: Vec<String> = filter
            .clause()
            .map(|c| format!("({})", c))
            .into_iter()
            .chain(keyset.predicate.map(|p| format!("({})", p)))
            .collect();
        let where_sql = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let limit = i64::try_from(seek.limit).unwrap_or(-1);

        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY {} LIMIT {}",
            Self::select_list(),
            E::TABLE,
            where_sql,
            keyset.order_by,
            limit
        );
        let mut params = filter.params().to_vec();
        params.extend(keyset.params);
        Self::query(context, &sql, params)
    }
}
