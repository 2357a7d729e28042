//! Keyset predicates and ordering rendered as SQL.
//!
//! For sort columns `c1..cn`, id column `id` and a boundary
//! `(v1..vn, k)`, a forward seek over ascending columns renders
//!
//! ```sql
//! (c1 > ?) OR (c1 IS ? AND c2 > ?) OR ... OR (c1 IS ? AND ... AND cn IS ? AND id > ?)
//! ORDER BY c1 ASC, ..., cn ASC, id ASC
//! ```
//!
//! Descending columns and backward seeks flip the comparison and the
//! ordering. NULL sorts lowest, as SQLite orders it.

use rusqlite::types::Value;

use crate::paging::{Seek, SeekDirection};
use crate::types::{Sort, SortOrder, SortValue};

use super::table::SqlSortColumn;

/// SQL fragments for one keyset window.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KeysetClause {
    /// Boundary predicate, `None` when the seek has no boundary.
    pub predicate: Option<String>,
    /// Parameters of the predicate, in placeholder order.
    pub params: Vec<Value>,
    /// `ORDER BY` body.
    pub order_by: String,
}

pub(crate) fn sql_value(value: &SortValue) -> Value {
    match value {
        SortValue::Null => Value::Null,
        SortValue::Boolean(b) => Value::Integer(i64::from(*b)),
        SortValue::Integer(n) => Value::Integer(*n),
        SortValue::Decimal(d) => Value::Real(*d),
        SortValue::Text(s) => Value::Text(s.clone()),
    }
}

/// Renders the order of `sort` followed by `id_column`, in seek direction.
pub(crate) fn order_by<S: SqlSortColumn>(sort: &[Sort<S>], id_column: &str, direction: SeekDirection) -> String {
    let flip = |order: SortOrder| match direction {
        SeekDirection::Forward => order,
        SeekDirection::Backward => order.reverse(),
    };

    sort.iter()
        .map(|s| format!("{} {}", s.attribute.column(), flip(s.order)))
        .chain(std::iter::once(format!(
            "{} {}",
            id_column,
            flip(SortOrder::Ascending)
        )))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders `column op value` where NULL is the lowest value.
fn beyond(column: &str, greater: bool, value: Value, params: &mut Vec<Value>) -> String {
    match (value, greater) {
        (Value::Null, true) => format!("{} IS NOT NULL", column),
        (Value::Null, false) => "0".to_string(),
        (value, true) => {
            params.push(value);
            format!("{} > ?", column)
        }
        (value, false) => {
            params.push(value);
            format!("({} IS NULL OR {} < ?)", column, column)
        }
    }
}

pub(crate) fn keyset_clause<I, S>(sort: &[Sort<S>], id_column: &str, seek: &Seek<I>) -> KeysetClause
where
    I: Clone + Into<Value>,
    S: SqlSortColumn,
{
    let order_by = order_by(sort, id_column, seek.direction);
    let Some(boundary) = &seek.boundary else {
        return KeysetClause {
            predicate: None,
            params: Vec::new(),
            order_by,
        };
    };

    let forward = seek.direction == SeekDirection::Forward;
    let mut params = Vec::new();
    let mut terms = Vec::with_capacity(sort.len() + 1);

    for i in 0..=sort.len() {
        let mut parts = Vec::with_capacity(i + 1);
        for (s, value) in sort.iter().zip(boundary.values()).take(i) {
            params.push(sql_value(value));
            parts.push(format!("{} IS ?", s.attribute.column()));
        }

        if let Some(s) = sort.get(i) {
            let greater = forward == (s.order == SortOrder::Ascending);
            let value = boundary.values().get(i).map(sql_value).unwrap_or(Value::Null);
            parts.push(beyond(s.attribute.column(), greater, value, &mut params));
        } else {
            params.push(boundary.id().clone().into());
            parts.push(format!("{} {} ?", id_column, if forward { ">" } else { "<" }));
        }

        terms.push(format!("({})", parts.join(" AND ")));
    }

    KeysetClause {
        predicate: Some(terms.join(" OR ")),
        params,
        order_by,
    }
}
