//! Mark-based (keyset) pagination engine.
//!
//! Pages are addressed by the position of a mark element inside a total
//! order: the declared sort keys followed by the element id as a final
//! tie-break. Sort keys need not be unique, the id makes the order total.
//!
//! The engine is store-agnostic. An adapter supplies one primitive,
//! [`KeysetSource::fetch_window`], returning up to `limit` rows strictly after
//! (or strictly before) a [`MarkKey`]; [`find_mark_page`] turns those windows
//! into a [`MarkPage`]:
//!
//! 1. fetch `size + 1` rows from the mark in the requested direction;
//! 2. an extra row means another page exists in that direction, and is
//!    dropped from the window;
//! 3. the opposite flag is answered by probing one row past the other edge
//!    of the window (a first page, requested without a mark, never has a
//!    previous page).
//!
//! Because every fetch seeks from a key instead of skipping an offset, rows
//! inserted or removed elsewhere never shift a window: continuing from a mark
//! neither repeats nor skips rows that existed when the mark was issued.

mod ordering;

pub use ordering::{KeysetOrdering, select_window};

use crate::error::{PersistenceResult, ValidationError};
use crate::types::{Identifiable, MarkPage, MarkPageRequest, Navigation, Sort, SortValue, Sortable};

/// Position of an element inside a keyset ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkKey<I> {
    values: Vec<SortValue>,
    id: I,
}

impl<I> MarkKey<I> {
    /// Creates a key from sort values (one per sort specification) and an id.
    pub fn new(values: Vec<SortValue>, id: I) -> Self {
        Self { values, id }
    }

    /// Computes the key of `element` under `sort`.
    pub fn of<T, S>(element: &T, sort: &[Sort<S>]) -> Self
    where
        T: Identifiable<Id = I> + Sortable<S>,
        I: Clone,
    {
        Self {
            values: sort
                .iter()
                .map(|s| element.sort_value(&s.attribute))
                .collect(),
            id: element.identifier().clone(),
        }
    }

    /// Returns the sort values.
    pub fn values(&self) -> &[SortValue] {
        &self.values
    }

    /// Returns the id.
    pub fn id(&self) -> &I {
        &self.id
    }
}

/// Direction of a window fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    /// Rows after the boundary, in forward order.
    Forward,
    /// Rows before the boundary, nearest first (reverse order).
    Backward,
}

/// Describes one window fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Seek<I> {
    /// Exclusive boundary; `None` starts at the corresponding end of the
    /// result set.
    pub boundary: Option<MarkKey<I>>,
    /// Fetch direction.
    pub direction: SeekDirection,
    /// Maximum number of rows to return.
    pub limit: usize,
}

impl<I> Seek<I> {
    /// Seeks forward from `boundary`.
    pub fn forward(boundary: Option<MarkKey<I>>, limit: usize) -> Self {
        Self {
            boundary,
            direction: SeekDirection::Forward,
            limit,
        }
    }

    /// Seeks backward from `boundary`.
    pub fn backward(boundary: Option<MarkKey<I>>, limit: usize) -> Self {
        Self {
            boundary,
            direction: SeekDirection::Backward,
            limit,
        }
    }
}

/// Range-fetch primitive supplied by a storage adapter.
pub trait KeysetSource<T: Identifiable, F, S, C> {
    /// Returns up to `seek.limit` elements matching `filter` that lie
    /// strictly after (forward) or strictly before (backward) the boundary.
    ///
    /// Forward windows are returned in the order defined by `sort` followed
    /// by id ascending; backward windows in exactly the reverse order.
    fn fetch_window(
        &self,
        filter: &F,
        sort: &[Sort<S>],
        seek: &Seek<T::Id>,
        context: &mut C,
    ) -> PersistenceResult<Vec<T>>;
}

/// Computes the page described by `request`.
///
/// # Errors
///
/// * `PersistenceError::Validation(InvalidPageSize)` - if `request.size()` is zero
/// * `PersistenceError::Validation(InvalidMark)` - if the mark has a NaN sort value
/// * any error raised by `source`
pub fn find_mark_page<T, F, S, C, K>(
    source: &K,
    filter: &F,
    sort: &[Sort<S>],
    request: MarkPageRequest<T>,
    context: &mut C,
) -> PersistenceResult<MarkPage<T>>
where
    T: Identifiable + Sortable<S>,
    K: KeysetSource<T, F, S, C> + ?Sized,
{
    let size = request.size();
    if size == 0 {
        return Err(ValidationError::InvalidPageSize { size }.into());
    }

    let mark = request.mark().map(|m| MarkKey::of(m, sort));
    if let Some(mark) = &mark
        && mark.values().iter().any(|v| matches!(v, SortValue::Decimal(d) if d.is_nan()))
    {
        // NaN has no position a store can seek from.
        return Err(ValidationError::InvalidMark {
            message: "mark has a NaN sort value".to_string(),
        }
        .into());
    }

    let (data, has_next, has_previous) = match request.navigation() {
        Navigation::Next => {
            let mut rows =
                source.fetch_window(filter, sort, &Seek::forward(mark.clone(), size.saturating_add(1)), context)?;
            let has_next = rows.len() > size;
            rows.truncate(size);

            let has_previous = match mark {
                None => false,
                Some(mark) => {
                    let boundary = rows.first().map(|first| MarkKey::of(first, sort)).unwrap_or(mark);
                    probe(source, filter, sort, Seek::backward(Some(boundary), 1), context)?
                }
            };
            (rows, has_next, has_previous)
        }
        Navigation::Previous => {
            let mut rows = source.fetch_window(
                filter,
                sort,
                &Seek::backward(mark.clone(), size.saturating_add(1)),
                context,
            )?;
            let has_previous = rows.len() > size;
            rows.truncate(size);
            rows.reverse();

            let has_next = match mark {
                None => false,
                Some(mark) => {
                    let boundary = rows.last().map(|last| MarkKey::of(last, sort)).unwrap_or(mark);
                    probe(source, filter, sort, Seek::forward(Some(boundary), 1), context)?
                }
            };
            (rows, has_next, has_previous)
        }
    };

    tracing::debug!(
        size,
        navigation = ?request.navigation(),
        returned = data.len(),
        has_next,
        has_previous,
        "computed mark page"
    );

    Ok(MarkPage::new(request, data, has_next, has_previous))
}

fn probe<T, F, S, C, K>(
    source: &K,
    filter: &F,
    sort: &[Sort<S>],
    seek: Seek<T::Id>,
    context: &mut C,
) -> PersistenceResult<bool>
where
    T: Identifiable,
    K: KeysetSource<T, F, S, C> + ?Sized,
{
    Ok(!source.fetch_window(filter, sort, &seek, context)?.is_empty())
}
