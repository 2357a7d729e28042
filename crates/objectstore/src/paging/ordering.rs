//! In-process keyset ordering for adapters that sort in memory.

use std::cmp::Ordering;

use crate::types::{Sort, SortOrder};

use super::{MarkKey, Seek, SeekDirection};

/// Composite order over [`MarkKey`]s: each sort value in its declared
/// direction, then the id ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetOrdering {
    orders: Vec<SortOrder>,
}

impl KeysetOrdering {
    /// Creates the ordering for `sort`.
    pub fn new<S>(sort: &[Sort<S>]) -> Self {
        Self {
            orders: sort.iter().map(|s| s.order).collect(),
        }
    }

    /// Compares two keys in forward order.
    pub fn compare<I: Ord>(&self, a: &MarkKey<I>, b: &MarkKey<I>) -> Ordering {
        self.orders
            .iter()
            .zip(a.values().iter().zip(b.values()))
            .map(|(order, (x, y))| order.apply(x.compare(y)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.id().cmp(b.id()))
    }

    /// Returns whether `key` lies strictly beyond the seek boundary in the
    /// seek direction.
    pub fn is_beyond<I: Ord>(&self, key: &MarkKey<I>, seek: &Seek<I>) -> bool {
        let Some(boundary) = &seek.boundary else {
            return true;
        };
        match seek.direction {
            SeekDirection::Forward => self.compare(key, boundary).is_gt(),
            SeekDirection::Backward => self.compare(key, boundary).is_lt(),
        }
    }
}

/// Selects the window described by `seek` from keyed rows.
///
/// Rows beyond the boundary are sorted in seek order (forward order, or its
/// reverse for backward seeks) and truncated to `seek.limit`.
pub fn select_window<I, X>(
    rows: impl IntoIterator<Item = (MarkKey<I>, X)>,
    ordering: &KeysetOrdering,
    seek: &Seek<I>,
) -> Vec<X>
where
    I: Ord,
{
    let mut candidates: Vec<(MarkKey<I>, X)> = rows
        .into_iter()
        .filter(|(key, _)| ordering.is_beyond(key, seek))
        .collect();

    candidates.sort_by(|(a, _), (b, _)| match seek.direction {
        SeekDirection::Forward => ordering.compare(a, b),
        SeekDirection::Backward => ordering.compare(b, a),
    });

    candidates
        .into_iter()
        .take(seek.limit)
        .map(|(_, row)| row)
        .collect()
}
