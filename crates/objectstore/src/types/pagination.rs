//! Mark-based pagination types.
//!
//! A page is addressed by a *mark*: an element returned by a previous page,
//! not a row offset. Fetching "the page after element X" stays correct while
//! rows are inserted or deleted elsewhere in the result set, which offsets
//! cannot guarantee.
//!
//! ```
//! use helios_objectstore::types::{MarkPage, MarkPageRequest, Navigation};
//!
//! let first = MarkPageRequest::<u32>::first(2);
//! assert!(first.mark().is_none());
//!
//! // A page as an adapter would return it.
//! let page = MarkPage::new(first, vec![1, 2], true, false);
//! let next = page.next_page_request().unwrap();
//! assert_eq!(next.mark(), Some(&2));
//! assert_eq!(next.navigation(), Navigation::Next);
//! assert!(page.previous_page_request().is_none());
//! ```

use serde::{Deserialize, Serialize};

/// Direction to page in, relative to the mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Navigation {
    /// Elements after the mark.
    #[default]
    Next,
    /// Elements before the mark.
    Previous,
}

/// A request for one page of elements.
///
/// Without a mark, [`Navigation::Next`] requests the first page and
/// [`Navigation::Previous`] requests the last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkPageRequest<T> {
    size: usize,
    mark: Option<T>,
    navigation: Navigation,
}

impl<T> MarkPageRequest<T> {
    /// Creates a request.
    ///
    /// A `size` of zero is accepted here and rejected when the request is
    /// executed.
    pub fn new(size: usize, mark: Option<T>, navigation: Navigation) -> Self {
        Self {
            size,
            mark,
            navigation,
        }
    }

    /// Requests the first page.
    pub fn first(size: usize) -> Self {
        Self::new(size, None, Navigation::Next)
    }

    /// Requests the last page.
    pub fn last(size: usize) -> Self {
        Self::new(size, None, Navigation::Previous)
    }

    /// Requests the page following `mark`.
    pub fn next(mark: T, size: usize) -> Self {
        Self::new(size, Some(mark), Navigation::Next)
    }

    /// Requests the page preceding `mark`.
    pub fn previous(mark: T, size: usize) -> Self {
        Self::new(size, Some(mark), Navigation::Previous)
    }

    /// Returns the maximum number of elements in the page.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the mark, if any.
    pub fn mark(&self) -> Option<&T> {
        self.mark.as_ref()
    }

    /// Returns the navigation direction.
    pub fn navigation(&self) -> Navigation {
        self.navigation
    }

    /// Maps the mark to a different type.
    pub fn map<U, F>(self, f: F) -> MarkPageRequest<U>
    where
        F: FnOnce(T) -> U,
    {
        MarkPageRequest {
            size: self.size,
            mark: self.mark.map(f),
            navigation: self.navigation,
        }
    }
}

/// One window of an ordered result set.
///
/// `data` is always in the forward order of the query, regardless of the
/// navigation direction of the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkPage<T> {
    request: MarkPageRequest<T>,
    data: Vec<T>,
    has_next: bool,
    has_previous: bool,
}

impl<T> MarkPage<T> {
    /// Creates a page.
    pub fn new(
        request: MarkPageRequest<T>,
        data: Vec<T>,
        has_next: bool,
        has_previous: bool,
    ) -> Self {
        Self {
            request,
            data,
            has_next,
            has_previous,
        }
    }

    /// Creates a page with no elements and no neighbours.
    pub fn empty(request: MarkPageRequest<T>) -> Self {
        Self::new(request, Vec::new(), false, false)
    }

    /// Returns the request this page answers.
    pub fn request(&self) -> &MarkPageRequest<T> {
        &self.request
    }

    /// Returns the elements of this page.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the page and returns its elements.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Returns true if elements exist after this page.
    pub fn has_next(&self) -> bool {
        self.has_next
    }

    /// Returns true if elements exist before this page.
    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Returns true if this page has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of elements in this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Maps the elements (and the request mark) to a different type.
    pub fn map<U, F>(self, mut f: F) -> MarkPage<U>
    where
        F: FnMut(T) -> U,
    {
        MarkPage {
            request: self.request.map(&mut f),
            data: self.data.into_iter().map(f).collect(),
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

impl<T: Clone> MarkPage<T> {
    /// Returns the request for the following page, if one exists.
    ///
    /// The mark is the last element of this page.
    pub fn next_page_request(&self) -> Option<MarkPageRequest<T>> {
        if !self.has_next {
            return None;
        }
        let mark = self.data.last().or(self.request.mark())?;
        Some(MarkPageRequest::next(mark.clone(), self.request.size))
    }

    /// Returns the request for the preceding page, if one exists.
    ///
    /// The mark is the first element of this page.
    pub fn previous_page_request(&self) -> Option<MarkPageRequest<T>> {
        if !self.has_previous {
            return None;
        }
        let mark = self.data.first().or(self.request.mark())?;
        Some(MarkPageRequest::previous(mark.clone(), self.request.size))
    }
}
