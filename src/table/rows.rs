//! Row sources.
//!
//! The renderer only needs random access by index. [`PagedRows`] is the
//! append-only implementation fed by page fetches.

use std::ops::Range;

use tracing::debug;

/// Random-access view over an ordered set of rows.
///
/// Once `index < len()`, `at(index)` must keep returning the same row.
pub trait RowSource {
    type Row;

    /// Total number of rows currently available.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row at `index`, `None` past the end.
    fn at(&self, index: usize) -> Option<&Self::Row>;
}

impl<R> RowSource for Vec<R> {
    type Row = R;

    fn len(&self) -> usize {
        <[R]>::len(self)
    }

    fn at(&self, index: usize) -> Option<&R> {
        self.get(index)
    }
}

/// Append-only rows, grown one page at a time.
#[derive(Debug, Clone)]
pub struct PagedRows<R> {
    rows: Vec<R>,
    /// Pages appended so far, including empty ones.
    pages: usize,
}

impl<R> Default for PagedRows<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> PagedRows<R> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            pages: 0,
        }
    }

    /// Appends a whole page. All of its rows become visible at once.
    ///
    /// Returns the index range the page occupies.
    pub fn append_page(&mut self, page: u32, rows: Vec<R>) -> Range<usize> {
        let start = self.rows.len();
        self.rows.extend(rows);
        let range = start..self.rows.len();
        debug!(page, rows = range.len(), total = self.rows.len(), "page appended");
        self.pages += 1;
        range
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }

    pub fn as_slice(&self) -> &[R] {
        &self.rows
    }
}

impl<R> RowSource for PagedRows<R> {
    type Row = R;

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn at(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }
}
