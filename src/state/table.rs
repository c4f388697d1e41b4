//! Query and selection state for one record table, plus its derived view.

use std::collections::BTreeMap;

use crate::logic::{
    Selection, clamp_page, filter_rows, page_window, sort_rows, total_pages,
};
use crate::state::records::Record;
use crate::state::types::{FacetFilter, PageSize, SortDirection};

/// The knobs a user can turn on one table: search text, facet constraints,
/// sort column and direction, and the page window.
#[derive(Debug, Clone)]
pub struct QueryState<F> {
    /// Free-text search; empty imposes nothing.
    pub search: String,
    /// Facet constraints; a missing entry means "all".
    pub facets: BTreeMap<F, FacetFilter>,
    /// Column the rows are ordered by.
    pub sort_field: F,
    /// Direction applied to `sort_field`.
    pub sort_direction: SortDirection,
    /// Current 1-based page, kept clamped to the filtered page count.
    pub page: usize,
    /// Rows per page.
    pub page_size: PageSize,
}

impl<F: Default> Default for QueryState<F> {
    fn default() -> Self {
        QueryState {
            search: String::new(),
            facets: BTreeMap::new(),
            sort_field: F::default(),
            sort_direction: SortDirection::default(),
            page: 1,
            page_size: PageSize::default(),
        }
    }
}

impl<F: Copy + Eq> QueryState<F> {
    /// Apply a header click: the same column flips direction, a new column
    /// sorts ascending.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn sort_by(&mut self, field: F) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Ascending;
        }
    }
}

/// One derived render of a table: the current window plus footer numbers.
///
/// Borrowed from the cache it was derived from; nothing here is stored back,
/// so a view can never drift out of sync with the records.
#[derive(Debug)]
pub struct TableView<'a, R> {
    /// Rows inside the current page window, in display order.
    pub rows: Vec<&'a R>,
    /// Records that survived search and facets, across all pages.
    pub filtered_count: usize,
    /// Page count for the footer; at least 1.
    pub total_pages: usize,
    /// The clamped 1-based page this window represents.
    pub page: usize,
}

/// Cached records for one module plus everything needed to derive the
/// visible window.
///
/// The visible rows are recomputed from `records` and `query` on every
/// [`TableState::view`] call. Mutators that can shrink the filtered set
/// re-clamp the page immediately, so `query.page` always points at a page
/// that exists.
#[derive(Debug, Clone)]
pub struct TableState<R: Record> {
    records: Vec<R>,
    /// Current query knobs.
    pub query: QueryState<R::Field>,
    /// Checked row ids; survives query changes.
    pub selection: Selection,
}

impl<R: Record> Default for TableState<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> TableState<R> {
    /// Empty table with default query knobs.
    #[must_use]
    pub fn new() -> Self {
        TableState {
            records: Vec::new(),
            query: QueryState::default(),
            selection: Selection::new(),
        }
    }

    /// The full cached record set, in backend order.
    #[cfg_attr(not(test), allow(dead_code))]
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Replace the cache after a fetch; the page is re-clamped, the query
    /// and selection stay as they are.
    pub fn set_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.clamp_current_page();
    }

    /// Set the free-text search and re-clamp the page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.clamp_current_page();
    }

    /// Set or clear one facet constraint and re-clamp the page.
    ///
    /// [`FacetFilter::Any`] removes the entry instead of storing a no-op.
    pub fn set_facet(&mut self, field: R::Field, filter: FacetFilter) {
        if filter.is_any() {
            self.query.facets.remove(&field);
        } else {
            self.query.facets.insert(field, filter);
        }
        self.clamp_current_page();
    }

    /// Header click on `field`; see [`QueryState::sort_by`].
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn sort_by(&mut self, field: R::Field) {
        self.query.sort_by(field);
    }

    /// Jump to a page, clamped into the valid range.
    pub fn set_page(&mut self, page: usize) {
        self.query.page = clamp_page(page, self.current_total_pages());
    }

    /// Advance one page; saturates at the last page.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn next_page(&mut self) {
        self.set_page(self.query.page.saturating_add(1));
    }

    /// Go back one page; saturates at page 1.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn prev_page(&mut self) {
        self.set_page(self.query.page.saturating_sub(1));
    }

    /// Switch the rows-per-page size; always rewinds to page 1.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.query.page_size = size;
        self.query.page = 1;
    }

    /// Ids of the rows inside the current window, in display order.
    #[cfg_attr(not(test), allow(dead_code))]
    #[must_use]
    pub fn visible_ids(&self) -> Vec<String> {
        self.view().rows.iter().map(|row| row.id().to_owned()).collect()
    }

    /// Header-checkbox toggle over the current window; see
    /// [`Selection::select_all_visible`].
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn select_all_visible(&mut self) {
        let visible = self.visible_ids();
        let refs: Vec<&str> = visible.iter().map(String::as_str).collect();
        self.selection.select_all_visible(&refs);
    }

    /// Number of records that survive the current search and facets.
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        filter_rows(&self.records, &self.query.search, &self.query.facets).len()
    }

    /// What: Derive the visible window from the cache and the query knobs.
    ///
    /// Output:
    /// - A [`TableView`] holding the filtered, sorted, paged rows plus the
    ///   footer numbers.
    ///
    /// Details:
    /// - Recomputed in full on every call: filter, then sort, then slice.
    ///   The page is clamped against the freshly computed page count, so
    ///   even a stale `query.page` renders a window that exists.
    #[must_use]
    pub fn view(&self) -> TableView<'_, R> {
        let mut rows = filter_rows(&self.records, &self.query.search, &self.query.facets);
        sort_rows(&mut rows, self.query.sort_field, self.query.sort_direction);
        let filtered_count = rows.len();
        let pages = total_pages(filtered_count, self.query.page_size.rows());
        let page = clamp_page(self.query.page, pages);
        let window = page_window(&rows, page, self.query.page_size.rows()).to_vec();
        TableView {
            rows: window,
            filtered_count,
            total_pages: pages,
            page,
        }
    }

    fn current_total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.query.page_size.rows())
    }

    fn clamp_current_page(&mut self) {
        self.query.page = clamp_page(self.query.page, self.current_total_pages());
    }
}
