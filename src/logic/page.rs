//! Paging math for the table footer and window slicing.

/// What: Number of pages needed for `count` rows at `page_size` rows per
/// page.
///
/// Inputs:
/// - `count`: Filtered row count
/// - `page_size`: Rows per page; must be positive
///
/// Output:
/// - `ceil(count / page_size)`, but never less than 1 so an empty table
///   still reads "1 of 1 Pages".
#[must_use]
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

/// Clamp a 1-based page index into `[1, total_pages]`.
#[must_use]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// What: Slice the window for one page out of the ordered rows.
///
/// Inputs:
/// - `rows`: Filtered and sorted rows
/// - `page`: 1-based page index
/// - `page_size`: Rows per page
///
/// Output:
/// - The sub-slice `[(page-1)*size .. page*size)`, shortened at the end of
///   the data; empty when `page` lies beyond it.
pub fn page_window<'s, 'a, R>(rows: &'s [&'a R], page: usize, page_size: usize) -> &'s [&'a R] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}
