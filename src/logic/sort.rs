//! Column ordering for the results table.

use std::cmp::Ordering;

use crate::state::{Record, SortDirection};

/// What: Order `rows` by one column, in place.
///
/// Inputs:
/// - `rows`: Filtered rows, as produced by the filter stage
/// - `field`: Column whose text values form the sort key
/// - `direction`: Ascending or descending
///
/// Output:
/// - `rows` reordered; nothing is added or removed.
///
/// Details:
/// - A missing value sorts as the empty string, so undated or sparsely
///   filled records gather at the ascending front.
/// - The underlying sort is stable and the key comparison deterministic, so
///   sorting an already sorted slice changes nothing.
pub fn sort_rows<R: Record>(rows: &mut [&R], field: R::Field, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let left = a.field_text(field).unwrap_or_default();
        let right = b.field_text(field).unwrap_or_default();
        let ordering = compare_text(left, right);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Case-folded text comparison with a raw tiebreak.
///
/// The tiebreak keeps keys that differ only by case in one deterministic
/// order instead of leaving them to their incidental cache positions.
#[must_use]
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
