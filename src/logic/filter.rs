//! Search and facet filtering over a module's cached records.

use std::collections::BTreeMap;

use crate::state::{FacetFilter, Record};

/// What: Reduce `records` to those matching the free-text `search` and every
/// facet constraint in `facets`.
///
/// Inputs:
/// - `records`: Full cached record set for the module
/// - `search`: Free text; matched case-insensitively as a substring of any
///   searchable column
/// - `facets`: Column-to-constraint map; missing entries and
///   [`FacetFilter::Any`] impose nothing
///
/// Output:
/// - References to the matching records, in their original order (a
///   subsequence of `records`).
///
/// Details:
/// - Conditions are conjunctive: a record must match the search and every
///   exact facet. With an empty search and no exact facets the full set
///   comes back unchanged.
pub fn filter_rows<'a, R: Record>(
    records: &'a [R],
    search: &str,
    facets: &BTreeMap<R::Field, FacetFilter>,
) -> Vec<&'a R> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| matches_search(*record, &needle))
        .filter(|record| matches_facets(*record, facets))
        .collect()
}

/// Whether any searchable column contains the lower-cased `needle`.
///
/// An empty needle matches everything; a record with no searchable values
/// matches nothing else.
fn matches_search<R: Record>(record: &R, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    R::SEARCH_FIELDS.iter().any(|field| {
        record
            .field_text(*field)
            .is_some_and(|value| value.to_lowercase().contains(needle))
    })
}

fn matches_facets<R: Record>(record: &R, facets: &BTreeMap<R::Field, FacetFilter>) -> bool {
    facets
        .iter()
        .all(|(field, filter)| filter.matches(record.field_text(*field)))
}

/// What: Collect the distinct values of one facet column.
///
/// Inputs:
/// - `records`: Full cached record set
/// - `field`: The facet column to enumerate
///
/// Output:
/// - Sorted, de-duplicated values; records without a value contribute
///   nothing.
///
/// Details:
/// - Feeds the filter dropdowns, which prepend their own "All …" entry.
#[cfg_attr(not(test), allow(dead_code))]
pub fn distinct_values<R: Record>(records: &[R], field: R::Field) -> Vec<String> {
    let mut values: Vec<String> = records
        .iter()
        .filter_map(|record| record.field_text(field))
        .map(str::to_owned)
        .collect();
    values.sort();
    values.dedup();
    values
}
