//! Pure table-engine stages: filtering, ordering, paging, and selection.
//!
//! Everything here is synchronous and side-effect free; the stages take the
//! cached records plus the current query knobs and derive what the table
//! shows. Wiring them together in the right order is the job of
//! [`crate::state::TableState::view`].

pub mod filter;
pub mod page;
pub mod selection;
pub mod sort;

#[allow(unused_imports)]
pub use filter::{distinct_values, filter_rows};
pub use page::{clamp_page, page_window, total_pages};
pub use selection::Selection;
#[allow(unused_imports)]
pub use sort::{compare_text, sort_rows};
