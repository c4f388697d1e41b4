//! Shared state for the crewdesk table engine.
//!
//! Submodules:
//! - [`records`]: the [`Record`] trait plus the concrete entities
//! - [`table`]: per-module query/selection state and the derived view
//! - [`types`]: small value types shared across the engine

pub mod records;
pub mod table;
pub mod types;

#[allow(unused_imports)]
pub use records::{Record, Task, TaskField, TeamField, TeamMember};
#[allow(unused_imports)]
pub use table::{QueryState, TableState, TableView};
pub use types::{FacetFilter, PageSize, SortDirection};
