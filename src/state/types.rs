//! Core value types used by the crewdesk table engine.

/// Direction applied by the sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest key first; the default for a freshly chosen column.
    #[default]
    Ascending,
    /// Largest key first.
    Descending,
}

impl SortDirection {
    /// Return the opposite direction.
    #[cfg_attr(not(test), allow(dead_code))]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Rows-per-page choices offered by the table footer.
///
/// The window size is always one of these; arbitrary sizes are rejected at
/// the parsing boundary rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// 10 rows per page (startup default).
    #[default]
    Ten,
    /// 25 rows per page.
    TwentyFive,
    /// 50 rows per page.
    Fifty,
    /// 100 rows per page.
    Hundred,
}

impl PageSize {
    /// Every selectable size, smallest first.
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    /// Number of rows this size puts in one window.
    #[must_use]
    pub fn rows(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }

    /// Parse a size from its row count.
    ///
    /// Inputs: `rows` as given on the command line or in `settings.conf`.
    ///
    /// Output: `Some(PageSize)` for a supported count; `None` otherwise.
    #[must_use]
    pub fn from_rows(rows: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.rows() == rows)
    }
}

/// Constraint applied to one categorical column.
///
/// Mirrors the filter dropdowns next to the search box: either the "All …"
/// entry or one concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FacetFilter {
    /// No constraint.
    #[default]
    Any,
    /// Keep only records whose column value equals this string exactly.
    Exact(String),
}

impl FacetFilter {
    /// Whether a record's column `value` passes this constraint.
    ///
    /// A missing column value never matches an [`FacetFilter::Exact`]
    /// constraint.
    #[must_use]
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            FacetFilter::Any => true,
            FacetFilter::Exact(wanted) => value == Some(wanted.as_str()),
        }
    }

    /// Whether this constraint filters anything at all.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, FacetFilter::Any)
    }
}
