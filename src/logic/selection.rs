//! Checked-row bookkeeping, independent of what is currently visible.

use std::collections::HashSet;

/// Set of selected record ids.
///
/// Ids are tracked on their own rather than as row positions, so a selection
/// survives searches, re-sorts, and page flips; rows that scroll out of the
/// window stay selected. The set empties only through [`Selection::clear`]
/// or the header-checkbox toggle.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<String>,
}

impl Selection {
    /// Empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of one id.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_owned());
        }
    }

    /// Whether `id` is currently selected.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop every selected id.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// What: Header-checkbox behavior for the current page.
    ///
    /// Inputs:
    /// - `visible`: Ids of the rows inside the current window
    ///
    /// Output:
    /// - When the selection already equals `visible` as a set, everything is
    ///   cleared; otherwise the selection becomes exactly `visible`.
    ///
    /// Details:
    /// - Replacing rather than merging means selections gathered on other
    ///   pages are discarded by this action; per-row toggles are the way to
    ///   build a cross-page selection.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn select_all_visible(&mut self, visible: &[&str]) {
        let already_exact =
            self.ids.len() == visible.len() && visible.iter().all(|id| self.ids.contains(*id));
        if already_exact {
            self.ids.clear();
        } else {
            self.ids = visible.iter().map(|id| (*id).to_owned()).collect();
        }
    }

    /// Selected ids in sorted order, for stable delete and call batches.
    #[must_use]
    pub fn ids_sorted(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Toggling adds then removes an id
    ///
    /// - Input: Toggle "A" twice, toggle "B" once
    /// - Output: Only "B" remains selected
    fn toggle_flips_membership() {
        let mut selection = Selection::new();
        selection.toggle("A");
        selection.toggle("B");
        assert!(selection.contains("A"));
        selection.toggle("A");
        assert!(!selection.contains("A"));
        assert!(selection.contains("B"));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    /// What: Select-all on a matching selection clears, otherwise replaces
    ///
    /// - Input: Empty selection, then select-all twice over the same page
    /// - Output: First call selects the page, second call clears everything
    fn select_all_toggles() {
        let mut selection = Selection::new();
        let visible = ["A", "B", "C"];
        selection.select_all_visible(&visible);
        assert_eq!(selection.len(), 3);
        assert!(selection.contains("B"));
        selection.select_all_visible(&visible);
        assert!(selection.is_empty());
    }

    #[test]
    /// What: A same-size but different selection is replaced, not cleared
    ///
    /// - Input: Selection {A, X} and visible page [A, B]
    /// - Output: Selection becomes exactly {A, B}
    fn select_all_compares_sets_not_sizes() {
        let mut selection = Selection::new();
        selection.toggle("A");
        selection.toggle("X");
        selection.select_all_visible(&["A", "B"]);
        assert_eq!(selection.ids_sorted(), vec!["A".to_owned(), "B".to_owned()]);
    }

    #[test]
    /// What: Select-all replaces selections built on other pages
    ///
    /// - Input: Selection {P, Q} from another page, visible page [A, B]
    /// - Output: Selection becomes {A, B}; P and Q are gone
    fn select_all_discards_other_pages() {
        let mut selection = Selection::new();
        selection.toggle("P");
        selection.toggle("Q");
        selection.select_all_visible(&["A", "B"]);
        assert!(!selection.contains("P"));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    /// What: Batch ids come out sorted regardless of toggle order
    ///
    /// - Input: Ids toggled in scrambled order
    /// - Output: `ids_sorted` is lexicographically ordered
    fn ids_sorted_is_stable() {
        let mut selection = Selection::new();
        for id in ["C9", "A1", "B5"] {
            selection.toggle(id);
        }
        assert_eq!(
            selection.ids_sorted(),
            vec!["A1".to_owned(), "B5".to_owned(), "C9".to_owned()]
        );
    }
}
