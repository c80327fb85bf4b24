/*
 * Tracks which folders are selected, independently of where they sit in the tree.
 * Any number of folders at any depth may be selected at the same time. The set is only
 * changed by explicit user actions; deleting folders prunes the ids that no longer exist.
 */
use super::folder_node::FolderId;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    // The tap toggled membership; `selected` is the new state of the row.
    Toggled { selected: bool },
    // Nothing was selected yet, so a plain tap does not start a selection.
    Ignored,
}

#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    selected: HashSet<FolderId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        SelectionSet::default()
    }

    /*
     * Inserts the folder if absent, removes it if present. Returns whether the folder is
     * selected afterwards. Calling it twice in a row restores the original set.
     */
    pub fn toggle(&mut self, id: FolderId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /*
     * Plain row-tap semantics: the first selection has to come from the explicit
     * "select" action, so a tap on an empty selection is ignored.
     */
    pub fn tap(&mut self, id: FolderId) -> TapOutcome {
        if self.selected.is_empty() {
            return TapOutcome::Ignored;
        }
        TapOutcome::Toggled {
            selected: self.toggle(id),
        }
    }

    pub fn contains(&self, id: FolderId) -> bool {
        self.selected.contains(&id)
    }

    // Returns how many of the given ids were actually selected.
    pub fn remove_all(&mut self, ids: &[FolderId]) -> usize {
        ids.iter().filter(|id| self.selected.remove(*id)).count()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    // Sorted by id for stable output.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = FolderId> {
        let mut ids: Vec<FolderId> = self.selected.iter().copied().collect();
        ids.sort();
        ids.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut selection = SelectionSet::new();
        selection.toggle(FolderId(1));
        let before: Vec<FolderId> = selection.iter().collect();

        assert!(selection.toggle(FolderId(2)));
        assert!(!selection.toggle(FolderId(2)));
        assert_eq!(selection.iter().collect::<Vec<_>>(), before);

        assert!(!selection.toggle(FolderId(1)));
        assert!(selection.toggle(FolderId(1)));
        assert_eq!(selection.iter().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_tap_on_empty_selection_is_ignored() {
        let mut selection = SelectionSet::new();
        assert_eq!(selection.tap(FolderId(1)), TapOutcome::Ignored);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_tap_toggles_once_selection_started() {
        let mut selection = SelectionSet::new();
        selection.toggle(FolderId(1));
        assert_eq!(
            selection.tap(FolderId(2)),
            TapOutcome::Toggled { selected: true }
        );
        assert_eq!(
            selection.tap(FolderId(1)),
            TapOutcome::Toggled { selected: false }
        );
        assert!(selection.contains(FolderId(2)));
        assert!(!selection.contains(FolderId(1)));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_remove_all_counts_only_selected() {
        let mut selection = SelectionSet::new();
        selection.toggle(FolderId(1));
        selection.toggle(FolderId(3));
        assert_eq!(
            selection.remove_all(&[FolderId(1), FolderId(2), FolderId(3)]),
            2
        );
        assert!(selection.is_empty());
    }

    #[test]
    fn test_iter_is_sorted() {
        let mut selection = SelectionSet::new();
        for raw in [5, 1, 3] {
            selection.toggle(FolderId(raw));
        }
        assert_eq!(
            selection.iter().collect::<Vec<_>>(),
            vec![FolderId(1), FolderId(3), FolderId(5)]
        );
    }
}
