//! Selection tracker
//!
//! Selection is keyed by record id, so it is unaffected by filtering, sorting
//! or paging. Only explicit calls change it.

use std::collections::BTreeSet;

/// State of the "select all" header checkbox over a set of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    Checked,
    Indeterminate,
    Unchecked,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: BTreeSet<u32>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row; returns the new state
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn set(&mut self, id: u32, on: bool) {
        if on {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
    }

    /// Select or deselect every id in `ids`; ids outside it are untouched
    pub fn toggle_all(&mut self, ids: impl IntoIterator<Item = u32>, on: bool) {
        for id in ids {
            self.set(id, on);
        }
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected ids in ascending order
    pub fn selected_ids(&self) -> Vec<u32> {
        self.selected.iter().copied().collect()
    }

    /// How many of `ids` are selected
    pub fn count_in(&self, ids: &[u32]) -> usize {
        ids.iter().filter(|id| self.selected.contains(id)).count()
    }

    /// Header checkbox state over `ids`
    pub fn select_all_state(&self, ids: &[u32]) -> SelectAllState {
        let count = self.count_in(ids);
        if count == 0 {
            SelectAllState::Unchecked
        } else if count == ids.len() {
            SelectAllState::Checked
        } else {
            SelectAllState::Indeterminate
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
