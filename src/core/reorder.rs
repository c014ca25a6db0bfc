//! Reorder controller - drag-to-reorder over the row store's base order
//!
//! A drag is a start → move × N → end gesture. Only the end commits a
//! mutation; moves just track which row is under the pointer. The controller
//! knows nothing about pointers or gestures, only record ids.
//!
//! Reordering writes the base order, which an active sort immediately
//! overrides, so the configured [`ReorderPolicy`] decides what a drag does
//! while the table is sorted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::query::SortState;
use crate::core::store::RowStore;

/// What happens when a drag starts while a sort is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReorderPolicy {
    /// Refuse to start the drag; the handle is disabled while sorted
    #[default]
    DisableWhileSorted,
    /// Clear the sort so the base order becomes visible, then drag
    ClearSort,
}

impl std::fmt::Display for ReorderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReorderPolicy::DisableWhileSorted => write!(f, "disable-while-sorted"),
            ReorderPolicy::ClearSort => write!(f, "clear-sort"),
        }
    }
}

impl std::str::FromStr for ReorderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disable-while-sorted" | "disable" => Ok(ReorderPolicy::DisableWhileSorted),
            "clear-sort" | "clear" => Ok(ReorderPolicy::ClearSort),
            _ => Err(format!(
                "Invalid reorder policy: {}. Use disable-while-sorted or clear-sort",
                s
            )),
        }
    }
}

/// Result of trying to start a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStart {
    Started,
    /// Started after clearing the active sort
    StartedClearedSort,
    /// The row is not in the store
    UnknownRow,
    /// A sort is active and the policy disables dragging
    DisabledBySort,
}

impl DragStart {
    pub fn is_started(&self) -> bool {
        matches!(self, DragStart::Started | DragStart::StartedClearedSort)
    }
}

impl std::fmt::Display for DragStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            DragStart::Started => "drag started",
            DragStart::StartedClearedSort => "sort cleared to show the base order",
            DragStart::UnknownRow => "row is not in the table",
            DragStart::DisabledBySort => {
                "reordering is disabled while the table is sorted (unsort first)"
            }
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragPhase {
    #[default]
    Idle,
    Dragging { dragged: u32, over: Option<u32> },
}

/// Move `dragged` into `target`'s slot in the base order
///
/// Same id or an absent id is a no-op. Returns whether the store changed.
pub fn on_drag_end(store: &mut RowStore, dragged: u32, target: u32) -> bool {
    if dragged == target {
        return false;
    }
    let Some(target_index) = store.position(target) else {
        debug!(dragged, target, "drop target not in store");
        return false;
    };
    store.reorder(dragged, target_index)
}

/// Tracks an in-flight drag gesture
#[derive(Debug, Clone, Default)]
pub struct ReorderController {
    policy: ReorderPolicy,
    phase: DragPhase,
}

impl ReorderController {
    pub fn new(policy: ReorderPolicy) -> Self {
        Self {
            policy,
            phase: DragPhase::Idle,
        }
    }

    pub fn policy(&self) -> ReorderPolicy {
        self.policy
    }

    /// Whether the drag handle is usable under the current sort
    pub fn can_drag(&self, sort: &SortState) -> bool {
        !sort.is_active() || self.policy == ReorderPolicy::ClearSort
    }

    /// Begin dragging a row
    pub fn drag_start(&mut self, id: u32, store: &RowStore, sort: &mut SortState) -> DragStart {
        if !store.contains(id) {
            return DragStart::UnknownRow;
        }
        let outcome = if !sort.is_active() {
            DragStart::Started
        } else {
            match self.policy {
                ReorderPolicy::DisableWhileSorted => {
                    debug!(id, "drag refused while sorted");
                    return DragStart::DisabledBySort;
                }
                ReorderPolicy::ClearSort => {
                    sort.clear();
                    DragStart::StartedClearedSort
                }
            }
        };
        self.phase = DragPhase::Dragging {
            dragged: id,
            over: None,
        };
        outcome
    }

    /// Pointer moved over another row (visual only)
    pub fn drag_move(&mut self, over: Option<u32>) {
        if let DragPhase::Dragging { over: current, .. } = &mut self.phase {
            *current = over;
        }
    }

    /// Drop: commit the move if the pointer is over a row
    ///
    /// A sort that became active during the drag hides the base order, so the
    /// drop is discarded instead of committed.
    pub fn drag_end(&mut self, store: &mut RowStore, sort: &SortState) -> bool {
        match std::mem::take(&mut self.phase) {
            DragPhase::Dragging { dragged, .. } if sort.is_active() => {
                debug!(dragged, "drop discarded: table sorted during drag");
                false
            }
            DragPhase::Dragging {
                dragged,
                over: Some(target),
            } => on_drag_end(store, dragged, target),
            _ => false,
        }
    }

    /// Sort state changed; an active sort ends any drag in progress
    pub fn sort_changed(&mut self, sort: &SortState) {
        if sort.is_active() && self.is_dragging() {
            debug!(dragged = ?self.dragged(), "drag cancelled by sort");
            self.phase = DragPhase::Idle;
        }
    }

    /// Abandon the drag without changing anything
    pub fn drag_cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Row being dragged
    pub fn dragged(&self) -> Option<u32> {
        match self.phase {
            DragPhase::Dragging { dragged, .. } => Some(dragged),
            DragPhase::Idle => None,
        }
    }

    /// Row currently under the pointer
    pub fn over(&self) -> Option<u32> {
        match self.phase {
            DragPhase::Dragging { over, .. } => over,
            DragPhase::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::columns::ColumnId;
    use crate::core::query::SortDirection;
    use crate::entities::Record;

    fn store() -> RowStore {
        RowStore::from_records(
            [1, 2, 3, 4].map(|id| Record::new(id, ["A", "B", "C", "D"][id as usize - 1])),
        )
        .unwrap()
    }

    #[test]
    fn test_drag_end_takes_target_slot() {
        let mut s = store();
        assert!(on_drag_end(&mut s, 1, 3));
        assert_eq!(s.ids(), vec![2, 3, 1, 4]);

        // Dragging upward lands before the target
        assert!(on_drag_end(&mut s, 4, 2));
        assert_eq!(s.ids(), vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_drag_end_noops() {
        let mut s = store();
        assert!(!on_drag_end(&mut s, 2, 2));
        assert!(!on_drag_end(&mut s, 9, 2));
        assert!(!on_drag_end(&mut s, 2, 9));
        assert_eq!(s.ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_drag_move_never_mutates() {
        let mut s = store();
        let mut sort = SortState::new();
        let mut c = ReorderController::default();

        assert_eq!(c.drag_start(1, &s, &mut sort), DragStart::Started);
        c.drag_move(Some(2));
        c.drag_move(Some(4));
        c.drag_move(Some(3));
        assert_eq!(s.ids(), vec![1, 2, 3, 4]);
        assert_eq!(c.over(), Some(3));

        assert!(c.drag_end(&mut s, &sort));
        assert_eq!(s.ids(), vec![2, 3, 1, 4]);
        assert!(!c.is_dragging());
    }

    #[test]
    fn test_drop_outside_rows_is_noop() {
        let mut s = store();
        let mut sort = SortState::new();
        let mut c = ReorderController::default();
        c.drag_start(2, &s, &mut sort);
        c.drag_move(Some(4));
        c.drag_move(None);
        assert!(!c.drag_end(&mut s, &sort));
        assert_eq!(s.ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_cancel() {
        let mut s = store();
        let mut sort = SortState::new();
        let mut c = ReorderController::default();
        c.drag_start(2, &s, &mut sort);
        c.drag_move(Some(4));
        c.drag_cancel();
        assert!(!c.drag_end(&mut s, &sort));
        assert_eq!(s.ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_policy_disable_while_sorted() {
        let s = store();
        let mut sort = SortState::by(ColumnId::Name, SortDirection::Desc);
        let mut c = ReorderController::new(ReorderPolicy::DisableWhileSorted);
        assert!(!c.can_drag(&sort));
        assert_eq!(c.drag_start(1, &s, &mut sort), DragStart::DisabledBySort);
        assert!(!c.is_dragging());
        assert!(sort.is_active());
    }

    #[test]
    fn test_policy_clear_sort() {
        let s = store();
        let mut sort = SortState::by(ColumnId::Name, SortDirection::Desc);
        let mut c = ReorderController::new(ReorderPolicy::ClearSort);
        assert!(c.can_drag(&sort));
        assert_eq!(c.drag_start(1, &s, &mut sort), DragStart::StartedClearedSort);
        assert!(c.is_dragging());
        assert!(!sort.is_active());
    }

    #[test]
    fn test_unknown_row() {
        let s = store();
        let mut sort = SortState::new();
        let mut c = ReorderController::default();
        assert_eq!(c.drag_start(42, &s, &mut sort), DragStart::UnknownRow);
        assert!(!c.is_dragging());
    }

    #[test]
    fn test_drop_after_sort_is_discarded() {
        let mut s = store();
        let mut sort = SortState::new();
        let mut c = ReorderController::default();
        c.drag_start(1, &s, &mut sort);
        c.drag_move(Some(3));

        sort.set(ColumnId::Name, SortDirection::Desc);
        assert!(!c.drag_end(&mut s, &sort));
        assert_eq!(s.ids(), vec![1, 2, 3, 4]);
        assert!(!c.is_dragging());
    }

    #[test]
    fn test_sort_changed_cancels_drag() {
        let s = store();
        let mut sort = SortState::new();
        let mut c = ReorderController::new(ReorderPolicy::ClearSort);
        c.drag_start(2, &s, &mut sort);

        c.sort_changed(&sort);
        assert!(c.is_dragging());

        sort.set(ColumnId::Name, SortDirection::Asc);
        c.sort_changed(&sort);
        assert!(!c.is_dragging());
    }

    #[test]
    fn test_drag_start_display() {
        assert_eq!(
            DragStart::DisabledBySort.to_string(),
            "reordering is disabled while the table is sorted (unsort first)"
        );
        assert_eq!(DragStart::UnknownRow.to_string(), "row is not in the table");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("clear-sort".parse::<ReorderPolicy>().unwrap(), ReorderPolicy::ClearSort);
        assert_eq!(
            "disable".parse::<ReorderPolicy>().unwrap(),
            ReorderPolicy::DisableWhileSorted
        );
        assert!("shuffle".parse::<ReorderPolicy>().is_err());
    }
}
