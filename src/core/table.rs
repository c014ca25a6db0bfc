//! Data table - one row store plus its filter, sort, selection, pagination,
//! column visibility and drag state
//!
//! Every mutating call recomputes the visible row order and re-clamps the page
//! index before returning, so a [`TableView`] never observes a partially
//! applied change.

use tracing::{debug, trace};

use crate::core::columns::{ColumnId, ColumnVisibility};
use crate::core::pagination::{Pagination, PaginationError, DEFAULT_PAGE_SIZE};
use crate::core::query::{apply_indices, FilterState, SortDirection, SortState};
use crate::core::reorder::{DragStart, ReorderController, ReorderPolicy};
use crate::core::selection::{SelectAllState, SelectionTracker};
use crate::core::store::{RowStore, StoreError};
use crate::entities::Record;

/// Construction options for a [`DataTable`]
#[derive(Debug, Clone, Copy)]
pub struct TableOptions {
    pub page_size: usize,
    pub reorder_policy: ReorderPolicy,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            reorder_policy: ReorderPolicy::default(),
        }
    }
}

/// Snapshot of what the table shows right now
#[derive(Debug)]
pub struct TableView<'a> {
    /// Rows on the current page, in display order
    pub rows: Vec<&'a Record>,
    /// Visible columns in display order
    pub columns: Vec<ColumnId>,
    /// Rows in the store
    pub total_count: usize,
    /// Rows passing the filter
    pub filtered_count: usize,
    /// Selected rows among the filtered rows
    pub selected_in_filter: usize,
    /// Selected rows overall
    pub selected_total: usize,
    /// Zero-based page index
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub can_previous: bool,
    pub can_next: bool,
    /// Header checkbox state over the filtered rows
    pub select_all: SelectAllState,
    /// Whether drag handles are usable
    pub drag_enabled: bool,
}

impl TableView<'_> {
    /// Footer text, e.g. "2 of 14 row(s) selected."
    pub fn selection_label(&self) -> String {
        format!(
            "{} of {} row(s) selected.",
            self.selected_in_filter, self.filtered_count
        )
    }

    /// Pager text, e.g. "Page 1 of 3"
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.page_count)
    }
}

#[derive(Debug, Clone)]
pub struct DataTable {
    store: RowStore,
    filter: FilterState,
    sort: SortState,
    selection: SelectionTracker,
    pagination: Pagination,
    columns: ColumnVisibility,
    reorder: ReorderController,
    /// Store indices of the filtered rows in display order
    visible: Vec<usize>,
}

impl DataTable {
    pub fn new(store: RowStore, options: TableOptions) -> Result<Self, PaginationError> {
        let mut table = Self {
            store,
            filter: FilterState::new(),
            sort: SortState::new(),
            selection: SelectionTracker::new(),
            pagination: Pagination::new(options.page_size)?,
            columns: ColumnVisibility::new(),
            reorder: ReorderController::new(options.reorder_policy),
            visible: Vec::new(),
        };
        table.refresh();
        Ok(table)
    }

    /// Table over `records` with default options
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self, StoreError> {
        let store = RowStore::from_records(records)?;
        let mut table = Self {
            store,
            filter: FilterState::new(),
            sort: SortState::new(),
            selection: SelectionTracker::new(),
            pagination: Pagination::default(),
            columns: ColumnVisibility::new(),
            reorder: ReorderController::default(),
            visible: Vec::new(),
        };
        table.refresh();
        Ok(table)
    }

    fn refresh(&mut self) {
        self.visible = apply_indices(self.store.snapshot(), &self.filter, &self.sort);
        self.pagination.clamp(self.visible.len());
        trace!(
            visible = self.visible.len(),
            page = self.pagination.page_index(),
            "table recomputed"
        );
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn columns(&self) -> &ColumnVisibility {
        &self.columns
    }

    pub fn reorder(&self) -> &ReorderController {
        &self.reorder
    }

    /// Filtered rows in display order (all pages)
    pub fn filtered_rows(&self) -> Vec<&Record> {
        let rows = self.store.snapshot();
        self.visible.iter().map(|&i| &rows[i]).collect()
    }

    /// Ids of the filtered rows in display order (all pages)
    pub fn filtered_ids(&self) -> Vec<u32> {
        let rows = self.store.snapshot();
        self.visible.iter().map(|&i| rows[i].id).collect()
    }

    /// Ids on the current page
    pub fn page_ids(&self) -> Vec<u32> {
        let rows = self.store.snapshot();
        self.pagination
            .window(&self.visible)
            .iter()
            .map(|&i| rows[i].id)
            .collect()
    }

    /// What is on screen now
    pub fn view(&self) -> TableView<'_> {
        let rows = self.store.snapshot();
        let filtered_ids = self.filtered_ids();
        TableView {
            rows: self
                .pagination
                .window(&self.visible)
                .iter()
                .map(|&i| &rows[i])
                .collect(),
            columns: self.columns.visible_columns(),
            total_count: self.store.len(),
            filtered_count: self.visible.len(),
            selected_in_filter: self.selection.count_in(&filtered_ids),
            selected_total: self.selection.selected_count(),
            page_index: self.pagination.page_index(),
            page_count: self.pagination.page_count(),
            page_size: self.pagination.page_size(),
            can_previous: self.pagination.can_previous(),
            can_next: self.pagination.can_next(),
            select_all: self.selection.select_all_state(&filtered_ids),
            drag_enabled: self.reorder.can_drag(&self.sort),
        }
    }

    // ---------------------------------------------------------------------
    // Row store
    // ---------------------------------------------------------------------

    /// Add a record; duplicates are rejected and leave the table unchanged
    pub fn insert(&mut self, record: Record) -> Result<(), StoreError> {
        self.store.insert(record)?;
        self.refresh();
        Ok(())
    }

    /// Remove a record; its selection goes with it
    pub fn remove(&mut self, id: u32) -> Option<Record> {
        let removed = self.store.remove(id)?;
        self.selection.set(id, false);
        self.refresh();
        Some(removed)
    }

    // ---------------------------------------------------------------------
    // Filtering and sorting
    // ---------------------------------------------------------------------

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.set_query(query);
        self.refresh();
    }

    pub fn set_column_filter<I, S>(&mut self, column: ColumnId, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let changed = self.filter.set_column_filter(column, values);
        self.refresh();
        changed
    }

    pub fn clear_column_filter(&mut self, column: ColumnId) {
        self.filter.clear_column_filter(column);
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.refresh();
    }

    /// Sort by a single column, replacing other keys
    pub fn sort_by(&mut self, column: ColumnId, direction: SortDirection) -> bool {
        let changed = self.sort.set(column, direction);
        self.reorder.sort_changed(&self.sort);
        self.refresh();
        changed
    }

    /// Add or update a tie-break key
    pub fn then_sort_by(&mut self, column: ColumnId, direction: SortDirection) -> bool {
        let changed = self.sort.push(column, direction);
        self.reorder.sort_changed(&self.sort);
        self.refresh();
        changed
    }

    /// Header-click sort cycle
    pub fn toggle_sort(&mut self, column: ColumnId) -> bool {
        let changed = self.sort.toggle(column);
        self.reorder.sort_changed(&self.sort);
        self.refresh();
        changed
    }

    pub fn clear_sort(&mut self) {
        self.sort.clear();
        self.refresh();
    }

    // ---------------------------------------------------------------------
    // Pagination
    // ---------------------------------------------------------------------

    pub fn set_page_index(&mut self, requested: isize) {
        self.pagination.set_page_index(requested);
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), PaginationError> {
        self.pagination.set_page_size(page_size)
    }

    pub fn first_page(&mut self) {
        self.pagination.first();
    }

    pub fn previous_page(&mut self) {
        self.pagination.previous();
    }

    pub fn next_page(&mut self) {
        self.pagination.next();
    }

    pub fn last_page(&mut self) {
        self.pagination.last();
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Flip a row's checkbox; unknown ids are ignored
    pub fn toggle_row(&mut self, id: u32) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        self.selection.toggle(id)
    }

    /// Header checkbox: applies to every filtered row, not just this page
    pub fn toggle_all(&mut self, on: bool) {
        let ids = self.filtered_ids();
        self.selection.toggle_all(ids, on);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected and still present in the store
    pub fn is_selected(&self, id: u32) -> bool {
        self.store.contains(id) && self.selection.is_selected(id)
    }

    /// Selected records in base order
    pub fn selected_rows(&self) -> Vec<&Record> {
        self.store
            .snapshot()
            .iter()
            .filter(|r| self.selection.is_selected(r.id))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Column visibility
    // ---------------------------------------------------------------------

    pub fn set_column_visible(&mut self, column: ColumnId, visible: bool) {
        self.columns.set_visible(column, visible);
    }

    pub fn toggle_column(&mut self, column: ColumnId) {
        self.columns.toggle(column);
    }

    // ---------------------------------------------------------------------
    // Drag reorder
    // ---------------------------------------------------------------------

    pub fn drag_start(&mut self, id: u32) -> DragStart {
        let outcome = self.reorder.drag_start(id, &self.store, &mut self.sort);
        if outcome == DragStart::StartedClearedSort {
            self.refresh();
        }
        outcome
    }

    pub fn drag_move(&mut self, over: Option<u32>) {
        self.reorder.drag_move(over);
    }

    pub fn drag_end(&mut self) -> bool {
        let moved = self.reorder.drag_end(&mut self.store, &self.sort);
        if moved {
            debug!(order = ?self.store.ids(), "rows reordered");
            self.refresh();
        }
        moved
    }

    pub fn drag_cancel(&mut self) {
        self.reorder.drag_cancel();
    }

    /// A complete drag of `dragged` onto `target`
    pub fn move_row(&mut self, dragged: u32, target: u32) -> Result<bool, DragStart> {
        let start = self.drag_start(dragged);
        if !start.is_started() {
            return Err(start);
        }
        self.drag_move(Some(target));
        Ok(self.drag_end())
    }
}
