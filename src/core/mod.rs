//! Core module - the order table engine, RFQ wizard and their collaborators

pub mod columns;
pub mod config;
pub mod dataset;
pub mod outbox;
pub mod pagination;
pub mod query;
pub mod reorder;
pub mod selection;
pub mod store;
pub mod summary;
pub mod table;
pub mod wizard;

pub use columns::{ColumnId, ColumnVisibility};
pub use config::{Config, ConfigError};
pub use dataset::DatasetError;
pub use outbox::OutboxSink;
pub use pagination::{Pagination, PaginationError, DEFAULT_PAGE_SIZE, PAGE_SIZES};
pub use query::{FilterState, SortDirection, SortKey, SortState};
pub use reorder::{DragStart, ReorderController, ReorderPolicy};
pub use selection::{SelectAllState, SelectionTracker};
pub use store::{RowStore, StoreError};
pub use summary::Summary;
pub use table::{DataTable, TableOptions, TableView};
pub use wizard::{RfqSink, RfqWizard, SubmitError, Transition, WizardStep};
