//! Row store - the authoritative ordered collection of records
//!
//! Order only matters for drag reordering. Filtering and sorting never touch it.

use thiserror::Error;
use tracing::debug;

use crate::entities::Record;

/// Errors raised by row store mutations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Duplicate record id: {0}")]
    DuplicateId(u32),
}

/// Ordered record storage keyed by unique id
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<Record>,
}

impl RowStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Seed a store from the data source, rejecting duplicate ids
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Append a record; a duplicate id leaves the store unchanged
    pub fn insert(&mut self, record: Record) -> Result<(), StoreError> {
        if self.contains(record.id) {
            debug!(id = record.id, "rejected insert of duplicate id");
            return Err(StoreError::DuplicateId(record.id));
        }
        self.rows.push(record);
        Ok(())
    }

    /// Remove a record by id, returning it if present
    pub fn remove(&mut self, id: u32) -> Option<Record> {
        let index = self.position(id)?;
        Some(self.rows.remove(index))
    }

    /// Move a record to `new_index` in the base order
    ///
    /// The record is removed first and then inserted at `new_index` (clamped to
    /// the end). Returns `false` without touching the store when `id` is absent.
    pub fn reorder(&mut self, id: u32, new_index: usize) -> bool {
        let Some(old_index) = self.position(id) else {
            debug!(id, "ignored reorder of absent id");
            return false;
        };
        let record = self.rows.remove(old_index);
        let new_index = new_index.min(self.rows.len());
        self.rows.insert(new_index, record);
        true
    }

    /// The records in base order
    pub fn snapshot(&self) -> &[Record] {
        &self.rows
    }

    /// Look up a record by id
    pub fn get(&self, id: u32) -> Option<&Record> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Index of a record in base order
    pub fn position(&self, id: u32) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ids in base order
    pub fn ids(&self) -> Vec<u32> {
        self.rows.iter().map(|r| r.id).collect()
    }
}
