//! Filter/sort engine
//!
//! Derives the visible, ordered subset of the row store from the active
//! filter and sort state. Everything here is a pure function of its inputs:
//! the stored rows are never reordered or mutated.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::core::columns::ColumnId;
use crate::entities::Record;

/// Sort direction for one sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" | "up" => Ok(SortDirection::Asc),
            "desc" | "descending" | "down" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}. Use asc or desc", s)),
        }
    }
}

/// One (column, direction) sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: ColumnId,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: ColumnId, direction: SortDirection) -> Self {
        Self { column, direction }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.column, self.direction)
    }
}

/// Parses `column` or `column:direction`, e.g. `price:desc`
impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.split_once(':') {
            Some((column, direction)) => (column, direction.parse()?),
            None => (s, SortDirection::Asc),
        };
        let column: ColumnId = column.parse()?;
        if !column.is_sortable() {
            return Err(format!("Column '{}' cannot be sorted", column));
        }
        Ok(SortKey::new(column, direction))
    }
}

/// Ordered list of sort keys; empty means base order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort by a single key, replacing any existing keys
    pub fn by(column: ColumnId, direction: SortDirection) -> Self {
        let mut state = Self::new();
        state.push(column, direction);
        state
    }

    /// Add a key, or change the direction of an existing key for the column
    ///
    /// Returns `false` for columns that cannot be sorted.
    pub fn push(&mut self, column: ColumnId, direction: SortDirection) -> bool {
        if !column.is_sortable() {
            return false;
        }
        match self.keys.iter_mut().find(|k| k.column == column) {
            Some(key) => key.direction = direction,
            None => self.keys.push(SortKey::new(column, direction)),
        }
        true
    }

    /// Replace all keys with a single one
    pub fn set(&mut self, column: ColumnId, direction: SortDirection) -> bool {
        if !column.is_sortable() {
            return false;
        }
        self.keys.clear();
        self.keys.push(SortKey::new(column, direction));
        true
    }

    /// Header-click cycle: unsorted → ascending → descending → unsorted
    ///
    /// Other keys are kept, so repeated toggles build a multi-column sort.
    pub fn toggle(&mut self, column: ColumnId) -> bool {
        if !column.is_sortable() {
            return false;
        }
        match self.keys.iter().position(|k| k.column == column) {
            None => self.keys.push(SortKey::new(column, SortDirection::Asc)),
            Some(i) if self.keys[i].direction == SortDirection::Asc => {
                self.keys[i].direction = SortDirection::Desc
            }
            Some(i) => {
                self.keys.remove(i);
            }
        }
        true
    }

    pub fn remove(&mut self, column: ColumnId) {
        self.keys.retain(|k| k.column != column);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.keys.is_empty()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Direction of the key for a column, if it is sorted
    pub fn direction(&self, column: ColumnId) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }
}

impl FromIterator<SortKey> for SortState {
    fn from_iter<I: IntoIterator<Item = SortKey>>(iter: I) -> Self {
        let mut state = Self::new();
        for key in iter {
            state.push(key.column, key.direction);
        }
        state
    }
}

/// Global search plus per-column accepted-value sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    query: String,
    columns: BTreeMap<ColumnId, BTreeSet<String>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter state with only a global query
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            columns: BTreeMap::new(),
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Accept only rows whose column value is one of `values`
    ///
    /// An empty set removes the column's predicate. Returns `false` for columns
    /// without record data.
    pub fn set_column_filter<I, S>(&mut self, column: ColumnId, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !column.is_data() {
            return false;
        }
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.columns.remove(&column);
        } else {
            self.columns.insert(column, values);
        }
        true
    }

    pub fn clear_column_filter(&mut self, column: ColumnId) {
        self.columns.remove(&column);
    }

    /// Accepted values for a column, if it is filtered
    pub fn column_filter(&self, column: ColumnId) -> Option<&BTreeSet<String>> {
        self.columns.get(&column)
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.columns.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || !self.columns.is_empty()
    }

    /// Whether a record passes the global query and every column predicate
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_query(record) && self.matches_columns(record)
    }

    fn matches_query(&self, record: &Record) -> bool {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        record
            .search_values()
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }

    fn matches_columns(&self, record: &Record) -> bool {
        self.columns.iter().all(|(column, accepted)| {
            column.filter_value(record).is_some_and(|value| {
                let value = value.trim();
                accepted.iter().any(|a| a.trim().eq_ignore_ascii_case(value))
            })
        })
    }
}

/// Comparable value extracted from a record for one sort key
#[derive(Debug)]
enum SortValue<'a> {
    Number(Option<f64>),
    Text(&'a str),
}

fn sort_value<'a>(record: &'a Record, column: ColumnId) -> SortValue<'a> {
    match column {
        ColumnId::Drag => SortValue::Number(Some(f64::from(record.id))),
        ColumnId::Quantity => {
            let mt = record.quantity_mt();
            if mt.is_none() {
                debug!(id = record.id, value = %record.quantity, "unparseable quantity sorts last");
            }
            SortValue::Number(mt)
        }
        ColumnId::Price => {
            let price = record.price_usd();
            if price.is_none() {
                debug!(id = record.id, value = %record.price, "unparseable price sorts last");
            }
            SortValue::Number(price)
        }
        ColumnId::Name => SortValue::Text(&record.header),
        ColumnId::Category => SortValue::Text(&record.category),
        ColumnId::Status => SortValue::Text(record.status.label()),
        ColumnId::Origin => SortValue::Text(record.origin_name()),
        ColumnId::Select | ColumnId::Actions => SortValue::Text(""),
    }
}

/// Unparseable numbers order after every parseable one in either direction
fn compare_values(a: &SortValue, b: &SortValue, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortValue::Number(Some(x)), SortValue::Number(Some(y))) => {
            direction.apply(x.total_cmp(y))
        }
        (SortValue::Number(Some(_)), SortValue::Number(None)) => Ordering::Less,
        (SortValue::Number(None), SortValue::Number(Some(_))) => Ordering::Greater,
        (SortValue::Number(None), SortValue::Number(None)) => Ordering::Equal,
        (SortValue::Text(x), SortValue::Text(y)) => direction.apply(x.cmp(y)),
        (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
    }
}

/// Indices into `rows` of the visible rows, in display order
pub fn apply_indices(rows: &[Record], filter: &FilterState, sort: &SortState) -> Vec<usize> {
    let mut visible: Vec<usize> = (0..rows.len())
        .filter(|&i| filter.matches(&rows[i]))
        .collect();

    if sort.is_active() {
        // Extract keys once so parse failures are logged once per row
        let mut keyed: Vec<(usize, Vec<SortValue>)> = visible
            .iter()
            .map(|&i| {
                let values = sort
                    .keys()
                    .iter()
                    .map(|k| sort_value(&rows[i], k.column))
                    .collect();
                (i, values)
            })
            .collect();

        keyed.sort_by(|(_, a), (_, b)| {
            sort.keys()
                .iter()
                .enumerate()
                .map(|(n, key)| compare_values(&a[n], &b[n], key.direction))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        visible = keyed.into_iter().map(|(i, _)| i).collect();
    }

    visible
}

/// The visible rows in display order
pub fn apply<'a>(rows: &'a [Record], filter: &FilterState, sort: &SortState) -> Vec<&'a Record> {
    apply_indices(rows, filter, sort)
        .into_iter()
        .map(|i| &rows[i])
        .collect()
}
