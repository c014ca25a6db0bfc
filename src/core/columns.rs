//! Table columns and the column visibility manager

use std::collections::BTreeMap;

use crate::entities::Record;

/// Columns of the order table, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnId {
    /// Drag handle (shows the row id in a terminal)
    Drag,
    /// Row selector checkbox
    Select,
    /// Product name
    Name,
    Category,
    Status,
    /// Quantity in metric tons
    Quantity,
    /// Price in USD per metric ton
    Price,
    Origin,
    /// Row actions menu
    Actions,
}

impl ColumnId {
    /// All columns in display order
    pub const ALL: [ColumnId; 9] = [
        ColumnId::Drag,
        ColumnId::Select,
        ColumnId::Name,
        ColumnId::Category,
        ColumnId::Status,
        ColumnId::Quantity,
        ColumnId::Price,
        ColumnId::Origin,
        ColumnId::Actions,
    ];

    /// Column key used on the command line
    pub fn key(&self) -> &'static str {
        match self {
            ColumnId::Drag => "drag",
            ColumnId::Select => "select",
            ColumnId::Name => "name",
            ColumnId::Category => "category",
            ColumnId::Status => "status",
            ColumnId::Quantity => "quantity",
            ColumnId::Price => "price",
            ColumnId::Origin => "origin",
            ColumnId::Actions => "actions",
        }
    }

    /// Header text
    pub fn header(&self) -> &'static str {
        match self {
            ColumnId::Drag => "#",
            ColumnId::Select => "",
            ColumnId::Name => "Product Name",
            ColumnId::Category => "Category",
            ColumnId::Status => "Order Status",
            ColumnId::Quantity => "Quantity (MT)",
            ColumnId::Price => "Price (USD/MT)",
            ColumnId::Origin => "Origin",
            ColumnId::Actions => "",
        }
    }

    /// Whether the column carries record data (and can be sorted or filtered)
    pub fn is_data(&self) -> bool {
        !matches!(self, ColumnId::Drag | ColumnId::Select | ColumnId::Actions)
    }

    pub fn is_sortable(&self) -> bool {
        self.is_data()
    }

    /// The row selector and the product name can never be hidden
    pub fn is_hideable(&self) -> bool {
        !matches!(self, ColumnId::Select | ColumnId::Name)
    }

    /// Raw text value matched by per-column filters
    pub fn filter_value<'a>(&self, record: &'a Record) -> Option<&'a str> {
        match self {
            ColumnId::Name => Some(&record.header),
            ColumnId::Category => Some(&record.category),
            ColumnId::Status => Some(record.status.label()),
            ColumnId::Quantity => Some(&record.quantity),
            ColumnId::Price => Some(&record.price),
            ColumnId::Origin => Some(&record.origin),
            ColumnId::Drag | ColumnId::Select | ColumnId::Actions => None,
        }
    }

    /// Display text of a data cell
    pub fn cell_text(&self, record: &Record) -> String {
        match self {
            ColumnId::Drag => record.id.to_string(),
            ColumnId::Select | ColumnId::Actions => String::new(),
            ColumnId::Name => record.header.clone(),
            ColumnId::Category => record.category.clone(),
            ColumnId::Status => record.status.label().to_string(),
            ColumnId::Quantity => record.quantity_display(),
            ColumnId::Price => record.price_display(),
            ColumnId::Origin => record.origin_name().to_string(),
        }
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for ColumnId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drag" | "id" | "#" => Ok(ColumnId::Drag),
            "select" => Ok(ColumnId::Select),
            "name" | "header" | "product" => Ok(ColumnId::Name),
            "category" | "type" => Ok(ColumnId::Category),
            "status" => Ok(ColumnId::Status),
            "quantity" | "qty" | "target" => Ok(ColumnId::Quantity),
            "price" | "limit" => Ok(ColumnId::Price),
            "origin" => Ok(ColumnId::Origin),
            "actions" => Ok(ColumnId::Actions),
            _ => Err(format!(
                "Unknown column: {}. Use name, category, status, quantity, price, origin, drag, select or actions",
                s
            )),
        }
    }
}

/// Which columns are shown; absent entries are visible
#[derive(Debug, Clone, Default)]
pub struct ColumnVisibility {
    state: BTreeMap<ColumnId, bool>,
}

impl ColumnVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show or hide a column; a no-op for columns that cannot be hidden
    pub fn set_visible(&mut self, column: ColumnId, visible: bool) {
        if !column.is_hideable() {
            return;
        }
        self.state.insert(column, visible);
    }

    pub fn is_visible(&self, column: ColumnId) -> bool {
        self.state.get(&column).copied().unwrap_or(true)
    }

    /// Flip a column's visibility
    pub fn toggle(&mut self, column: ColumnId) {
        let visible = self.is_visible(column);
        self.set_visible(column, !visible);
    }

    /// Visible columns in display order
    pub fn visible_columns(&self) -> Vec<ColumnId> {
        ColumnId::ALL
            .into_iter()
            .filter(|c| self.is_visible(*c))
            .collect()
    }

    /// Columns offered by the "View" menu
    pub fn hideable() -> Vec<ColumnId> {
        ColumnId::ALL
            .into_iter()
            .filter(|c| c.is_hideable())
            .collect()
    }

    /// Show every column again
    pub fn reset(&mut self) {
        self.state.clear();
    }
}
