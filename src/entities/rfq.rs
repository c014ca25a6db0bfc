//! RFQ entity - a request for quote as collected by the wizard
//!
//! `RfqFields` is the accumulated field record handed to the submit sink;
//! `RfqDocument` is what the outbox persists for each submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incoterms offered by the delivery step
pub const INCOTERMS: &[&str] = &[
    "EXW", "FCA", "FAS", "FOB", "CFR", "CIF", "CPT", "CIP", "DAP", "DPU", "DDP",
];

/// Commodity categories offered by the basics step
pub const CATEGORIES: &[&str] = &[
    "Grains", "Oilseeds", "Softs", "Coffee", "Cocoa", "Metals", "Energy", "Fertilizer",
];

/// A single field of the RFQ form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RfqField {
    ProductName,
    Category,
    Quantity,
    TargetPrice,
    Origin,
    DeliveryPort,
    DeliveryDate,
    Quality,
    Incoterms,
    Notes,
}

impl RfqField {
    /// All fields in form order
    pub const ALL: [RfqField; 10] = [
        RfqField::ProductName,
        RfqField::Category,
        RfqField::Quantity,
        RfqField::TargetPrice,
        RfqField::Origin,
        RfqField::DeliveryPort,
        RfqField::DeliveryDate,
        RfqField::Quality,
        RfqField::Incoterms,
        RfqField::Notes,
    ];

    /// Human-readable label used in prompts and validation messages
    pub fn label(&self) -> &'static str {
        match self {
            RfqField::ProductName => "Product name",
            RfqField::Category => "Category",
            RfqField::Quantity => "Quantity (MT)",
            RfqField::TargetPrice => "Target price (USD/MT)",
            RfqField::Origin => "Origin",
            RfqField::DeliveryPort => "Delivery port",
            RfqField::DeliveryDate => "Delivery date",
            RfqField::Quality => "Quality",
            RfqField::Incoterms => "Incoterms",
            RfqField::Notes => "Notes",
        }
    }

    /// Key used on the command line and in the outbox document
    pub fn key(&self) -> &'static str {
        match self {
            RfqField::ProductName => "product_name",
            RfqField::Category => "category",
            RfqField::Quantity => "quantity",
            RfqField::TargetPrice => "target_price",
            RfqField::Origin => "origin",
            RfqField::DeliveryPort => "delivery_port",
            RfqField::DeliveryDate => "delivery_date",
            RfqField::Quality => "quality",
            RfqField::Incoterms => "incoterms",
            RfqField::Notes => "notes",
        }
    }
}

impl std::fmt::Display for RfqField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for RfqField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        RfqField::ALL
            .into_iter()
            .find(|f| f.key() == normalized)
            .ok_or_else(|| format!("Unknown RFQ field: {}", s))
    }
}

/// Field values accumulated across the wizard steps
///
/// Empty strings mean "not filled in".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RfqFields {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub quantity: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target_price: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub origin: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub delivery_port: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub delivery_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub quality: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub incoterms: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl RfqFields {
    /// Get the current value of a field
    pub fn get(&self, field: RfqField) -> &str {
        match field {
            RfqField::ProductName => &self.product_name,
            RfqField::Category => &self.category,
            RfqField::Quantity => &self.quantity,
            RfqField::TargetPrice => &self.target_price,
            RfqField::Origin => &self.origin,
            RfqField::DeliveryPort => &self.delivery_port,
            RfqField::DeliveryDate => &self.delivery_date,
            RfqField::Quality => &self.quality,
            RfqField::Incoterms => &self.incoterms,
            RfqField::Notes => &self.notes,
        }
    }

    /// Set one field, leaving every other field untouched
    pub fn set(&mut self, field: RfqField, value: impl Into<String>) {
        let slot = match field {
            RfqField::ProductName => &mut self.product_name,
            RfqField::Category => &mut self.category,
            RfqField::Quantity => &mut self.quantity,
            RfqField::TargetPrice => &mut self.target_price,
            RfqField::Origin => &mut self.origin,
            RfqField::DeliveryPort => &mut self.delivery_port,
            RfqField::DeliveryDate => &mut self.delivery_date,
            RfqField::Quality => &mut self.quality,
            RfqField::Incoterms => &mut self.incoterms,
            RfqField::Notes => &mut self.notes,
        };
        *slot = value.into();
    }

    /// Whether a field holds a non-blank value
    pub fn is_filled(&self, field: RfqField) -> bool {
        !self.get(field).trim().is_empty()
    }

    /// Whether no field has been filled in
    pub fn is_empty(&self) -> bool {
        RfqField::ALL.iter().all(|f| !self.is_filled(*f))
    }
}

/// A submitted RFQ as stored in the outbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfqDocument {
    /// RFQ reference (RFQ-<ULID>)
    pub id: String,

    /// When the wizard handed the RFQ off
    pub submitted: DateTime<Utc>,

    /// Who submitted it
    pub author: String,

    /// The collected form fields
    #[serde(flatten)]
    pub fields: RfqFields,
}

impl RfqDocument {
    /// Build a new document with a fresh RFQ reference
    pub fn new(fields: RfqFields, author: impl Into<String>) -> Self {
        Self {
            id: format!("RFQ-{}", ulid::Ulid::new()),
            submitted: Utc::now(),
            author: author.into(),
            fields,
        }
    }
}
