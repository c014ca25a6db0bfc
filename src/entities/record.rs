//! Record entity - one row of the order desk (RFQ, quote, contract, shipment or order)
//!
//! Display fields are stored exactly as the data source supplied them. Quantity
//! and price are parsed on demand; a value that does not parse is rendered as
//! [`NOT_APPLICABLE`] instead of failing.

use serde::{Deserialize, Deserializer, Serialize};

/// Kilograms per metric ton
pub const KG_PER_MT: f64 = 1000.0;

/// Display value for quantities and prices that cannot be parsed
pub const NOT_APPLICABLE: &str = "N/A";

/// Country codes known to the origin column, with their display names
pub const ORIGIN_COUNTRIES: &[(&str, &str)] = &[
    ("US", "United States"),
    ("CA", "Canada"),
    ("GB", "United Kingdom"),
    ("DE", "Germany"),
    ("FR", "France"),
    ("JP", "Japan"),
    ("CN", "China"),
    ("IN", "India"),
    ("BR", "Brazil"),
    ("AU", "Australia"),
    ("MX", "Mexico"),
    ("ES", "Spain"),
    ("IT", "Italy"),
    ("NL", "Netherlands"),
    ("SE", "Sweden"),
    ("CH", "Switzerland"),
    ("SG", "Singapore"),
    ("KR", "South Korea"),
    ("AE", "UAE"),
    ("SA", "Saudi Arabia"),
];

/// Order status shown in the status column
///
/// Labels outside the four known values are kept verbatim in `Other` and get
/// the default (neutral) styling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Delivered,
    Processing,
    OnHold,
    InTransit,
    Other(String),
}

impl OrderStatus {
    /// The label as shown in the table and matched by filters
    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Processing => "Processing",
            OrderStatus::OnHold => "On Hold",
            OrderStatus::InTransit => "In Transit",
            OrderStatus::Other(label) => label,
        }
    }

    /// Whether the order is still open (anything not delivered)
    pub fn is_active(&self) -> bool {
        !matches!(self, OrderStatus::Delivered)
    }

    /// Whether the status is one of the four known values
    pub fn is_known(&self) -> bool {
        !matches!(self, OrderStatus::Other(_))
    }
}

impl From<String> for OrderStatus {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "delivered" => OrderStatus::Delivered,
            "processing" => OrderStatus::Processing,
            "on hold" | "on_hold" | "on-hold" => OrderStatus::OnHold,
            "in transit" | "in_transit" | "in-transit" => OrderStatus::InTransit,
            _ => OrderStatus::Other(label),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(label: &str) -> Self {
        OrderStatus::from(label.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.label().to_string()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of the order table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier, stable across reorders
    pub id: u32,

    /// Product name
    pub header: String,

    /// Commodity category
    #[serde(alias = "type", default)]
    pub category: String,

    /// Order status
    pub status: OrderStatus,

    /// Quantity in kilograms, may contain thousands separators
    #[serde(alias = "target", deserialize_with = "string_or_number")]
    pub quantity: String,

    /// Price in USD per metric ton
    #[serde(alias = "limit", deserialize_with = "string_or_number")]
    pub price: String,

    /// Origin country code
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub origin: String,
}

impl Record {
    /// Create a record with the given id and product name; other fields empty
    pub fn new(id: u32, header: impl Into<String>) -> Self {
        Self {
            id,
            header: header.into(),
            category: String::new(),
            status: OrderStatus::Processing,
            quantity: String::new(),
            price: String::new(),
            origin: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<OrderStatus>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Stored quantity in kilograms, if it parses
    pub fn quantity_kg(&self) -> Option<i64> {
        parse_quantity_kg(&self.quantity)
    }

    /// Quantity in metric tons, unrounded
    pub fn quantity_mt(&self) -> Option<f64> {
        self.quantity_kg().map(|kg| kg as f64 / KG_PER_MT)
    }

    /// Quantity in metric tons as displayed (rounded, with separators)
    pub fn quantity_display(&self) -> String {
        match self.quantity_mt() {
            Some(mt) => format_mt(mt),
            None => NOT_APPLICABLE.to_string(),
        }
    }

    /// Price in USD per metric ton, if it parses
    pub fn price_usd(&self) -> Option<f64> {
        parse_price(&self.price)
    }

    /// Price as displayed (`$1,234.50`)
    pub fn price_display(&self) -> String {
        match self.price_usd() {
            Some(price) => format_usd(price),
            None => NOT_APPLICABLE.to_string(),
        }
    }

    /// Origin country display name
    pub fn origin_name(&self) -> &str {
        origin_name(&self.origin)
    }

    /// Every field as text, as matched by the global search
    pub fn search_values(&self) -> Vec<String> {
        let mut values = vec![
            self.id.to_string(),
            self.header.clone(),
            self.category.clone(),
            self.status.label().to_string(),
            self.quantity.clone(),
            self.price.clone(),
        ];
        if !self.origin.trim().is_empty() {
            values.push(self.origin.clone());
            values.push(self.origin_name().to_string());
        }
        values
    }
}

/// Look up the display name for an origin country code
///
/// Unknown codes display as themselves; an empty code displays as "-".
pub fn origin_name(code: &str) -> &str {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return "-";
    }
    ORIGIN_COUNTRIES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(trimmed))
        .map(|(_, name)| *name)
        .unwrap_or(trimmed)
}

/// Parse a kilogram quantity such as `"150,500"`
///
/// Thousands separators are ignored. Fractional input is truncated toward zero.
pub fn parse_quantity_kg(raw: &str) -> Option<i64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<i64>().ok().or_else(|| {
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.trunc() as i64)
    })
}

/// Parse a USD price such as `"1,250.75"` or `"$980"`
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Group an integer with thousands separators
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format metric tons rounded to the nearest whole ton
pub fn format_mt(mt: f64) -> String {
    format_thousands(mt.round() as i64)
}

/// Format a USD amount with two decimals and thousands separators
pub fn format_usd(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!(
        "{}${}.{:02}",
        sign,
        format_thousands(cents / 100),
        cents % 100
    )
}

/// Accept either a string or a bare number for string fields
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(x) => x.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(OrderStatus::from("Delivered"), OrderStatus::Delivered);
        assert_eq!(OrderStatus::from("on hold"), OrderStatus::OnHold);
        assert_eq!(OrderStatus::from("In Transit"), OrderStatus::InTransit);
        assert_eq!(
            OrderStatus::from("Cancelled"),
            OrderStatus::Other("Cancelled".to_string())
        );
        assert!(!OrderStatus::from("Cancelled").is_known());
        assert_eq!(OrderStatus::from("Cancelled").label(), "Cancelled");
    }

    #[test]
    fn test_status_active() {
        assert!(!OrderStatus::Delivered.is_active());
        assert!(OrderStatus::OnHold.is_active());
        assert!(OrderStatus::Other("Draft".into()).is_active());
    }

    #[test]
    fn test_quantity_display_in_metric_tons() {
        let r = Record::new(1, "Wheat").with_quantity("150000");
        assert_eq!(r.quantity_kg(), Some(150_000));
        assert_eq!(r.quantity_display(), "150");

        let r = Record::new(2, "Corn").with_quantity("150,500");
        assert_eq!(r.quantity_mt(), Some(150.5));
        assert_eq!(r.quantity_display(), "151");

        let r = Record::new(3, "Soy").with_quantity("12,345,000");
        assert_eq!(r.quantity_display(), "12,345");
    }

    #[test]
    fn test_unparseable_values_render_sentinel() {
        let r = Record::new(1, "Sugar")
            .with_quantity("lots")
            .with_price("N/A");
        assert_eq!(r.quantity_mt(), None);
        assert_eq!(r.quantity_display(), NOT_APPLICABLE);
        assert_eq!(r.price_usd(), None);
        assert_eq!(r.price_display(), NOT_APPLICABLE);
    }

    #[test]
    fn test_price_display() {
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(-12.5), "-$12.50");
        assert_eq!(parse_price("$1,250.75"), Some(1250.75));
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(-1234567), "-1,234,567");
    }

    #[test]
    fn test_origin_name() {
        assert_eq!(origin_name("BR"), "Brazil");
        assert_eq!(origin_name("br"), "Brazil");
        assert_eq!(origin_name("ZZ"), "ZZ");
        assert_eq!(origin_name(""), "-");
    }

    #[test]
    fn test_deserialize_with_source_aliases_and_numbers() {
        let yaml = r#"
id: 7
header: Arabica Coffee
type: Coffee
status: In Transit
target: 25000
limit: "3,410.00"
origin: BR
"#;
        let r: Record = serde_yml::from_str(yaml).unwrap();
        assert_eq!(r.category, "Coffee");
        assert_eq!(r.status, OrderStatus::InTransit);
        assert_eq!(r.quantity, "25000");
        assert_eq!(r.price_usd(), Some(3410.0));
    }

    #[test]
    fn test_serialize_uses_status_label() {
        let r = Record::new(1, "Cocoa").with_status("On Hold");
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"status\":\"On Hold\""));
        assert!(!json.contains("origin"));
    }
}
