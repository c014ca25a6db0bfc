//! Dashboard summary cards derived from the row store

use serde::Serialize;

use crate::entities::record::{format_mt, format_thousands, format_usd};
use crate::entities::{OrderStatus, Record};

/// Order counts and totals over a set of records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub delivered: usize,
    pub processing: usize,
    pub on_hold: usize,
    pub in_transit: usize,
    /// Statuses outside the four known labels
    pub other: usize,
    /// Orders not yet delivered
    pub active: usize,
    /// Sum of parseable quantities, in metric tons
    pub volume_mt: f64,
    /// Sum of quantity (MT) x price (USD/MT) over rows where both parse
    pub value_usd: f64,
}

impl Summary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut summary = Summary::default();
        for record in records {
            summary.total += 1;
            match record.status {
                OrderStatus::Delivered => summary.delivered += 1,
                OrderStatus::Processing => summary.processing += 1,
                OrderStatus::OnHold => summary.on_hold += 1,
                OrderStatus::InTransit => summary.in_transit += 1,
                OrderStatus::Other(_) => summary.other += 1,
            }
            if record.status.is_active() {
                summary.active += 1;
            }
            if let Some(mt) = record.quantity_mt() {
                summary.volume_mt += mt;
                if let Some(price) = record.price_usd() {
                    summary.value_usd += mt * price;
                }
            }
        }
        summary
    }

    /// Delayed orders are the ones on hold
    pub fn delayed(&self) -> usize {
        self.on_hold
    }

    /// (title, value) pairs in card order
    pub fn cards(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total Orders", format_thousands(self.total as i64)),
            ("Active Orders", format_thousands(self.active as i64)),
            ("Delayed", format_thousands(self.delayed() as i64)),
            ("In Transit", format_thousands(self.in_transit as i64)),
            ("Delivered", format_thousands(self.delivered as i64)),
            ("Volume (MT)", format_mt(self.volume_mt)),
            ("Contract Value", format_usd(self.value_usd)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_and_totals() {
        let records = vec![
            Record::new(1, "Wheat")
                .with_status("Delivered")
                .with_quantity("2,000")
                .with_price("250"),
            Record::new(2, "Corn")
                .with_status("On Hold")
                .with_quantity("3000")
                .with_price("N/A"),
            Record::new(3, "Sugar")
                .with_status("Pending review")
                .with_quantity("abc")
                .with_price("400"),
        ];
        let s = Summary::from_records(&records);
        assert_eq!(s.total, 3);
        assert_eq!(s.delivered, 1);
        assert_eq!(s.delayed(), 1);
        assert_eq!(s.other, 1);
        assert_eq!(s.active, 2);
        assert!((s.volume_mt - 5.0).abs() < 1e-9);
        assert!((s.value_usd - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_cards_order() {
        let s = Summary::from_records(std::iter::empty());
        let titles: Vec<&str> = s.cards().iter().map(|(t, _)| *t).collect();
        assert_eq!(titles[0], "Total Orders");
        assert_eq!(s.cards()[6].1, "$0.00");
    }
}
