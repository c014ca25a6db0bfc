//! Filter enums shared by order commands

use clap::ValueEnum;

use crate::entities::OrderStatus;

/// Order status filter for list commands
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StatusFilter {
    Delivered,
    Processing,
    OnHold,
    InTransit,
    /// Anything not delivered
    Active,
}

impl StatusFilter {
    /// Status labels this filter accepts; `None` for filters that are not a
    /// fixed label set
    pub fn labels(&self) -> Option<&'static [&'static str]> {
        match self {
            StatusFilter::Delivered => Some(&["Delivered"]),
            StatusFilter::Processing => Some(&["Processing"]),
            StatusFilter::OnHold => Some(&["On Hold"]),
            StatusFilter::InTransit => Some(&["In Transit"]),
            StatusFilter::Active => None,
        }
    }

    pub fn matches(&self, status: &OrderStatus) -> bool {
        match self {
            StatusFilter::Delivered => *status == OrderStatus::Delivered,
            StatusFilter::Processing => *status == OrderStatus::Processing,
            StatusFilter::OnHold => *status == OrderStatus::OnHold,
            StatusFilter::InTransit => *status == OrderStatus::InTransit,
            StatusFilter::Active => status.is_active(),
        }
    }
}
