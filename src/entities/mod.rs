//! Entity type definitions

pub mod record;
pub mod rfq;

pub use record::{OrderStatus, Record};
pub use rfq::{RfqDocument, RfqField, RfqFields};
