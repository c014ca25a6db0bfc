//! RFQ wizard state machine
//!
//! A three-step form: basics, pricing, delivery. `next()` on the last step
//! hands the accumulated fields to an [`RfqSink`] once and closes the wizard on
//! success. The open flag lives on the wizard itself; callers pass the wizard
//! around rather than sharing a global "dialog open" toggle.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::entities::{RfqField, RfqFields};

/// Submitting an RFQ failed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("RFQ rejected: {0}")]
    Rejected(String),

    #[error("Failed to write RFQ: {0}")]
    Io(String),

    #[error("Failed to serialize RFQ: {0}")]
    Serialize(String),
}

/// Receives a completed RFQ; returns the reference it was filed under
pub trait RfqSink {
    fn submit(&mut self, fields: &RfqFields) -> Result<String, SubmitError>;
}

impl<F> RfqSink for F
where
    F: FnMut(&RfqFields) -> Result<String, SubmitError>,
{
    fn submit(&mut self, fields: &RfqFields) -> Result<String, SubmitError> {
        self(fields)
    }
}

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WizardStep {
    #[default]
    Basics = 1,
    Pricing = 2,
    Delivery = 3,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Basics, WizardStep::Pricing, WizardStep::Delivery];

    /// 1-based step number
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Basics => "Product Details",
            WizardStep::Pricing => "Pricing & Origin",
            WizardStep::Delivery => "Delivery & Terms",
        }
    }

    /// Fields collected on this step, in form order
    pub fn fields(&self) -> &'static [RfqField] {
        match self {
            WizardStep::Basics => &[RfqField::ProductName, RfqField::Category, RfqField::Quantity],
            WizardStep::Pricing => &[
                RfqField::TargetPrice,
                RfqField::Origin,
                RfqField::DeliveryPort,
            ],
            WizardStep::Delivery => &[
                RfqField::DeliveryDate,
                RfqField::Quality,
                RfqField::Incoterms,
                RfqField::Notes,
            ],
        }
    }

    /// Fields that must be non-blank before leaving this step
    pub fn required(&self) -> &'static [RfqField] {
        match self {
            WizardStep::Basics => &[RfqField::ProductName, RfqField::Category, RfqField::Quantity],
            WizardStep::Pricing => &[RfqField::DeliveryPort],
            WizardStep::Delivery => &[],
        }
    }

    pub fn is_required(&self, field: RfqField) -> bool {
        self.required().contains(&field)
    }

    fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Basics => Some(WizardStep::Pricing),
            WizardStep::Pricing => Some(WizardStep::Delivery),
            WizardStep::Delivery => None,
        }
    }

    fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::Basics => None,
            WizardStep::Pricing => Some(WizardStep::Basics),
            WizardStep::Delivery => Some(WizardStep::Pricing),
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Step {} of 3: {}", self.number(), self.title())
    }
}

/// Outcome of a wizard action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The wizard is closed; nothing happened
    Ignored,
    /// Moved forward to a step
    Advanced(WizardStep),
    /// Required fields are blank; the step did not change
    Blocked { missing: Vec<RfqField> },
    /// The sink accepted the RFQ and the wizard closed
    Submitted { reference: String, fields: RfqFields },
    /// The sink failed; the wizard stays on the last step
    SubmitFailed { message: String },
    /// Moved back to a step
    MovedBack(WizardStep),
    /// Already on the first step
    Unchanged,
}

/// The RFQ wizard
#[derive(Debug, Clone, Default)]
pub struct RfqWizard {
    open: bool,
    step: WizardStep,
    fields: RfqFields,
    message: Option<String>,
}

impl RfqWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dialog on the first step
    pub fn open(&mut self) {
        self.open = true;
        debug!("RFQ wizard opened");
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn fields(&self) -> &RfqFields {
        &self.fields
    }

    /// Inline validation or submit error, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Edit one field; other values (on any step) are kept
    pub fn set_field(&mut self, field: RfqField, value: impl Into<String>) {
        self.fields.set(field, value);
        self.message = None;
    }

    /// Required fields of the current step that are still blank
    pub fn missing(&self) -> Vec<RfqField> {
        self.step
            .required()
            .iter()
            .copied()
            .filter(|f| !self.fields.is_filled(*f))
            .collect()
    }

    /// Advance, or submit from the last step
    pub fn next<S: RfqSink + ?Sized>(&mut self, sink: &mut S) -> Transition {
        if !self.open {
            return Transition::Ignored;
        }

        let missing = self.missing();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.label()).collect();
            self.message = Some(format!("Please fill in: {}", names.join(", ")));
            debug!(step = self.step.number(), ?missing, "wizard step blocked");
            return Transition::Blocked { missing };
        }
        self.message = None;

        match self.step.next() {
            Some(step) => {
                self.step = step;
                Transition::Advanced(step)
            }
            None => match sink.submit(&self.fields) {
                Ok(reference) => {
                    info!(%reference, "RFQ submitted");
                    let fields = std::mem::take(&mut self.fields);
                    self.reset();
                    Transition::Submitted { reference, fields }
                }
                Err(e) => {
                    warn!(error = %e, "RFQ submit failed");
                    let message = e.to_string();
                    self.message = Some(message.clone());
                    Transition::SubmitFailed { message }
                }
            },
        }
    }

    /// Go back one step; fields are kept
    pub fn back(&mut self) -> Transition {
        if !self.open {
            return Transition::Ignored;
        }
        match self.step.previous() {
            Some(step) => {
                self.step = step;
                self.message = None;
                Transition::MovedBack(step)
            }
            None => Transition::Unchanged,
        }
    }

    /// Close the dialog and discard everything
    pub fn cancel(&mut self) {
        debug!(step = self.step.number(), "RFQ wizard cancelled");
        self.reset();
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accept(_: &RfqFields) -> Result<String, SubmitError> {
        Ok("RFQ-TEST".to_string())
    }

    fn fill_basics(w: &mut RfqWizard) {
        w.set_field(RfqField::ProductName, "Raw Sugar");
        w.set_field(RfqField::Category, "Softs");
        w.set_field(RfqField::Quantity, "100");
    }

    #[test]
    fn test_blocked_until_required_filled() {
        let mut w = RfqWizard::new();
        w.open();
        w.set_field(RfqField::ProductName, "Raw Sugar");
        w.set_field(RfqField::Category, "Softs");

        let t = w.next(&mut accept);
        assert_eq!(
            t,
            Transition::Blocked {
                missing: vec![RfqField::Quantity]
            }
        );
        assert_eq!(w.step(), WizardStep::Basics);
        assert!(w.message().is_some_and(|m| m.contains("Quantity")));

        w.set_field(RfqField::Quantity, "100");
        assert!(w.message().is_none());
        assert_eq!(w.next(&mut accept), Transition::Advanced(WizardStep::Pricing));
    }

    #[test]
    fn test_whitespace_does_not_satisfy_required() {
        let mut w = RfqWizard::new();
        w.open();
        fill_basics(&mut w);
        w.set_field(RfqField::Quantity, "  ");
        assert!(matches!(w.next(&mut accept), Transition::Blocked { .. }));
    }

    #[test]
    fn test_back_keeps_fields() {
        let mut w = RfqWizard::new();
        w.open();
        fill_basics(&mut w);
        w.next(&mut accept);
        w.set_field(RfqField::DeliveryPort, "Rotterdam");

        assert_eq!(w.back(), Transition::MovedBack(WizardStep::Basics));
        assert_eq!(w.back(), Transition::Unchanged);
        assert_eq!(w.fields().get(RfqField::DeliveryPort), "Rotterdam");
        assert_eq!(w.fields().get(RfqField::ProductName), "Raw Sugar");
    }

    #[test]
    fn test_submit_calls_sink_once_and_resets() {
        let mut calls = 0;
        let mut sink = |fields: &RfqFields| {
            calls += 1;
            assert_eq!(fields.delivery_port, "Santos");
            Ok::<_, SubmitError>("RFQ-1".to_string())
        };

        let mut w = RfqWizard::new();
        w.open();
        fill_basics(&mut w);
        w.next(&mut sink);
        w.set_field(RfqField::DeliveryPort, "Santos");
        w.next(&mut sink);
        let t = w.next(&mut sink);

        match t {
            Transition::Submitted { reference, fields } => {
                assert_eq!(reference, "RFQ-1");
                assert_eq!(fields.product_name, "Raw Sugar");
            }
            other => panic!("unexpected transition: {:?}", other),
        }
        assert!(!w.is_open());
        assert_eq!(w.step(), WizardStep::Basics);
        assert!(w.fields().is_empty());

        // Closed wizard ignores further input
        assert_eq!(w.next(&mut sink), Transition::Ignored);
        drop(sink);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_sink_failure_keeps_wizard_open() {
        let mut failing =
            |_: &RfqFields| Err::<String, _>(SubmitError::Rejected("desk closed".to_string()));

        let mut w = RfqWizard::new();
        w.open();
        fill_basics(&mut w);
        w.next(&mut accept);
        w.set_field(RfqField::DeliveryPort, "Santos");
        w.next(&mut accept);

        let t = w.next(&mut failing);
        assert!(matches!(t, Transition::SubmitFailed { .. }));
        assert!(w.is_open());
        assert_eq!(w.step(), WizardStep::Delivery);
        assert_eq!(w.fields().delivery_port, "Santos");
        assert_eq!(w.message(), Some("RFQ rejected: desk closed"));
    }

    #[test]
    fn test_cancel_from_last_step() {
        let mut w = RfqWizard::new();
        w.open();
        fill_basics(&mut w);
        w.next(&mut accept);
        w.set_field(RfqField::DeliveryPort, "Santos");
        w.next(&mut accept);
        assert_eq!(w.step(), WizardStep::Delivery);

        w.cancel();
        assert!(!w.is_open());
        assert_eq!(w.step(), WizardStep::Basics);
        assert!(w.fields().is_empty());
    }

    #[test]
    fn test_step_display() {
        assert_eq!(WizardStep::Pricing.to_string(), "Step 2 of 3: Pricing & Origin");
        assert!(WizardStep::Pricing.is_required(RfqField::DeliveryPort));
        assert!(!WizardStep::Pricing.is_required(RfqField::Origin));
    }
}
