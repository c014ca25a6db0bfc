//! Tradedesk: a terminal order desk for commodity trading
//!
//! Orders live in a plain YAML (or JSON) file. The [`core::DataTable`] engine
//! filters, sorts, pages, selects and reorders them; the [`core::RfqWizard`]
//! collects a request for quote over three validated steps and hands it to an
//! [`core::RfqSink`].

pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
