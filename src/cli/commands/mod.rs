//! CLI command implementations

pub mod browse;
pub mod completions;
pub mod init;
pub mod orders;
pub mod rfq;
pub mod utils;
