//! Shared utilities for CLI commands

use std::path::PathBuf;

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::dataset;
use crate::core::{Config, DataTable, TableOptions};

/// Dataset path: `--data` (or `TRADEDESK_DATA`), then config, then `orders.yaml`
pub fn data_path(global: &GlobalOpts, config: &Config) -> PathBuf {
    global.data.clone().unwrap_or_else(|| config.data_file())
}

/// Load the dataset into a table
pub fn load_table(path: &std::path::Path, options: TableOptions) -> Result<DataTable> {
    let store = dataset::load_store(path)?;
    DataTable::new(store, options).map_err(|e| miette::miette!("{}", e))
}

/// Parse an order id argument
pub fn parse_id(raw: &str) -> Result<u32> {
    raw.trim()
        .trim_start_matches('#')
        .parse::<u32>()
        .map_err(|_| miette::miette!("Invalid order id: {}", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert_eq!(parse_id("#7").unwrap(), 7);
        assert!(parse_id("abc").is_err());
    }
}
