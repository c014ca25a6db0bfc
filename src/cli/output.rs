//! Resolving `--output auto`

use crate::cli::OutputFormat;

/// Auto means a table for lists and YAML for a single item
pub fn effective_format(format: OutputFormat, is_list: bool) -> OutputFormat {
    match (format, is_list) {
        (OutputFormat::Auto, true) => OutputFormat::Table,
        (OutputFormat::Auto, false) => OutputFormat::Yaml,
        (other, _) => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_format() {
        assert_eq!(effective_format(OutputFormat::Auto, true), OutputFormat::Table);
        assert_eq!(effective_format(OutputFormat::Auto, false), OutputFormat::Yaml);
        assert_eq!(effective_format(OutputFormat::Csv, false), OutputFormat::Csv);
    }
}
