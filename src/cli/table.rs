//! Rendering rows as tables, TSV/CSV, JSON, YAML or bare ids

use std::io::Write;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

/// Rows of display text with a header
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bordered table for terminals
    pub fn render(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.clone());
        for row in &self.rows {
            builder.push_record(row.clone());
        }
        let mut table = builder.build();
        table.with(Style::rounded());
        table.to_string()
    }

    /// Delimited text with a header row
    pub fn render_delimited(&self, delimiter: u8) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());
        writer.write_record(&self.headers).into_diagnostic()?;
        for row in &self.rows {
            writer.write_record(row).into_diagnostic()?;
        }
        let bytes = writer.into_inner().into_diagnostic()?;
        String::from_utf8(bytes).into_diagnostic()
    }
}

/// Print a list in `format`
///
/// `items` feed JSON/YAML, `ids` feed the id format, and `table` feeds the
/// text formats.
pub fn print_list<T: Serialize>(
    format: OutputFormat,
    items: &[T],
    ids: &[String],
    table: &TextTable,
) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).into_diagnostic()?;
            writeln!(out, "{}", json).into_diagnostic()?;
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(items).into_diagnostic()?;
            write!(out, "{}", yaml).into_diagnostic()?;
        }
        OutputFormat::Id => {
            for id in ids {
                writeln!(out, "{}", id).into_diagnostic()?;
            }
        }
        OutputFormat::Tsv => {
            write!(out, "{}", table.render_delimited(b'\t')?).into_diagnostic()?;
        }
        OutputFormat::Csv => {
            write!(out, "{}", table.render_delimited(b',')?).into_diagnostic()?;
        }
        OutputFormat::Table | OutputFormat::Auto => {
            writeln!(out, "{}", table.render()).into_diagnostic()?;
        }
    }
    Ok(())
}

/// Print one item as JSON or YAML (text formats fall back to YAML)
pub fn print_item<T: Serialize>(format: OutputFormat, item: &T) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item).into_diagnostic()?);
        }
        _ => {
            print!("{}", serde_yml::to_string(item).into_diagnostic()?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TextTable {
        let mut t = TextTable::new(["#", "Product Name", "Price (USD/MT)"]);
        t.push(["1", "Wheat", "$245.50"]);
        t.push(["2", "Corn, yellow", "$1,198.00"]);
        t
    }

    #[test]
    fn test_tsv() {
        let tsv = sample().render_delimited(b'\t').unwrap();
        assert_eq!(tsv.lines().nth(1), Some("1\tWheat\t$245.50"));
        insta::assert_snapshot!(
            sample().render_delimited(b',').unwrap().lines().next().unwrap(),
            @"#,Product Name,Price (USD/MT)"
        );
    }

    #[test]
    fn test_csv_quotes_commas() {
        let csv = sample().render_delimited(b',').unwrap();
        assert!(csv.contains("\"Corn, yellow\",\"$1,198.00\""));
    }

    #[test]
    fn test_render_has_headers() {
        let text = sample().render();
        assert!(text.contains("Product Name"));
        assert!(text.contains("$1,198.00"));
    }
}
