//! Diagnostics for dataset and document parse failures

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Failed to read {path}: {source}")]
    #[diagnostic(code(tradedesk::io))]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize {path}: {message}")]
    #[diagnostic(code(tradedesk::serialize))]
    Serialize { path: String, message: String },
}

/// A parse error pointing into the offending file
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid {format} in {filename}: {message}")]
#[diagnostic(
    code(tradedesk::parse),
    help("Each entry needs id, header, status, quantity and price")
)]
pub struct YamlSyntaxError {
    pub filename: String,
    pub format: &'static str,
    pub message: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let span = err
            .location()
            .map(|loc| SourceSpan::from((clamp_offset(loc.index(), content), 1)));
        Self {
            filename: filename.to_string(),
            format: "YAML",
            message: err.to_string(),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }

    pub fn from_json_error(err: &serde_json::Error, content: &str, filename: &str) -> Self {
        let span = (err.line() > 0).then(|| {
            let offset = line_column_offset(content, err.line(), err.column());
            SourceSpan::from((clamp_offset(offset, content), 1))
        });
        Self {
            filename: filename.to_string(),
            format: "JSON",
            message: err.to_string(),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }

    pub fn span(&self) -> Option<SourceSpan> {
        self.span
    }
}

/// Byte offset of a 1-based line and column
fn line_column_offset(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    line_start + column.saturating_sub(1)
}

fn clamp_offset(offset: usize, content: &str) -> usize {
    offset.min(content.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column_offset() {
        let content = "ab\ncd\nef";
        assert_eq!(line_column_offset(content, 1, 1), 0);
        assert_eq!(line_column_offset(content, 2, 2), 4);
        assert_eq!(line_column_offset(content, 3, 1), 6);
    }

    #[test]
    fn test_json_error_has_span() {
        let content = "[\n  {\"id\": }\n]";
        let err = serde_json::from_str::<serde_json::Value>(content).unwrap_err();
        let diag = YamlSyntaxError::from_json_error(&err, content, "orders.json");
        assert!(diag.span().is_some());
        assert!(diag.to_string().starts_with("Invalid JSON in orders.json"));
    }
}
