//! Document parsing with source-pointing errors
//!
//! Datasets may be YAML or JSON; the format follows the file extension.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// On-disk document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` is JSON; everything else is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Parse YAML content into a typed value
pub fn parse_yaml<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content).map_err(|e| {
        YamlError::Syntax(YamlSyntaxError::from_serde_error(&e, content, filename))
    })
}

/// Parse JSON content into a typed value
pub fn parse_json<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_json::from_str(content).map_err(|e| {
        YamlError::Syntax(YamlSyntaxError::from_json_error(&e, content, filename))
    })
}

/// Parse a file in the format its extension names
pub fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let filename = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| YamlError::Io {
        path: filename.clone(),
        source,
    })?;
    match DocumentFormat::from_path(path) {
        DocumentFormat::Json => parse_json(&content, &filename),
        DocumentFormat::Yaml => parse_yaml(&content, &filename),
    }
}

/// Serialize `value` in the format `path`'s extension names and write it
pub fn write_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), YamlError> {
    let filename = path.display().to_string();
    let serialize_err = |message: String| YamlError::Serialize {
        path: filename.clone(),
        message,
    };
    let content = match DocumentFormat::from_path(path) {
        DocumentFormat::Json => {
            let mut s = serde_json::to_string_pretty(value).map_err(|e| serialize_err(e.to_string()))?;
            s.push('\n');
            s
        }
        DocumentFormat::Yaml => {
            serde_yml::to_string(value).map_err(|e| serialize_err(e.to_string()))?
        }
    };
    std::fs::write(path, content).map_err(|source| YamlError::Io {
        path: filename.clone(),
        source,
    })
}
