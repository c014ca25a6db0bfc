//! Order dataset files and the embedded sample

use std::path::Path;

use miette::Diagnostic;
use rust_embed::Embed;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::store::{RowStore, StoreError};
use crate::entities::Record;
use crate::yaml::{self, YamlError};

#[derive(Embed)]
#[folder = "data/"]
struct SampleData;

/// File name of the embedded sample dataset
pub const SAMPLE_FILE: &str = "orders.yaml";

#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error("Dataset not found: {path}")]
    #[diagnostic(
        code(tradedesk::dataset::missing),
        help("Run 'tradedesk init' to create a sample dataset, or pass --data")
    )]
    NotFound { path: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] YamlError),

    #[error("Invalid dataset {path}: {source}")]
    #[diagnostic(code(tradedesk::dataset::duplicate))]
    Store { path: String, source: StoreError },

    #[error("Embedded sample dataset is missing")]
    #[diagnostic(code(tradedesk::dataset::sample))]
    MissingSample,
}

/// Read records from a YAML or JSON file
pub fn load_records(path: &Path) -> Result<Vec<Record>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound {
            path: path.display().to_string(),
        });
    }
    let records: Vec<Record> = yaml::parse_file(path)?;
    debug!(path = %path.display(), count = records.len(), "dataset loaded");
    Ok(records)
}

/// Read records into a row store, rejecting duplicate ids
pub fn load_store(path: &Path) -> Result<RowStore, DatasetError> {
    let records = load_records(path)?;
    RowStore::from_records(records).map_err(|source| DatasetError::Store {
        path: path.display().to_string(),
        source,
    })
}

/// Write records back in the format the file's extension names
pub fn save_records(path: &Path, records: &[Record]) -> Result<(), DatasetError> {
    yaml::write_file(path, records)?;
    info!(path = %path.display(), count = records.len(), "dataset saved");
    Ok(())
}

/// The embedded sample dataset as YAML text
pub fn sample_yaml() -> Result<String, DatasetError> {
    let file = SampleData::get(SAMPLE_FILE).ok_or(DatasetError::MissingSample)?;
    Ok(String::from_utf8_lossy(&file.data).into_owned())
}

/// The embedded sample dataset as records
pub fn sample_records() -> Result<Vec<Record>, DatasetError> {
    let content = sample_yaml()?;
    Ok(yaml::parse_yaml(&content, SAMPLE_FILE)?)
}
