//! RFQ outbox - a directory of submitted RFQ documents
//!
//! Each submission becomes `RFQ-<ULID>.yaml`. ULIDs sort by creation time, so
//! a name-ordered listing is also chronological.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::wizard::{RfqSink, SubmitError};
use crate::entities::{RfqDocument, RfqFields};
use crate::yaml;

/// Writes submitted RFQs into a directory
#[derive(Debug, Clone)]
pub struct OutboxSink {
    dir: PathBuf,
    author: String,
}

impl OutboxSink {
    pub fn new(dir: impl Into<PathBuf>, author: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            author: author.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a document with the given reference is written to
    pub fn path_for(&self, reference: &str) -> PathBuf {
        self.dir.join(format!("{}.yaml", reference))
    }
}

impl RfqSink for OutboxSink {
    fn submit(&mut self, fields: &RfqFields) -> Result<String, SubmitError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            SubmitError::Io(format!("{}: {}", self.dir.display(), e))
        })?;

        let doc = RfqDocument::new(fields.clone(), self.author.clone());
        let yaml = serde_yml::to_string(&doc).map_err(|e| SubmitError::Serialize(e.to_string()))?;
        let path = self.path_for(&doc.id);
        fs::write(&path, yaml).map_err(|e| SubmitError::Io(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "RFQ written to outbox");
        Ok(doc.id)
    }
}

/// Every RFQ document in `dir`, oldest first
///
/// A missing directory is an empty outbox. Files that fail to parse are
/// skipped with a warning.
pub fn list(dir: &Path) -> Vec<RfqDocument> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut docs: Vec<RfqDocument> = WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            name.starts_with("RFQ-") && name.ends_with(".yaml")
        })
        .filter_map(|e| match yaml::parse_file::<RfqDocument>(e.path()) {
            Ok(doc) => Some(doc),
            Err(err) => {
                warn!(path = %e.path().display(), error = %err, "skipping unreadable RFQ");
                None
            }
        })
        .collect();

    docs.sort_by(|a, b| a.submitted.cmp(&b.submitted).then_with(|| a.id.cmp(&b.id)));
    docs
}
