//! Movement labels loaded at startup.

use std::path::Path;

use tracing::info;

use crate::error::{ModelError, ModelResult};

/// Default location of the newline-delimited label file.
pub const DEFAULT_LABELS_PATH: &str = "assets/labels.txt";

/// Movement labels in file order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Build from label text: one label per line, blank lines ignored.
    pub fn parse(text: &str) -> ModelResult<Self> {
        let labels: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if labels.is_empty() {
            return Err(ModelError::label_source("label list is empty"));
        }

        Ok(Self { labels })
    }

    /// Load from a file. A missing or empty file is an error.
    pub fn load(path: impl AsRef<Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ModelError::label_source(format!("cannot read {}: {}", path.display(), e))
        })?;

        let set = Self::parse(&text).map_err(|e| match e {
            ModelError::LabelSource(msg) => {
                ModelError::label_source(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        info!("Loaded {} labels from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    /// First label, used as the default dropdown selection.
    pub fn default_label(&self) -> &str {
        // Non-empty by construction.
        &self.labels[0]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
