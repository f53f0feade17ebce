//! Demo clips for each known movement.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Route prefix under which example clips are served.
pub const ASSET_ROUTE: &str = "/assets";

/// Movement label to demo clip filename.
const EXAMPLE_CLIPS: [(&str, &str); 9] = [
    ("bar-facing burpee", "bar-facing burpee_1.mp4"),
    ("chest-to-bar", "chest-to-bar_46.mp4"),
    ("deadlift", "deadlift_64.mp4"),
    ("double-unders", "double-unders_73.mp4"),
    ("ghd", "ghd_79.mp4"),
    ("ohs", "ohs_142.mp4"),
    ("power clean", "power clean_262.mp4"),
    ("shspu", "shspu_291.mp4"),
    ("thruster", "thruster_32.mp4"),
];

/// A static example clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssetReference {
    pub label: String,
    pub filename: String,
    /// Public URL of the clip.
    pub url: String,
}

impl AssetReference {
    fn new(label: &str, filename: &str) -> Self {
        Self {
            label: label.to_string(),
            filename: filename.to_string(),
            url: format!("{}/{}", ASSET_ROUTE, urlencoding::encode(filename)),
        }
    }
}

/// Fixed catalog of example clips.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExampleCatalog;

impl ExampleCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Look up the example clip for a label.
    pub fn lookup(&self, label: &str) -> ModelResult<AssetReference> {
        EXAMPLE_CLIPS
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(known, filename)| AssetReference::new(known, filename))
            .ok_or_else(|| ModelError::unknown_label(label))
    }
}
