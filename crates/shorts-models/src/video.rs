//! Source video metadata.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata returned by the video source provider for a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceVideo {
    /// Provider-assigned video id (used for the local file name)
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Duration in seconds
    #[serde(rename = "duration")]
    pub duration_seconds: f64,
}

impl SourceVideo {
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration_seconds: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_seconds,
        }
    }

    /// File-system safe variant of the id.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        if stem.is_empty() {
            "source".to_string()
        } else {
            stem
        }
    }
}
