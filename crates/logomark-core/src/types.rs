//! Core data types shared by the provider layer and the rename pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a vision model said about an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandResult {
    /// Brand or company name exactly as the model wrote it
    pub brand_name: String,

    /// Whether the model actually recognized a brand
    pub is_confident: bool,

    /// The model's explanation, if it gave one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl BrandResult {
    /// A result carrying no usable brand.
    pub fn unrecognized() -> Self {
        Self {
            brand_name: String::new(),
            is_confident: false,
            reasoning: None,
        }
    }
}

/// The rename chosen for one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameDecision {
    /// File that was identified
    pub source: PathBuf,

    /// Collision-free destination
    pub target: PathBuf,

    /// Model answer the target was derived from
    pub brand: BrandResult,

    /// Whether the filesystem rename was performed
    pub applied: bool,
}

impl RenameDecision {
    /// True when the file already bears its resolved name.
    pub fn is_unchanged(&self) -> bool {
        self.source == self.target
    }
}
