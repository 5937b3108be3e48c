//! Documentation extraction seam.
//!
//! The comment-extraction engine itself is an external collaborator; the
//! pipeline only hands it a base path and persists the structured records
//! it emits.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extraction errors.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Engine-reported failure.
    #[error("extraction failed: {0}")]
    Engine(String),
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// One structured comment record emitted by the extraction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    /// Record identifier, unique within a run.
    pub id: String,

    /// Record kind (e.g. `directive`, `service`).
    pub kind: String,

    /// Documented symbol name.
    pub name: String,

    /// Extracted description text.
    pub description: String,

    /// Source file the comment was read from.
    pub source_path: PathBuf,
}

/// The extraction engine contract: given a base path, emit comment records.
pub trait DocExtractor {
    /// Scan sources under `base_path` and return all extracted records.
    fn extract(&self, base_path: &Path) -> Result<Vec<CommentRecord>>;
}
