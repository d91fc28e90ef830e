//! Error types for text extraction.

use std::path::PathBuf;

use taskweave_core::TaskweaveError;

/// Errors from reading or analyzing source text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ExtractError> for TaskweaveError {
    fn from(err: ExtractError) -> Self {
        TaskweaveError::Extraction(err.to_string())
    }
}
