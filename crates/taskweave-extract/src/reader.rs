//! Source text readers.
//!
//! The pipeline consumes raw text through the [`TextExtractor`] contract.
//! Binary document formats (PDF, DOCX, spreadsheets, OCR) are external
//! collaborators that implement this trait out of tree; only the plain-text
//! adapter ships here.

use std::path::Path;

use tracing::debug;

use crate::error::ExtractError;

/// Extracts raw text from a source file.
pub trait TextExtractor: Send + Sync {
    /// Read and return the text content of `path`.
    ///
    /// Fails with [`ExtractError::UnsupportedFormat`] for formats this
    /// extractor does not handle: the caller reports that to the submitter
    /// without taking down the pipeline.
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Reader for plain-text files (txt, md, log).
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "txt" | "md" | "log" | "text" => {
                let text =
                    std::fs::read_to_string(path).map_err(|source| ExtractError::Unreadable {
                        path: path.to_path_buf(),
                        source,
                    })?;
                debug!(path = %path.display(), chars = text.len(), "text file read");
                Ok(text)
            }
            other => Err(ExtractError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                other.to_string()
            })),
        }
    }
}
