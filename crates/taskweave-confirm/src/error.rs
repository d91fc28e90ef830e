//! Error types for the confirmation workflow.

use taskweave_core::TaskweaveError;

use crate::types::ConfirmationStatus;

/// Errors from confirmation store operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    /// The id is unknown. Surfaced to the caller: approve/reject on a
    /// missing item is a caller bug, not a pipeline failure.
    #[error("Confirmation item not found: {0}")]
    NotFound(String),
    #[error("Invalid state transition: {0} -> {1}")]
    InvalidTransition(ConfirmationStatus, ConfirmationStatus),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ConfirmError> for TaskweaveError {
    fn from(err: ConfirmError) -> Self {
        TaskweaveError::Confirmation(err.to_string())
    }
}
