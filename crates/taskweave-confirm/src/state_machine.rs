//! Confirmation state machine with validated transitions.
//!
//! Pending -> Approved
//! Pending -> Rejected
//!
//! Approved and Rejected are terminal; an item is confirmed or rejected
//! exactly once.

use crate::error::ConfirmError;
use crate::types::ConfirmationStatus;

/// Validate that a status transition is allowed.
pub fn validate_transition(
    from: ConfirmationStatus,
    to: ConfirmationStatus,
) -> Result<(), ConfirmError> {
    let valid = matches!(
        (from, to),
        (ConfirmationStatus::Pending, ConfirmationStatus::Approved)
            | (ConfirmationStatus::Pending, ConfirmationStatus::Rejected)
    );

    if valid {
        Ok(())
    } else {
        Err(ConfirmError::InvalidTransition(from, to))
    }
}
