//! Human-in-the-loop confirmation workflow.
//!
//! Extracted items queue here as `Pending` until a human approves or rejects
//! them. The full item list is rewritten to a JSON snapshot after every
//! mutation, so a restart resumes exactly where the last mutation left off.

pub mod error;
pub mod state_machine;
pub mod store;
pub mod types;

pub use error::ConfirmError;
pub use store::ConfirmationStore;
pub use types::{ConfirmationItem, ConfirmationStatus};
