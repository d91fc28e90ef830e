//! Built-in worker agents.
//!
//! Each worker implements [`Agent`](crate::runtime::Agent) for one slice of
//! the pipeline and publishes its domain event when it finishes a unit of
//! work; the runtime layer adds the generic work_completed/work_failed
//! events on top.

pub mod conflict;
pub mod document;
pub mod extraction;
pub mod research;
pub mod synthesis;

pub use conflict::ConflictWorker;
pub use document::DocumentWorker;
pub use extraction::ExtractionWorker;
pub use research::ResearchWorker;
pub use synthesis::SynthesisWorker;

use crate::error::AgentError;

/// Pull a required string field out of a work item payload.
pub(crate) fn require_str<'a>(
    payload: &'a serde_json::Value,
    field: &str,
) -> Result<&'a str, AgentError> {
    payload
        .get(field)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| AgentError::InvalidPayload(format!("missing '{}' field", field)))
}
