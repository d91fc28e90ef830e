//! Language model collaborator contract.
//!
//! The pipeline treats the model as an optional upstream: every operation
//! here has a deterministic rule-based twin in `taskweave-extract` /
//! `taskweave-tasks`, and callers fall back to it whenever the model is
//! unreachable. Nothing in this crate is ever fatal to the pipeline.

pub mod client;
pub mod json;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use taskweave_core::{ActionItem, Task, TaskweaveError};
use taskweave_tasks::Conflict;

pub use client::OllamaClient;

/// Errors from model calls.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport-level failure: daemon down, timeout, HTTP error. Callers
    /// switch to the rule-based path.
    #[error("Model unavailable: {0}")]
    Unavailable(String),
    /// The model answered but not in the shape we asked for.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
}

impl From<LlmError> for TaskweaveError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Unavailable(msg) => TaskweaveError::ModelUnavailable(msg),
            LlmError::MalformedResponse(msg) => TaskweaveError::Serialization(msg),
        }
    }
}

/// Structured meeting summary returned by [`LanguageModel::summarize`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MeetingDigest {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
}

/// Completion-capable model behind a narrow pipeline-facing contract.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Raw completion for a prompt with an optional system instruction.
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError>;

    /// Cheap reachability probe. `false` routes callers to rule-based paths.
    async fn is_available(&self) -> bool;

    /// Extract action items from free text.
    async fn extract_action_items(&self, text: &str) -> Result<Vec<ActionItem>, LlmError>;

    /// Summarize meeting-style text into a structured digest.
    async fn summarize(&self, text: &str) -> Result<MeetingDigest, LlmError>;

    /// Flag conflicts the deterministic passes cannot see. Results are
    /// appended to, never replace, the rule-based report.
    async fn detect_conflicts(&self, tasks: &[Task]) -> Result<Vec<Conflict>, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_into_taskweave_error() {
        let err: TaskweaveError = LlmError::Unavailable("connection refused".to_string()).into();
        assert!(matches!(err, TaskweaveError::ModelUnavailable(_)));

        let err: TaskweaveError = LlmError::MalformedResponse("not json".to_string()).into();
        assert!(matches!(err, TaskweaveError::Serialization(_)));
    }

    #[test]
    fn test_meeting_digest_tolerates_partial_json() {
        let digest: MeetingDigest =
            serde_json::from_str(r#"{"summary": "short sync"}"#).unwrap();
        assert_eq!(digest.summary, "short sync");
        assert!(digest.key_points.is_empty());
        assert!(digest.decisions.is_empty());
    }
}
