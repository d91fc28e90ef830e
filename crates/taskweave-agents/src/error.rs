//! Error types for the agent layer.

use taskweave_core::TaskweaveError;

/// Errors from an agent's processing function or runtime.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The processing function failed. The runtime converts this into a
    /// `work_failed` event and keeps the worker alive.
    #[error("Processing failed: {0}")]
    Processing(String),
    /// The payload did not carry the fields the capability requires.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("Agent already running: {0}")]
    AlreadyRunning(String),
}

impl From<AgentError> for TaskweaveError {
    fn from(err: AgentError) -> Self {
        TaskweaveError::Agent(err.to_string())
    }
}

/// Errors from agent registration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Agent already registered: {0}")]
    DuplicateAgent(String),
    /// Two agents declaring one capability is a configuration error, caught
    /// here instead of silently routing to whichever registered first.
    #[error("Capability '{capability}' already owned by agent '{owner}'")]
    DuplicateCapability { capability: String, owner: String },
}

impl From<RegistryError> for TaskweaveError {
    fn from(err: RegistryError) -> Self {
        TaskweaveError::Agent(err.to_string())
    }
}
