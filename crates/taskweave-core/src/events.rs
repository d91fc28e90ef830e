use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Timestamp;

/// Well-known event types published by the built-in workers.
///
/// The bus itself routes on arbitrary string keys; these constants exist so
/// that publishers and subscribers agree on spelling.
pub mod topics {
    /// A document was read and its text cleaned (document worker).
    pub const DOCUMENT_PROCESSED: &str = "document_processed";
    /// Text was analyzed for action items and decisions (extraction worker).
    pub const TEXT_ANALYZED: &str = "text_analyzed";
    /// The authoritative task list changed (synthesis worker).
    pub const TASKS_SYNTHESIZED: &str = "tasks_synthesized";
    /// A conflict report was produced over a task snapshot (conflict worker).
    pub const CONFLICTS_DETECTED: &str = "conflicts_detected";
    /// An agent finished a work item successfully (any runtime).
    pub const WORK_COMPLETED: &str = "work_completed";
    /// An agent's process function failed; the agent keeps running.
    pub const WORK_FAILED: &str = "work_failed";
}

/// A single event on the bus. Immutable once published.
///
/// Ordering is per-subscriber-callback-invocation: the dispatch task invokes
/// callbacks in registration order for each event, but no total order exists
/// across event types or publishers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub source_agent: String,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    pub fn new(
        source_agent: impl Into<String>,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_agent: source_agent.into(),
            event_type: event_type.into(),
            payload,
            timestamp: Timestamp::now(),
        }
    }
}
