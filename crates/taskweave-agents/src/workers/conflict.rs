//! Conflict worker: runs the detector over a task snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use taskweave_core::{topics, EventBus, Task, WorkItem};
use taskweave_llm::LanguageModel;
use taskweave_tasks::{detect, Conflict};

use crate::error::AgentError;
use crate::runtime::Agent;

pub struct ConflictWorker {
    capabilities: Vec<String>,
    bus: Arc<EventBus>,
    model: Option<Arc<dyn LanguageModel>>,
}

impl ConflictWorker {
    pub fn new(bus: Arc<EventBus>, model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self {
            capabilities: vec!["detect_conflicts".to_string()],
            bus,
            model,
        }
    }
}

#[async_trait]
impl Agent for ConflictWorker {
    fn agent_id(&self) -> &str {
        "conflict_detector"
    }

    fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    async fn process(&self, item: WorkItem) -> Result<serde_json::Value, AgentError> {
        let tasks_value = item
            .payload
            .get("tasks")
            .cloned()
            .ok_or_else(|| AgentError::InvalidPayload("missing 'tasks' array".to_string()))?;
        let tasks: Vec<Task> = serde_json::from_value(tasks_value)
            .map_err(|e| AgentError::InvalidPayload(format!("bad 'tasks' array: {}", e)))?;

        let mut conflicts: Vec<Conflict> = detect(&tasks);

        // The model may append conflicts of the same shape; its absence or
        // failure leaves the deterministic report untouched.
        if let Some(model) = &self.model {
            if model.is_available().await {
                match model.detect_conflicts(&tasks).await {
                    Ok(extra) => conflicts.extend(extra),
                    Err(e) => debug!(error = %e, "model conflict pass skipped"),
                }
            }
        }

        info!(tasks = tasks.len(), conflicts = conflicts.len(), "conflict report computed");

        let result = serde_json::json!({
            "count": conflicts.len(),
            "conflicts": conflicts,
        });
        self.bus
            .publish(self.agent_id(), topics::CONFLICTS_DETECTED, result.clone());
        Ok(result)
    }
}
