//! Synthesis worker: folds confirmed action items into the task board.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use taskweave_core::{topics, ActionItem, EventBus, Priority, WorkItem};
use taskweave_tasks::TaskBoard;

use crate::error::AgentError;
use crate::runtime::Agent;

pub struct SynthesisWorker {
    capabilities: Vec<String>,
    bus: Arc<EventBus>,
    board: Arc<TaskBoard>,
}

impl SynthesisWorker {
    pub fn new(bus: Arc<EventBus>, board: Arc<TaskBoard>) -> Self {
        Self {
            capabilities: vec!["synthesize_tasks".to_string()],
            bus,
            board,
        }
    }
}

#[async_trait]
impl Agent for SynthesisWorker {
    fn agent_id(&self) -> &str {
        "task_agent"
    }

    fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    async fn process(&self, item: WorkItem) -> Result<serde_json::Value, AgentError> {
        let actions = item
            .payload
            .get("actions")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| AgentError::InvalidPayload("missing 'actions' array".to_string()))?;

        let items: Vec<ActionItem> = actions.iter().filter_map(value_to_action_item).collect();
        let outcome = self.board.synthesize(&items);
        info!(
            added = outcome.added,
            duplicates = outcome.duplicates,
            total = outcome.total,
            "tasks synthesized"
        );

        let result = serde_json::json!({
            "count": outcome.total,
            "added": outcome.added,
            "duplicates": outcome.duplicates,
            "tasks": self.board.raw_tasks(),
        });
        self.bus
            .publish(self.agent_id(), topics::TASKS_SYNTHESIZED, result.clone());
        Ok(result)
    }
}

/// Read an action item out of loosely shaped payload data.
///
/// Accepts both the confirmation-data shape (`"task"`, `"unassigned"`
/// placeholder) and the typed `ActionItem` shape (`"text"`). Entries without
/// usable task text are skipped.
pub fn value_to_action_item(value: &serde_json::Value) -> Option<ActionItem> {
    let text = value
        .get("task")
        .or_else(|| value.get("text"))
        .and_then(serde_json::Value::as_str)?
        .trim();
    if text.is_empty() {
        return None;
    }

    let field = |name: &str| -> Option<String> {
        value
            .get(name)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("unassigned"))
            .map(str::to_string)
    };

    Some(ActionItem {
        text: text.to_string(),
        assignee: field("assignee"),
        deadline: value
            .get("deadline")
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        priority: value
            .get("priority")
            .and_then(serde_json::Value::as_str)
            .and_then(|p| p.parse::<Priority>().ok()),
        confidence: value
            .get("confidence")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(1.0),
    })
}
