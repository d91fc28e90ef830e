//! Document worker: reads source files into text for the pipeline.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use taskweave_core::{topics, EventBus, WorkItem};
use taskweave_extract::TextExtractor;

use crate::error::AgentError;
use crate::runtime::Agent;
use crate::workers::require_str;

/// Turns `parse_*` work items into `document_processed` events.
///
/// Unsupported or corrupt files fail the work item (reported through the
/// runtime's `work_failed` event) without disturbing the pipeline.
pub struct DocumentWorker {
    capabilities: Vec<String>,
    bus: Arc<EventBus>,
    extractor: Arc<dyn TextExtractor>,
}

impl DocumentWorker {
    pub fn new(bus: Arc<EventBus>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            capabilities: vec![
                "parse_txt".to_string(),
                "parse_md".to_string(),
                "parse_log".to_string(),
            ],
            bus,
            extractor,
        }
    }
}

#[async_trait]
impl Agent for DocumentWorker {
    fn agent_id(&self) -> &str {
        "document_agent"
    }

    fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    async fn process(&self, item: WorkItem) -> Result<serde_json::Value, AgentError> {
        let file_path = require_str(&item.payload, "file_path")?;

        let text = self
            .extractor
            .extract(Path::new(file_path))
            .map_err(|e| AgentError::Processing(e.to_string()))?;
        info!(file_path, chars = text.len(), "document text extracted");

        let result = serde_json::json!({
            "file_path": file_path,
            "source": file_path,
            "text": text,
            "chars": text.len(),
        });
        self.bus
            .publish(self.agent_id(), topics::DOCUMENT_PROCESSED, result.clone());
        Ok(result)
    }
}
