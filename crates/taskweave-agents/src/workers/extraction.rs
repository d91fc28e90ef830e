//! Extraction worker: text in, confirmation-gated action items out.
//!
//! Prefers the language model when one is configured and reachable, and
//! falls back to the rule-based patterns otherwise: including when the
//! model answers but finds nothing. Every extracted action item is queued
//! for human confirmation; nothing becomes a task from here.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use taskweave_confirm::ConfirmationStore;
use taskweave_core::{topics, ActionItem, EventBus, WorkItem};
use taskweave_extract::{summarize, Decision, PatternSet};
use taskweave_llm::LanguageModel;

use crate::error::AgentError;
use crate::runtime::Agent;
use crate::workers::require_str;

/// Confidence attached to decisions lifted from a model digest.
const MODEL_DECISION_CONFIDENCE: f64 = 0.9;

pub struct ExtractionWorker {
    capabilities: Vec<String>,
    bus: Arc<EventBus>,
    confirmations: Arc<ConfirmationStore>,
    patterns: PatternSet,
    model: Option<Arc<dyn LanguageModel>>,
}

impl ExtractionWorker {
    pub fn new(
        bus: Arc<EventBus>,
        confirmations: Arc<ConfirmationStore>,
        model: Option<Arc<dyn LanguageModel>>,
    ) -> Self {
        Self {
            capabilities: vec![
                "extract_actions".to_string(),
                "summarize".to_string(),
                "extract_decisions".to_string(),
            ],
            bus,
            confirmations,
            patterns: PatternSet::new(),
            model,
        }
    }

    /// Model-backed extraction, or `None` when the model is absent, down,
    /// errored, or empty-handed.
    async fn try_model(
        &self,
        text: &str,
    ) -> Option<(Vec<ActionItem>, Option<taskweave_llm::MeetingDigest>)> {
        let model = self.model.as_ref()?;
        if !model.is_available().await {
            debug!("model not reachable, using rule-based extraction");
            return None;
        }

        match model.extract_action_items(text).await {
            Ok(items) if !items.is_empty() => {
                let digest = model.summarize(text).await.ok();
                Some((items, digest))
            }
            Ok(_) => {
                debug!("model returned no action items, using rule-based extraction");
                None
            }
            Err(e) => {
                warn!(error = %e, "model extraction failed, using rule-based extraction");
                None
            }
        }
    }
}

#[async_trait]
impl Agent for ExtractionWorker {
    fn agent_id(&self) -> &str {
        "meeting_agent"
    }

    fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    async fn process(&self, item: WorkItem) -> Result<serde_json::Value, AgentError> {
        let text = require_str(&item.payload, "text")?;
        let source = item
            .payload
            .get("source")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("manual");

        let model_output = self.try_model(text).await;
        let ai_powered = model_output.is_some();
        let (actions, digest) = match model_output {
            Some((items, digest)) => (items, digest),
            None => (self.patterns.extract_action_items(text), None),
        };

        let summary = digest
            .as_ref()
            .map(|d| d.summary.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| summarize(text));
        let decisions: Vec<Decision> = match &digest {
            Some(d) if !d.decisions.is_empty() => d
                .decisions
                .iter()
                .map(|text| Decision {
                    text: text.clone(),
                    confidence: MODEL_DECISION_CONFIDENCE,
                })
                .collect(),
            _ => self.patterns.extract_decisions(text),
        };
        let notes = self.patterns.extract_notes(text);
        let tags = self.patterns.extract_tags(text);

        info!(
            source,
            actions = actions.len(),
            decisions = decisions.len(),
            ai_powered,
            "text analyzed"
        );

        for action in &actions {
            let data = serde_json::json!({
                "task": action.text,
                "assignee": action.assignee.clone().unwrap_or_else(|| "unassigned".to_string()),
                "deadline": action.deadline.clone().unwrap_or_default(),
                "priority": action.priority.map(|p| p.to_string()).unwrap_or_else(|| "normal".to_string()),
                "confidence": action.confidence,
            });
            self.confirmations
                .add_for_confirmation("task", data, action.confidence)
                .map_err(|e| AgentError::Processing(e.to_string()))?;
        }

        let result = serde_json::json!({
            "source": source,
            "actions": actions,
            "decisions": decisions,
            "summary": summary,
            "notes": notes,
            "tags": tags,
            "ai_powered": ai_powered,
            "requires_confirmation": true,
        });
        self.bus
            .publish(self.agent_id(), topics::TEXT_ANALYZED, result.clone());
        Ok(result)
    }
}
