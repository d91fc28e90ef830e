//! Ollama-backed implementation of [`LanguageModel`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use taskweave_core::config::LlmConfig;
use taskweave_core::{ActionItem, Priority, Severity, Task};
use taskweave_tasks::{Conflict, ConflictKind};

use crate::json::extract_json;
use crate::{LanguageModel, LlmError, MeetingDigest};

const EXTRACT_SYSTEM: &str = "You are a task extraction assistant. Extract action items from text.\n\
Return ONLY a JSON array of tasks with this format:\n\
[{\"task\": \"description\", \"assignee\": \"name or null\", \"deadline\": \"date or null\", \"priority\": \"urgent/high/medium/normal\"}]";

const SUMMARIZE_SYSTEM: &str = "You are a meeting summarization assistant. Create concise summaries.\n\
Return ONLY a JSON object with this format:\n\
{\"summary\": \"brief summary\", \"key_points\": [\"point1\", \"point2\"], \"decisions\": [\"decision1\"]}";

const CONFLICT_SYSTEM: &str = "You are a conflict detection assistant. Identify scheduling conflicts, duplicate tasks, and issues.\n\
Return ONLY a JSON array of conflicts:\n\
[{\"type\": \"duplicate/deadline_conflict/missing_info\", \"description\": \"...\", \"affected_tasks\": [0, 1]}]";

/// Confidence assigned to model-extracted items that carry none of their own.
const MODEL_ITEM_CONFIDENCE: f64 = 0.85;

/// Client for a local Ollama daemon.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "reqwest builder failed, using default client");
                reqwest::Client::new()
            });
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            system,
            options: GenerateOptions { temperature },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| LlmError::Unavailable(e.to_string()))?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
        debug!(model = %self.model, chars = body.response.len(), "model completion received");
        Ok(body.response)
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        self.generate(prompt, system, 0.7).await
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let probe = self
            .client
            .get(&url)
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .await;
        matches!(probe, Ok(response) if response.status().is_success())
    }

    async fn extract_action_items(&self, text: &str) -> Result<Vec<ActionItem>, LlmError> {
        let prompt = format!(
            "Extract all action items and tasks from this text:\n\n{}\n\nReturn only the JSON array, no other text.",
            text
        );
        let response = self.generate(&prompt, Some(EXTRACT_SYSTEM), 0.3).await?;

        let raw: Vec<RawActionItem> = extract_json(&response).ok_or_else(|| {
            LlmError::MalformedResponse("no JSON array of tasks in response".to_string())
        })?;
        Ok(raw.into_iter().map(RawActionItem::into_action_item).collect())
    }

    async fn summarize(&self, text: &str) -> Result<MeetingDigest, LlmError> {
        let prompt = format!(
            "Summarize this meeting:\n\n{}\n\nReturn only the JSON object, no other text.",
            text
        );
        let response = self.generate(&prompt, Some(SUMMARIZE_SYSTEM), 0.5).await?;

        extract_json(&response).ok_or_else(|| {
            LlmError::MalformedResponse("no JSON digest in response".to_string())
        })
    }

    async fn detect_conflicts(&self, tasks: &[Task]) -> Result<Vec<Conflict>, LlmError> {
        let task_json = serde_json::to_string_pretty(tasks)
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
        let prompt = format!(
            "Analyze these tasks for conflicts:\n\n{}\n\nReturn only the JSON array of conflicts, no other text.",
            task_json
        );
        let response = self.generate(&prompt, Some(CONFLICT_SYSTEM), 0.3).await?;

        let raw: Vec<RawConflict> = extract_json(&response).ok_or_else(|| {
            LlmError::MalformedResponse("no JSON array of conflicts in response".to_string())
        })?;
        Ok(raw.into_iter().filter_map(RawConflict::into_conflict).collect())
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Action item as the model emits it.
#[derive(Deserialize)]
struct RawActionItem {
    #[serde(default)]
    task: String,
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default)]
    deadline: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

impl RawActionItem {
    fn into_action_item(self) -> ActionItem {
        ActionItem {
            text: self.task,
            assignee: self.assignee.filter(|a| !a.is_empty() && a != "null"),
            deadline: self.deadline.filter(|d| !d.is_empty() && d != "null"),
            priority: self.priority.and_then(|p| p.parse::<Priority>().ok()),
            confidence: self.confidence.unwrap_or(MODEL_ITEM_CONFIDENCE),
        }
    }
}

/// Conflict as the model emits it. Unknown types are dropped rather than
/// guessed at.
#[derive(Deserialize)]
struct RawConflict {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    affected_tasks: Vec<usize>,
}

impl RawConflict {
    fn into_conflict(self) -> Option<Conflict> {
        let (kind, severity) = match self.kind.as_str() {
            "duplicate" => (ConflictKind::Duplicate, Severity::Medium),
            "deadline_conflict" => (ConflictKind::DeadlineConflict, Severity::High),
            "missing_info" => (ConflictKind::MissingInfo, Severity::Low),
            _ => return None,
        };
        Some(Conflict {
            kind,
            description: self.description,
            affected_task_indices: self.affected_tasks,
            severity,
            assignee: None,
            date: None,
            missing_fields: Vec::new(),
        })
    }
}
