//! Research worker: document indexing and semantic search.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use taskweave_core::WorkItem;
use taskweave_vector::{Embedder, VectorIndex};

use crate::error::AgentError;
use crate::runtime::Agent;
use crate::workers::require_str;

const DEFAULT_SEARCH_K: usize = 5;

pub struct ResearchWorker {
    capabilities: Vec<String>,
    embedder: Arc<dyn Embedder>,
    index: Arc<VectorIndex>,
}

impl ResearchWorker {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<VectorIndex>) -> Self {
        Self {
            capabilities: vec!["index_document".to_string(), "semantic_search".to_string()],
            embedder,
            index,
        }
    }

    fn index_document(&self, item: &WorkItem) -> Result<serde_json::Value, AgentError> {
        let text = require_str(&item.payload, "text")?;
        let metadata = item
            .payload
            .get("metadata")
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        let id = Uuid::new_v4();
        let texts = vec![text.to_string()];
        let vectors = self.embedder.embed(&texts);
        self.index.add(&[id], &texts, &vectors, &[metadata]);
        debug!(%id, chars = text.len(), "document chunk indexed");

        Ok(serde_json::json!({"indexed": 1, "id": id, "total": self.index.len()}))
    }

    fn search(&self, item: &WorkItem) -> Result<serde_json::Value, AgentError> {
        let query = require_str(&item.payload, "query")?;
        let k = item
            .payload
            .get("k")
            .and_then(serde_json::Value::as_u64)
            .map(|k| k as usize)
            .unwrap_or(DEFAULT_SEARCH_K);

        let vectors = self.embedder.embed(&[query.to_string()]);
        let hits = self.index.search(&vectors[0], k);

        let results: Vec<serde_json::Value> = hits
            .iter()
            .map(|hit| {
                serde_json::json!({
                    "text": hit.text,
                    "metadata": hit.metadata,
                    "score": hit.score,
                })
            })
            .collect();
        Ok(serde_json::json!({"query": query, "results": results}))
    }
}

#[async_trait]
impl Agent for ResearchWorker {
    fn agent_id(&self) -> &str {
        "research_agent"
    }

    fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    async fn process(&self, item: WorkItem) -> Result<serde_json::Value, AgentError> {
        match item.capability.as_str() {
            "index_document" => self.index_document(&item),
            "semantic_search" => self.search(&item),
            other => Err(AgentError::InvalidPayload(format!(
                "capability '{}' not handled by research agent",
                other
            ))),
        }
    }
}
