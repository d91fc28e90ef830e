//! The workspace context object.
//!
//! Explicitly constructed, explicitly started and stopped: there is no
//! process-global instance. `open` wires the bus, agents, registry, and
//! stores together and registers every event subscription before the bus can
//! start, so no subscriber misses an event to a registration race.
//!
//! Control flow once running: a parsed document or ingested text is routed
//! to the extraction agent; extracted items wait in the confirmation store;
//! approving a task-typed item routes it to task synthesis; a changed task
//! list triggers conflict detection.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use taskweave_agents::workers::{
    ConflictWorker, DocumentWorker, ExtractionWorker, ResearchWorker, SynthesisWorker,
};
use taskweave_agents::{AgentRegistry, AgentRuntime, RouteOutcome, Supervisor};
use taskweave_confirm::{ConfirmationItem, ConfirmationStore};
use taskweave_core::{
    topics, AgentStatus, EventBus, Result, Task, TaskweaveConfig, TaskweaveError, WorkItem,
};
use taskweave_extract::PlainTextExtractor;
use taskweave_llm::{LanguageModel, OllamaClient};
use taskweave_tasks::{detect, Conflict, TaskBoard};
use taskweave_vector::{Embedder, HashEmbedder, SearchHit, VectorIndex};

/// Characters per indexed chunk.
const CHUNK_SIZE: usize = 500;
/// Characters of context carried between adjacent chunks.
const CHUNK_OVERLAP: usize = 100;

/// Single-process pipeline context: bus, agents, confirmation store, task
/// board, and the produced API surface the outer layers call.
pub struct Workspace {
    config: TaskweaveConfig,
    bus: Arc<EventBus>,
    supervisor: Arc<Supervisor>,
    confirmations: Arc<ConfirmationStore>,
    board: Arc<TaskBoard>,
    embedder: Arc<dyn Embedder>,
    index: Arc<VectorIndex>,
}

impl Workspace {
    /// Build and wire the full pipeline. The only fatal conditions live
    /// here: an unusable data directory or confirmation snapshot.
    pub fn open(config: TaskweaveConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.general.data_dir)?;
        let storage_path = config.confirmation.storage_path(&config.general.data_dir);
        let confirmations = Arc::new(ConfirmationStore::open(&storage_path)?);

        let board = Arc::new(TaskBoard::with_threshold(
            config.synthesis.duplicate_threshold,
        ));
        let bus = Arc::new(EventBus::new());
        let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::default());
        let index = Arc::new(VectorIndex::new());

        let model: Option<Arc<dyn LanguageModel>> = if config.llm.enabled {
            Some(Arc::new(OllamaClient::new(&config.llm)))
        } else {
            info!("language model disabled, rule-based paths only");
            None
        };

        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(AgentRuntime::new(
            Arc::new(DocumentWorker::new(
                Arc::clone(&bus),
                Arc::new(PlainTextExtractor::new()),
            )),
            Arc::clone(&bus),
        )))?;
        registry.register(Arc::new(AgentRuntime::new(
            Arc::new(ExtractionWorker::new(
                Arc::clone(&bus),
                Arc::clone(&confirmations),
                model.clone(),
            )),
            Arc::clone(&bus),
        )))?;
        registry.register(Arc::new(AgentRuntime::new(
            Arc::new(SynthesisWorker::new(Arc::clone(&bus), Arc::clone(&board))),
            Arc::clone(&bus),
        )))?;
        registry.register(Arc::new(AgentRuntime::new(
            Arc::new(ConflictWorker::new(Arc::clone(&bus), model)),
            Arc::clone(&bus),
        )))?;
        registry.register(Arc::new(AgentRuntime::new(
            Arc::new(ResearchWorker::new(Arc::clone(&embedder), Arc::clone(&index))),
            Arc::clone(&bus),
        )))?;

        let supervisor = Arc::new(Supervisor::new(registry));

        // Processed documents fan out to indexing and extraction.
        {
            let supervisor = Arc::clone(&supervisor);
            bus.subscribe(
                topics::DOCUMENT_PROCESSED,
                Box::new(move |event| {
                    let text = event
                        .payload
                        .get("text")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or_default();
                    if text.trim().is_empty() {
                        return Ok(());
                    }
                    let source = event
                        .payload
                        .get("source")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or("unknown");

                    for chunk in chunk_text(text, CHUNK_SIZE, CHUNK_OVERLAP) {
                        supervisor.route(WorkItem::new(
                            "index_document",
                            serde_json::json!({"text": chunk, "metadata": {"source": source}}),
                        ));
                    }
                    supervisor.route(WorkItem::new(
                        "extract_actions",
                        serde_json::json!({"text": text, "source": source}),
                    ));
                    Ok(())
                }),
            )
            .map_err(|e| TaskweaveError::Bus(e.to_string()))?;
        }

        // Every task-list change gets a fresh conflict report.
        {
            let supervisor = Arc::clone(&supervisor);
            bus.subscribe(
                topics::TASKS_SYNTHESIZED,
                Box::new(move |event| {
                    let Some(tasks) = event.payload.get("tasks") else {
                        return Ok(());
                    };
                    if tasks.as_array().is_some_and(|a| !a.is_empty()) {
                        supervisor.route(WorkItem::new(
                            "detect_conflicts",
                            serde_json::json!({"tasks": tasks.clone()}),
                        ));
                    }
                    Ok(())
                }),
            )
            .map_err(|e| TaskweaveError::Bus(e.to_string()))?;
        }

        Ok(Self {
            config,
            bus,
            supervisor,
            confirmations,
            board,
            embedder,
            index,
        })
    }

    /// Start the bus dispatch task and every agent worker.
    pub fn start(&self) -> Result<()> {
        self.bus
            .start()
            .map_err(|e| TaskweaveError::Bus(e.to_string()))?;
        self.supervisor.start_all()?;
        info!("workspace started");
        Ok(())
    }

    /// Stop all agents, then the bus. In-flight work finishes first.
    pub fn stop(&self) {
        self.supervisor.stop_all();
        self.bus.stop();
        info!("workspace stopped");
    }

    // =========================================================================
    // Produced API surface
    // =========================================================================

    /// Route an arbitrary capability-tagged work item.
    pub fn route_task(&self, item: WorkItem) -> RouteOutcome {
        self.supervisor.route(item)
    }

    pub fn agent_statuses(&self) -> BTreeMap<String, AgentStatus> {
        self.supervisor.registry().statuses()
    }

    pub fn pending_confirmations(&self, item_type: Option<&str>) -> Vec<ConfirmationItem> {
        self.confirmations.pending(item_type)
    }

    /// Approve an item; approved task items flow into task synthesis with
    /// whatever data the human left on them.
    pub fn approve_confirmation(
        &self,
        id: &str,
        edited_data: Option<serde_json::Value>,
    ) -> Result<ConfirmationItem> {
        let item = self.confirmations.approve(id, edited_data)?;
        if item.item_type == "task" {
            let outcome = self.supervisor.route(WorkItem::new(
                "synthesize_tasks",
                serde_json::json!({"actions": [item.data.clone()]}),
            ));
            if !outcome.is_routed() {
                warn!(id = %item.id, "approved task could not be routed to synthesis");
            }
        }
        Ok(item)
    }

    pub fn reject_confirmation(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<ConfirmationItem> {
        Ok(self.confirmations.reject(id, reason)?)
    }

    /// Authoritative tasks, priority-sorted.
    pub fn tasks(&self) -> Vec<Task> {
        self.board.all_tasks()
    }

    /// Conflict report over the given tasks, or over the current board
    /// snapshot (insertion order, so indices are stable) when none given.
    pub fn detect_conflicts(&self, tasks: Option<&[Task]>) -> Vec<Conflict> {
        match tasks {
            Some(tasks) => detect(tasks),
            None => detect(&self.board.raw_tasks()),
        }
    }

    /// Route a file to the document agent based on its extension.
    pub fn process_file(&self, path: &Path) -> RouteOutcome {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "unknown".to_string());
        self.supervisor.route(WorkItem::new(
            format!("parse_{}", extension),
            serde_json::json!({"file_path": path.display().to_string()}),
        ))
    }

    /// Feed raw text (transcript, manual notes) straight to extraction.
    pub fn ingest_text(&self, text: &str, source: &str) -> RouteOutcome {
        self.supervisor.route(WorkItem::new(
            "extract_actions",
            serde_json::json!({"text": text, "source": source}),
        ))
    }

    /// Synchronous semantic search over everything indexed so far.
    pub fn search(&self, query: &str, k: usize) -> Vec<SearchHit> {
        let vectors = self.embedder.embed(&[query.to_string()]);
        match vectors.first() {
            Some(vector) => self.index.search(vector, k),
            None => Vec::new(),
        }
    }

    pub fn config(&self) -> &TaskweaveConfig {
        &self.config
    }
}

/// Split text into overlapping chunks, preferring sentence/line boundaries
/// past the midpoint of each chunk.
fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= chunk_size {
        return vec![text.trim().to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let mut slice_end = end;

        if end < chars.len() {
            let window = &chars[start..end];
            if let Some(pos) = window.iter().rposition(|c| *c == '.' || *c == '\n') {
                if pos > chunk_size / 2 {
                    slice_end = start + pos + 1;
                }
            }
        }

        let chunk: String = chars[start..slice_end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if slice_end >= chars.len() {
            break;
        }
        let next_start = slice_end.saturating_sub(overlap);
        // Overlap must never stall the walk.
        start = if next_start > start { next_start } else { slice_end };
    }

    chunks
}
