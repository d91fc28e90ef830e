//! Generic execution shell around a capability-specific processing function.
//!
//! The runtime owns a private unbounded FIFO queue and one worker task. The
//! worker pulls one item at a time, reports status, and publishes a
//! `work_completed` or `work_failed` event per item. A failed item never
//! terminates the worker: the agent stays live for the next item.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Notify;
use tracing::{debug, warn};

use taskweave_core::{topics, AgentStatus, EventBus, WorkItem};

use crate::error::AgentError;

/// A capability-specific processing function with identity metadata.
///
/// `process` runs on the agent's dedicated worker task, one item at a time;
/// there is no preemption within a call.
#[async_trait]
pub trait Agent: Send + Sync {
    fn agent_id(&self) -> &str;
    fn capabilities(&self) -> &[String];
    async fn process(&self, item: WorkItem) -> Result<serde_json::Value, AgentError>;
}

/// Execution shell for one agent: queue, worker task, status cell.
pub struct AgentRuntime {
    agent: Arc<dyn Agent>,
    bus: Arc<EventBus>,
    tx: UnboundedSender<WorkItem>,
    rx: Mutex<Option<UnboundedReceiver<WorkItem>>>,
    status: Arc<Mutex<AgentStatus>>,
    shutdown: Arc<Notify>,
}

impl AgentRuntime {
    pub fn new(agent: Arc<dyn Agent>, bus: Arc<EventBus>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            agent,
            bus,
            tx,
            rx: Mutex::new(Some(rx)),
            status: Arc::new(Mutex::new(AgentStatus::Idle)),
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn agent_id(&self) -> &str {
        self.agent.agent_id()
    }

    pub fn capabilities(&self) -> &[String] {
        self.agent.capabilities()
    }

    pub fn status(&self) -> AgentStatus {
        *self.status.lock().unwrap()
    }

    /// Append a work item to the private queue. Never blocks; FIFO order is
    /// preserved within this agent. Items enqueued before `start` are
    /// processed once the worker runs.
    pub fn enqueue(&self, item: WorkItem) {
        if self.tx.send(item).is_err() {
            warn!(agent_id = %self.agent_id(), "agent queue closed, work item dropped");
        }
    }

    /// Spawn the worker task.
    pub fn start(&self) -> Result<(), AgentError> {
        let rx = self
            .rx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| AgentError::AlreadyRunning(self.agent_id().to_string()))?;

        debug!(agent_id = %self.agent_id(), "agent started");
        tokio::spawn(worker_loop(
            Arc::clone(&self.agent),
            rx,
            Arc::clone(&self.status),
            Arc::clone(&self.bus),
            Arc::clone(&self.shutdown),
        ));
        Ok(())
    }

    /// Signal the worker to exit. An item already being processed finishes;
    /// nothing else is pulled from the queue.
    pub fn stop(&self) {
        debug!(agent_id = %self.agent_id(), "agent stop requested");
        self.shutdown.notify_one();
    }
}

async fn worker_loop(
    agent: Arc<dyn Agent>,
    mut rx: UnboundedReceiver<WorkItem>,
    status: Arc<Mutex<AgentStatus>>,
    bus: Arc<EventBus>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.notified() => break,
            item = rx.recv() => match item {
                Some(item) => run_one(&agent, item, &status, &bus).await,
                None => break,
            },
        }
    }
    debug!(agent_id = %agent.agent_id(), "agent worker exited");
}

async fn run_one(
    agent: &Arc<dyn Agent>,
    item: WorkItem,
    status: &Mutex<AgentStatus>,
    bus: &EventBus,
) {
    *status.lock().unwrap() = AgentStatus::Processing;

    match agent.process(item.clone()).await {
        Ok(result) => {
            *status.lock().unwrap() = AgentStatus::Idle;
            bus.publish(
                agent.agent_id(),
                topics::WORK_COMPLETED,
                serde_json::json!({
                    "agent_id": agent.agent_id(),
                    "work_item": item,
                    "result": result,
                }),
            );
        }
        Err(e) => {
            *status.lock().unwrap() = AgentStatus::Error;
            warn!(
                agent_id = %agent.agent_id(),
                capability = %item.capability,
                error = %e,
                "work item failed"
            );
            bus.publish(
                agent.agent_id(),
                topics::WORK_FAILED,
                serde_json::json!({
                    "agent_id": agent.agent_id(),
                    "capability": item.capability,
                    "error": e.to_string(),
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Test agent: fails on payloads with `"fail": true`, echoes otherwise.
    struct EchoAgent {
        capabilities: Vec<String>,
        processed: AtomicUsize,
    }

    impl EchoAgent {
        fn new() -> Self {
            Self {
                capabilities: vec!["echo".to_string()],
                processed: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Agent for EchoAgent {
        fn agent_id(&self) -> &str {
            "echo_agent"
        }

        fn capabilities(&self) -> &[String] {
            &self.capabilities
        }

        async fn process(&self, item: WorkItem) -> Result<serde_json::Value, AgentError> {
            self.processed.fetch_add(1, Ordering::SeqCst);
            if item.payload.get("fail").and_then(|v| v.as_bool()) == Some(true) {
                return Err(AgentError::Processing("asked to fail".to_string()));
            }
            Ok(item.payload)
        }
    }

    async fn wait_until(check: impl Fn() -> bool) {
        for _ in 0..100 {
            if check() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached within timeout");
    }

    fn runtime_with_bus() -> (Arc<AgentRuntime>, Arc<EventBus>, Arc<EchoAgent>) {
        let bus = Arc::new(EventBus::new());
        let agent = Arc::new(EchoAgent::new());
        let runtime = Arc::new(AgentRuntime::new(
            Arc::clone(&agent) as Arc<dyn Agent>,
            Arc::clone(&bus),
        ));
        (runtime, bus, agent)
    }

    #[tokio::test]
    async fn test_processes_enqueued_items_in_order() {
        let (runtime, bus, agent) = runtime_with_bus();
        let _bus_handle = bus.start().unwrap();
        runtime.start().unwrap();

        for i in 0..3 {
            runtime.enqueue(WorkItem::new("echo", serde_json::json!({"seq": i})));
        }

        wait_until(|| agent.processed.load(Ordering::SeqCst) == 3).await;
        assert_eq!(runtime.status(), AgentStatus::Idle);

        runtime.stop();
        bus.stop();
    }

    #[tokio::test]
    async fn test_failure_publishes_work_failed_and_agent_survives() {
        let bus = Arc::new(EventBus::new());
        let failed = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));
        {
            let failed = Arc::clone(&failed);
            bus.subscribe(
                topics::WORK_FAILED,
                Box::new(move |_| {
                    failed.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            )
            .unwrap();
            let completed = Arc::clone(&completed);
            bus.subscribe(
                topics::WORK_COMPLETED,
                Box::new(move |_| {
                    completed.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            )
            .unwrap();
        }
        let _bus_handle = bus.start().unwrap();

        let agent = Arc::new(EchoAgent::new());
        let runtime = AgentRuntime::new(Arc::clone(&agent) as Arc<dyn Agent>, Arc::clone(&bus));
        runtime.start().unwrap();

        runtime.enqueue(WorkItem::new("echo", serde_json::json!({"fail": true})));
        runtime.enqueue(WorkItem::new("echo", serde_json::json!({"ok": 1})));

        wait_until(|| {
            failed.load(Ordering::SeqCst) == 1 && completed.load(Ordering::SeqCst) == 1
        })
        .await;

        // The worker processed the second item after the first failed.
        assert_eq!(agent.processed.load(Ordering::SeqCst), 2);
        assert_eq!(runtime.status(), AgentStatus::Idle);

        runtime.stop();
        bus.stop();
    }

    #[tokio::test]
    async fn test_status_is_error_after_trailing_failure() {
        let (runtime, bus, agent) = runtime_with_bus();
        let _bus_handle = bus.start().unwrap();
        runtime.start().unwrap();

        runtime.enqueue(WorkItem::new("echo", serde_json::json!({"fail": true})));
        wait_until(|| agent.processed.load(Ordering::SeqCst) == 1).await;

        // Give the status write a moment to land after process returns.
        wait_until(|| runtime.status() == AgentStatus::Error).await;

        runtime.stop();
        bus.stop();
    }

    #[tokio::test]
    async fn test_work_completed_carries_item_and_result() {
        let bus = Arc::new(EventBus::new());
        let seen: Arc<Mutex<Vec<serde_json::Value>>> = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            bus.subscribe(
                topics::WORK_COMPLETED,
                Box::new(move |event| {
                    seen.lock().unwrap().push(event.payload.clone());
                    Ok(())
                }),
            )
            .unwrap();
        }
        let _bus_handle = bus.start().unwrap();

        let agent = Arc::new(EchoAgent::new());
        let runtime = AgentRuntime::new(Arc::clone(&agent) as Arc<dyn Agent>, Arc::clone(&bus));
        runtime.start().unwrap();
        runtime.enqueue(WorkItem::new("echo", serde_json::json!({"k": "v"})));

        wait_until(|| !seen.lock().unwrap().is_empty()).await;
        let payload = seen.lock().unwrap()[0].clone();
        assert_eq!(payload["agent_id"], "echo_agent");
        assert_eq!(payload["work_item"]["capability"], "echo");
        assert_eq!(payload["result"]["k"], "v");

        runtime.stop();
        bus.stop();
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let (runtime, _bus, _agent) = runtime_with_bus();
        runtime.start().unwrap();
        assert!(matches!(
            runtime.start(),
            Err(AgentError::AlreadyRunning(_))
        ));
        runtime.stop();
    }

    #[tokio::test]
    async fn test_items_enqueued_before_start_are_processed() {
        let (runtime, bus, agent) = runtime_with_bus();
        runtime.enqueue(WorkItem::new("echo", serde_json::json!({"early": true})));

        let _bus_handle = bus.start().unwrap();
        runtime.start().unwrap();

        wait_until(|| agent.processed.load(Ordering::SeqCst) == 1).await;
        runtime.stop();
        bus.stop();
    }
}
