//! Asynchronous publish/subscribe event bus.
//!
//! Producers call [`EventBus::publish`], which enqueues the event and returns
//! immediately. A single dispatch task drains the queue and invokes every
//! callback registered for the event type, in registration order. A callback
//! that fails is logged and does not affect other callbacks or the loop.
//!
//! All subscriptions must complete before [`EventBus::start`]; registering a
//! callback afterwards fails with [`BusError::AlreadyStarted`]. This closes
//! the subscribe/publish race instead of delivering best-effort to late
//! subscribers. Events published before `start` are buffered in the queue and
//! dispatched once the bus is running.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::events::Event;

/// Errors from event bus operations.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("cannot subscribe to '{0}': bus already started")]
    AlreadyStarted(String),
    #[error("event bus already started")]
    AlreadyRunning,
}

/// Callback invoked for each dispatched event of a subscribed type.
///
/// Errors are logged by the dispatch loop; they never propagate to the
/// publisher or to other subscribers.
pub type EventCallback =
    Box<dyn Fn(&Event) -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + Sync>;

type SubscriberMap = HashMap<String, Vec<EventCallback>>;

/// Publish/subscribe broker decoupling agents from each other and from the
/// orchestrator.
pub struct EventBus {
    subscribers: Arc<Mutex<SubscriberMap>>,
    tx: UnboundedSender<Event>,
    rx: Mutex<Option<UnboundedReceiver<Event>>>,
    started: AtomicBool,
    shutdown: Arc<Notify>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            tx,
            rx: Mutex::new(Some(rx)),
            started: AtomicBool::new(false),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Register a callback for an event type.
    ///
    /// Callbacks for the same type are invoked in registration order. Fails
    /// once the dispatch task is running.
    pub fn subscribe(&self, event_type: &str, callback: EventCallback) -> Result<(), BusError> {
        if self.started.load(Ordering::SeqCst) {
            return Err(BusError::AlreadyStarted(event_type.to_string()));
        }
        let mut subs = self.subscribers.lock().unwrap();
        subs.entry(event_type.to_string()).or_default().push(callback);
        Ok(())
    }

    /// Enqueue an event for dispatch. Never blocks the caller.
    pub fn publish(&self, source_agent: &str, event_type: &str, payload: serde_json::Value) {
        let event = Event::new(source_agent, event_type, payload);
        if self.tx.send(event).is_err() {
            warn!(event_type, "event bus queue closed, event dropped");
        }
    }

    /// Start the dispatch task. Subsequent `subscribe` calls are rejected.
    pub fn start(&self) -> Result<tokio::task::JoinHandle<()>, BusError> {
        let mut rx_slot = self.rx.lock().unwrap();
        let rx = rx_slot.take().ok_or(BusError::AlreadyRunning)?;
        self.started.store(true, Ordering::SeqCst);

        let subscribers = Arc::clone(&self.subscribers);
        let shutdown = Arc::clone(&self.shutdown);
        Ok(tokio::spawn(dispatch_loop(rx, subscribers, shutdown)))
    }

    /// Signal the dispatch task to exit. Any dispatch already in progress
    /// completes; events still queued are not delivered.
    pub fn stop(&self) {
        self.shutdown.notify_one();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

async fn dispatch_loop(
    mut rx: UnboundedReceiver<Event>,
    subscribers: Arc<Mutex<SubscriberMap>>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => dispatch(&subscribers, &event),
                None => break,
            },
            _ = shutdown.notified() => break,
        }
    }
}

fn dispatch(subscribers: &Mutex<SubscriberMap>, event: &Event) {
    let subs = subscribers.lock().unwrap();
    let Some(callbacks) = subs.get(&event.event_type) else {
        debug!(event_type = %event.event_type, "no subscribers for event");
        return;
    };
    for callback in callbacks {
        if let Err(e) = callback(event) {
            warn!(
                event_type = %event.event_type,
                source = %event.source_agent,
                error = %e,
                "event callback failed"
            );
        }
    }
}
