//! Capability routing and cascaded agent lifecycle.

use tracing::{debug, warn};

use taskweave_core::WorkItem;

use crate::error::AgentError;
use crate::registry::AgentRegistry;

/// Result of a routing attempt.
///
/// Routing is deliberately permissive: an unknown capability drops the work
/// item rather than failing the submitter, but the outcome says so
/// explicitly instead of disappearing into a log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    Routed { agent_id: String },
    Unrouted { capability: String },
}

impl RouteOutcome {
    pub fn is_routed(&self) -> bool {
        matches!(self, RouteOutcome::Routed { .. })
    }
}

/// Routes capability-tagged work to the owning agent and manages agent
/// lifecycle as a group.
pub struct Supervisor {
    registry: AgentRegistry,
}

impl Supervisor {
    pub fn new(registry: AgentRegistry) -> Self {
        Self { registry }
    }

    /// Route a work item to the agent owning its capability.
    ///
    /// Enqueueing never blocks. No exception reaches the submitter: a missing
    /// capability is logged and reported through the returned outcome.
    pub fn route(&self, item: WorkItem) -> RouteOutcome {
        match self.registry.find_agent_for_capability(&item.capability) {
            Some(agent) => {
                debug!(
                    capability = %item.capability,
                    agent_id = %agent.agent_id(),
                    "work item routed"
                );
                let agent_id = agent.agent_id().to_string();
                agent.enqueue(item);
                RouteOutcome::Routed { agent_id }
            }
            None => {
                warn!(
                    capability = %item.capability,
                    "no agent registered for capability, work item dropped"
                );
                RouteOutcome::Unrouted {
                    capability: item.capability,
                }
            }
        }
    }

    /// Start every registered agent's worker.
    pub fn start_all(&self) -> Result<(), AgentError> {
        for agent in self.registry.agents() {
            agent.start()?;
        }
        Ok(())
    }

    /// Signal every agent's worker to exit; in-flight items finish first.
    pub fn stop_all(&self) {
        for agent in self.registry.agents() {
            agent.stop();
        }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }
}
