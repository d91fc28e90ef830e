//! Capability-keyed agent registry.
//!
//! Capability sets are fixed at registration for the life of the process.
//! Registration is atomic: a duplicate capability rejects the whole agent
//! and leaves the registry unchanged.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::info;

use taskweave_core::AgentStatus;

use crate::error::RegistryError;
use crate::runtime::AgentRuntime;

/// Maps capability name to the one agent that declared it.
#[derive(Default)]
pub struct AgentRegistry {
    agents: Vec<Arc<AgentRuntime>>,
    by_capability: HashMap<String, usize>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent and claim all of its capabilities.
    ///
    /// Fails if the agent id is taken or any capability is already owned by
    /// another agent; in both cases nothing is registered.
    pub fn register(&mut self, runtime: Arc<AgentRuntime>) -> Result<(), RegistryError> {
        if self.agents.iter().any(|a| a.agent_id() == runtime.agent_id()) {
            return Err(RegistryError::DuplicateAgent(runtime.agent_id().to_string()));
        }
        for capability in runtime.capabilities() {
            if let Some(&owner_idx) = self.by_capability.get(capability) {
                return Err(RegistryError::DuplicateCapability {
                    capability: capability.clone(),
                    owner: self.agents[owner_idx].agent_id().to_string(),
                });
            }
        }

        let index = self.agents.len();
        for capability in runtime.capabilities() {
            self.by_capability.insert(capability.clone(), index);
        }
        info!(
            agent_id = %runtime.agent_id(),
            capabilities = ?runtime.capabilities(),
            "agent registered"
        );
        self.agents.push(runtime);
        Ok(())
    }

    /// The agent owning a capability, if any.
    pub fn find_agent_for_capability(&self, capability: &str) -> Option<&Arc<AgentRuntime>> {
        self.by_capability
            .get(capability)
            .map(|&index| &self.agents[index])
    }

    /// All agents, in registration order.
    pub fn agents(&self) -> &[Arc<AgentRuntime>] {
        &self.agents
    }

    /// Current status per agent id.
    pub fn statuses(&self) -> BTreeMap<String, AgentStatus> {
        self.agents
            .iter()
            .map(|agent| (agent.agent_id().to_string(), agent.status()))
            .collect()
    }
}
