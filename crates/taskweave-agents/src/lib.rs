//! Agent runtime, registry, supervisor, and the built-in workers.
//!
//! Every agent wraps a capability-tagged processing function behind a private
//! FIFO queue and a dedicated worker task. The registry maps each capability
//! to exactly one agent; the supervisor routes work items by capability and
//! cascades lifecycle to all agents.

pub mod error;
pub mod registry;
pub mod runtime;
pub mod supervisor;
pub mod workers;

pub use error::{AgentError, RegistryError};
pub use registry::AgentRegistry;
pub use runtime::{Agent, AgentRuntime};
pub use supervisor::{RouteOutcome, Supervisor};
