pub mod bus;
pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use bus::{BusError, EventBus};
pub use config::TaskweaveConfig;
pub use error::{Result, TaskweaveError};
pub use events::{topics, Event};
pub use types::*;
