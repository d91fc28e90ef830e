//! Task synthesis and conflict detection.
//!
//! [`TaskBoard`] turns confirmed action items into the authoritative task
//! list (deduplicating near-identical text and inferring priority), and
//! [`conflict::detect`] reports duplicates, deadline collisions, and missing
//! fields over a snapshot of that list.

pub mod board;
pub mod conflict;
pub mod similarity;

pub use board::{SynthesisOutcome, TaskBoard};
pub use conflict::{detect, Conflict, ConflictKind};
pub use similarity::jaccard;
