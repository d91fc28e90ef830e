//! Rule-based text analysis for taskweave.
//!
//! Extracts candidate action items, decisions, summaries, notes, and tags
//! from unstructured text without a language model. This is the deterministic
//! fallback path the pipeline uses whenever the model collaborator is down,
//! and the reference behavior the model-backed path must mirror in shape.

pub mod dates;
pub mod error;
pub mod patterns;
pub mod reader;
pub mod summary;

pub use error::ExtractError;
pub use patterns::{Decision, PatternSet};
pub use reader::{PlainTextExtractor, TextExtractor};
pub use summary::summarize;
