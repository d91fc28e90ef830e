//! Embedding and vector search for the research worker.
//!
//! Production embedding models are external collaborators; what ships here
//! is the [`Embedder`] contract, a deterministic hash-based implementation,
//! and a brute-force in-memory cosine index. O(n) search is fine for the
//! document volumes a single workspace sees.

pub mod embedding;
pub mod index;

pub use embedding::{Embedder, HashEmbedder};
pub use index::{SearchHit, VectorIndex};
