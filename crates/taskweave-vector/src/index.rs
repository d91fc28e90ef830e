//! In-memory vector index with brute-force cosine similarity search.

use std::sync::RwLock;

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

/// A single hit returned from a vector search.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: Uuid,
    pub text: String,
    pub metadata: Value,
    /// Cosine similarity against the query, descending in results.
    pub score: f32,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    id: Uuid,
    text: String,
    embedding: Vec<f32>,
    metadata: Value,
}

/// Thread-safe brute-force cosine index.
#[derive(Debug, Default)]
pub struct VectorIndex {
    entries: RwLock<Vec<IndexEntry>>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Add a batch of documents. Ids, vectors, and texts are parallel slices;
    /// extra elements on any side are ignored.
    pub fn add(&self, ids: &[Uuid], texts: &[String], vectors: &[Vec<f32>], metadata: &[Value]) {
        let mut entries = self.entries.write().unwrap();
        for (((id, text), vector), meta) in ids
            .iter()
            .zip(texts.iter())
            .zip(vectors.iter())
            .zip(metadata.iter())
        {
            entries.push(IndexEntry {
                id: *id,
                text: text.clone(),
                embedding: vector.clone(),
                metadata: meta.clone(),
            });
        }
        debug!(total = entries.len(), "vector index updated");
    }

    /// Top-k nearest entries by cosine similarity, best first.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchHit> {
        let entries = self.entries.read().unwrap();
        let mut hits: Vec<SearchHit> = entries
            .iter()
            .map(|entry| SearchHit {
                id: entry.id,
                text: entry.text.clone(),
                metadata: entry.metadata.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        hits
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{Embedder, HashEmbedder};

    fn index_texts(index: &VectorIndex, embedder: &HashEmbedder, texts: &[&str]) {
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let ids: Vec<Uuid> = texts.iter().map(|_| Uuid::new_v4()).collect();
        let vectors = embedder.embed(&owned);
        let metadata: Vec<Value> = texts.iter().map(|_| Value::Null).collect();
        index.add(&ids, &owned, &vectors, &metadata);
    }

    #[test]
    fn test_search_ranks_exact_match_first() {
        let embedder = HashEmbedder::default();
        let index = VectorIndex::new();
        index_texts(
            &index,
            &embedder,
            &[
                "quarterly budget review meeting",
                "completely unrelated grocery list",
            ],
        );

        let query = embedder.embed(&["quarterly budget review meeting".to_string()]);
        let hits = index.search(&query[0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "quarterly budget review meeting");
        assert!(hits[0].score > hits[1].score);
        assert!((hits[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_search_respects_k() {
        let embedder = HashEmbedder::default();
        let index = VectorIndex::new();
        index_texts(&index, &embedder, &["a b c", "b c d", "c d e", "d e f"]);

        let query = embedder.embed(&["a b c".to_string()]);
        assert_eq!(index.search(&query[0], 2).len(), 2);
    }

    #[test]
    fn test_search_empty_index() {
        let index = VectorIndex::new();
        assert!(index.search(&[0.1, 0.2], 5).is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
