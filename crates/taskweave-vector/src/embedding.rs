//! Embedding contract and the hash-based fallback implementation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Turns text into fixed-dimensional vectors.
///
/// Empty input yields empty output, never an error.
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Vec<Vec<f32>>;
    fn dimensions(&self) -> usize;
}

/// Deterministic token-hash embedder.
///
/// Each token is hashed into a bucket and the vector L2-normalized, so equal
/// text always embeds identically and token overlap produces cosine overlap.
/// Not semantically meaningful: it exists so search works without a model
/// collaborator and so tests are reproducible.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimensions];
        for token in text.to_lowercase().split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|text| self.embed_one(text)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_output() {
        let embedder = HashEmbedder::default();
        assert!(embedder.embed(&[]).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed(&["quarterly budget review".to_string()]);
        let b = embedder.embed(&["quarterly budget review".to_string()]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_dimensions_respected() {
        let embedder = HashEmbedder::new(64);
        let vectors = embedder.embed(&["some text".to_string()]);
        assert_eq!(vectors[0].len(), 64);
        assert_eq!(embedder.dimensions(), 64);
    }

    #[test]
    fn test_vectors_are_normalized() {
        let embedder = HashEmbedder::default();
        let vectors = embedder.embed(&["normalize this text please".to_string()]);
        let norm: f32 = vectors[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_embeds_to_zero_vector() {
        let embedder = HashEmbedder::new(16);
        let vectors = embedder.embed(&["".to_string()]);
        assert!(vectors[0].iter().all(|v| *v == 0.0));
    }
}
