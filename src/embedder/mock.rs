/// Mock embedder for testing purposes.
///
/// Generates deterministic embeddings based on text hash, or returns one
/// fixed vector for every input.
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::Embedder;
use crate::error::Result;

/// A mock embedder that produces deterministic vectors without any network
/// access. Counts how many texts it has embedded.
pub struct MockEmbedder {
    pub dimensions: usize,
    fixed: Option<Vec<f32>>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    /// Create a hash-based `MockEmbedder` with the given dimensionality.
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            fixed: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a `MockEmbedder` that answers every request with `vector`.
    #[must_use]
    pub fn with_vector(vector: Vec<f32>) -> Self {
        Self {
            dimensions: vector.len(),
            fixed: Some(vector),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `embed` calls served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(16)
    }
}

impl Embedder for MockEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if let Some(fixed) = &self.fixed {
            return Ok(fixed.clone());
        }

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let bytes = hasher.finish().to_le_bytes();

        Ok((0..self.dimensions)
            .map(|i| f32::from(bytes[i % 8]) / 255.0)
            .collect())
    }
}
