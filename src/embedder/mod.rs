/// Embedder trait for mapping text to vectors.
///
/// The production implementation is the remote client in
/// [`crate::client::MistralClient`]; [`mock::MockEmbedder`] serves tests.
pub mod mock;

use crate::error::Result;

/// Trait for text embedding implementations.
///
/// All implementations must be `Send + Sync` to allow shared use
/// behind `Arc`.
pub trait Embedder: Send + Sync {
    /// Embed a single text string into a vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple text strings, one call per text, preserving order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}
