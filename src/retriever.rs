use tracing::debug;

use crate::chunker::chunk_document;
use crate::embedder::Embedder;
use crate::error::{RagError, Result};
use crate::index::FlatIndex;

pub const DEFAULT_TOP_K: usize = 2;

/// A chunk selected for a question, with its split position and squared
/// distance to the question embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub position: usize,
    pub distance: f32,
    pub content: String,
}

/// Chunks a document, embeds it, and picks the chunks nearest a question.
///
/// The index is rebuilt on every call and dropped afterwards.
pub struct Retriever<'a, E: Embedder + ?Sized> {
    pub embedder: &'a E,
    pub chunk_size: usize,
    pub top_k: usize,
}

impl<'a, E: Embedder + ?Sized> Retriever<'a, E> {
    pub fn new(embedder: &'a E, chunk_size: usize) -> Self {
        Self {
            embedder,
            chunk_size,
            top_k: DEFAULT_TOP_K,
        }
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Return the nearest chunks with their positions and distances.
    pub fn retrieve_scored(&self, document: &str, question: &str) -> Result<Vec<RetrievedChunk>> {
        if self.top_k == 0 {
            return Err(RagError::InvalidArgument(
                "top_k must be at least 1".to_string(),
            ));
        }

        let chunks = chunk_document(document, self.chunk_size)?;
        if chunks.is_empty() {
            return Err(RagError::EmptyCorpus);
        }

        debug!("Embedding {} chunks", chunks.len());
        let refs: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let vectors = self.embedder.embed_batch(&refs)?;
        let index = FlatIndex::build(vectors)?;

        let query = self.embedder.embed(question)?;
        let hits = index.search(&query, self.top_k)?;
        debug!(
            "Retrieved positions {:?}",
            hits.iter().map(|h| h.position).collect::<Vec<_>>()
        );

        Ok(hits
            .into_iter()
            .map(|h| {
                let chunk = &chunks[h.position];
                RetrievedChunk {
                    position: chunk.position,
                    distance: h.distance,
                    content: chunk.content.clone(),
                }
            })
            .collect())
    }

    /// Return the text of the nearest chunks, nearest first.
    pub fn retrieve(&self, document: &str, question: &str) -> Result<Vec<String>> {
        Ok(self
            .retrieve_scored(document, question)?
            .into_iter()
            .map(|c| c.content)
            .collect())
    }
}
