use crate::error::{RagError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub content: String,
    pub position: usize,
}

/// Splits text into consecutive, non-overlapping windows of `chunk_size`
/// characters (using `char` count). The last window may be shorter.
pub fn split_into_chunks(content: &str, chunk_size: usize) -> Result<Vec<String>> {
    if chunk_size == 0 {
        return Err(RagError::InvalidArgument(
            "chunk_size must be at least 1".to_string(),
        ));
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in content.char_indices() {
        if count == chunk_size {
            chunks.push(content[start..idx].to_string());
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if count > 0 {
        chunks.push(content[start..].to_string());
    }

    Ok(chunks)
}

/// Splits text into chunks tagged with their split position.
pub fn chunk_document(content: &str, chunk_size: usize) -> Result<Vec<Chunk>> {
    Ok(split_into_chunks(content, chunk_size)?
        .into_iter()
        .enumerate()
        .map(|(position, content)| Chunk { content, position })
        .collect())
}
