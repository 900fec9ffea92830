//! Prompt assembly for context-augmented answering.

const SEPARATOR: &str = "---------------------";

/// Build the answering prompt from retrieved chunks and the user question.
/// Chunks are listed verbatim, one per line, in the order given.
pub fn build_prompt<S: AsRef<str>>(retrieved: &[S], question: &str) -> String {
    let context = retrieved
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Context information is below.\n\
         {SEPARATOR}\n\
         {context}\n\
         {SEPARATOR}\n\
         Given the context information and not prior knowledge, answer the query.\n\
         Query: {question}\n\
         Answer:"
    )
}
