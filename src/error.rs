/// Error type shared by the retrieval pipeline, the remote client and the
/// tool registry.
use thiserror::Error;

/// Errors that can occur while chunking, indexing, calling the remote
/// services or dispatching tools.
#[derive(Error, Debug)]
pub enum RagError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("no chunks to index")]
    EmptyCorpus,

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for tool {tool}: {reason}")]
    InvalidToolArguments { tool: String, reason: String },

    #[error("tool with name '{0}' is already registered")]
    DuplicateTool(String),
}

impl From<reqwest::Error> for RagError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::MalformedResponse(e.to_string())
        } else {
            Self::ServiceUnavailable(e.to_string())
        }
    }
}

pub type Result<T, E = RagError> = std::result::Result<T, E>;
