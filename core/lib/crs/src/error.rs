use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrsError {
    #[error("Requested {requested} points, the transcript provides between 1 and {max}")]
    InvalidRequestSize { requested: i64, max: u64 },
    #[error("Invalid transcript layout: {0}")]
    InvalidLayout(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid byte range {start}-{end}: start is past the end")]
    InvalidRange { start: u64, end: u64 },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Expected 206 Partial Content, got {status}")]
    UnexpectedStatus { status: u16 },
    #[error("Expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },
    #[error("Reference string is not loaded")]
    NotLoaded,
    #[error("Reference string retrieval is already in progress")]
    RetrievalInProgress,
    #[error("Reference string retrieval has already finished")]
    AlreadyRetrieved,
    #[error("Reference string retrieval was cancelled")]
    Cancelled,
}

impl CrsError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}
