//! # Tool Errors
//!
//! The closed set of failures a tool call can end in. Every core operation returns
//! these as data; nothing here is meant to escape past the dispatcher.

use serde::Serialize;
use std::path::PathBuf;

/// Result of every FileStore and dispatcher operation.
pub type OperationResult<T> = Result<T, ToolError>;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Path {candidate} is outside the sandbox root {}", .root.display())]
    OutOfSandbox { candidate: String, root: PathBuf },

    #[error("{path} does not exist")]
    NotFound { path: String },

    #[error("{path} is not a file")]
    NotAFile { path: String },

    #[error("{path} is not a directory")]
    NotADirectory { path: String },

    #[error("File {path} is too large ({size} bytes, max {limit} bytes)")]
    TooLarge { path: String, size: u64, limit: u64 },

    #[error("File {path} appears to be binary")]
    BinaryRejected { path: String },

    #[error("Original snippet not found in {path}")]
    SnippetNotFound { path: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("{context}: {source}")]
    OperationFailed {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Wire-level discriminant of a [`ToolError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    OutOfSandbox,
    NotFound,
    NotAFile,
    NotADirectory,
    TooLarge,
    BinaryRejected,
    SnippetNotFound,
    UnknownTool,
    InvalidParameters,
    OperationFailed,
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::OutOfSandbox { .. } => ErrorKind::OutOfSandbox,
            ToolError::NotFound { .. } => ErrorKind::NotFound,
            ToolError::NotAFile { .. } => ErrorKind::NotAFile,
            ToolError::NotADirectory { .. } => ErrorKind::NotADirectory,
            ToolError::TooLarge { .. } => ErrorKind::TooLarge,
            ToolError::BinaryRejected { .. } => ErrorKind::BinaryRejected,
            ToolError::SnippetNotFound { .. } => ErrorKind::SnippetNotFound,
            ToolError::UnknownTool(_) => ErrorKind::UnknownTool,
            ToolError::InvalidParameters(_) => ErrorKind::InvalidParameters,
            ToolError::OperationFailed { .. } => ErrorKind::OperationFailed,
        }
    }

    /// Wraps a low-level I/O fault with a short description of what was attempted.
    pub fn failed(context: impl Into<String>, source: std::io::Error) -> Self {
        ToolError::OperationFailed {
            context: context.into(),
            source,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ToolError::InvalidParameters(message.into())
    }
}
