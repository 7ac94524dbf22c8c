//! Error types for scene graph loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or loading a scene graph.
#[derive(Error, Debug)]
pub enum Error {
    /// Scene description file does not exist or cannot be accessed
    #[error("Scene file not found: {0}")]
    FileNotFound(PathBuf),

    /// A node names a parent that was never declared
    #[error("Node '{node}' references unknown parent '{parent}'")]
    UnknownParent { node: String, parent: String },

    /// Two nodes share the same name
    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),

    /// Description parsed but is not a usable scene
    #[error("Invalid scene structure: {0}")]
    InvalidStructure(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }
}

/// Result type alias for scene graph operations.
pub type Result<T> = std::result::Result<T, Error>;
