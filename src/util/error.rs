//! Error types for scene ingestion and rendering.

use scene_graph::{AttributeType, MappingMode, ReferenceMode};
use thiserror::Error;

/// Main error type for renderer operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Attribute layer uses a mapping this renderer does not read
    #[error("Unsupported layer mapping mode: {0:?}")]
    UnsupportedMappingMode(MappingMode),

    /// Attribute layer uses a reference encoding this renderer does not read
    #[error("Unsupported layer reference mode: {0:?}")]
    UnsupportedReferenceMode(ReferenceMode),

    /// Mesh or layer index out of range
    #[error("{what} index {index} out of bounds (count: {count})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        count: usize,
    },

    /// Builder handed a node of the wrong kind
    #[error("Attribute mismatch on node '{node}': expected {expected:?}, got {actual:?}")]
    AttributeMismatch {
        node: String,
        expected: AttributeType,
        actual: AttributeType,
    },

    /// Camera position coincides with its look-at target
    #[error("Camera '{0}' looks at its own position")]
    DegenerateCamera(String),

    /// Camera lens value outside its valid range
    #[error("Camera '{node}' has invalid {field}: {value}")]
    InvalidCamera {
        node: String,
        field: &'static str,
        value: f32,
    },

    /// Scene has nothing to render from
    #[error("Scene has no camera")]
    NoCamera,

    /// Settings failed validation
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Scene graph could not be loaded
    #[error("Scene graph error: {0}")]
    Graph(#[from] scene_graph::Error),

    /// Image could not be written
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed settings file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid settings error.
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::InvalidSettings(msg.into())
    }

    pub(crate) fn out_of_bounds(what: &'static str, index: usize, count: usize) -> Self {
        Self::IndexOutOfBounds { what, index, count }
    }
}

/// Result type alias for renderer operations.
pub type Result<T> = std::result::Result<T, Error>;
