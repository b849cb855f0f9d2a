//! Error types for pigment-bca.

use thiserror::Error;

/// Error type for diffusion runs.
#[derive(Error, Debug)]
pub enum Error {
    /// Graph-side error.
    #[error(transparent)]
    Core(#[from] pigment_core::Error),

    /// A configuration value was rejected before any job ran.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Bookmark index outside the output index space.
    #[error("Bookmark {bookmark} outside index space of size {size}")]
    UnknownBookmark {
        /// Requested bookmark.
        bookmark: usize,
        /// Size of the index space.
        size: usize,
    },

    /// Reverse traversal requested for an undirected policy.
    #[error("{variant} is undirected and cannot run in reverse mode")]
    ReverseUnsupported {
        /// Policy name.
        variant: &'static str,
    },

    /// Removed-edge bookkeeping does not fit the vertex it belongs to.
    #[error("Removed-edge set of vertex {vertex} holds {removed} edges but the vertex has degree {degree}")]
    MalformedExclusions {
        /// Vertex whose set is inconsistent.
        vertex: usize,
        /// Number of removed edges recorded.
        removed: usize,
        /// Actual degree of the vertex.
        degree: usize,
    },

    /// The run was cancelled.
    #[error("Cancelled while coloring bookmark {bookmark}")]
    Cancelled {
        /// Bookmark being processed.
        bookmark: usize,
    },

    /// Thread pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for diffusion operations.
pub type Result<T> = std::result::Result<T, Error>;
