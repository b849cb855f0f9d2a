//! Error types for pigment-core.

use thiserror::Error;

/// Error type for graph construction and precomputation.
#[derive(Error, Debug)]
pub enum Error {
    /// Triple parsing error.
    #[error("Failed to parse triple: {0}")]
    ParseTriple(String),

    /// N-Triples format error.
    #[error("Invalid N-Triples format: {0}")]
    InvalidNTriples(String),

    /// Edge weight or similarity score outside its allowed range.
    #[error("Invalid weight {value} for {what}")]
    InvalidWeight {
        /// What the weight was attached to.
        what: String,
        /// The rejected value.
        value: f64,
    },

    /// A configuration value was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Vertex id is not part of the graph.
    #[error("Vertex not found: {0}")]
    VertexNotFound(usize),

    /// Literal similarity requested between non-literal vertices.
    #[error("Similarity edges join two literals, got vertices {0} and {1}")]
    NotLiterals(usize, usize),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pigment-core operations.
pub type Result<T> = std::result::Result<T, Error>;
