// Allow minor clippy style warnings at crate level
// These are mostly style preferences, not bugs
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]

//! Core types for bookmark-coloring graph embeddings.
//!
//! This crate provides the graph side of the pipeline:
//!
//! - [`Term`] / [`Triple`] - RDF statements and the N-Triples reader in [`formats`]
//! - [`RdfGraph`] - a typed graph with dense vertex, edge, and predicate ids
//! - [`Adjacency`] - per-vertex neighbor and incident-edge arrays, built in parallel
//! - [`weighting`] - per-predicate weight tables (manual, PageRank, frequency)
//!
//! # Vertex and Edge Ids
//!
//! Diffusion jobs address everything by dense integers:
//!
//! | Id | Range | Meaning |
//! |----|-------|---------|
//! | vertex | `[0, N)` | IRI, blank node, or literal |
//! | edge | `[0, M)` | one statement |
//! | predicate | `[0, T)` | edge type |
//!
//! A vertex's [`VertexKind`] decides how literal-aware policies treat it.
//!
//! # Example
//!
//! ```rust
//! use pigment_core::{Adjacency, RdfGraph, Term, Triple};
//!
//! let mut graph = RdfGraph::new();
//! graph.add_triple(Triple::new(Term::iri("ex:a"), "ex:knows", Term::iri("ex:b")));
//! graph.add_triple(Triple::new(Term::iri("ex:b"), "ex:knows", Term::iri("ex:c")));
//!
//! let adjacency = Adjacency::build_partitioned(&graph, 2);
//! assert_eq!(adjacency.vertex_out(0), &[1]);
//! assert_eq!(adjacency.vertex_in(2), &[1]);
//! ```

mod adjacency;
pub mod algo;
mod error;
pub mod formats;
mod graph;
mod term;
mod triple;
pub mod weighting;

pub use adjacency::Adjacency;
pub use error::{Error, Result};
pub use graph::{EdgeData, EdgeId, PredicateId, RdfGraph, RdfGraphStats, VertexId, SIMILARITY_PREDICATE};
pub use term::{Term, VertexKind};
pub use triple::Triple;
pub use weighting::{PredicateWeighting, PredicateWeights};

// Re-export petgraph for advanced graph operations
pub use petgraph;
