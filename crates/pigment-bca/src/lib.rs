// Allow minor clippy style warnings at crate level
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]

//! Bookmark Coloring Algorithm over RDF graphs.
//!
//! For every bookmark vertex, BCA diffuses one unit of paint through the graph:
//! each node keeps a fraction `alpha` of the paint that reaches it and passes
//! the rest to its neighbors in proportion to edge weight, until the flow drops
//! below `epsilon`. The paint kept at each node forms the bookmark's sparse
//! context vector ([`Bcv`]); all vectors together form the co-occurrence
//! input of a GloVe-style embedding optimizer.
//!
//! - [`kernel`] - the diffusion loop shared by every variant
//! - [`policy`] - neighbor selection per variant ([`NeighborPolicy`])
//! - [`schedule`] - one job per bookmark on a rayon pool
//! - [`BcaEngine`] - configuration, pool, and dispatch in one place
//! - [`CoOccurrenceMatrix`] - coordinate-form output with a seeded shuffle
//!
//! # Output index space
//!
//! | Index | Meaning |
//! |-------|---------|
//! | `[0, N)` | vertices |
//! | `[N, N + T)` | predicate slots (predicate context, Kale pseudo-vertices) |
//!
//! # Example
//!
//! ```rust
//! use pigment_bca::kernel::{diffuse, DiffusionContext, DiffusionParams, Scratch};
//! use pigment_bca::policy::DirectedWeighted;
//! use pigment_core::{Adjacency, PredicateWeights, RdfGraph, Term, Triple};
//!
//! let mut graph = RdfGraph::new();
//! graph.add_triple(Triple::new(Term::iri("ex:0"), "ex:next", Term::iri("ex:1")));
//! graph.add_triple(Triple::new(Term::iri("ex:1"), "ex:next", Term::iri("ex:2")));
//!
//! let adjacency = Adjacency::build_partitioned(&graph, 1);
//! let weights = PredicateWeights::uniform(graph.predicate_count());
//! let params = DiffusionParams::new(0.5, 0.01, false).unwrap();
//! let ctx = DiffusionContext::new(&graph, &adjacency, &weights, params);
//!
//! let bcv = diffuse(&ctx, &DirectedWeighted, 0, &mut Scratch::for_context(&ctx)).unwrap();
//! assert_eq!(bcv.iter().collect::<Vec<_>>(), vec![(0, 0.5), (1, 0.25), (2, 0.125)]);
//! ```

mod bcv;
mod config;
mod cooccurrence;
mod engine;
mod error;
pub mod kernel;
mod paint;
pub mod policy;
pub mod schedule;

pub use bcv::Bcv;
pub use config::{BcaConfig, Variant};
pub use cooccurrence::{CoOccurrenceMatrix, IndexKind};
pub use engine::BcaEngine;
pub use error::{Error, Result};
pub use kernel::{CancelToken, DiffusionContext, DiffusionParams, Frontier, Scratch};
pub use paint::{PaintQueue, PaintedNode};
pub use policy::{DateDirection, DateFilter, NeighborPolicy};
pub use schedule::{color_all, BookmarkSet, Coloring, JobFailure};
