//! Neighbor-selection policies.
//!
//! Every BCA variant runs the same kernel ([`crate::kernel::diffuse`]); they
//! differ only in which moves leave a focus node and how each move is
//! weighted. A policy answers that question through [`NeighborPolicy::select`].
//!
//! | Policy | Moves from a vertex | Weight |
//! |--------|---------------------|--------|
//! | [`DirectedUnweighted`] | out-edges (in-edges in reverse) | 1 |
//! | [`DirectedWeighted`] | out-edges | edge x predicate weight |
//! | [`DirectedWeightedLiteral`] | out-edges; literals go back along their arrival predicate | similarity, else predicate weight |
//! | [`HybridWeighted`] | out-edges; literals use in + out | edge x predicate weight |
//! | [`UndirectedWeighted`] | in + out, minus the way back | edge x predicate weight |
//! | [`ContextWinnowedUndirectedWeighted`] | in + out, minus date edges failing a [`DateFilter`] | edge x predicate weight |
//! | [`Kale15x15`], [`Kale15x10`], [`Kale10x10Plus5x5`] | vertices plus predicate pseudo-vertices | edge x predicate weight, summed per pseudo-vertex |
//!
//! Policies are stateless and shared by reference across worker threads; any
//! per-job state lives in [`Scratch`].

mod directed;
mod kale;
mod literal;
mod undirected;
mod winnow;

pub use directed::{DirectedUnweighted, DirectedWeighted};
pub use kale::{Kale10x10Plus5x5, Kale15x10, Kale15x15};
pub use literal::{DirectedWeightedLiteral, HybridWeighted};
pub use undirected::UndirectedWeighted;
pub use winnow::{parse_date_literal, ContextWinnowedUndirectedWeighted, DateDirection, DateFilter, RemovedEdges};

use crate::bcv::Bcv;
use crate::error::Result;
use crate::kernel::{diffuse, DiffusionContext, Frontier, Scratch};
use crate::paint::PaintedNode;
use pigment_core::{EdgeId, VertexId};

/// Strategy hook of the diffusion kernel.
pub trait NeighborPolicy: Send + Sync {
    /// Variant name used in errors and logs.
    fn name(&self) -> &'static str;

    /// False for undirected policies, which reject reverse mode.
    fn supports_reverse(&self) -> bool {
        true
    }

    /// True if arrival predicates get their own output slot.
    fn emits_predicate_context(&self) -> bool {
        false
    }

    /// Fill `frontier` with the moves leaving `focus`.
    ///
    /// `frontier` arrives empty. Leaving it empty ends the flow at `focus`.
    fn select(&self, ctx: &DiffusionContext<'_>, focus: &PaintedNode, frontier: &mut Frontier);

    /// Normalizer for the weights in `frontier`.
    fn total_weight(&self, _ctx: &DiffusionContext<'_>, frontier: &Frontier) -> f64 {
        frontier.weight_sum()
    }

    /// Compute the full vector of `bookmark`.
    fn color(&self, ctx: &DiffusionContext<'_>, bookmark: usize, scratch: &mut Scratch) -> Result<Bcv> {
        diffuse(ctx, self, bookmark, scratch)
    }
}

/// Directed moves of a vertex, weighted by `weight`.
fn push_directed(
    ctx: &DiffusionContext<'_>,
    focus: VertexId,
    frontier: &mut Frontier,
    weight: impl Fn(EdgeId) -> f64,
) {
    for (neighbor, edge) in ctx.adjacency.directed(focus, ctx.params.reverse) {
        frontier.push(neighbor, edge, weight(edge));
    }
}

/// In + out moves of a vertex, each self-loop once, skipping edges `keep` rejects.
fn push_undirected(
    ctx: &DiffusionContext<'_>,
    focus: VertexId,
    frontier: &mut Frontier,
    mut keep: impl FnMut(VertexId, EdgeId) -> bool,
) {
    for (neighbor, edge) in ctx.adjacency.incoming(focus) {
        if keep(neighbor, edge) {
            frontier.push(neighbor, edge, ctx.edge_weight(edge));
        }
    }
    for (neighbor, edge) in ctx.adjacency.outgoing(focus) {
        if neighbor != focus && keep(neighbor, edge) {
            frontier.push(neighbor, edge, ctx.edge_weight(edge));
        }
    }
}
