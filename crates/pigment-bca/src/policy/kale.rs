//! Edge-as-node variants.
//!
//! Predicates are promoted to pseudo-vertices so they receive context vectors
//! of their own. Predicate `t` lives at output index `N + t`; moves into it
//! from one vertex are summed over all of that vertex's `t`-edges.
//!
//! | Variant | From a vertex | From pseudo-vertex `t` |
//! |---------|---------------|------------------------|
//! | [`Kale15x15`] | adjacent vertices and pseudo-vertices of its edges | objects of `t`-edges |
//! | [`Kale15x10`] | adjacent vertices | objects of `t`-edges |
//! | [`Kale10x10Plus5x5`] | adjacent vertices | pseudo-vertices of edges leaving those objects |
//!
//! In reverse mode edges are read backwards, so "objects" become subjects.

use super::NeighborPolicy;
use crate::kernel::{DiffusionContext, Frontier};
use crate::paint::PaintedNode;
use pigment_core::PredicateId;

/// Joint diffusion over vertices and predicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Kale15x15;

impl NeighborPolicy for Kale15x15 {
    fn name(&self) -> &'static str {
        "Kale15x15"
    }

    fn select(&self, ctx: &DiffusionContext<'_>, focus: &PaintedNode, frontier: &mut Frontier) {
        match as_predicate(ctx, focus.node) {
            Some(t) => push_objects(ctx, t, frontier),
            None => push_vertex_moves(ctx, focus.node, frontier, true),
        }
    }
}

/// Vertices stay among vertices; predicates spill into vertices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Kale15x10;

impl NeighborPolicy for Kale15x10 {
    fn name(&self) -> &'static str {
        "Kale15x10"
    }

    fn select(&self, ctx: &DiffusionContext<'_>, focus: &PaintedNode, frontier: &mut Frontier) {
        match as_predicate(ctx, focus.node) {
            Some(t) => push_objects(ctx, t, frontier),
            None => push_vertex_moves(ctx, focus.node, frontier, false),
        }
    }
}

/// Vertex space and predicate space diffuse separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Kale10x10Plus5x5;

impl NeighborPolicy for Kale10x10Plus5x5 {
    fn name(&self) -> &'static str {
        "Kale10x10Plus5x5"
    }

    fn select(&self, ctx: &DiffusionContext<'_>, focus: &PaintedNode, frontier: &mut Frontier) {
        match as_predicate(ctx, focus.node) {
            Some(t) => push_following_predicates(ctx, t, frontier),
            None => push_vertex_moves(ctx, focus.node, frontier, false),
        }
    }
}

fn as_predicate(ctx: &DiffusionContext<'_>, index: usize) -> Option<PredicateId> {
    index.checked_sub(ctx.vertex_count())
}

fn push_vertex_moves(
    ctx: &DiffusionContext<'_>,
    v: usize,
    frontier: &mut Frontier,
    with_predicates: bool,
) {
    for (neighbor, edge) in ctx.adjacency.directed(v, ctx.params.reverse) {
        let weight = ctx.edge_weight(edge);
        frontier.push(neighbor, edge, weight);
        if with_predicates {
            if let Some(t) = ctx.graph.edge_type(edge) {
                frontier.accumulate(ctx.predicate_slot(t), edge, weight);
            }
        }
    }
}

/// Far endpoint of every `t`-edge, one move per edge.
fn push_objects(ctx: &DiffusionContext<'_>, t: PredicateId, frontier: &mut Frontier) {
    let reverse = ctx.params.reverse;
    for &edge in ctx.adjacency.edges_of_type(t) {
        if let Some((subject, object)) = ctx.graph.edge_endpoints(edge) {
            let target = if reverse { subject } else { object };
            frontier.push(target, edge, ctx.edge_weight(edge));
        }
    }
}

/// Pseudo-vertices of the edges leaving the objects of `t`-edges.
fn push_following_predicates(ctx: &DiffusionContext<'_>, t: PredicateId, frontier: &mut Frontier) {
    let reverse = ctx.params.reverse;
    for &edge in ctx.adjacency.edges_of_type(t) {
        let Some((subject, object)) = ctx.graph.edge_endpoints(edge) else {
            continue;
        };
        let hinge = if reverse { subject } else { object };
        for (_, next) in ctx.adjacency.directed(hinge, reverse) {
            if let Some(q) = ctx.graph.edge_type(next) {
                frontier.accumulate(ctx.predicate_slot(q), next, ctx.edge_weight(next));
            }
        }
    }
}
