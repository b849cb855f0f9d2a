use super::{push_undirected, NeighborPolicy};
use crate::kernel::{DiffusionContext, Frontier};
use crate::paint::PaintedNode;

/// Ignores edge direction but never sends paint straight back.
///
/// The edges excluded are those of the arrival predicate that lead to the
/// predecessor. Reverse mode is meaningless here and rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndirectedWeighted;

impl NeighborPolicy for UndirectedWeighted {
    fn name(&self) -> &'static str {
        "UndirectedWeighted"
    }

    fn supports_reverse(&self) -> bool {
        false
    }

    fn select(&self, ctx: &DiffusionContext<'_>, focus: &PaintedNode, frontier: &mut Frontier) {
        let back = focus.prev.zip(focus.predicate);
        push_undirected(ctx, focus.node, frontier, |neighbor, edge| match back {
            Some((prev, p)) => !(neighbor == prev && ctx.graph.edge_type(edge) == Some(p)),
            None => true,
        });
    }
}
