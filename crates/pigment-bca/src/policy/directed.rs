use super::{push_directed, NeighborPolicy};
use crate::kernel::{DiffusionContext, Frontier};
use crate::paint::PaintedNode;

/// Follows edge direction, splitting paint evenly over the fan-out.
///
/// With `emit_predicates` a vertex shares its retained paint evenly with the
/// slot `N + p` of the predicate it was reached through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectedUnweighted {
    /// Emit predicate-context slots.
    pub emit_predicates: bool,
}

impl NeighborPolicy for DirectedUnweighted {
    fn name(&self) -> &'static str {
        "DirectedUnweighted"
    }

    fn emits_predicate_context(&self) -> bool {
        self.emit_predicates
    }

    fn select(&self, ctx: &DiffusionContext<'_>, focus: &PaintedNode, frontier: &mut Frontier) {
        push_directed(ctx, focus.node, frontier, |_| 1.0);
    }
}

/// Follows edge direction, splitting paint by edge weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectedWeighted;

impl NeighborPolicy for DirectedWeighted {
    fn name(&self) -> &'static str {
        "DirectedWeighted"
    }

    fn select(&self, ctx: &DiffusionContext<'_>, focus: &PaintedNode, frontier: &mut Frontier) {
        push_directed(ctx, focus.node, frontier, |e| ctx.edge_weight(e));
    }
}
