use super::{push_directed, push_undirected, NeighborPolicy};
use crate::kernel::{DiffusionContext, Frontier};
use crate::paint::PaintedNode;
use pigment_core::EdgeId;

/// Directed weighted diffusion that keeps literals from bleeding across
/// predicates.
///
/// Many subjects share a literal such as `"1984"` through unrelated
/// predicates. A literal focus therefore only sends paint back along edges of
/// the predicate it arrived through (all of them when the literal is the
/// bookmark), plus its literal-similarity edges in either direction.
///
/// Moves are weighted by similarity score when the edge has one, else by the
/// predicate weight alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectedWeightedLiteral;

impl DirectedWeightedLiteral {
    fn weight(ctx: &DiffusionContext<'_>, e: EdgeId) -> f64 {
        ctx.graph
            .edge_similarity(e)
            .unwrap_or_else(|| ctx.predicate_weight(e))
    }
}

impl NeighborPolicy for DirectedWeightedLiteral {
    fn name(&self) -> &'static str {
        "DirectedWeightedLiteral"
    }

    fn select(&self, ctx: &DiffusionContext<'_>, focus: &PaintedNode, frontier: &mut Frontier) {
        let v = focus.node;
        if !ctx.is_literal(v) {
            push_directed(ctx, v, frontier, |e| Self::weight(ctx, e));
            return;
        }

        let reverse = ctx.params.reverse;
        for (neighbor, edge) in ctx.adjacency.directed(v, !reverse) {
            let similar = ctx.graph.edge_similarity(edge).is_some();
            let same_predicate = focus
                .predicate
                .map_or(true, |p| ctx.graph.edge_type(edge) == Some(p));
            if similar || same_predicate {
                frontier.push(neighbor, edge, Self::weight(ctx, edge));
            }
        }
        for (neighbor, edge) in ctx.adjacency.directed(v, reverse) {
            if neighbor != v && ctx.graph.edge_similarity(edge).is_some() {
                frontier.push(neighbor, edge, Self::weight(ctx, edge));
            }
        }
    }
}

/// Directed weighted diffusion in which literals act undirected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HybridWeighted;

impl NeighborPolicy for HybridWeighted {
    fn name(&self) -> &'static str {
        "HybridWeighted"
    }

    fn select(&self, ctx: &DiffusionContext<'_>, focus: &PaintedNode, frontier: &mut Frontier) {
        if ctx.is_literal(focus.node) {
            push_undirected(ctx, focus.node, frontier, |_, _| true);
        } else {
            push_directed(ctx, focus.node, frontier, |e| ctx.edge_weight(e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{diffuse, DiffusionParams, Scratch};
    use crate::policy::DirectedWeighted;
    use pigment_core::{Adjacency, PredicateWeights, RdfGraph, Term, Triple};

    fn color<P: NeighborPolicy>(g: &RdfGraph, policy: &P, bookmark: usize) -> crate::Bcv {
        let adj = Adjacency::build_partitioned(g, 1);
        let w = PredicateWeights::uniform(g.predicate_count());
        let ctx = DiffusionContext::new(g, &adj, &w, DiffusionParams::new(0.5, 1e-6, false).unwrap());
        let mut scratch = Scratch::for_context(&ctx);
        diffuse(&ctx, policy, bookmark, &mut scratch).unwrap()
    }

    #[test]
    fn test_literal_only_returns_to_predecessor() {
        // a -p-> L <-q- b: from a, L must not leak to b, and going back to a
        // alone is a no-op.
        let mut g = RdfGraph::new();
        g.add_triple(Triple::new(Term::iri("a"), "p", Term::literal("1984")));
        g.add_triple(Triple::new(Term::iri("b"), "q", Term::literal("1984")));
        let a = g.vertex_id(&Term::iri("a")).unwrap();
        let lit = g.vertex_id(&Term::literal("1984")).unwrap();
        let b = g.vertex_id(&Term::iri("b")).unwrap();

        let bcv = color(&g, &DirectedWeightedLiteral, a);
        assert!((bcv.get(a).unwrap() - 0.5).abs() < 1e-12);
        assert!((bcv.get(lit).unwrap() - 0.25).abs() < 1e-12);
        assert!(!bcv.contains(b));
    }

    #[test]
    fn test_literal_bookmark_uses_every_predicate() {
        let mut g = RdfGraph::new();
        g.add_triple(Triple::new(Term::iri("a"), "p", Term::literal("x")));
        g.add_triple(Triple::new(Term::iri("b"), "q", Term::literal("x")));
        let lit = g.vertex_id(&Term::literal("x")).unwrap();

        let bcv = color(&g, &DirectedWeightedLiteral, lit);
        assert_eq!(bcv.len(), 3);
    }

    #[test]
    fn test_similarity_edges_carry_paint() {
        let mut g = RdfGraph::new();
        g.add_triple(Triple::new(Term::iri("a"), "p", Term::literal("Jon")));
        g.add_triple(Triple::new(Term::iri("b"), "p", Term::literal("John")));
        let jon = g.vertex_id(&Term::literal("Jon")).unwrap();
        let john = g.vertex_id(&Term::literal("John")).unwrap();
        g.add_literal_similarity(jon, john, 0.5).unwrap();
        let a = g.vertex_id(&Term::iri("a")).unwrap();
        let b = g.vertex_id(&Term::iri("b")).unwrap();

        let bcv = color(&g, &DirectedWeightedLiteral, a);
        assert!(bcv.contains(john));
        // John arrived through the similarity predicate, so b is out of reach.
        assert!(!bcv.contains(b));
    }

    #[test]
    fn test_hybrid_literal_spreads_both_ways() {
        let mut g = RdfGraph::new();
        g.add_triple(Triple::new(Term::iri("a"), "p", Term::literal("x")));
        g.add_triple(Triple::new(Term::iri("b"), "q", Term::literal("x")));
        let a = g.vertex_id(&Term::iri("a")).unwrap();
        let b = g.vertex_id(&Term::iri("b")).unwrap();

        let bcv = color(&g, &HybridWeighted, a);
        assert!(bcv.contains(b));
        assert!(!color(&g, &DirectedWeighted, a).contains(b));
    }
}
