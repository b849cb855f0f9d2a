//! End-to-end runs: adjacency, predicate weights, policy dispatch.

use crate::config::{BcaConfig, Variant};
use crate::error::{Error, Result};
use crate::kernel::{CancelToken, DiffusionContext};
use crate::policy::{
    ContextWinnowedUndirectedWeighted, DirectedUnweighted, DirectedWeighted,
    DirectedWeightedLiteral, HybridWeighted, Kale10x10Plus5x5, Kale15x10, Kale15x15,
    UndirectedWeighted,
};
use crate::schedule::{color_all, BookmarkSet, Coloring};
use pigment_core::{Adjacency, PredicateWeights, RdfGraph};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;
use tracing::{debug, info};

/// A validated configuration bound to its own worker pool.
///
/// ```rust
/// use pigment_bca::{BcaConfig, BcaEngine};
/// use pigment_core::{RdfGraph, Term, Triple};
///
/// let mut graph = RdfGraph::new();
/// graph.add_triple(Triple::new(Term::iri("ex:a"), "ex:p", Term::iri("ex:b")));
///
/// let engine = BcaEngine::new(BcaConfig { threads: 2, ..BcaConfig::default() }).unwrap();
/// let coloring = engine.run(&graph).unwrap();
/// assert_eq!(coloring.len(), 2);
/// ```
#[derive(Debug)]
pub struct BcaEngine {
    config: BcaConfig,
    pool: ThreadPool,
    cancel: CancelToken,
}

impl BcaEngine {
    /// Validate `config` and start its thread pool.
    pub fn new(config: BcaConfig) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("pigment-bca-{i}"))
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;
        Ok(Self {
            config,
            pool,
            cancel: CancelToken::new(),
        })
    }

    /// The configuration this engine runs.
    pub fn config(&self) -> &BcaConfig {
        &self.config
    }

    /// Token that stops every running and future job of this engine.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Bookmarks selected by the configuration.
    pub fn bookmarks(&self, graph: &RdfGraph) -> BookmarkSet {
        let base = match &self.config.bookmark_kinds {
            Some(kinds) => BookmarkSet::of_kinds(graph, kinds),
            None => BookmarkSet::all_vertices(graph),
        };
        if self.config.include_predicates || self.config.variant.is_kale() {
            base.with_predicates(graph)
        } else {
            base
        }
    }

    /// Color the configured bookmarks of `graph`.
    pub fn run(&self, graph: &RdfGraph) -> Result<Coloring> {
        let bookmarks = self.bookmarks(graph);
        self.run_with(graph, &bookmarks)
    }

    /// Color explicit bookmarks of `graph`.
    ///
    /// Errors here are run-level (bad weights); per-bookmark failures are
    /// reported inside the [`Coloring`].
    pub fn run_with(&self, graph: &RdfGraph, bookmarks: &BookmarkSet) -> Result<Coloring> {
        let started = Instant::now();
        info!(
            variant = %self.config.variant,
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            predicates = graph.predicate_count(),
            bookmarks = bookmarks.len(),
            threads = self.pool.current_num_threads(),
            "coloring graph"
        );

        let adjacency = Adjacency::build(graph, &self.pool);
        let weights =
            PredicateWeights::compute(graph, self.config.weighting, &self.config.manual_weights)?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            weighting = ?self.config.weighting,
            "neighborhoods and predicate weights ready"
        );

        let ctx = DiffusionContext::new(graph, &adjacency, &weights, self.config.params())
            .with_cancel(self.cancel.clone());
        let coloring = self.dispatch(&ctx, bookmarks);

        info!(
            colored = coloring.len() - coloring.failure_count(),
            failed = coloring.failure_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "coloring finished"
        );
        Ok(coloring)
    }

    fn dispatch(&self, ctx: &DiffusionContext<'_>, bookmarks: &BookmarkSet) -> Coloring {
        let pool = &self.pool;
        match self.config.variant {
            Variant::DirectedUnweighted => {
                let policy = DirectedUnweighted {
                    emit_predicates: self.config.emit_predicates,
                };
                color_all(pool, ctx, &policy, bookmarks)
            }
            Variant::DirectedWeighted => color_all(pool, ctx, &DirectedWeighted, bookmarks),
            Variant::DirectedWeightedLiteral => {
                color_all(pool, ctx, &DirectedWeightedLiteral, bookmarks)
            }
            Variant::HybridWeighted => color_all(pool, ctx, &HybridWeighted, bookmarks),
            Variant::UndirectedWeighted => color_all(pool, ctx, &UndirectedWeighted, bookmarks),
            Variant::ContextWinnowedUndirectedWeighted => {
                let policy = ContextWinnowedUndirectedWeighted::new(
                    self.config.date_filter.unwrap_or_default(),
                );
                color_all(pool, ctx, &policy, bookmarks)
            }
            Variant::Kale15x15 => color_all(pool, ctx, &Kale15x15, bookmarks),
            Variant::Kale15x10 => color_all(pool, ctx, &Kale15x10, bookmarks),
            Variant::Kale10x10Plus5x5 => color_all(pool, ctx, &Kale10x10Plus5x5, bookmarks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pigment_core::{Term, Triple, VertexKind};

    fn graph() -> RdfGraph {
        let mut g = RdfGraph::new();
        g.add_triple(Triple::new(Term::iri("a"), "p", Term::iri("b")));
        g.add_triple(Triple::new(Term::iri("b"), "name", Term::literal("Bee")));
        g
    }

    #[test]
    fn test_invalid_config_rejected_before_running() {
        let config = BcaConfig {
            epsilon: 0.0,
            ..BcaConfig::default()
        };
        assert!(matches!(BcaEngine::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_bookmark_selection() {
        let g = graph();
        let engine = BcaEngine::new(BcaConfig {
            threads: 1,
            bookmark_kinds: Some(vec![VertexKind::Uri]),
            ..BcaConfig::default()
        })
        .unwrap();
        assert_eq!(engine.bookmarks(&g).as_slice(), &[0, 1]);

        let kale = BcaEngine::new(BcaConfig {
            threads: 1,
            variant: Variant::Kale15x10,
            ..BcaConfig::default()
        })
        .unwrap();
        assert_eq!(kale.bookmarks(&g).as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_every_variant_runs() {
        let g = graph();
        for variant in Variant::ALL {
            let date_filter = (variant == Variant::ContextWinnowedUndirectedWeighted)
                .then(crate::policy::DateFilter::exact);
            let engine = BcaEngine::new(BcaConfig {
                threads: 2,
                variant,
                date_filter,
                ..BcaConfig::default()
            })
            .unwrap();
            let coloring = engine.run(&g).unwrap();
            assert_eq!(coloring.failure_count(), 0, "{variant}");
            assert_eq!(coloring.len(), engine.bookmarks(&g).len());
        }
    }

    #[test]
    fn test_cancel_fails_every_job() {
        let g = graph();
        let engine = BcaEngine::new(BcaConfig {
            threads: 2,
            ..BcaConfig::default()
        })
        .unwrap();
        engine.cancel_token().cancel();
        let coloring = engine.run(&g).unwrap();
        assert_eq!(coloring.failure_count(), coloring.len());
    }
}
