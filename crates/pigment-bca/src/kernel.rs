//! The diffusion kernel shared by every policy.
//!
//! For one bookmark `b`:
//!
//! 1. Seed the queue with `b` holding all the paint (1.0).
//! 2. Pop the pending node with the smallest id and deposit `alpha * paint`.
//! 3. Below `epsilon` the node keeps its deposit and sends nothing on.
//! 4. Otherwise the policy fills a [`Frontier`]; each entry receives
//!    `(1 - alpha) * paint * w / total`, dropped when below `epsilon`.
//!
//! A frontier whose single entry is the predecessor is a no-op, as is a zero
//! total weight (never a division). Every forwarded partial
//! is at least `epsilon` and the forwarded mass shrinks by `1 - alpha` per hop,
//! so the loop terminates on cyclic graphs.

use crate::bcv::Bcv;
use crate::error::{Error, Result};
use crate::paint::{PaintQueue, PaintedNode};
use crate::policy::NeighborPolicy;
use pigment_core::{Adjacency, EdgeId, PredicateWeights, RdfGraph, VertexId, VertexKind};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Numeric parameters of a diffusion run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiffusionParams {
    /// Fraction of arriving paint kept at each node, in `(0, 1]`.
    pub alpha: f64,
    /// Paint below this is not forwarded.
    pub epsilon: f64,
    /// Follow edges against their direction.
    pub reverse: bool,
}

impl Default for DiffusionParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            epsilon: 1e-4,
            reverse: false,
        }
    }
}

impl DiffusionParams {
    /// Validated parameters.
    pub fn new(alpha: f64, epsilon: f64, reverse: bool) -> Result<Self> {
        let params = Self {
            alpha,
            epsilon,
            reverse,
        };
        params.validate()?;
        Ok(params)
    }

    /// Reject values for which the kernel is undefined.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Cooperative cancellation flag shared by all jobs of a run.
///
/// Jobs poll it once per popped node and stop with [`Error::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once [`CancelToken::cancel`] was called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Read-only state every job of a run shares.
#[derive(Debug, Clone)]
pub struct DiffusionContext<'g> {
    /// The graph being colored.
    pub graph: &'g RdfGraph,
    /// Its precomputed neighborhoods.
    pub adjacency: &'g Adjacency,
    /// One weight per predicate.
    pub predicate_weights: &'g PredicateWeights,
    /// Kernel parameters.
    pub params: DiffusionParams,
    cancel: CancelToken,
}

impl<'g> DiffusionContext<'g> {
    /// Context with a private cancel token.
    pub fn new(
        graph: &'g RdfGraph,
        adjacency: &'g Adjacency,
        predicate_weights: &'g PredicateWeights,
        params: DiffusionParams,
    ) -> Self {
        Self {
            graph,
            adjacency,
            predicate_weights,
            params,
            cancel: CancelToken::new(),
        }
    }

    /// Share `token` with the caller so it can stop the run.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Number of vertices `N`; predicate slots start here.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    /// Number of edge types `T`.
    #[inline]
    pub fn predicate_count(&self) -> usize {
        self.graph.predicate_count()
    }

    /// Size of the output index space, `N + T`.
    #[inline]
    pub fn index_space(&self) -> usize {
        self.vertex_count() + self.predicate_count()
    }

    /// Output index of predicate `t`'s slot.
    #[inline]
    pub fn predicate_slot(&self, t: usize) -> usize {
        self.vertex_count() + t
    }

    /// True if `v` is a literal vertex.
    #[inline]
    pub fn is_literal(&self, v: VertexId) -> bool {
        self.graph.vertex_kind(v) == Some(VertexKind::Literal)
    }

    /// Weight of an edge's predicate.
    #[inline]
    pub fn predicate_weight(&self, e: EdgeId) -> f64 {
        self.graph
            .edge_type(e)
            .map_or(0.0, |t| self.predicate_weights.get(t))
    }

    /// Edge weight scaled by its predicate weight.
    #[inline]
    pub fn edge_weight(&self, e: EdgeId) -> f64 {
        self.graph.edge_weight(e) * self.predicate_weight(e)
    }

    /// True once the run was cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Candidate neighbors of one focus node.
///
/// Three index-aligned buffers: target output index, edge used to get there,
/// and the weight of that move. Reused across pops.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    neighbors: Vec<usize>,
    edges: Vec<EdgeId>,
    weights: Vec<f64>,
}

impl Frontier {
    /// Empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move.
    #[inline]
    pub fn push(&mut self, neighbor: usize, edge: EdgeId, weight: f64) {
        self.neighbors.push(neighbor);
        self.edges.push(edge);
        self.weights.push(weight);
    }

    /// Add `weight` to the entry for `neighbor`, appending it if absent.
    ///
    /// The entry keeps the edge it was created with.
    pub fn accumulate(&mut self, neighbor: usize, edge: EdgeId, weight: f64) {
        match self.neighbors.iter().position(|&n| n == neighbor) {
            Some(i) => self.weights[i] += weight,
            None => self.push(neighbor, edge, weight),
        }
    }

    /// Drop every entry, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.neighbors.clear();
        self.edges.clear();
        self.weights.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// True if there is nowhere to go.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Selected neighbor indices.
    pub fn select_neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Edges aligned with [`Frontier::select_neighbors`].
    pub fn select_edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Weights aligned with [`Frontier::select_neighbors`].
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Sum of all weights.
    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// `(neighbor, edge, weight)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (usize, EdgeId, f64)> + '_ {
        self.neighbors
            .iter()
            .zip(&self.edges)
            .zip(&self.weights)
            .map(|((&n, &e), &w)| (n, e, w))
    }
}

/// Per-worker buffers, reused from job to job.
#[derive(Debug, Default)]
pub struct Scratch {
    pub(crate) queue: PaintQueue,
    pub(crate) frontier: Frontier,
}

impl Scratch {
    /// Buffers sized for `ctx`'s index space.
    pub fn for_context(ctx: &DiffusionContext<'_>) -> Self {
        Self {
            queue: PaintQueue::with_capacity(ctx.index_space()),
            frontier: Frontier::new(),
        }
    }
}

/// Color one bookmark with `policy`.
///
/// Fails with [`Error::ReverseUnsupported`] when the policy cannot run in
/// reverse, [`Error::UnknownBookmark`] outside `[0, N + T)`, and
/// [`Error::Cancelled`] when the context's token fires mid-job.
pub fn diffuse<P: NeighborPolicy + ?Sized>(
    ctx: &DiffusionContext<'_>,
    policy: &P,
    bookmark: usize,
    scratch: &mut Scratch,
) -> Result<Bcv> {
    if ctx.params.reverse && !policy.supports_reverse() {
        return Err(Error::ReverseUnsupported {
            variant: policy.name(),
        });
    }
    let size = ctx.index_space();
    if bookmark >= size {
        return Err(Error::UnknownBookmark { bookmark, size });
    }

    let DiffusionParams { alpha, epsilon, .. } = ctx.params;
    let n = ctx.vertex_count();
    let emit_predicates = policy.emits_predicate_context();
    let Scratch { queue, frontier } = scratch;

    queue.clear();
    queue.push(PaintedNode::seed(bookmark));
    let mut bcv = Bcv::new(bookmark);

    while let Some(focus) = queue.pop_first() {
        if ctx.is_cancelled() {
            queue.clear();
            return Err(Error::Cancelled { bookmark });
        }

        let kept = alpha * focus.paint;
        match focus.predicate.filter(|_| emit_predicates && focus.node < n) {
            // The arrival predicate takes half of the retained share.
            Some(p) => {
                bcv.add(focus.node, kept / 2.0);
                bcv.add(n + p, kept / 2.0);
            }
            None => bcv.add(focus.node, kept),
        }

        if focus.paint < epsilon {
            continue;
        }

        frontier.clear();
        policy.select(ctx, &focus, frontier);
        if frontier.is_empty() {
            continue;
        }
        // The only way out is back to the predecessor.
        if frontier.len() == 1 && focus.prev == Some(frontier.select_neighbors()[0]) {
            continue;
        }
        let total = policy.total_weight(ctx, frontier);
        if !(total > 0.0) {
            continue;
        }

        let outflow = (1.0 - alpha) * focus.paint;
        for (neighbor, edge, weight) in frontier.iter() {
            let partial = outflow * weight / total;
            if partial < epsilon {
                continue;
            }
            queue.deposit(neighbor, ctx.graph.edge_type(edge), Some(focus.node), partial);
        }
    }

    trace!(bookmark, entries = bcv.len(), policy = policy.name(), "bookmark colored");
    Ok(bcv)
}
