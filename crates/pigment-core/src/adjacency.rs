//! Neighborhood precomputation.
//!
//! Flattens the graph into four index-aligned arrays per vertex:
//!
//! | Array | Content |
//! |-------|---------|
//! | `vertex_in[v]` | sources of edges entering `v` |
//! | `edge_in[v]` | ids of those edges, same positions |
//! | `vertex_out[v]` | targets of edges leaving `v` |
//! | `edge_out[v]` | ids of those edges, same positions |
//!
//! Every list is sorted by ascending edge id, so the arrays do not depend on
//! how many threads built them. The arrays are built once and then shared
//! read-only by every diffusion job.
//!
//! Work is split into contiguous vertex ranges, one per worker. Each worker
//! owns a disjoint `&mut` slice of every output array, so no locking is needed.

use crate::{EdgeId, PredicateId, RdfGraph, VertexId};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::debug;

/// Precomputed per-vertex neighborhoods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    vertex_in: Vec<Vec<VertexId>>,
    vertex_out: Vec<Vec<VertexId>>,
    edge_in: Vec<Vec<EdgeId>>,
    edge_out: Vec<Vec<EdgeId>>,
    /// Ascending edge ids per predicate (vertex <-> edge-type mapping).
    edges_by_type: Vec<Vec<EdgeId>>,
}

impl Adjacency {
    /// Build the arrays using every thread of `pool`, one vertex range each.
    pub fn build(graph: &RdfGraph, pool: &ThreadPool) -> Self {
        let partitions = pool.current_num_threads().max(1);
        pool.install(|| Self::build_partitioned(graph, partitions))
    }

    /// Build with an explicit number of vertex-range partitions.
    ///
    /// Runs on whatever rayon pool is current.
    pub fn build_partitioned(graph: &RdfGraph, partitions: usize) -> Self {
        let n = graph.vertex_count();
        let mut vertex_in = vec![Vec::new(); n];
        let mut vertex_out = vec![Vec::new(); n];
        let mut edge_in = vec![Vec::new(); n];
        let mut edge_out = vec![Vec::new(); n];

        if n > 0 {
            let chunk = n.div_ceil(partitions.max(1));
            let pg = graph.as_petgraph();

            vertex_in
                .par_chunks_mut(chunk)
                .zip(edge_in.par_chunks_mut(chunk))
                .zip(vertex_out.par_chunks_mut(chunk))
                .zip(edge_out.par_chunks_mut(chunk))
                .enumerate()
                .for_each(|(part, (((v_in, e_in), v_out), e_out))| {
                    let start = part * chunk;
                    for offset in 0..v_in.len() {
                        let v = NodeIndex::new(start + offset);

                        let mut incoming: Vec<(EdgeId, VertexId)> = pg
                            .edges_directed(v, Direction::Incoming)
                            .map(|e| (e.id().index(), e.source().index()))
                            .collect();
                        incoming.sort_unstable();
                        (v_in[offset], e_in[offset]) =
                            incoming.into_iter().map(|(e, s)| (s, e)).unzip();

                        let mut outgoing: Vec<(EdgeId, VertexId)> = pg
                            .edges_directed(v, Direction::Outgoing)
                            .map(|e| (e.id().index(), e.target().index()))
                            .collect();
                        outgoing.sort_unstable();
                        (v_out[offset], e_out[offset]) =
                            outgoing.into_iter().map(|(e, t)| (t, e)).unzip();
                    }
                });
        }

        let mut edges_by_type = vec![Vec::new(); graph.predicate_count()];
        for (id, _, _, data) in graph.edges() {
            edges_by_type[data.predicate].push(id);
        }
        debug!(vertices = n, edges = graph.edge_count(), partitions, "adjacency built");

        Self {
            vertex_in,
            vertex_out,
            edge_in,
            edge_out,
            edges_by_type,
        }
    }

    /// Number of vertices covered.
    pub fn vertex_count(&self) -> usize {
        self.vertex_out.len()
    }

    /// Sources of edges entering `v`.
    pub fn vertex_in(&self, v: VertexId) -> &[VertexId] {
        self.vertex_in.get(v).map(Vec::as_slice).unwrap_or_default()
    }

    /// Targets of edges leaving `v`.
    pub fn vertex_out(&self, v: VertexId) -> &[VertexId] {
        self.vertex_out.get(v).map(Vec::as_slice).unwrap_or_default()
    }

    /// Edges entering `v`, aligned with [`Adjacency::vertex_in`].
    pub fn edge_in(&self, v: VertexId) -> &[EdgeId] {
        self.edge_in.get(v).map(Vec::as_slice).unwrap_or_default()
    }

    /// Edges leaving `v`, aligned with [`Adjacency::vertex_out`].
    pub fn edge_out(&self, v: VertexId) -> &[EdgeId] {
        self.edge_out.get(v).map(Vec::as_slice).unwrap_or_default()
    }

    /// `(source, edge)` pairs entering `v`.
    pub fn incoming(&self, v: VertexId) -> impl Iterator<Item = (VertexId, EdgeId)> + '_ {
        self.vertex_in(v)
            .iter()
            .copied()
            .zip(self.edge_in(v).iter().copied())
    }

    /// `(target, edge)` pairs leaving `v`.
    pub fn outgoing(&self, v: VertexId) -> impl Iterator<Item = (VertexId, EdgeId)> + '_ {
        self.vertex_out(v)
            .iter()
            .copied()
            .zip(self.edge_out(v).iter().copied())
    }

    /// `(neighbor, edge)` pairs in the given direction; `reverse` swaps in and out.
    pub fn directed(
        &self,
        v: VertexId,
        reverse: bool,
    ) -> impl Iterator<Item = (VertexId, EdgeId)> + '_ {
        let (vertices, edges) = if reverse {
            (self.vertex_in(v), self.edge_in(v))
        } else {
            (self.vertex_out(v), self.edge_out(v))
        };
        vertices.iter().copied().zip(edges.iter().copied())
    }

    /// Total degree (in + out) of `v`.
    pub fn degree(&self, v: VertexId) -> usize {
        self.edge_in(v).len() + self.edge_out(v).len()
    }

    /// Ascending edge ids with predicate `t`.
    pub fn edges_of_type(&self, t: PredicateId) -> &[EdgeId] {
        self.edges_by_type.get(t).map(Vec::as_slice).unwrap_or_default()
    }
}
