//! Parallel scheduling of diffusion jobs.
//!
//! One job per bookmark. Jobs share the read-only [`DiffusionContext`] and
//! nothing else; each worker owns one [`Scratch`] that it reuses across the
//! jobs it runs. Results land in job order, so row `i` of the output always
//! belongs to bookmark `i` of the [`BookmarkSet`] whatever the scheduling.

use crate::bcv::Bcv;
use crate::error::Error;
use crate::kernel::{DiffusionContext, Scratch};
use crate::policy::NeighborPolicy;
use pigment_core::{RdfGraph, VertexKind};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::collections::HashSet;
use tracing::warn;

/// Ordered list of bookmarks to color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkSet(Vec<usize>);

impl BookmarkSet {
    /// Every vertex, in id order.
    pub fn all_vertices(graph: &RdfGraph) -> Self {
        Self((0..graph.vertex_count()).collect())
    }

    /// Vertices whose kind is in `kinds`, in id order.
    pub fn of_kinds(graph: &RdfGraph, kinds: &[VertexKind]) -> Self {
        Self(
            (0..graph.vertex_count())
                .filter(|&v| graph.vertex_kind(v).is_some_and(|k| kinds.contains(&k)))
                .collect(),
        )
    }

    /// Explicit bookmarks, order preserved.
    pub fn from_ids(ids: Vec<usize>) -> Self {
        Self(ids)
    }

    /// Append every predicate slot `N..N + T` not already present.
    pub fn with_predicates(mut self, graph: &RdfGraph) -> Self {
        let n = graph.vertex_count();
        let slots = n..n + graph.predicate_count();
        let present: HashSet<usize> = self.0.iter().copied().filter(|b| slots.contains(b)).collect();
        self.0.extend(slots.filter(|s| !present.contains(s)));
        self
    }

    /// Bookmarks in job order.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there is nothing to color.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A job that did not produce a vector.
#[derive(Debug, thiserror::Error)]
#[error("bookmark {bookmark} failed under {variant}: {source}")]
pub struct JobFailure {
    /// Bookmark of the failed job.
    pub bookmark: usize,
    /// Policy that ran it.
    pub variant: &'static str,
    /// What went wrong.
    #[source]
    pub source: Error,
}

/// Outcome of a run, one slot per bookmark in job order.
#[derive(Debug, Default)]
pub struct Coloring {
    results: Vec<Result<Bcv, JobFailure>>,
}

impl Coloring {
    /// Wrap job-ordered results.
    pub fn from_results(results: Vec<Result<Bcv, JobFailure>>) -> Self {
        Self { results }
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if no job ran.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Outcome of job `i`.
    pub fn get(&self, i: usize) -> Option<&Result<Bcv, JobFailure>> {
        self.results.get(i)
    }

    /// All outcomes in job order.
    pub fn results(&self) -> &[Result<Bcv, JobFailure>] {
        &self.results
    }

    /// Successful vectors in job order.
    pub fn vectors(&self) -> impl Iterator<Item = &Bcv> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    /// Failed jobs in job order.
    pub fn failures(&self) -> impl Iterator<Item = &JobFailure> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    /// Number of failed jobs.
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Consume into job-ordered outcomes.
    pub fn into_results(self) -> Vec<Result<Bcv, JobFailure>> {
        self.results
    }
}

/// Color every bookmark of `bookmarks` on `pool`.
///
/// A failing job only fails its own slot.
pub fn color_all<P: NeighborPolicy>(
    pool: &ThreadPool,
    ctx: &DiffusionContext<'_>,
    policy: &P,
    bookmarks: &BookmarkSet,
) -> Coloring {
    let results: Vec<Result<Bcv, JobFailure>> = pool.install(|| {
        bookmarks
            .as_slice()
            .par_iter()
            .map_init(
                || Scratch::for_context(ctx),
                |scratch, &bookmark| {
                    policy
                        .color(ctx, bookmark, scratch)
                        .map_err(|source| JobFailure {
                            bookmark,
                            variant: policy.name(),
                            source,
                        })
                },
            )
            .collect()
    });

    for failure in results.iter().filter_map(|r| r.as_ref().err()) {
        warn!(
            bookmark = failure.bookmark,
            variant = failure.variant,
            error = %failure.source,
            "diffusion job failed"
        );
    }
    Coloring::from_results(results)
}
