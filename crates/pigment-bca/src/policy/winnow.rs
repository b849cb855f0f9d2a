//! Date-winnowed undirected diffusion.
//!
//! Records often carry many date literals (births, releases, sightings) that
//! connect otherwise unrelated entities. This policy colors a bookmark
//! undirected, then prunes date literals that disagree with the bookmark's
//! own dates and colors it again:
//!
//! 1. Plain undirected diffusion finds the candidate neighborhood.
//! 2. Anchor dates are the date literals adjacent to the bookmark (or the
//!    bookmark itself). Any other date literal in the neighborhood that no
//!    anchor accepts under the [`DateFilter`] loses all its incident edges,
//!    recorded for both endpoints.
//! 3. If anything was removed, diffusion reruns without those edges.

use super::{push_undirected, NeighborPolicy};
use crate::bcv::Bcv;
use crate::error::{Error, Result};
use crate::kernel::{diffuse, DiffusionContext, Frontier, Scratch};
use crate::paint::PaintedNode;
use chrono::NaiveDate;
use pigment_core::{Adjacency, EdgeId, VertexId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Which side of an anchor a candidate date may fall on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateDirection {
    /// Candidate on or before the anchor.
    Backwards,
    /// Candidate on or after the anchor.
    Forwards,
    /// Either side.
    #[default]
    Bidirectional,
}

/// Rule deciding whether a candidate date fits an anchor date.
///
/// With `diff = candidate - anchor` in days, the direction bounds the sign of
/// `diff` and `max_days` bounds `|diff|`. `max_days = Some(0)` demands the
/// exact same day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFilter {
    /// Largest allowed distance in days; unbounded when `None`.
    #[serde(default)]
    pub max_days: Option<u32>,
    /// Allowed side of the anchor.
    #[serde(default)]
    pub direction: DateDirection,
}

impl DateFilter {
    /// Same day only.
    pub fn exact() -> Self {
        Self {
            max_days: Some(0),
            direction: DateDirection::Bidirectional,
        }
    }

    /// Candidate no later than the anchor.
    pub fn before(max_days: Option<u32>) -> Self {
        Self {
            max_days,
            direction: DateDirection::Backwards,
        }
    }

    /// Candidate no earlier than the anchor.
    pub fn after(max_days: Option<u32>) -> Self {
        Self {
            max_days,
            direction: DateDirection::Forwards,
        }
    }

    /// True if `candidate` fits `anchor`.
    pub fn accepts(&self, anchor: NaiveDate, candidate: NaiveDate) -> bool {
        let diff = candidate.signed_duration_since(anchor).num_days();
        let side = match self.direction {
            DateDirection::Backwards => diff <= 0,
            DateDirection::Forwards => diff >= 0,
            DateDirection::Bidirectional => true,
        };
        side && self
            .max_days
            .map_or(true, |max| diff.unsigned_abs() <= u64::from(max))
    }
}

/// Date of a literal whose lexical form starts with `YYYY-MM-DD`.
///
/// Anything after the tenth character (time, zone) is ignored.
pub fn parse_date_literal(lexical: &str) -> Option<NaiveDate> {
    let head = lexical.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Edges excluded from a rerun, per vertex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedEdges {
    by_vertex: HashMap<VertexId, BTreeSet<EdgeId>>,
}

impl RemovedEdges {
    /// Nothing removed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude `edge` when diffusing from `vertex`. Returns false if it was
    /// already excluded.
    pub fn insert(&mut self, vertex: VertexId, edge: EdgeId) -> bool {
        self.by_vertex.entry(vertex).or_default().insert(edge)
    }

    /// True if `edge` is excluded at `vertex`.
    pub fn contains(&self, vertex: VertexId, edge: EdgeId) -> bool {
        self.by_vertex
            .get(&vertex)
            .is_some_and(|edges| edges.contains(&edge))
    }

    /// Number of edges excluded at `vertex`.
    pub fn removed_at(&self, vertex: VertexId) -> usize {
        self.by_vertex.get(&vertex).map_or(0, BTreeSet::len)
    }

    /// Number of vertices with at least one exclusion.
    pub fn vertex_count(&self) -> usize {
        self.by_vertex.len()
    }

    /// True if nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.by_vertex.is_empty()
    }

    /// Every set must fit inside its vertex's degree.
    pub fn validate(&self, adjacency: &Adjacency) -> Result<()> {
        let mut vertices: Vec<_> = self.by_vertex.iter().collect();
        vertices.sort_unstable_by_key(|(&v, _)| v);
        for (&vertex, edges) in vertices {
            let degree = adjacency.degree(vertex);
            if edges.len() > degree {
                return Err(Error::MalformedExclusions {
                    vertex,
                    removed: edges.len(),
                    degree,
                });
            }
        }
        Ok(())
    }
}

/// Undirected diffusion with date-literal winnowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextWinnowedUndirectedWeighted {
    /// Rule a candidate date must satisfy against at least one anchor.
    pub filter: DateFilter,
}

impl ContextWinnowedUndirectedWeighted {
    /// Policy using `filter`.
    pub fn new(filter: DateFilter) -> Self {
        Self { filter }
    }

    /// Date literals adjacent to `bookmark`, and `bookmark` itself if it is one.
    pub fn anchors(&self, ctx: &DiffusionContext<'_>, bookmark: usize) -> Vec<(VertexId, NaiveDate)> {
        if bookmark >= ctx.vertex_count() {
            return Vec::new();
        }
        let adjacency = ctx.adjacency;
        let mut anchors: Vec<(VertexId, NaiveDate)> = std::iter::once(bookmark)
            .chain(adjacency.vertex_in(bookmark).iter().copied())
            .chain(adjacency.vertex_out(bookmark).iter().copied())
            .filter_map(|v| date_of(ctx, v).map(|d| (v, d)))
            .collect();
        anchors.sort_unstable();
        anchors.dedup();
        anchors
    }

    /// Edges to drop given the first-pass vector of a bookmark.
    pub fn removed_edges(&self, ctx: &DiffusionContext<'_>, first_pass: &Bcv) -> RemovedEdges {
        let mut removed = RemovedEdges::new();
        let anchors = self.anchors(ctx, first_pass.root());
        if anchors.is_empty() {
            return removed;
        }

        let n = ctx.vertex_count();
        for v in first_pass.indices().take_while(|&v| v < n) {
            if anchors.iter().any(|&(a, _)| a == v) {
                continue;
            }
            let Some(date) = date_of(ctx, v) else {
                continue;
            };
            if anchors.iter().any(|&(_, anchor)| self.filter.accepts(anchor, date)) {
                continue;
            }
            for (neighbor, edge) in ctx.adjacency.incoming(v).chain(ctx.adjacency.outgoing(v)) {
                removed.insert(v, edge);
                removed.insert(neighbor, edge);
            }
        }
        removed
    }

    /// Color `bookmark` without the edges in `removed`.
    pub fn diffuse_excluding(
        &self,
        ctx: &DiffusionContext<'_>,
        bookmark: usize,
        removed: &RemovedEdges,
        scratch: &mut Scratch,
    ) -> Result<Bcv> {
        removed.validate(ctx.adjacency)?;
        diffuse(ctx, &Winnowed { removed }, bookmark, scratch)
    }
}

impl NeighborPolicy for ContextWinnowedUndirectedWeighted {
    fn name(&self) -> &'static str {
        "ContextWinnowedUndirectedWeighted"
    }

    fn supports_reverse(&self) -> bool {
        false
    }

    fn select(&self, ctx: &DiffusionContext<'_>, focus: &PaintedNode, frontier: &mut Frontier) {
        push_undirected(ctx, focus.node, frontier, |_, _| true);
    }

    fn color(&self, ctx: &DiffusionContext<'_>, bookmark: usize, scratch: &mut Scratch) -> Result<Bcv> {
        let first_pass = diffuse(ctx, self, bookmark, scratch)?;
        let removed = self.removed_edges(ctx, &first_pass);
        if removed.is_empty() {
            return Ok(first_pass);
        }
        debug!(
            bookmark,
            vertices = removed.vertex_count(),
            "rerunning without winnowed date edges"
        );
        self.diffuse_excluding(ctx, bookmark, &removed, scratch)
    }
}

/// Second-pass policy: undirected moves minus one job's exclusions.
struct Winnowed<'a> {
    removed: &'a RemovedEdges,
}

impl NeighborPolicy for Winnowed<'_> {
    fn name(&self) -> &'static str {
        "ContextWinnowedUndirectedWeighted"
    }

    fn supports_reverse(&self) -> bool {
        false
    }

    fn select(&self, ctx: &DiffusionContext<'_>, focus: &PaintedNode, frontier: &mut Frontier) {
        let v = focus.node;
        push_undirected(ctx, v, frontier, |_, edge| !self.removed.contains(v, edge));
    }
}

fn date_of(ctx: &DiffusionContext<'_>, v: VertexId) -> Option<NaiveDate> {
    if !ctx.is_literal(v) {
        return None;
    }
    ctx.graph.vertex_label(v).and_then(parse_date_literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::DiffusionParams;
    use pigment_core::{PredicateWeights, RdfGraph, Term, Triple};

    const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    fn date(s: &str) -> NaiveDate {
        parse_date_literal(s).unwrap()
    }

    #[test]
    fn test_parse_date_literal() {
        assert_eq!(date("2020-02-29"), NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
        assert_eq!(
            parse_date_literal("1999-12-31T23:59:00Z"),
            NaiveDate::from_ymd_opt(1999, 12, 31)
        );
        assert_eq!(parse_date_literal("2021-02-30"), None);
        assert_eq!(parse_date_literal("Ann"), None);
        assert_eq!(parse_date_literal(""), None);
    }

    #[test]
    fn test_filter_directions() {
        let anchor = date("2020-01-10");
        let earlier = date("2020-01-05");
        let later = date("2020-01-20");

        assert!(DateFilter::before(None).accepts(anchor, earlier));
        assert!(!DateFilter::before(None).accepts(anchor, later));
        assert!(DateFilter::after(None).accepts(anchor, later));
        assert!(!DateFilter::after(None).accepts(anchor, earlier));
        assert!(DateFilter::exact().accepts(anchor, anchor));
        assert!(!DateFilter::exact().accepts(anchor, earlier));

        let week = DateFilter {
            max_days: Some(7),
            direction: DateDirection::Bidirectional,
        };
        assert!(week.accepts(anchor, earlier));
        assert!(!week.accepts(anchor, later));
    }

    /// event -date-> 2020-01-01, event -rel-> f, f -date-> 2021-06-01,
    /// f -seen-> 2020-01-05
    fn events() -> RdfGraph {
        let mut g = RdfGraph::new();
        let event = Term::iri("ex:event");
        let f = Term::iri("ex:f");
        g.add_triple(Triple::new(event.clone(), "ex:date", Term::typed_literal("2020-01-01", XSD_DATE)));
        g.add_triple(Triple::new(event, "ex:rel", f.clone()));
        g.add_triple(Triple::new(f.clone(), "ex:date", Term::typed_literal("2021-06-01", XSD_DATE)));
        g.add_triple(Triple::new(f, "ex:seen", Term::typed_literal("2020-01-05", XSD_DATE)));
        g
    }

    #[test]
    fn test_winnow_drops_far_dates() {
        let g = events();
        let adj = Adjacency::build_partitioned(&g, 1);
        let w = PredicateWeights::uniform(g.predicate_count());
        let ctx = DiffusionContext::new(&g, &adj, &w, DiffusionParams::new(0.5, 1e-6, false).unwrap());
        let mut scratch = Scratch::for_context(&ctx);

        let event = g.vertex_id(&Term::iri("ex:event")).unwrap();
        let far = g.vertex_id(&Term::typed_literal("2021-06-01", XSD_DATE)).unwrap();
        let near = g.vertex_id(&Term::typed_literal("2020-01-05", XSD_DATE)).unwrap();

        let policy = ContextWinnowedUndirectedWeighted::new(DateFilter {
            max_days: Some(7),
            direction: DateDirection::Bidirectional,
        });
        let first = diffuse(&ctx, &policy, event, &mut scratch).unwrap();
        assert!(first.contains(far));

        let removed = policy.removed_edges(&ctx, &first);
        assert_eq!(removed.vertex_count(), 2);
        assert_eq!(removed.removed_at(far), 1);

        let bcv = policy.color(&ctx, event, &mut scratch).unwrap();
        assert!(!bcv.contains(far));
        assert!(bcv.contains(near));
    }

    #[test]
    fn test_anchors_and_anchorless_bookmark() {
        let g = events();
        let adj = Adjacency::build_partitioned(&g, 1);
        let w = PredicateWeights::uniform(g.predicate_count());
        let ctx = DiffusionContext::new(&g, &adj, &w, DiffusionParams::new(0.5, 1e-6, false).unwrap());
        let mut scratch = Scratch::for_context(&ctx);

        // Both of f's own dates anchor it.
        let f = g.vertex_id(&Term::iri("ex:f")).unwrap();
        let policy = ContextWinnowedUndirectedWeighted::new(DateFilter::exact());
        let anchors = policy.anchors(&ctx, f);
        assert_eq!(anchors.len(), 2);

        // A predicate slot has no anchors at all.
        let slot = ctx.predicate_slot(0);
        assert!(policy.anchors(&ctx, slot).is_empty());
        let plain = diffuse(&ctx, &policy, slot, &mut scratch).unwrap();
        assert_eq!(policy.color(&ctx, slot, &mut scratch).unwrap(), plain);
    }

    #[test]
    fn test_malformed_exclusions_abort_job() {
        let g = events();
        let adj = Adjacency::build_partitioned(&g, 1);
        let w = PredicateWeights::uniform(g.predicate_count());
        let ctx = DiffusionContext::new(&g, &adj, &w, DiffusionParams::default());
        let mut scratch = Scratch::for_context(&ctx);

        let event = g.vertex_id(&Term::iri("ex:event")).unwrap();
        let mut removed = RemovedEdges::new();
        for e in 0..5 {
            removed.insert(event, e);
        }
        let policy = ContextWinnowedUndirectedWeighted::default();
        let err = policy
            .diffuse_excluding(&ctx, event, &removed, &mut scratch)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedExclusions {
                removed: 5,
                degree: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_reverse_rejected_before_winnowing() {
        let g = events();
        let adj = Adjacency::build_partitioned(&g, 1);
        let w = PredicateWeights::uniform(g.predicate_count());
        let ctx = DiffusionContext::new(&g, &adj, &w, DiffusionParams::new(0.5, 1e-3, true).unwrap());
        let mut scratch = Scratch::for_context(&ctx);
        let policy = ContextWinnowedUndirectedWeighted::default();
        assert!(matches!(
            policy.color(&ctx, 0, &mut scratch),
            Err(Error::ReverseUnsupported { .. })
        ));
    }
}
