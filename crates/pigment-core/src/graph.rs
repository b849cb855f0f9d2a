use crate::{Error, Result, Term, Triple, VertexKind};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dense vertex id in `[0, vertex_count)`.
pub type VertexId = usize;

/// Dense edge id in `[0, edge_count)`.
pub type EdgeId = usize;

/// Dense edge-type (predicate) id in `[0, predicate_count)`.
pub type PredicateId = usize;

/// Predicate IRI given to literal-similarity edges.
pub const SIMILARITY_PREDICATE: &str = "urn:pigment:literal-similarity";

/// Edge payload: predicate, weight, and optional literal-literal similarity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    /// Edge type (interned predicate).
    pub predicate: PredicateId,
    /// Non-negative weight, 1.0 for unweighted input.
    pub weight: f64,
    /// Similarity score in `[0, 1]` for edges between two literals.
    pub similarity: Option<f64>,
}

/// An RDF graph with dense vertex, edge, and predicate ids.
///
/// Uses petgraph's directed graph internally so ids are assigned in insertion
/// order. Identical terms share one vertex, so a literal used by several
/// triples is a single vertex with several incoming edges.
///
/// # Example
///
/// ```rust
/// use pigment_core::{RdfGraph, Term, Triple, VertexKind};
///
/// let mut graph = RdfGraph::new();
/// graph.add_triple(Triple::new(Term::iri("ex:a"), "ex:name", Term::literal("Ann")));
/// graph.add_triple(Triple::new(Term::iri("ex:b"), "ex:name", Term::literal("Ann")));
///
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.predicate_count(), 1);
/// assert_eq!(graph.vertex_kind(1), Some(VertexKind::Literal));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RdfGraph {
    /// The underlying directed graph.
    graph: DiGraph<Term, EdgeData>,

    /// Map from term to vertex id.
    #[serde(skip, default)]
    vertex_index: HashMap<Term, VertexId>,

    /// Interned predicate IRIs, indexed by predicate id.
    predicates: Vec<String>,

    /// Map from predicate IRI to predicate id.
    #[serde(skip, default)]
    predicate_index: HashMap<String, PredicateId>,
}

impl RdfGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with estimated capacity.
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(vertices, edges),
            vertex_index: HashMap::with_capacity(vertices),
            predicates: Vec::new(),
            predicate_index: HashMap::new(),
        }
    }

    /// Rebuild lookup indexes after deserialization.
    pub fn rebuild_indexes(&mut self) {
        self.vertex_index = self
            .graph
            .node_indices()
            .map(|idx| (self.graph[idx].clone(), idx.index()))
            .collect();
        self.predicate_index = self
            .predicates
            .iter()
            .enumerate()
            .map(|(id, iri)| (iri.clone(), id))
            .collect();
    }

    /// Add a triple with weight 1.0, returning its edge id.
    pub fn add_triple(&mut self, triple: Triple) -> EdgeId {
        let subject = self.get_or_create_vertex(triple.subject);
        let object = self.get_or_create_vertex(triple.object);
        let predicate = self.intern_predicate(&triple.predicate);
        self.push_edge(
            subject,
            object,
            EdgeData {
                predicate,
                weight: 1.0,
                similarity: None,
            },
        )
    }

    /// Add a weighted edge between two terms.
    pub fn add_edge(
        &mut self,
        subject: Term,
        predicate: &str,
        object: Term,
        weight: f64,
    ) -> Result<EdgeId> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight {
                what: format!("edge {subject} {predicate} {object}"),
                value: weight,
            });
        }
        let subject = self.get_or_create_vertex(subject);
        let object = self.get_or_create_vertex(object);
        let predicate = self.intern_predicate(predicate);
        Ok(self.push_edge(
            subject,
            object,
            EdgeData {
                predicate,
                weight,
                similarity: None,
            },
        ))
    }

    /// Link two literal vertices with a similarity score in `[0, 1]`.
    pub fn add_literal_similarity(
        &mut self,
        a: VertexId,
        b: VertexId,
        score: f64,
    ) -> Result<EdgeId> {
        let kind_a = self.vertex_kind(a).ok_or(Error::VertexNotFound(a))?;
        let kind_b = self.vertex_kind(b).ok_or(Error::VertexNotFound(b))?;
        if kind_a != VertexKind::Literal || kind_b != VertexKind::Literal {
            return Err(Error::NotLiterals(a, b));
        }
        if !(0.0..=1.0).contains(&score) {
            return Err(Error::InvalidWeight {
                what: format!("similarity between {a} and {b}"),
                value: score,
            });
        }
        let predicate = self.intern_predicate(SIMILARITY_PREDICATE);
        Ok(self.push_edge(
            a,
            b,
            EdgeData {
                predicate,
                weight: 1.0,
                similarity: Some(score),
            },
        ))
    }

    fn push_edge(&mut self, subject: VertexId, object: VertexId, data: EdgeData) -> EdgeId {
        self.graph
            .add_edge(NodeIndex::new(subject), NodeIndex::new(object), data)
            .index()
    }

    /// Get or create the vertex for a term.
    pub fn get_or_create_vertex(&mut self, term: Term) -> VertexId {
        if let Some(&id) = self.vertex_index.get(&term) {
            return id;
        }
        let id = self.graph.add_node(term.clone()).index();
        self.vertex_index.insert(term, id);
        id
    }

    fn intern_predicate(&mut self, iri: &str) -> PredicateId {
        if let Some(&id) = self.predicate_index.get(iri) {
            return id;
        }
        let id = self.predicates.len();
        self.predicates.push(iri.to_string());
        self.predicate_index.insert(iri.to_string(), id);
        id
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of distinct predicates (edge types).
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// Vertex id of a term, if present.
    pub fn vertex_id(&self, term: &Term) -> Option<VertexId> {
        self.vertex_index.get(term).copied()
    }

    /// Predicate id of an IRI, if present.
    pub fn predicate_id(&self, iri: &str) -> Option<PredicateId> {
        self.predicate_index.get(iri).copied()
    }

    /// Term stored at a vertex.
    pub fn vertex_term(&self, v: VertexId) -> Option<&Term> {
        self.graph.node_weight(NodeIndex::new(v))
    }

    /// Kind of a vertex.
    pub fn vertex_kind(&self, v: VertexId) -> Option<VertexKind> {
        self.vertex_term(v).map(Term::kind)
    }

    /// IRI, blank label, or lexical form of a vertex.
    pub fn vertex_label(&self, v: VertexId) -> Option<&str> {
        self.vertex_term(v).map(Term::value)
    }

    /// IRI of a predicate.
    pub fn predicate_label(&self, t: PredicateId) -> Option<&str> {
        self.predicates.get(t).map(String::as_str)
    }

    /// Full payload of an edge.
    pub fn edge(&self, e: EdgeId) -> Option<&EdgeData> {
        self.graph.edge_weight(EdgeIndex::new(e))
    }

    /// Weight of an edge (0.0 for unknown ids).
    pub fn edge_weight(&self, e: EdgeId) -> f64 {
        self.edge(e).map_or(0.0, |d| d.weight)
    }

    /// Edge type of an edge.
    pub fn edge_type(&self, e: EdgeId) -> Option<PredicateId> {
        self.edge(e).map(|d| d.predicate)
    }

    /// Literal similarity carried by an edge.
    pub fn edge_similarity(&self, e: EdgeId) -> Option<f64> {
        self.edge(e).and_then(|d| d.similarity)
    }

    /// `(source, target)` of an edge.
    pub fn edge_endpoints(&self, e: EdgeId) -> Option<(VertexId, VertexId)> {
        self.graph
            .edge_endpoints(EdgeIndex::new(e))
            .map(|(s, t)| (s.index(), t.index()))
    }

    /// Iterate over all edges as `(id, source, target, data)`.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, VertexId, VertexId, &EdgeData)> {
        self.graph.raw_edges().iter().enumerate().map(|(id, edge)| {
            (id, edge.source().index(), edge.target().index(), &edge.weight)
        })
    }

    /// Get the underlying petgraph for advanced operations.
    pub fn as_petgraph(&self) -> &DiGraph<Term, EdgeData> {
        &self.graph
    }
}

/// Statistics about an RDF graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdfGraphStats {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Number of distinct predicates.
    pub predicate_count: usize,
    /// Vertex count per kind, indexed by [`VertexKind::ordinal`].
    pub kind_counts: [usize; 3],
    /// Average out-degree.
    pub avg_out_degree: f64,
}

impl RdfGraph {
    /// Compute statistics about the graph.
    pub fn stats(&self) -> RdfGraphStats {
        let mut kind_counts = [0usize; 3];
        for term in self.graph.node_weights() {
            kind_counts[usize::from(term.kind().ordinal())] += 1;
        }
        let vertex_count = self.vertex_count();
        let edge_count = self.edge_count();
        let avg_out_degree = if vertex_count > 0 {
            edge_count as f64 / vertex_count as f64
        } else {
            0.0
        };
        RdfGraphStats {
            vertex_count,
            edge_count,
            predicate_count: self.predicate_count(),
            kind_counts,
            avg_out_degree,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str, p: &str, o: Term) -> Triple {
        Triple::new(Term::iri(s), p, o)
    }

    #[test]
    fn test_dense_ids_in_insertion_order() {
        let mut g = RdfGraph::new();
        let e0 = g.add_triple(t("a", "p", Term::iri("b")));
        let e1 = g.add_triple(t("b", "q", Term::iri("c")));

        assert_eq!((e0, e1), (0, 1));
        assert_eq!(g.vertex_id(&Term::iri("a")), Some(0));
        assert_eq!(g.vertex_id(&Term::iri("c")), Some(2));
        assert_eq!(g.edge_endpoints(1), Some((1, 2)));
        assert_eq!(g.edge_type(1), g.predicate_id("q"));
        assert_eq!(g.edge_weight(0), 1.0);
    }

    #[test]
    fn test_shared_literal_vertex() {
        let mut g = RdfGraph::new();
        g.add_triple(t("a", "p", Term::literal("x")));
        g.add_triple(t("b", "q", Term::literal("x")));
        g.add_triple(t("c", "q", Term::literal("x")));

        let stats = g.stats();
        assert_eq!(stats.vertex_count, 4);
        assert_eq!(stats.kind_counts, [3, 0, 1]);
        assert_eq!(stats.predicate_count, 2);
    }

    #[test]
    fn test_rejects_bad_weights() {
        let mut g = RdfGraph::new();
        assert!(g
            .add_edge(Term::iri("a"), "p", Term::iri("b"), -1.0)
            .is_err());
        assert!(g
            .add_edge(Term::iri("a"), "p", Term::iri("b"), f64::NAN)
            .is_err());
        assert!(g.add_edge(Term::iri("a"), "p", Term::iri("b"), 0.0).is_ok());
    }

    #[test]
    fn test_similarity_requires_literals() {
        let mut g = RdfGraph::new();
        g.add_triple(t("a", "p", Term::literal("Jon")));
        g.add_triple(t("b", "p", Term::literal("John")));
        let jon = g.vertex_id(&Term::literal("Jon")).unwrap();
        let john = g.vertex_id(&Term::literal("John")).unwrap();

        let e = g.add_literal_similarity(jon, john, 0.8).unwrap();
        assert_eq!(g.edge_similarity(e), Some(0.8));
        assert_eq!(g.predicate_label(g.edge_type(e).unwrap()), Some(SIMILARITY_PREDICATE));

        assert!(matches!(
            g.add_literal_similarity(0, john, 0.5),
            Err(Error::NotLiterals(0, _))
        ));
        assert!(g.add_literal_similarity(jon, john, 1.5).is_err());
    }

    #[test]
    fn test_rebuild_indexes() {
        let mut g = RdfGraph::new();
        g.add_triple(t("a", "p", Term::iri("b")));
        let mut copy = g.clone();
        copy.vertex_index.clear();
        copy.predicate_index.clear();
        copy.rebuild_indexes();
        assert_eq!(copy.vertex_id(&Term::iri("b")), Some(1));
        assert_eq!(copy.predicate_id("p"), Some(0));
    }
}
