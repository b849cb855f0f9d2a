//! `PageRank` centrality algorithm.
//!
//! Computes the importance of vertices based on link structure. Used by
//! [`crate::weighting`] to derive predicate weights.

use crate::RdfGraph;

/// `PageRank` configuration.
#[derive(Debug, Clone, Copy)]
pub struct PageRankConfig {
    /// Damping factor (probability of following a link vs teleporting).
    /// Typically 0.85.
    pub damping_factor: f64,
    /// Maximum iterations before stopping.
    pub max_iterations: usize,
    /// Convergence tolerance (L1 norm of score changes).
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Compute `PageRank` for all vertices.
///
/// Returns one score per vertex id; scores sum to 1.0.
///
/// # Algorithm
/// Uses the power iteration method with proper handling of dangling vertices
/// (vertices with no outgoing edges). Dangling mass is redistributed uniformly.
/// Parallel edges count once per edge.
#[must_use]
#[allow(clippy::cast_precision_loss)] // vertex counts won't exceed f64 precision
pub fn pagerank(graph: &RdfGraph, config: PageRankConfig) -> Vec<f64> {
    let n = graph.vertex_count();
    if n == 0 {
        return Vec::new();
    }

    let n_f64 = n as f64;
    let d = config.damping_factor;
    let teleport = (1.0 - d) / n_f64;

    let mut scores = vec![1.0 / n_f64; n];
    let mut new_scores = vec![0.0; n];

    let mut out_degrees = vec![0usize; n];
    for (_, source, _, _) in graph.edges() {
        out_degrees[source] += 1;
    }

    for _iter in 0..config.max_iterations {
        let dangling_sum: f64 = out_degrees
            .iter()
            .enumerate()
            .filter(|(_, &deg)| deg == 0)
            .map(|(i, _)| scores[i])
            .sum();

        let dangling_contrib = d * dangling_sum / n_f64;
        new_scores.fill(teleport + dangling_contrib);

        for (_, source, target, _) in graph.edges() {
            new_scores[target] += d * scores[source] / out_degrees[source] as f64;
        }

        let diff: f64 = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();

        std::mem::swap(&mut scores, &mut new_scores);

        if diff < config.tolerance {
            break;
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Term, Triple};

    fn graph(edges: &[(&str, &str)]) -> RdfGraph {
        let mut g = RdfGraph::new();
        for (s, o) in edges {
            g.add_triple(Triple::new(Term::iri(*s), "rel", Term::iri(*o)));
        }
        g
    }

    #[test]
    fn test_pagerank_cycle() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let scores = pagerank(&g, PageRankConfig::default());

        assert!((scores[0] - scores[1]).abs() < 1e-4);
        assert!((scores[1] - scores[2]).abs() < 1e-4);
        assert!((scores[0] - 1.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_pagerank_star() {
        let g = graph(&[("Hub", "A"), ("Hub", "B"), ("Hub", "C")]);
        let scores = pagerank(&g, PageRankConfig::default());

        // Leaves receive mass from Hub + teleport; Hub only gets teleport.
        assert!(scores[1] > scores[0], "leaf {} hub {}", scores[1], scores[0]);
    }

    #[test]
    fn test_pagerank_sums_to_one() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "A"), ("A", "D")]);
        let total: f64 = pagerank(&g, PageRankConfig::default()).iter().sum();
        assert!((total - 1.0).abs() < 1e-6, "got {total}");
    }

    #[test]
    fn test_pagerank_empty() {
        assert!(pagerank(&RdfGraph::new(), PageRankConfig::default()).is_empty());
    }
}
