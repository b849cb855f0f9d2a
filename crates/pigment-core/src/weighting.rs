//! Predicate weighting.
//!
//! Turns a weighting method into one non-negative weight per edge type.
//!
//! | Method | Weight of predicate `t` |
//! |--------|-------------------------|
//! | `NONE` | 1.0 |
//! | `MANUAL` | user-supplied, 1.0 when missing |
//! | `PAGERANK` | mean PageRank of the objects of `t`-edges, max-normalized |
//! | `FREQUENCY` | `count(t) / max_count` |
//! | `INVERSE_FREQUENCY` | `min_count / count(t)` |

use crate::algo::pagerank::{pagerank, PageRankConfig};
use crate::{Error, PredicateId, RdfGraph, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// How predicate (edge type) weights are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredicateWeighting {
    /// Every predicate weighs 1.0.
    #[default]
    None,
    /// Weights come from a user-supplied table.
    Manual,
    /// Weights follow the PageRank of the vertices a predicate points to.
    #[serde(rename = "PAGERANK")]
    PageRank,
    /// Frequent predicates weigh more.
    Frequency,
    /// Rare predicates weigh more.
    InverseFrequency,
}

impl std::str::FromStr for PredicateWeighting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "NONE" => Ok(Self::None),
            "MANUAL" => Ok(Self::Manual),
            "PAGERANK" => Ok(Self::PageRank),
            "FREQUENCY" => Ok(Self::Frequency),
            "INVERSE_FREQUENCY" => Ok(Self::InverseFrequency),
            other => Err(Error::InvalidConfig(format!(
                "unknown predicate weighting '{other}'"
            ))),
        }
    }
}

/// One weight per predicate id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateWeights(Vec<f64>);

impl PredicateWeights {
    /// All predicates weigh 1.0.
    pub fn uniform(predicate_count: usize) -> Self {
        Self(vec![1.0; predicate_count])
    }

    /// Wrap precomputed weights.
    pub fn from_vec(weights: Vec<f64>) -> Result<Self> {
        if let Some((t, &w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(Error::InvalidWeight {
                what: format!("predicate {t}"),
                value: w,
            });
        }
        Ok(Self(weights))
    }

    /// Weight of predicate `t`; unknown predicates weigh 1.0.
    #[inline]
    pub fn get(&self, t: PredicateId) -> f64 {
        self.0.get(t).copied().unwrap_or(1.0)
    }

    /// Number of predicates covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no predicate is covered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Weights as a slice indexed by predicate id.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Derive weights for every predicate of `graph`.
    ///
    /// `manual` maps predicate IRIs to weights and is only read for
    /// [`PredicateWeighting::Manual`].
    pub fn compute(
        graph: &RdfGraph,
        method: PredicateWeighting,
        manual: &HashMap<String, f64>,
    ) -> Result<Self> {
        let t_count = graph.predicate_count();
        let weights = match method {
            PredicateWeighting::None => vec![1.0; t_count],
            PredicateWeighting::Manual => manual_weights(graph, manual)?,
            PredicateWeighting::PageRank => pagerank_weights(graph),
            PredicateWeighting::Frequency => {
                let counts = predicate_counts(graph);
                let max = counts.iter().copied().max().unwrap_or(0);
                counts
                    .iter()
                    .map(|&c| if max == 0 { 0.0 } else { c as f64 / max as f64 })
                    .collect()
            }
            PredicateWeighting::InverseFrequency => {
                let counts = predicate_counts(graph);
                let min = counts.iter().copied().filter(|&c| c > 0).min().unwrap_or(0);
                counts
                    .iter()
                    .map(|&c| if c == 0 { 0.0 } else { min as f64 / c as f64 })
                    .collect()
            }
        };
        debug!(?method, predicates = t_count, "computed predicate weights");
        Self::from_vec(weights)
    }
}

fn predicate_counts(graph: &RdfGraph) -> Vec<usize> {
    let mut counts = vec![0usize; graph.predicate_count()];
    for (_, _, _, data) in graph.edges() {
        counts[data.predicate] += 1;
    }
    counts
}

fn manual_weights(graph: &RdfGraph, manual: &HashMap<String, f64>) -> Result<Vec<f64>> {
    for (iri, &w) in manual {
        if !w.is_finite() || w < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "manual weight {w} for predicate {iri} must be finite and non-negative"
            )));
        }
        if graph.predicate_id(iri).is_none() {
            debug!(predicate = %iri, "manual weight for predicate absent from graph");
        }
    }

    let mut missing = 0usize;
    let weights = (0..graph.predicate_count())
        .map(|t| {
            let label = graph.predicate_label(t).unwrap_or_default();
            manual.get(label).copied().unwrap_or_else(|| {
                missing += 1;
                1.0
            })
        })
        .collect();
    if missing > 0 {
        warn!(missing, "predicates without a manual weight default to 1.0");
    }
    Ok(weights)
}

fn pagerank_weights(graph: &RdfGraph) -> Vec<f64> {
    let scores = pagerank(graph, PageRankConfig::default());
    let mut sums = vec![0.0f64; graph.predicate_count()];
    let mut counts = vec![0usize; graph.predicate_count()];
    for (_, _, target, data) in graph.edges() {
        sums[data.predicate] += scores[target];
        counts[data.predicate] += 1;
    }
    let means: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(&s, &c)| if c == 0 { 0.0 } else { s / c as f64 })
        .collect();
    let max = means.iter().copied().fold(0.0f64, f64::max);
    if max > 0.0 {
        means.iter().map(|m| m / max).collect()
    } else {
        means
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Term, Triple};

    fn graph() -> RdfGraph {
        let mut g = RdfGraph::new();
        // "common" appears three times, "rare" once.
        for (s, p, o) in [
            ("a", "common", "b"),
            ("b", "common", "c"),
            ("c", "common", "d"),
            ("a", "rare", "hub"),
        ] {
            g.add_triple(Triple::new(Term::iri(s), p, Term::iri(o)));
        }
        g
    }

    #[test]
    fn test_none_is_uniform() {
        let g = graph();
        let w = PredicateWeights::compute(&g, PredicateWeighting::None, &HashMap::new()).unwrap();
        assert_eq!(w.as_slice(), &[1.0, 1.0]);
    }

    #[test]
    fn test_frequency_and_inverse() {
        let g = graph();
        let common = g.predicate_id("common").unwrap();
        let rare = g.predicate_id("rare").unwrap();

        let f = PredicateWeights::compute(&g, PredicateWeighting::Frequency, &HashMap::new())
            .unwrap();
        assert_eq!(f.get(common), 1.0);
        assert!((f.get(rare) - 1.0 / 3.0).abs() < 1e-12);

        let inv =
            PredicateWeights::compute(&g, PredicateWeighting::InverseFrequency, &HashMap::new())
                .unwrap();
        assert_eq!(inv.get(rare), 1.0);
        assert!((inv.get(common) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_manual_defaults_and_validation() {
        let g = graph();
        let mut manual = HashMap::new();
        manual.insert("rare".to_string(), 5.0);
        let w = PredicateWeights::compute(&g, PredicateWeighting::Manual, &manual).unwrap();
        assert_eq!(w.get(g.predicate_id("rare").unwrap()), 5.0);
        assert_eq!(w.get(g.predicate_id("common").unwrap()), 1.0);

        manual.insert("common".to_string(), -2.0);
        assert!(matches!(
            PredicateWeights::compute(&g, PredicateWeighting::Manual, &manual),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_pagerank_weights_are_max_normalized() {
        let g = graph();
        let w = PredicateWeights::compute(&g, PredicateWeighting::PageRank, &HashMap::new())
            .unwrap();
        let max = w.as_slice().iter().copied().fold(0.0, f64::max);
        assert!((max - 1.0).abs() < 1e-12);
        assert!(w.as_slice().iter().all(|&x| x > 0.0 && x <= 1.0));
    }

    #[test]
    fn test_parse_method_names() {
        assert_eq!(
            "inverse-frequency".parse::<PredicateWeighting>().unwrap(),
            PredicateWeighting::InverseFrequency
        );
        assert_eq!("PAGERANK".parse::<PredicateWeighting>().unwrap(), PredicateWeighting::PageRank);
        assert!("bogus".parse::<PredicateWeighting>().is_err());
    }
}
