//! Run configuration.

use crate::error::{Error, Result};
use crate::kernel::DiffusionParams;
use crate::policy::DateFilter;
use pigment_core::{PredicateWeighting, VertexKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;

/// Which neighbor policy a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Directed, every edge weighs 1.
    DirectedUnweighted,
    /// Directed, weighted by edge and predicate weight.
    #[default]
    DirectedWeighted,
    /// Directed; literals only return along their arrival predicate.
    DirectedWeightedLiteral,
    /// Directed; literals spread both ways.
    HybridWeighted,
    /// Undirected without immediate back-traversal.
    UndirectedWeighted,
    /// Undirected with date-literal winnowing.
    ContextWinnowedUndirectedWeighted,
    /// Joint vertex and predicate diffusion.
    Kale15x15,
    /// Vertex diffusion; predicates spill into vertices.
    Kale15x10,
    /// Separate vertex and predicate diffusion.
    Kale10x10Plus5x5,
}

impl Variant {
    /// Every variant.
    pub const ALL: [Variant; 9] = [
        Variant::DirectedUnweighted,
        Variant::DirectedWeighted,
        Variant::DirectedWeightedLiteral,
        Variant::HybridWeighted,
        Variant::UndirectedWeighted,
        Variant::ContextWinnowedUndirectedWeighted,
        Variant::Kale15x15,
        Variant::Kale15x10,
        Variant::Kale10x10Plus5x5,
    ];

    /// Name used in logs, errors, and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Variant::DirectedUnweighted => "DirectedUnweighted",
            Variant::DirectedWeighted => "DirectedWeighted",
            Variant::DirectedWeightedLiteral => "DirectedWeightedLiteral",
            Variant::HybridWeighted => "HybridWeighted",
            Variant::UndirectedWeighted => "UndirectedWeighted",
            Variant::ContextWinnowedUndirectedWeighted => "ContextWinnowedUndirectedWeighted",
            Variant::Kale15x15 => "Kale15x15",
            Variant::Kale15x10 => "Kale15x10",
            Variant::Kale10x10Plus5x5 => "Kale10x10Plus5x5",
        }
    }

    /// Undirected variants cannot run in reverse.
    pub fn is_undirected(self) -> bool {
        matches!(
            self,
            Variant::UndirectedWeighted | Variant::ContextWinnowedUndirectedWeighted
        )
    }

    /// Edge-as-node variants, which always color predicate slots too.
    pub fn is_kale(self) -> bool {
        matches!(
            self,
            Variant::Kale15x15 | Variant::Kale15x10 | Variant::Kale10x10Plus5x5
        )
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Variant {
    type Err = Error;

    /// Case-insensitive; `-` and `_` are ignored, so `directed-weighted`
    /// and `DirectedWeighted` are the same variant.
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Variant::ALL
            .into_iter()
            .find(|v| v.name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown variant '{s}'")))
    }
}

/// Configuration of a BCA run.
///
/// Every field has a default, so a JSON file only needs the values it
/// changes:
///
/// ```json
/// { "alpha": 0.15, "variant": "UndirectedWeighted", "weighting": "INVERSE_FREQUENCY" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BcaConfig {
    /// Fraction of arriving paint kept at each node, in `(0, 1]`.
    pub alpha: f64,
    /// Paint below this is not forwarded.
    pub epsilon: f64,
    /// Worker threads.
    pub threads: usize,
    /// Neighbor policy.
    pub variant: Variant,
    /// Follow edges backwards.
    pub reverse: bool,
    /// How predicate weights are derived.
    pub weighting: PredicateWeighting,
    /// Predicate IRI to weight, read with [`PredicateWeighting::Manual`].
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub manual_weights: HashMap<String, f64>,
    /// Emit predicate-context slots ([`Variant::DirectedUnweighted`] only).
    pub emit_predicates: bool,
    /// Date rule of [`Variant::ContextWinnowedUndirectedWeighted`].
    pub date_filter: Option<DateFilter>,
    /// Restrict bookmarks to these vertex kinds; all vertices when `None`.
    pub bookmark_kinds: Option<Vec<VertexKind>>,
    /// Also color predicate slots (always on for Kale variants).
    pub include_predicates: bool,
}

impl Default for BcaConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            epsilon: 1e-4,
            threads: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            variant: Variant::default(),
            reverse: false,
            weighting: PredicateWeighting::default(),
            manual_weights: HashMap::new(),
            emit_predicates: false,
            date_filter: None,
            bookmark_kinds: None,
            include_predicates: false,
        }
    }
}

impl BcaConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Kernel parameters of this configuration.
    pub fn params(&self) -> DiffusionParams {
        DiffusionParams {
            alpha: self.alpha,
            epsilon: self.epsilon,
            reverse: self.reverse,
        }
    }

    /// Reject configurations no job could run with.
    pub fn validate(&self) -> Result<()> {
        self.params().validate()?;
        if self.threads == 0 {
            return Err(Error::InvalidConfig("threads must be at least 1".into()));
        }
        if self.reverse && self.variant.is_undirected() {
            return Err(Error::ReverseUnsupported {
                variant: self.variant.name(),
            });
        }

        let winnow = self.variant == Variant::ContextWinnowedUndirectedWeighted;
        match (winnow, self.date_filter.is_some()) {
            (true, false) => {
                return Err(Error::InvalidConfig(format!(
                    "{} requires a date_filter",
                    self.variant
                )))
            }
            (false, true) => {
                return Err(Error::InvalidConfig(format!(
                    "date_filter only applies to {}, not {}",
                    Variant::ContextWinnowedUndirectedWeighted,
                    self.variant
                )))
            }
            _ => {}
        }

        if !self.manual_weights.is_empty() && self.weighting != PredicateWeighting::Manual {
            return Err(Error::InvalidConfig(
                "manual_weights given but weighting is not MANUAL".into(),
            ));
        }
        if self.emit_predicates && self.variant != Variant::DirectedUnweighted {
            return Err(Error::InvalidConfig(format!(
                "emit_predicates only applies to {}",
                Variant::DirectedUnweighted
            )));
        }
        if self.bookmark_kinds.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::InvalidConfig("bookmark_kinds is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DateDirection;

    #[test]
    fn test_default_is_valid() {
        let config = BcaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.variant, Variant::DirectedWeighted);
        assert!(config.threads >= 1);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        for (alpha, epsilon) in [(0.0, 1e-4), (-1.0, 1e-4), (1.1, 1e-4), (0.5, 0.0), (0.5, -1.0)] {
            let config = BcaConfig {
                alpha,
                epsilon,
                ..BcaConfig::default()
            };
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))), "{alpha} {epsilon}");
        }
        let config = BcaConfig {
            threads: 0,
            ..BcaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reverse_undirected_fails_fast() {
        let config = BcaConfig {
            variant: Variant::UndirectedWeighted,
            reverse: true,
            ..BcaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::ReverseUnsupported {
                variant: "UndirectedWeighted"
            })
        ));
    }

    #[test]
    fn test_date_filter_pairs_with_winnow() {
        let mut config = BcaConfig {
            variant: Variant::ContextWinnowedUndirectedWeighted,
            ..BcaConfig::default()
        };
        assert!(config.validate().is_err());
        config.date_filter = Some(DateFilter::exact());
        assert!(config.validate().is_ok());
        config.variant = Variant::HybridWeighted;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_overrides_defaults() {
        let config = BcaConfig::from_json_str(
            r#"{
                "alpha": 0.25,
                "threads": 2,
                "variant": "ContextWinnowedUndirectedWeighted",
                "weighting": "INVERSE_FREQUENCY",
                "date_filter": { "max_days": 30, "direction": "BACKWARDS" },
                "bookmark_kinds": ["URI", "BLANK"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.alpha, 0.25);
        assert_eq!(config.epsilon, 1e-4);
        assert_eq!(config.weighting, PredicateWeighting::InverseFrequency);
        assert_eq!(
            config.date_filter,
            Some(DateFilter {
                max_days: Some(30),
                direction: DateDirection::Backwards
            })
        );
        assert_eq!(
            config.bookmark_kinds,
            Some(vec![VertexKind::Uri, VertexKind::Blank])
        );

        assert!(matches!(
            BcaConfig::from_json_str(r#"{ "alpha": 2.0 }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(BcaConfig::from_json_str("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_variant_names_roundtrip() {
        for v in Variant::ALL {
            assert_eq!(v.name().parse::<Variant>().unwrap(), v);
        }
        assert_eq!("kale-15x15".parse::<Variant>().unwrap(), Variant::Kale15x15);
        assert_eq!(
            "directed_weighted_literal".parse::<Variant>().unwrap(),
            Variant::DirectedWeightedLiteral
        );
        assert!("sideways".parse::<Variant>().is_err());
    }
}
