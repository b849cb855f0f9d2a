//! Bookmark Coloring Vectors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse context vector of one bookmark.
///
/// Maps output indices (vertex ids, or `vertex_count + predicate` for
/// predicate slots) to accumulated paint. Entries are only ever added to, never
/// removed, and never negative. Iteration is in ascending index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bcv {
    root: usize,
    entries: BTreeMap<usize, f64>,
}

impl Bcv {
    /// Empty vector for a bookmark.
    pub fn new(root: usize) -> Self {
        Self {
            root,
            entries: BTreeMap::new(),
        }
    }

    /// The bookmark this vector describes.
    pub fn root(&self) -> usize {
        self.root
    }

    /// Accumulate `delta` at `index`.
    ///
    /// Negative or NaN deltas are ignored.
    #[inline]
    pub fn add(&mut self, index: usize, delta: f64) {
        debug_assert!(delta >= 0.0, "negative paint {delta} at {index}");
        if !(delta >= 0.0) {
            return;
        }
        *self.entries.entry(index).or_insert(0.0) += delta;
    }

    /// Weight at `index`, if present.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.entries.get(&index).copied()
    }

    /// True if `index` has an entry.
    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entry exists.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(index, weight)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|(&i, &w)| (i, w))
    }

    /// Indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Sum of the weights at indices below `limit` (vertex slots when `limit`
    /// is the vertex count).
    pub fn total_below(&self, limit: usize) -> f64 {
        self.entries.range(..limit).map(|(_, w)| w).sum()
    }

    /// Largest weight, 0.0 when empty.
    pub fn max_value(&self) -> f64 {
        self.entries.values().copied().fold(0.0, f64::max)
    }
}

impl<'a> IntoIterator for &'a Bcv {
    type Item = (usize, f64);
    type IntoIter = std::iter::Map<
        std::collections::btree_map::Iter<'a, usize, f64>,
        fn((&'a usize, &'a f64)) -> (usize, f64),
    >;

    fn into_iter(self) -> Self::IntoIter {
        let copied: fn((&'a usize, &'a f64)) -> (usize, f64) = |(&i, &w)| (i, w);
        self.entries.iter().map(copied)
    }
}
