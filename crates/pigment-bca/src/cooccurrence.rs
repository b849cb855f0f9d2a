//! Co-occurrence triples for GloVe-style optimizers.
//!
//! Flattens a [`Coloring`] into three parallel vectors: row (bookmark output
//! index), column (colored output index), and value. Rows appear in job order
//! and columns ascend within a row, until [`CoOccurrenceMatrix::shuffle`]
//! permutes all three jointly.

use crate::error::Result;
use crate::schedule::Coloring;
use pigment_core::{RdfGraph, VertexKind};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// What an output index stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    /// A vertex of the given kind.
    Vertex(VertexKind),
    /// A predicate slot.
    Predicate,
}

/// Sparse co-occurrence counts in coordinate form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoOccurrenceMatrix {
    c_idx_i: Vec<usize>,
    c_idx_j: Vec<usize>,
    c_idx_c: Vec<f64>,
    max: f64,
    keys: Vec<String>,
    kinds: Vec<IndexKind>,
}

impl CoOccurrenceMatrix {
    /// Collect every nonzero entry of every successful job.
    pub fn from_coloring(graph: &RdfGraph, coloring: &Coloring) -> Self {
        let cap: usize = coloring.vectors().map(|bcv| bcv.len()).sum();
        let mut c_idx_i = Vec::with_capacity(cap);
        let mut c_idx_j = Vec::with_capacity(cap);
        let mut c_idx_c = Vec::with_capacity(cap);
        let mut max = 0.0f64;

        for bcv in coloring.vectors() {
            for (j, c) in bcv.iter() {
                if c > 0.0 {
                    c_idx_i.push(bcv.root());
                    c_idx_j.push(j);
                    c_idx_c.push(c);
                    max = max.max(c);
                }
            }
        }

        let n = graph.vertex_count();
        let t = graph.predicate_count();
        let mut keys = Vec::with_capacity(n + t);
        let mut kinds = Vec::with_capacity(n + t);
        for v in 0..n {
            keys.push(graph.vertex_label(v).unwrap_or_default().to_string());
            kinds.push(IndexKind::Vertex(
                graph.vertex_kind(v).unwrap_or(VertexKind::Uri),
            ));
        }
        for p in 0..t {
            keys.push(graph.predicate_label(p).unwrap_or_default().to_string());
            kinds.push(IndexKind::Predicate);
        }

        Self {
            c_idx_i,
            c_idx_j,
            c_idx_c,
            max,
            keys,
            kinds,
        }
    }

    /// Row indices.
    pub fn c_idx_i(&self) -> &[usize] {
        &self.c_idx_i
    }

    /// Column indices.
    pub fn c_idx_j(&self) -> &[usize] {
        &self.c_idx_j
    }

    /// Values.
    pub fn c_idx_c(&self) -> &[f64] {
        &self.c_idx_c
    }

    /// Largest value, for normalization. 0.0 when empty.
    pub fn max_value(&self) -> f64 {
        self.max
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.c_idx_c.len()
    }

    /// True if there are no triples.
    pub fn is_empty(&self) -> bool {
        self.c_idx_c.is_empty()
    }

    /// Size of the output index space, `N + T`.
    pub fn vocabulary_size(&self) -> usize {
        self.keys.len()
    }

    /// Vertex label or predicate IRI of an output index.
    pub fn get_key(&self, idx: usize) -> Option<&str> {
        self.keys.get(idx).map(String::as_str)
    }

    /// Kind of an output index.
    pub fn get_type(&self, idx: usize) -> Option<IndexKind> {
        self.kinds.get(idx).copied()
    }

    /// Permute the triples with a Fisher-Yates shuffle seeded by `seed`.
    ///
    /// The same seed always yields the same order.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = XorShiftRng::seed_from_u64(seed);
        for i in (1..self.len()).rev() {
            let j = rng.random_range(0..=i);
            self.c_idx_i.swap(i, j);
            self.c_idx_j.swap(i, j);
            self.c_idx_c.swap(i, j);
        }
    }

    /// Write `row\tcolumn\tvalue` lines after a `# max_value` header.
    pub fn write_tsv<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "# max_value\t{}", self.max)?;
        for ((i, j), c) in self.c_idx_i.iter().zip(&self.c_idx_j).zip(&self.c_idx_c) {
            writeln!(writer, "{i}\t{j}\t{c}")?;
        }
        writer.flush()?;
        Ok(())
    }
}
