//! Graph algorithms used to derive edge weights.

/// PageRank centrality algorithm.
pub mod pagerank;
