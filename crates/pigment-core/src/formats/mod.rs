//! RDF serialization formats.
//!
//! Only N-Triples is supported: it is line-based, so a malformed statement can
//! be skipped without losing the rest of the file.

mod ntriples;

pub use ntriples::{NTriples, ReadReport};
