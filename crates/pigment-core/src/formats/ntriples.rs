//! N-Triples format (RDF 1.2).
//!
//! Line-based, simple format for RDF triples.
//! Each line is: `<subject> <predicate> <object> .`
//!
//! Reference: <https://www.w3.org/TR/rdf12-n-triples/>

use crate::{RdfGraph, Result, Triple};
use std::io::{BufRead, BufReader, Read, Write};
use tracing::warn;

/// N-Triples format handler.
pub struct NTriples;

/// Outcome of reading an N-Triples document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadReport {
    /// Statements added to the graph.
    pub triples: usize,
    /// Non-empty, non-comment lines that failed to parse.
    pub skipped: usize,
}

impl NTriples {
    /// Parse N-Triples from a reader.
    ///
    /// Malformed lines are logged and skipped.
    pub fn read<R: Read>(reader: R) -> Result<RdfGraph> {
        let mut graph = RdfGraph::new();
        Self::read_into(reader, &mut graph)?;
        Ok(graph)
    }

    /// Parse N-Triples from a reader, appending to an existing graph.
    pub fn read_into<R: Read>(reader: R, graph: &mut RdfGraph) -> Result<ReadReport> {
        let buf = BufReader::new(reader);
        let mut report = ReadReport::default();

        for (line_no, line) in buf.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match Triple::from_ntriples(line) {
                Ok(triple) => {
                    graph.add_triple(triple);
                    report.triples += 1;
                }
                Err(err) => {
                    report.skipped += 1;
                    warn!(line = line_no + 1, %err, "skipping malformed N-Triples statement");
                }
            }
        }

        Ok(report)
    }

    /// Write every edge of the graph as an N-Triples statement.
    pub fn write<W: Write>(graph: &RdfGraph, mut writer: W) -> Result<()> {
        for (_, source, target, data) in graph.edges() {
            let (Some(s), Some(o), Some(p)) = (
                graph.vertex_term(source),
                graph.vertex_term(target),
                graph.predicate_label(data.predicate),
            ) else {
                continue;
            };
            writeln!(writer, "{} <{}> {} .", s.to_ntriples(), p, o.to_ntriples())?;
        }
        Ok(())
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Result<RdfGraph> {
        Self::read(s.as_bytes())
    }

    /// Convert to string.
    pub fn to_string(graph: &RdfGraph) -> Result<String> {
        let mut buf = Vec::new();
        Self::write(graph, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Term;

    #[test]
    fn test_roundtrip() {
        let input = r#"
<http://example.org/Apple> <http://example.org/founded_by> <http://example.org/Steve_Jobs> .
<http://example.org/Apple> <http://example.org/founded> "1976-04-01"^^<http://www.w3.org/2001/XMLSchema#date> .
"#;
        let graph = NTriples::from_str(input).unwrap();
        assert_eq!(graph.edge_count(), 2);

        let output = NTriples::to_string(&graph).unwrap();
        let again = NTriples::from_str(&output).unwrap();
        assert_eq!(again.edge_count(), 2);
        assert!(again
            .vertex_id(&Term::typed_literal(
                "1976-04-01",
                "http://www.w3.org/2001/XMLSchema#date"
            ))
            .is_some());
    }

    #[test]
    fn test_skips_malformed_lines() {
        let input = "<http://a> <http://p> <http://b> .\nnot a triple\n# comment\n\n<http://b> <http://p> <http://c> .\n";
        let mut graph = RdfGraph::new();
        let report = NTriples::read_into(input.as_bytes(), &mut graph).unwrap();

        assert_eq!(report, ReadReport { triples: 2, skipped: 1 });
        assert_eq!(graph.vertex_count(), 3);
    }
}
