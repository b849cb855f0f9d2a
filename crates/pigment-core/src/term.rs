//! RDF terms and the vertex kinds they map to.

use crate::triple::{parse_term, skip_whitespace};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a graph vertex.
///
/// The ordinal is a stable byte encoding: `Uri = 0`, `Blank = 1`, `Literal = 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VertexKind {
    /// An IRI-named resource.
    Uri,
    /// A blank node.
    Blank,
    /// A literal value.
    Literal,
}

impl VertexKind {
    /// All kinds in ordinal order.
    pub const ALL: [VertexKind; 3] = [VertexKind::Uri, VertexKind::Blank, VertexKind::Literal];

    /// Stable byte encoding.
    pub fn ordinal(self) -> u8 {
        match self {
            VertexKind::Uri => 0,
            VertexKind::Blank => 1,
            VertexKind::Literal => 2,
        }
    }

    /// Decode from the stable byte encoding.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(VertexKind::Uri),
            1 => Some(VertexKind::Blank),
            2 => Some(VertexKind::Literal),
            _ => None,
        }
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VertexKind::Uri => "URI",
            VertexKind::Blank => "BLANK",
            VertexKind::Literal => "LITERAL",
        };
        f.write_str(name)
    }
}

/// An RDF term occupying the subject or object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// IRI, stored without the surrounding angle brackets.
    Iri(String),
    /// Blank node label, stored without the `_:` prefix.
    Blank(String),
    /// Literal with optional datatype IRI or language tag.
    Literal {
        /// Unescaped lexical form.
        lexical: String,
        /// Datatype IRI, if any.
        datatype: Option<String>,
        /// Language tag, if any.
        language: Option<String>,
    },
}

impl Term {
    /// Create an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Create a blank node term.
    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(label.into())
    }

    /// Create a plain literal.
    pub fn literal(lexical: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    /// Create a typed literal.
    pub fn typed_literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// Parse one term in N-Triples syntax: `<iri>`, `_:label`, `"v"`,
    /// `"v"@lang` or `"v"^^<datatype>`.
    ///
    /// ```rust
    /// use pigment_core::Term;
    ///
    /// let date = Term::from_ntriples(r#""2020-01-01"^^<http://www.w3.org/2001/XMLSchema#date>"#).unwrap();
    /// assert_eq!(date, Term::typed_literal("2020-01-01", "http://www.w3.org/2001/XMLSchema#date"));
    /// ```
    pub fn from_ntriples(text: &str) -> Result<Self> {
        let mut chars = text.trim().chars().peekable();
        let term = parse_term(&mut chars, text)?;
        skip_whitespace(&mut chars);
        match chars.peek() {
            None => Ok(term),
            Some(_) => Err(Error::InvalidNTriples(format!(
                "trailing content after term: {text}"
            ))),
        }
    }

    /// The vertex kind this term becomes.
    pub fn kind(&self) -> VertexKind {
        match self {
            Term::Iri(_) => VertexKind::Uri,
            Term::Blank(_) => VertexKind::Blank,
            Term::Literal { .. } => VertexKind::Literal,
        }
    }

    /// IRI, blank label, or lexical form.
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(s) | Term::Blank(s) => s,
            Term::Literal { lexical, .. } => lexical,
        }
    }

    /// Serialize in N-Triples term syntax.
    pub fn to_ntriples(&self) -> String {
        match self {
            Term::Iri(iri) => format!("<{iri}>"),
            Term::Blank(label) => format!("_:{label}"),
            Term::Literal {
                lexical,
                datatype,
                language,
            } => {
                let mut out = String::with_capacity(lexical.len() + 2);
                out.push('"');
                for c in lexical.chars() {
                    match c {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        c => out.push(c),
                    }
                }
                out.push('"');
                if let Some(lang) = language {
                    out.push('@');
                    out.push_str(lang);
                } else if let Some(dt) = datatype {
                    out.push_str("^^<");
                    out.push_str(dt);
                    out.push('>');
                }
                out
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ntriples())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ordinals_are_stable() {
        assert_eq!(VertexKind::Uri.ordinal(), 0);
        assert_eq!(VertexKind::Blank.ordinal(), 1);
        assert_eq!(VertexKind::Literal.ordinal(), 2);
        for kind in VertexKind::ALL {
            assert_eq!(VertexKind::from_ordinal(kind.ordinal()), Some(kind));
        }
        assert_eq!(VertexKind::from_ordinal(3), None);
    }

    #[test]
    fn test_literal_escaping() {
        let t = Term::literal("say \"hi\"\n");
        assert_eq!(t.to_ntriples(), r#""say \"hi\"\n""#);

        let dated = Term::typed_literal("2020-01-05", "http://www.w3.org/2001/XMLSchema#date");
        assert_eq!(
            dated.to_ntriples(),
            "\"2020-01-05\"^^<http://www.w3.org/2001/XMLSchema#date>"
        );
        assert_eq!(dated.kind(), VertexKind::Literal);
    }

    #[test]
    fn test_parse_single_term() {
        assert_eq!(Term::from_ntriples("<http://ex/a>").unwrap(), Term::iri("http://ex/a"));
        assert_eq!(Term::from_ntriples(" _:b7 ").unwrap(), Term::blank("b7"));
        assert_eq!(Term::from_ntriples(r#""Anna""#).unwrap(), Term::literal("Anna"));
        assert_eq!(
            Term::from_ntriples(r#""1984"^^<http://www.w3.org/2001/XMLSchema#gYear>"#).unwrap(),
            Term::typed_literal("1984", "http://www.w3.org/2001/XMLSchema#gYear")
        );
        assert!(Term::from_ntriples("").is_err());
        assert!(Term::from_ntriples("<http://ex/a> <http://ex/b>").is_err());
        assert!(Term::from_ntriples("http://ex/a").is_err());
    }
}
