//! Triple type for RDF graphs.
//!
//! A triple represents a (subject, predicate, object) statement.

use crate::{Error, Result, Term};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// A (subject, predicate, object) triple.
///
/// # Example
///
/// ```rust
/// use pigment_core::{Term, Triple};
///
/// let triple = Triple::new(
///     Term::iri("http://example.org/Apple"),
///     "http://example.org/founded",
///     Term::literal("1976"),
/// );
/// assert_eq!(triple.predicate, "http://example.org/founded");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject term (IRI or blank node).
    pub subject: Term,

    /// Predicate IRI.
    pub predicate: String,

    /// Object term.
    pub object: Term,
}

impl Triple {
    /// Create a new triple.
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }

    /// Parse one N-Triples statement.
    ///
    /// Format: `<subject> <predicate> <object> .` where subject may be a blank
    /// node (`_:b0`) and object may additionally be a literal (`"v"`,
    /// `"v"@en`, `"v"^^<datatype>`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use pigment_core::{Term, Triple};
    ///
    /// let line = r#"<http://ex.org/a> <http://ex.org/born> "1879-03-14"^^<http://www.w3.org/2001/XMLSchema#date> ."#;
    /// let triple = Triple::from_ntriples(line).unwrap();
    /// assert_eq!(triple.object.value(), "1879-03-14");
    /// ```
    pub fn from_ntriples(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Err(Error::ParseTriple("Empty or comment line".into()));
        }

        let mut chars = line.chars().peekable();
        let subject = parse_term(&mut chars, line)?;
        if matches!(subject, Term::Literal { .. }) {
            return Err(Error::InvalidNTriples(format!(
                "literal in subject position: {line}"
            )));
        }
        let predicate = match parse_term(&mut chars, line)? {
            Term::Iri(iri) => iri,
            _ => {
                return Err(Error::InvalidNTriples(format!(
                    "predicate must be an IRI: {line}"
                )))
            }
        };
        let object = parse_term(&mut chars, line)?;

        skip_whitespace(&mut chars);
        match chars.next() {
            Some('.') => {}
            _ => {
                return Err(Error::InvalidNTriples(format!(
                    "missing terminating '.': {line}"
                )))
            }
        }
        skip_whitespace(&mut chars);
        match chars.peek() {
            None | Some('#') => Ok(Self::new(subject, predicate, object)),
            Some(_) => Err(Error::InvalidNTriples(format!(
                "trailing content after '.': {line}"
            ))),
        }
    }

    /// Convert to N-Triples format.
    pub fn to_ntriples(&self) -> String {
        format!(
            "{} <{}> {} .",
            self.subject.to_ntriples(),
            self.predicate,
            self.object.to_ntriples()
        )
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.predicate, self.object)
    }
}

pub(crate) fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

pub(crate) fn parse_term(chars: &mut Peekable<Chars<'_>>, line: &str) -> Result<Term> {
    skip_whitespace(chars);
    match chars.next() {
        Some('<') => Ok(Term::Iri(read_iri(chars, line)?)),
        Some('_') => {
            if chars.next() != Some(':') {
                return Err(Error::InvalidNTriples(format!("bad blank node: {line}")));
            }
            let mut label = String::new();
            while let Some(&c) = chars.peek() {
                // A '.' directly followed by whitespace or the end is the statement terminator.
                if c.is_whitespace() || (c == '.' && !continues_label(chars)) {
                    break;
                }
                label.push(c);
                chars.next();
            }
            if label.is_empty() {
                return Err(Error::InvalidNTriples(format!("empty blank node: {line}")));
            }
            Ok(Term::Blank(label))
        }
        Some('"') => {
            let lexical = read_quoted(chars, line)?;
            match chars.peek() {
                Some('@') => {
                    chars.next();
                    let mut lang = String::new();
                    while let Some(&c) = chars.peek() {
                        if c.is_ascii_alphanumeric() || c == '-' {
                            lang.push(c);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    Ok(Term::Literal {
                        lexical,
                        datatype: None,
                        language: Some(lang),
                    })
                }
                Some('^') => {
                    chars.next();
                    if chars.next() != Some('^') || chars.next() != Some('<') {
                        return Err(Error::InvalidNTriples(format!("bad datatype: {line}")));
                    }
                    let datatype = read_iri(chars, line)?;
                    Ok(Term::Literal {
                        lexical,
                        datatype: Some(datatype),
                        language: None,
                    })
                }
                _ => Ok(Term::literal(lexical)),
            }
        }
        Some(c) => Err(Error::InvalidNTriples(format!(
            "unexpected character '{c}': {line}"
        ))),
        None => Err(Error::InvalidNTriples(format!(
            "Expected 3 terms, line ended early: {line}"
        ))),
    }
}

fn continues_label(chars: &Peekable<Chars<'_>>) -> bool {
    let mut ahead = chars.clone();
    ahead.next();
    ahead.peek().is_some_and(|c| !c.is_whitespace())
}

fn read_iri(chars: &mut Peekable<Chars<'_>>, line: &str) -> Result<String> {
    let mut iri = String::new();
    for c in chars.by_ref() {
        if c == '>' {
            return Ok(iri);
        }
        iri.push(c);
    }
    Err(Error::InvalidNTriples(format!("unterminated IRI: {line}")))
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>, line: &str) -> Result<String> {
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Ok(out),
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('\'') => out.push('\''),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => break,
            },
            c => out.push(c),
        }
    }
    Err(Error::InvalidNTriples(format!("unterminated literal: {line}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iri_triple() {
        let line = r#"<http://example.org/Apple> <http://example.org/type> <http://example.org/Company> ."#;
        let triple = Triple::from_ntriples(line).unwrap();

        assert_eq!(triple.subject, Term::iri("http://example.org/Apple"));
        assert_eq!(triple.predicate, "http://example.org/type");
        assert_eq!(triple.object, Term::iri("http://example.org/Company"));
    }

    #[test]
    fn test_parse_blank_and_literals() {
        let t = Triple::from_ntriples(r#"_:b0 <http://ex/p> "chat"@fr ."#).unwrap();
        assert_eq!(t.subject, Term::blank("b0"));
        assert_eq!(
            t.object,
            Term::Literal {
                lexical: "chat".into(),
                datatype: None,
                language: Some("fr".into()),
            }
        );

        let t = Triple::from_ntriples(r#"<http://ex/s> <http://ex/p> _:b1."#).unwrap();
        assert_eq!(t.object, Term::blank("b1"));

        let t = Triple::from_ntriples(r#"<http://ex/s> <http://ex/p> "a \"quoted\" word" ."#)
            .unwrap();
        assert_eq!(t.object.value(), "a \"quoted\" word");
    }

    #[test]
    fn test_ntriples_roundtrip() {
        let original = Triple::new(
            Term::iri("http://example.org/Apple"),
            "http://example.org/founded",
            Term::typed_literal("1976-04-01", "http://www.w3.org/2001/XMLSchema#date"),
        );
        let parsed = Triple::from_ntriples(&original.to_ntriples()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Triple::from_ntriples("").is_err());
        assert!(Triple::from_ntriples("# comment").is_err());
        assert!(Triple::from_ntriples("<http://a> <http://b> .").is_err());
        assert!(Triple::from_ntriples(r#""lit" <http://b> <http://c> ."#).is_err());
        assert!(Triple::from_ntriples("<http://a> _:p <http://c> .").is_err());
        assert!(Triple::from_ntriples("<http://a> <http://b> <http://c>").is_err());
        assert!(Triple::from_ntriples(r#"<http://a> <http://b> "open ."#).is_err());
    }
}
