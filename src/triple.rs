//! RDF triple types and the per-feature accumulator
//!
//! Triples are immutable once created. The [`TripleBuffer`] collects the
//! triples produced for one feature and hands them to the downstream sink.

use serde::{Deserialize, Serialize};

use crate::vocab::rdf;

/// Object position of an RDF triple
///
/// Either an IRI resource or a literal with optional datatype and language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RdfTerm {
    /// An IRI
    Iri(String),
    /// A literal with optional datatype and language
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl RdfTerm {
    /// Create an IRI term
    pub fn iri(iri: impl Into<String>) -> Self {
        RdfTerm::Iri(iri.into())
    }

    /// Create a plain string literal
    pub fn string(value: impl Into<String>) -> Self {
        RdfTerm::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Create a typed literal
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        RdfTerm::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// Create a language-tagged string
    pub fn lang_string(value: impl Into<String>, lang: impl Into<String>) -> Self {
        RdfTerm::Literal {
            value: value.into(),
            datatype: Some(rdf::LANG_STRING.to_string()),
            language: Some(lang.into()),
        }
    }

    /// Check if this is an IRI
    pub fn is_iri(&self) -> bool {
        matches!(self, RdfTerm::Iri(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, RdfTerm::Literal { .. })
    }

    /// Get as IRI string if this is an IRI
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            RdfTerm::Iri(iri) => Some(iri),
            RdfTerm::Literal { .. } => None,
        }
    }

    /// Get the lexical value if this is a literal
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            RdfTerm::Literal { value, .. } => Some(value),
            RdfTerm::Iri(_) => None,
        }
    }

    /// Get the language tag if this is a language-tagged literal
    pub fn language(&self) -> Option<&str> {
        match self {
            RdfTerm::Literal { language, .. } => language.as_deref(),
            RdfTerm::Iri(_) => None,
        }
    }
}

/// One (subject, predicate, object) statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triple {
    /// Subject IRI
    pub subject: String,
    /// Predicate IRI
    pub predicate: String,
    /// Object term
    pub object: RdfTerm,
}

impl Triple {
    /// Create a triple
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: RdfTerm) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

/// Accumulator of triples generated for one feature
///
/// Cleared between features by the caller; never shared across engine
/// instances.
#[derive(Debug, Clone, Default)]
pub struct TripleBuffer {
    triples: Vec<Triple>,
}

impl TripleBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a triple with an IRI object
    pub fn push_resource(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) {
        self.triples
            .push(Triple::new(subject, predicate, RdfTerm::iri(object)));
    }

    /// Append a triple with a plain literal object
    pub fn push_plain(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.triples
            .push(Triple::new(subject, predicate, RdfTerm::string(value)));
    }

    /// Append a triple with a language-tagged literal object
    pub fn push_lang(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
        lang: impl Into<String>,
    ) {
        self.triples.push(Triple::new(
            subject,
            predicate,
            RdfTerm::lang_string(value, lang),
        ));
    }

    /// Append a triple with a typed literal object
    pub fn push_typed(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
        datatype: impl Into<String>,
    ) {
        self.triples.push(Triple::new(
            subject,
            predicate,
            RdfTerm::typed(value, datatype),
        ));
    }

    /// Borrow the accumulated triples
    pub fn as_slice(&self) -> &[Triple] {
        &self.triples
    }

    /// Number of accumulated triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Remove all accumulated triples
    pub fn clear(&mut self) {
        self.triples.clear();
    }

    /// Take ownership of the accumulated triples, leaving the buffer empty
    pub fn take(&mut self) -> Vec<Triple> {
        std::mem::take(&mut self.triples)
    }
}
