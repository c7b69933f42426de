//! Mapping-driven RDF triple generation for geospatial features
//!
//! This crate transforms feature records (thematic attributes plus a WKT
//! geometry) into RDF triples according to a declarative mapping
//! specification. It implements the transformation core only: reading input
//! formats, reprojecting coordinates and serializing the triples are the
//! jobs of external collaborators.
//!
//! # Key Features
//!
//! - **Profile-based mapping**: Each attribute maps to one of a closed set
//!   of emission shapes (plain, language-tagged and typed literals, URLs,
//!   sub-entity instances, composite parts)
//! - **Multi-faceted attributes**: Wildcard rules cover families like
//!   `name_el`, `name_fr`, inferring the language tag from the suffix
//! - **Geometry vocabularies**: GeoSPARQL WKT serialization, plus the
//!   legacy WGS84 Geoposition and Virtuoso point encodings
//! - **Derived attributes**: Registered functions mint identifiers and
//!   compute geometric measurements (area, length, centroid coordinates)
//!   injected as ordinary attributes
//! - **Classification hierarchies**: Category names resolve to term URIs
//!   through a caller-supplied lookup, with hierarchy triples on demand
//!
//! # Usage
//!
//! Build a [`TransformConfig`] and optionally a [`MappingModel`], construct
//! a [`TripleGenerator`], and feed it one record at a time via
//! [`TripleGenerator::transform()`]. Accumulated triples are drained with
//! [`TripleGenerator::take_triples()`]; per-attribute counts are available
//! from [`TripleGenerator::statistics()`].

pub mod classify;
pub mod clean;
pub mod config;
pub mod error;
pub mod functions;
pub mod geometry;
pub mod mapping;
pub mod stats;
pub mod transform;
pub mod triple;
pub mod uri;
pub mod vocab;

pub use classify::{CategoryRef, ClassificationLookup};
pub use config::{CrsSettings, GeoVocabulary, TransformConfig};
pub use error::{GeordfError, Result};
pub use functions::{BuiltinFn, FunctionRegistry};
pub use geometry::GeometryKind;
pub use mapping::{MappingModel, MappingProfile, MappingRule, CATCH_ALL_KEY, WILDCARD};
pub use stats::StatsCollector;
pub use transform::TripleGenerator;
pub use triple::{RdfTerm, Triple, TripleBuffer};
pub use uri::UriMinter;
