//! Engine configuration
//!
//! All configuration is supplied explicitly at construction and held as
//! immutable fields; the engine reads no process-wide state. Parsing the
//! configuration file itself is the job of an external loader.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{GeordfError, Result};

/// Target vocabulary for geometry triples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoVocabulary {
    /// GeoSPARQL: geometry sub-resource with a CRS-prefixed WKT literal
    #[default]
    GeoSparql,
    /// Legacy WGS84 Geoposition vocabulary: lon/lat typed literals (points)
    Wgs84Pos,
    /// Legacy Virtuoso RDF geometries: single typed WKT literal (points)
    Virtuoso,
}

/// Source/target coordinate reference systems, as EPSG codes
///
/// The engine performs no reprojection itself; it resolves and validates the
/// effective target CRS once, before any feature is processed, and carries
/// the code into WKT literals and measurement calls.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CrsSettings {
    /// EPSG code of the input geometries, if known
    pub source: Option<u32>,
    /// EPSG code requested for the output, if any
    pub target: Option<u32>,
}

impl CrsSettings {
    /// Resolve the effective target EPSG code
    ///
    /// Without an explicit target, features with an unknown source CRS are
    /// assumed to be in WGS84 lon/lat (EPSG:4326); otherwise the source CRS
    /// is retained. An explicit target requires a known source, since every
    /// feature would need the same reprojection.
    pub fn resolve(&self) -> Result<u32> {
        match self.target {
            None => match self.source {
                None | Some(0) => Ok(4326),
                Some(src) => Ok(src),
            },
            Some(0) => Err(GeordfError::Crs("target CRS code must be non-zero".into())),
            Some(tgt) => match self.source {
                None | Some(0) => Err(GeordfError::Crs(format!(
                    "reprojection to EPSG:{tgt} requested but the source CRS is unknown"
                ))),
                Some(_) => Ok(tgt),
            },
        }
    }
}

/// Configuration for one transformation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Name of the data source provider, recorded on every feature
    pub feature_source: String,

    /// Attribute holding the record's native identifier
    pub attr_key: String,

    /// Attribute holding the geometry; never emitted as a thematic triple
    pub attr_geometry: String,

    /// Attribute holding the feature's category name
    pub attr_category: String,

    /// Fallback language tag for language-tagged literals; empty means "en"
    #[serde(default)]
    pub default_lang: String,

    /// Namespace of the target ontology
    pub ontology_ns: String,

    /// Namespace under which feature URIs are minted
    pub feature_ns: String,

    /// Namespace for classification term URIs
    pub feature_class_ns: String,

    /// Namespace for classification scheme URIs
    pub classification_ns: String,

    /// Prefix -> namespace table used to expand prefixed predicates
    #[serde(default)]
    pub prefixes: HashMap<String, String>,

    /// Vocabulary used for geometry triples
    #[serde(default)]
    pub geo_vocab: GeoVocabulary,

    /// Coordinate reference system settings
    #[serde(default)]
    pub crs: CrsSettings,
}

impl TransformConfig {
    /// Effective default language tag ("en" when unset)
    pub fn default_language(&self) -> &str {
        if self.default_lang.is_empty() {
            "en"
        } else {
            &self.default_lang
        }
    }

    /// Expand a `prefix:local` name into a full IRI using the prefix table
    ///
    /// Names whose prefix is not registered (including full IRIs, whose
    /// scheme is never a registered prefix) pass through unchanged.
    pub fn expand_namespace(&self, name: &str) -> String {
        if let Some(idx) = name.find(':') {
            let prefix = &name[..idx];
            if let Some(ns) = self.prefixes.get(prefix) {
                return format!("{}{}", ns, &name[idx + 1..]);
            }
        }
        name.to_string()
    }
}
