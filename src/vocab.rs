//! RDF vocabulary constants used during triple generation
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary
//! - `xsd` - XML Schema datatypes
//! - `geo` - GeoSPARQL ontology
//! - `sf` - GeoSPARQL simple features (geometry kinds)
//! - `wgs84_pos` - legacy WGS84 Geoposition vocabulary
//! - `virtrdf` - legacy Virtuoso RDF geometries

/// RDF vocabulary constants
pub mod rdf {
    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// XSD vocabulary constants
pub mod xsd {
    /// XSD namespace IRI
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:float IRI
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
}

/// GeoSPARQL ontology constants
pub mod geo {
    /// GeoSPARQL namespace IRI
    pub const NS: &str = "http://www.opengis.net/ont/geosparql#";

    /// geo:Feature class IRI
    pub const FEATURE: &str = "http://www.opengis.net/ont/geosparql#Feature";

    /// geo:hasGeometry property IRI
    pub const HAS_GEOMETRY: &str = "http://www.opengis.net/ont/geosparql#hasGeometry";

    /// geo:asWKT property IRI
    pub const AS_WKT: &str = "http://www.opengis.net/ont/geosparql#asWKT";

    /// geo:wktLiteral datatype IRI
    pub const WKT_LITERAL: &str = "http://www.opengis.net/ont/geosparql#wktLiteral";
}

/// GeoSPARQL simple-features constants (geometry kind classes)
pub mod sf {
    /// Simple-features namespace IRI
    pub const NS: &str = "http://www.opengis.net/ont/sf#";
}

/// Legacy WGS84 Geoposition vocabulary constants
pub mod wgs84_pos {
    /// WGS84 Geoposition namespace IRI
    pub const NS: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#";

    /// pos:long property IRI
    pub const LONG: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#long";

    /// pos:lat property IRI
    pub const LAT: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#lat";

    /// pos:geometry property IRI (used by the Virtuoso legacy encoding)
    pub const GEOMETRY: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#geometry";
}

/// Legacy Virtuoso RDF geometry constants
pub mod virtrdf {
    /// Virtuoso namespace IRI
    pub const NS: &str = "http://www.openlinksw.com/schemas/virtrdf#";

    /// virtrdf:Geometry datatype IRI
    pub const GEOMETRY: &str = "http://www.openlinksw.com/schemas/virtrdf#Geometry";
}

/// Base IRI for EPSG coordinate reference system identifiers, embedded in
/// GeoSPARQL WKT literals
pub const EPSG_CRS_BASE: &str = "http://www.opengis.net/def/crs/EPSG/0/";

/// Suffix appended to a feature URI to form its geometry sub-resource URI
pub const GEO_URI_SUFFIX: &str = "/geom";
