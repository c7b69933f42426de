//! Geometry helpers for the transformation engine
//!
//! The engine never reprojects coordinates itself (that is the job of an
//! external collaborator); it detects the geometry kind from the textual WKT
//! representation and computes scalar measurements (area, length, centroid)
//! used as derived thematic attributes.

use geo::line_measures::{Euclidean, LengthMeasurable};
use geo::{Area, Centroid};
use geo_types::Geometry;

use crate::error::{GeordfError, Result};

/// Geometry kind as declared by the leading WKT keyword
///
/// Carries the raw keyword so the simple-features type triple reproduces the
/// input spelling (`POLYGON`, `MultiLineString`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryKind {
    keyword: String,
}

impl GeometryKind {
    /// Detect the geometry kind from a WKT string
    ///
    /// Takes the text before the first opening parenthesis; returns `None`
    /// when the representation has no parenthesized coordinate list.
    pub fn detect(wkt: &str) -> Option<Self> {
        let idx = wkt.find('(')?;
        let keyword = wkt[..idx].trim();
        if keyword.is_empty() {
            return None;
        }
        Some(Self {
            keyword: keyword.to_string(),
        })
    }

    /// The raw WKT keyword
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// True for POLYGON and MULTIPOLYGON geometries
    pub fn is_areal(&self) -> bool {
        self.keyword.to_uppercase().contains("POLYGON")
    }

    /// True for LINESTRING and MULTILINESTRING geometries
    pub fn is_linear(&self) -> bool {
        let upper = self.keyword.to_uppercase();
        upper.contains("LINE") && !upper.contains("POLYGON")
    }
}

/// Parse a WKT string into a geometry
pub fn parse_wkt(text: &str) -> Result<Geometry<f64>> {
    use std::str::FromStr;
    let parsed =
        wkt::Wkt::<f64>::from_str(text).map_err(|e| GeordfError::WktParse(format!("{e:?}")))?;
    Geometry::try_from(parsed).map_err(|e| GeordfError::WktParse(format!("{e:?}")))
}

/// Unsigned area of an areal geometry, in squared coordinate units
pub fn area(geom: &Geometry<f64>) -> f64 {
    geom.unsigned_area()
}

/// Length of a geometry, in coordinate units
///
/// For areal geometries this is the perimeter (exterior plus interior
/// rings); for linear geometries the path length; zero otherwise.
pub fn length(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::LineString(ls) => ls.length(&Euclidean),
        Geometry::MultiLineString(mls) => mls.length(&Euclidean),
        Geometry::Polygon(poly) => {
            poly.exterior().length(&Euclidean)
                + poly
                    .interiors()
                    .iter()
                    .map(|ring| ring.length(&Euclidean))
                    .sum::<f64>()
        }
        Geometry::MultiPolygon(mp) => mp
            .iter()
            .map(|poly| length(&Geometry::Polygon(poly.clone())))
            .sum(),
        _ => 0.0,
    }
}

/// Centroid of a geometry as (longitude, latitude)
pub fn centroid(geom: &Geometry<f64>) -> Result<(f64, f64)> {
    geom.centroid()
        .map(|c| (c.x(), c.y()))
        .ok_or_else(|| GeordfError::Record("geometry has no centroid".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_detection() {
        let kind = GeometryKind::detect("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))").unwrap();
        assert_eq!(kind.keyword(), "POLYGON");
        assert!(kind.is_areal());
        assert!(!kind.is_linear());

        let kind = GeometryKind::detect("MultiLineString ((0 0, 1 1))").unwrap();
        assert_eq!(kind.keyword(), "MultiLineString");
        assert!(kind.is_linear());

        assert!(GeometryKind::detect("not a geometry").is_none());
        assert!(GeometryKind::detect("(0 0)").is_none());
    }

    #[test]
    fn test_parse_polygon() {
        let geom = parse_wkt("POLYGON((0 0, 4 0, 4 3, 0 3, 0 0))").unwrap();
        assert!(matches!(geom, Geometry::Polygon(_)));
        assert_eq!(area(&geom), 12.0);
        assert_eq!(length(&geom), 14.0);
    }

    #[test]
    fn test_linestring_length() {
        let geom = parse_wkt("LINESTRING(0 0, 3 4)").unwrap();
        assert_eq!(length(&geom), 5.0);
        assert_eq!(area(&geom), 0.0);
    }

    #[test]
    fn test_multi_geometry_lengths() {
        let geom = parse_wkt("MULTILINESTRING((0 0, 3 4), (0 0, 0 2))").unwrap();
        assert_eq!(length(&geom), 7.0);

        let geom = parse_wkt(
            "MULTIPOLYGON(((0 0, 4 0, 4 3, 0 3, 0 0)), ((10 10, 11 10, 11 11, 10 11, 10 10)))",
        )
        .unwrap();
        assert_eq!(length(&geom), 18.0);
        assert_eq!(area(&geom), 13.0);

        // Interior rings count toward the perimeter
        let geom =
            parse_wkt("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 2 1, 2 2, 1 2, 1 1))").unwrap();
        assert_eq!(length(&geom), 20.0);

        let geom = parse_wkt("POINT(1 1)").unwrap();
        assert_eq!(length(&geom), 0.0);
    }

    #[test]
    fn test_centroid() {
        let geom = parse_wkt("POLYGON((0 0, 2 0, 2 2, 0 2, 0 0))").unwrap();
        let (lon, lat) = centroid(&geom).unwrap();
        assert_eq!((lon, lat), (1.0, 1.0));

        let geom = parse_wkt("POINT(23.72 37.98)").unwrap();
        let (lon, lat) = centroid(&geom).unwrap();
        assert!((lon - 23.72).abs() < 1e-9);
        assert!((lat - 37.98).abs() < 1e-9);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_wkt("POLYGON((0 0, 1 1").is_err());
        assert!(parse_wkt("").is_err());
    }
}
