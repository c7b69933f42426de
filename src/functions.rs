//! Built-in function registry
//!
//! Mapping rules can name a generator function for values that must be
//! computed rather than read directly from the record (minted identifiers,
//! geometric measurements, inferred language tags). Functions are resolved
//! by name from this registry and invoked with positional string arguments;
//! references to unknown names are rejected when the mapping model is
//! loaded, never at transformation time.

use std::collections::HashMap;

use uuid::Uuid;

use crate::clean::is_valid_iso_language;
use crate::error::{GeordfError, Result};
use crate::geometry;

/// A pure built-in function over positional string arguments
pub type BuiltinFn = fn(&[String]) -> Result<String>;

/// Names of the geometric measurement builtins, evaluated during the
/// geometry step rather than the thematic step
pub const GEOMETRIC_FUNCTIONS: &[&str] = &["area", "length", "longitude", "latitude"];

/// Registry of named built-in functions
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    funcs: HashMap<&'static str, BuiltinFn>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FunctionRegistry {
    /// Create a registry pre-populated with all builtins
    pub fn with_builtins() -> Self {
        let mut funcs: HashMap<&'static str, BuiltinFn> = HashMap::new();
        funcs.insert("uuid", fn_uuid);
        funcs.insert("random_uuid", fn_random_uuid);
        funcs.insert("keep_id", fn_keep_id);
        funcs.insert("area", fn_area);
        funcs.insert("length", fn_length);
        funcs.insert("longitude", fn_longitude);
        funcs.insert("latitude", fn_latitude);
        funcs.insert("lang_suffix", fn_lang_suffix);
        Self { funcs }
    }

    /// Register an additional function under a static name
    pub fn register(&mut self, name: &'static str, f: BuiltinFn) {
        self.funcs.insert(name, f);
    }

    /// Check whether a function name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Invoke a function by name
    pub fn invoke(&self, name: &str, args: &[String]) -> Result<String> {
        let f = self
            .funcs
            .get(name)
            .ok_or_else(|| GeordfError::UnknownFunction(name.to_string()))?;
        f(args)
    }
}

/// Deterministic identifier derived from the argument values (UUID v5)
fn fn_uuid(args: &[String]) -> Result<String> {
    let seed = args.join(":");
    Ok(Uuid::new_v5(&Uuid::NAMESPACE_URL, seed.as_bytes()).to_string())
}

/// Random unique identifier (UUID v4); ignores its arguments
fn fn_random_uuid(_args: &[String]) -> Result<String> {
    Ok(Uuid::new_v4().to_string())
}

/// Concatenation of the argument values, retaining original identifiers
fn fn_keep_id(args: &[String]) -> Result<String> {
    Ok(args.concat())
}

fn parse_geometry_arg(name: &str, args: &[String]) -> Result<geo_types::Geometry<f64>> {
    let wkt = args.first().ok_or_else(|| GeordfError::Function {
        name: name.to_string(),
        message: "missing WKT argument".to_string(),
    })?;
    geometry::parse_wkt(wkt)
}

/// Unsigned area of the geometry given as (wkt, srid)
fn fn_area(args: &[String]) -> Result<String> {
    let geom = parse_geometry_arg("area", args)?;
    Ok(geometry::area(&geom).to_string())
}

/// Length or perimeter of the geometry given as (wkt, srid)
fn fn_length(args: &[String]) -> Result<String> {
    let geom = parse_geometry_arg("length", args)?;
    Ok(geometry::length(&geom).to_string())
}

/// Longitude of the centroid of the geometry given as (wkt, srid)
fn fn_longitude(args: &[String]) -> Result<String> {
    let geom = parse_geometry_arg("longitude", args)?;
    let (lon, _) = geometry::centroid(&geom)?;
    Ok(lon.to_string())
}

/// Latitude of the centroid of the geometry given as (wkt, srid)
fn fn_latitude(args: &[String]) -> Result<String> {
    let geom = parse_geometry_arg("latitude", args)?;
    let (_, lat) = geometry::centroid(&geom)?;
    Ok(lat.to_string())
}

/// Infer a language tag from a multi-faceted attribute name
///
/// Arguments are (attribute key, base-name length). The remainder of the
/// key after the base is stripped of separators and lowercased; returns the
/// ISO 639-1 code, or the empty string when the suffix is not one.
fn fn_lang_suffix(args: &[String]) -> Result<String> {
    let key = args.first().ok_or_else(|| GeordfError::Function {
        name: "lang_suffix".to_string(),
        message: "missing attribute key argument".to_string(),
    })?;
    let base_len: usize = args
        .get(1)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| GeordfError::Function {
            name: "lang_suffix".to_string(),
            message: "missing or invalid base length argument".to_string(),
        })?;

    // Offsets past the end or inside a multibyte character yield no tag
    let Some(rest) = key.get(base_len..) else {
        return Ok(String::new());
    };
    let suffix = rest
        .trim_matches(|c| c == '_' || c == '-' || c == ':')
        .to_lowercase();
    if is_valid_iso_language(&suffix) {
        Ok(suffix)
    } else {
        Ok(String::new())
    }
}
