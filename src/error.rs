//! Error types for feature-to-RDF transformation

use thiserror::Error;

/// Errors raised while configuring or running the transformation engine
#[derive(Debug, Error)]
pub enum GeordfError {
    /// Malformed or contradictory mapping rule, detected at load time
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unsupported coordinate reference system pair, detected before any
    /// feature is processed
    #[error("CRS error: {0}")]
    Crs(String),

    /// Built-in function invocation failure
    #[error("Function '{name}' failed: {message}")]
    Function { name: String, message: String },

    /// Reference to a builtin not present in the function registry
    #[error("Unknown builtin function: {0}")]
    UnknownFunction(String),

    /// Error parsing a WKT geometry representation
    #[error("WKT parse error: {0}")]
    WktParse(String),

    /// Failure while transforming a single feature record
    #[error("Record transformation error: {0}")]
    Record(String),
}

/// Result type for transformation operations
pub type Result<T> = std::result::Result<T, GeordfError>;
