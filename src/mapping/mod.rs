//! Mapping specification structures
//!
//! The declarative mapping specification is parsed by an external loader;
//! this module holds its in-memory form and the one-time derivations the
//! evaluator needs.

mod model;
mod rule;

pub use model::{MappingModel, CATCH_ALL_KEY, WILDCARD};
pub use rule::{MappingProfile, MappingRule};
