//! Mapping rule structures
//!
//! One rule per logical attribute, describing how its values become triples.

use serde::{Deserialize, Serialize};

/// Emission shape for one attribute (closed set)
///
/// The evaluator matches exhaustively on this enum; a rule without a
/// recognized profile emits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingProfile {
    /// Sub-entity instantiating an ontology class, with language handling
    InstanceWithLanguage,
    /// Sub-entity instantiating an ontology class, no language handling
    Instance,
    /// Member of a composite sub-entity, language-tagged value
    PartWithLanguage,
    /// Member of a composite sub-entity, plain value
    Part,
    /// URL-valued property; values are repaired before emission
    TypedUrl,
    /// Typed literal with an explicit datatype
    TypedLiteral,
    /// Language-tagged literal on the feature itself
    LanguageLiteral,
    /// Plain literal on the feature itself
    PlainLiteral,
    /// No triples for this attribute (default)
    #[default]
    Skip,
}

impl MappingProfile {
    /// Whether this profile links the subject to a sub-entity URI
    pub fn is_instance(&self) -> bool {
        matches!(
            self,
            MappingProfile::InstanceWithLanguage | MappingProfile::Instance
        )
    }

    /// Whether this profile contributes to a composite sub-entity
    pub fn is_part(&self) -> bool {
        matches!(
            self,
            MappingProfile::PartWithLanguage | MappingProfile::Part
        )
    }

    /// Whether emission requires a predicate on the rule
    pub fn requires_predicate(&self) -> bool {
        !matches!(self, MappingProfile::Skip)
    }
}

/// Declarative transformation rule for one attribute
///
/// Loaded from the external mapping specification; all fields except the
/// profile are optional and validated against the profile when the model is
/// built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingRule {
    /// Emission shape
    pub profile: MappingProfile,

    /// Ontology property, possibly namespace-prefixed
    pub predicate: Option<String>,

    /// Entity-type suffix for sub-entity URIs; the reserved value `uri`
    /// designates this attribute as the URI generator, and values containing
    /// `category` designate the category-URI attribute
    pub entity_type: Option<String>,

    /// Ontology class instantiated by sub-entity profiles
    pub resource_class: Option<String>,

    /// Resource-type literal for instance profiles; `NONE` suppresses it
    pub resource_type: Option<String>,

    /// Language tag (exact-match rules) or the name of the registered
    /// function deriving one from the attribute name (wildcard rules)
    pub language: Option<String>,

    /// Datatype IRI for typed-literal profiles
    pub data_type: Option<String>,

    /// Composite group this attribute belongs to (e.g. `address`)
    pub part_of: Option<String>,

    /// Registered function computing this attribute's value
    pub generator_function: Option<String>,

    /// Attribute names resolved into positional function arguments
    pub function_args: Vec<String>,
}

impl MappingRule {
    /// Create a rule with the given profile
    pub fn with_profile(profile: MappingProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Create a plain-literal rule
    pub fn plain_literal(predicate: impl Into<String>) -> Self {
        Self {
            profile: MappingProfile::PlainLiteral,
            predicate: Some(predicate.into()),
            ..Self::default()
        }
    }

    /// Create a language-literal rule
    pub fn language_literal(predicate: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            profile: MappingProfile::LanguageLiteral,
            predicate: Some(predicate.into()),
            language: Some(lang.into()),
            ..Self::default()
        }
    }

    /// Create a composite-member rule
    pub fn part(
        entity_type: impl Into<String>,
        part_of: impl Into<String>,
        predicate: impl Into<String>,
    ) -> Self {
        Self {
            profile: MappingProfile::Part,
            entity_type: Some(entity_type.into()),
            part_of: Some(part_of.into()),
            predicate: Some(predicate.into()),
            ..Self::default()
        }
    }

    /// Create a URI-generator rule
    pub fn uri_generator(function: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            profile: MappingProfile::Skip,
            entity_type: Some("uri".to_string()),
            generator_function: Some(function.into()),
            function_args: args,
            ..Self::default()
        }
    }

    /// Whether this rule designates the URI-generator attribute
    pub fn is_uri_designator(&self) -> bool {
        self.entity_type
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case("uri"))
    }

    /// Whether this rule designates the category-URI attribute
    pub fn is_category_designator(&self) -> bool {
        !self.is_uri_designator()
            && self
                .entity_type
                .as_deref()
                .is_some_and(|e| e.contains("category"))
    }

    /// Whether this rule designates the datasource attribute
    pub fn is_datasource_designator(&self) -> bool {
        self.predicate
            .as_deref()
            .is_some_and(|p| p.contains("sourceRef"))
    }
}
