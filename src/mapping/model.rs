//! Mapping model: the compiled form of the declarative specification
//!
//! Built once from the rules the external loader parsed; designated
//! attributes (URI generator, category URI, datasource) are derived at
//! construction and never recomputed per feature.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rule::{MappingProfile, MappingRule};
use crate::error::{GeordfError, Result};
use crate::functions::{FunctionRegistry, GEOMETRIC_FUNCTIONS};

/// Reserved key denoting the catch-all rule
pub const CATCH_ALL_KEY: &str = "_";

/// Reserved trailing character marking a multi-faceted attribute base
pub const WILDCARD: char = '%';

/// Default key of the URI-generator attribute when none is designated
const DEFAULT_ATTR_URI: &str = "URI";

/// Default key of the category-URI attribute when none is designated
const DEFAULT_ATTR_CATEGORY_URI: &str = "CATEGORY_URI";

/// Default key of the datasource attribute when none is designated
const DEFAULT_ATTR_DATA_SOURCE: &str = "DATA_SOURCE";

/// Compiled mapping specification, one rule per logical attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, MappingRule>",
    into = "BTreeMap<String, MappingRule>"
)]
pub struct MappingModel {
    rules: BTreeMap<String, MappingRule>,
    attr_uri: String,
    attr_category_uri: String,
    attr_data_source: String,
}

impl TryFrom<BTreeMap<String, MappingRule>> for MappingModel {
    type Error = GeordfError;

    fn try_from(rules: BTreeMap<String, MappingRule>) -> Result<Self> {
        MappingModel::from_rules(rules)
    }
}

impl From<MappingModel> for BTreeMap<String, MappingRule> {
    fn from(model: MappingModel) -> Self {
        model.rules
    }
}

impl MappingModel {
    /// Build a model from parsed rules, deriving the designated attributes
    ///
    /// At most one rule may designate each of the URI-generator, category
    /// and datasource attributes; a second designation is a configuration
    /// error.
    pub fn from_rules(rules: BTreeMap<String, MappingRule>) -> Result<Self> {
        let mut attr_uri = None;
        let mut attr_category_uri = None;
        let mut attr_data_source = None;

        for (key, rule) in &rules {
            if rule.is_uri_designator() {
                if let Some(prev) = attr_uri.replace(key.clone()) {
                    return Err(GeordfError::Configuration(format!(
                        "both '{prev}' and '{key}' are designated as the URI attribute"
                    )));
                }
            }
            if rule.is_category_designator() {
                if let Some(prev) = attr_category_uri.replace(key.clone()) {
                    return Err(GeordfError::Configuration(format!(
                        "both '{prev}' and '{key}' are designated as the category attribute"
                    )));
                }
            }
            if rule.is_datasource_designator() {
                if let Some(prev) = attr_data_source.replace(key.clone()) {
                    return Err(GeordfError::Configuration(format!(
                        "both '{prev}' and '{key}' are designated as the datasource attribute"
                    )));
                }
            }
        }

        Ok(Self {
            rules,
            attr_uri: attr_uri.unwrap_or_else(|| DEFAULT_ATTR_URI.to_string()),
            attr_category_uri: attr_category_uri
                .unwrap_or_else(|| DEFAULT_ATTR_CATEGORY_URI.to_string()),
            attr_data_source: attr_data_source
                .unwrap_or_else(|| DEFAULT_ATTR_DATA_SOURCE.to_string()),
        })
    }

    /// Key of the URI-generator attribute
    pub fn attr_uri(&self) -> &str {
        &self.attr_uri
    }

    /// Key of the category-URI attribute
    pub fn attr_category_uri(&self) -> &str {
        &self.attr_category_uri
    }

    /// Key of the datasource attribute
    pub fn attr_data_source(&self) -> &str {
        &self.attr_data_source
    }

    /// Look up the rule for an attribute key
    pub fn find(&self, key: &str) -> Option<&MappingRule> {
        self.rules.get(key)
    }

    /// The catch-all rule, if the specification declares one
    pub fn catch_all(&self) -> Option<&MappingRule> {
        self.rules.get(CATCH_ALL_KEY)
    }

    /// Find the wildcard key whose base matches a multi-faceted attribute
    ///
    /// A key `base%` matches attributes that start with `base` and carry a
    /// non-empty suffix. When several bases match, the longest wins.
    pub fn multi_faceted_key(&self, attr: &str) -> Option<&str> {
        self.rules
            .keys()
            .filter(|key| key.ends_with(WILDCARD))
            .filter_map(|key| {
                let base = &key[..key.len() - WILDCARD.len_utf8()];
                (!base.is_empty() && attr.len() > base.len() && attr.starts_with(base))
                    .then_some((key.as_str(), base.len()))
            })
            .max_by_key(|&(_, base_len)| base_len)
            .map(|(key, _)| key)
    }

    /// Key of the derived geometric attribute computed by a given builtin
    pub fn extra_geometric_attr(&self, function: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(_, rule)| rule.generator_function.as_deref() == Some(function))
            .map(|(key, _)| key.as_str())
    }

    /// Keys of generated thematic attributes, in deterministic order
    ///
    /// Excludes the URI-generator attribute (its value is the minted URI)
    /// and geometric measurements (computed during the geometry step).
    pub fn extra_thematic_attrs(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .filter(move |(key, rule)| {
                rule.generator_function
                    .as_deref()
                    .is_some_and(|f| !GEOMETRIC_FUNCTIONS.contains(&f))
                    && key.as_str() != self.attr_uri
                    && !key.ends_with(WILDCARD)
                    && key.as_str() != CATCH_ALL_KEY
            })
            .map(|(key, _)| key.as_str())
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the model holds no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate the model against the function registry
    ///
    /// Unknown function names and rules missing fields their profile needs
    /// are configuration errors, surfaced at load time rather than during
    /// transformation.
    pub fn validate(&self, registry: &FunctionRegistry) -> Result<()> {
        for (key, rule) in &self.rules {
            if let Some(f) = rule.generator_function.as_deref() {
                if !registry.contains(f) {
                    return Err(GeordfError::Configuration(format!(
                        "rule '{key}' references unknown function '{f}'"
                    )));
                }
            }

            if key.ends_with(WILDCARD) {
                let lang_fn = rule.language.as_deref().unwrap_or("lang_suffix");
                if !registry.contains(lang_fn) {
                    return Err(GeordfError::Configuration(format!(
                        "wildcard rule '{key}' references unknown language function '{lang_fn}'"
                    )));
                }
            }

            if rule.profile.requires_predicate() && rule.predicate.is_none() {
                return Err(GeordfError::Configuration(format!(
                    "rule '{key}' has profile {:?} but no predicate",
                    rule.profile
                )));
            }
            if rule.profile.is_instance() && rule.resource_class.is_none() {
                return Err(GeordfError::Configuration(format!(
                    "rule '{key}' has an instance profile but no resource class"
                )));
            }
            if rule.profile.is_part() && (rule.entity_type.is_none() || rule.part_of.is_none()) {
                return Err(GeordfError::Configuration(format!(
                    "rule '{key}' has a part profile but lacks entity type or composite group"
                )));
            }
            if rule.profile == MappingProfile::TypedLiteral && rule.data_type.is_none() {
                return Err(GeordfError::Configuration(format!(
                    "rule '{key}' has a typed-literal profile but no datatype"
                )));
            }
        }

        if let Some(catch_all) = self.catch_all() {
            if catch_all.predicate.is_none() {
                return Err(GeordfError::Configuration(
                    "catch-all rule has no predicate".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules_with(entries: Vec<(&str, MappingRule)>) -> BTreeMap<String, MappingRule> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_default_designations() {
        let model = MappingModel::from_rules(rules_with(vec![(
            "name",
            MappingRule::plain_literal("slipo:name"),
        )]))
        .unwrap();
        assert_eq!(model.attr_uri(), "URI");
        assert_eq!(model.attr_category_uri(), "CATEGORY_URI");
        assert_eq!(model.attr_data_source(), "DATA_SOURCE");
    }

    #[test]
    fn test_derived_designations() {
        let mut category = MappingRule::plain_literal("slipo:category");
        category.entity_type = Some("categoryURI".to_string());
        let model = MappingModel::from_rules(rules_with(vec![
            ("id", MappingRule::uri_generator("uuid", vec![])),
            ("cat", category),
            ("src", MappingRule::plain_literal("slipo:sourceRef")),
        ]))
        .unwrap();
        assert_eq!(model.attr_uri(), "id");
        assert_eq!(model.attr_category_uri(), "cat");
        assert_eq!(model.attr_data_source(), "src");
    }

    #[test]
    fn test_duplicate_designation_rejected() {
        let result = MappingModel::from_rules(rules_with(vec![
            ("a", MappingRule::uri_generator("uuid", vec![])),
            ("b", MappingRule::uri_generator("uuid", vec![])),
        ]));
        assert!(matches!(result, Err(GeordfError::Configuration(_))));
    }

    #[test]
    fn test_multi_faceted_longest_base_wins() {
        let model = MappingModel::from_rules(rules_with(vec![
            ("name%", MappingRule::plain_literal("slipo:name")),
            ("name_alt%", MappingRule::plain_literal("slipo:altName")),
        ]))
        .unwrap();
        assert_eq!(model.multi_faceted_key("name_el"), Some("name%"));
        assert_eq!(model.multi_faceted_key("name_alt_en"), Some("name_alt%"));
        assert_eq!(model.multi_faceted_key("name"), None);
        assert_eq!(model.multi_faceted_key("phone"), None);
    }

    #[test]
    fn test_extra_attrs() {
        let mut area = MappingRule::plain_literal("slipo:area");
        area.generator_function = Some("area".to_string());
        let mut computed = MappingRule::plain_literal("slipo:label");
        computed.generator_function = Some("keep_id".to_string());
        computed.function_args = vec!["id".to_string()];

        let model = MappingModel::from_rules(rules_with(vec![
            ("calc_area", area),
            ("label", computed),
            ("uri_attr", MappingRule::uri_generator("uuid", vec![])),
        ]))
        .unwrap();

        assert_eq!(model.extra_geometric_attr("area"), Some("calc_area"));
        assert_eq!(model.extra_geometric_attr("length"), None);
        let thematic: Vec<_> = model.extra_thematic_attrs().collect();
        assert_eq!(thematic, vec!["label"]);
    }

    #[test]
    fn test_validation_catches_unknown_function() {
        let registry = FunctionRegistry::with_builtins();
        let mut rule = MappingRule::plain_literal("slipo:x");
        rule.generator_function = Some("no_such_fn".to_string());
        let model = MappingModel::from_rules(rules_with(vec![("x", rule)])).unwrap();
        assert!(matches!(
            model.validate(&registry),
            Err(GeordfError::Configuration(_))
        ));
    }

    #[test]
    fn test_validation_catches_missing_fields() {
        let registry = FunctionRegistry::with_builtins();

        let model = MappingModel::from_rules(rules_with(vec![(
            "x",
            MappingRule::with_profile(MappingProfile::PlainLiteral),
        )]))
        .unwrap();
        assert!(model.validate(&registry).is_err());

        let model = MappingModel::from_rules(rules_with(vec![(
            "x",
            MappingRule::with_profile(MappingProfile::Skip),
        )]))
        .unwrap();
        assert!(model.validate(&registry).is_ok());

        let mut typed = MappingRule::plain_literal("slipo:x");
        typed.profile = MappingProfile::TypedLiteral;
        let model = MappingModel::from_rules(rules_with(vec![("x", typed)])).unwrap();
        assert!(model.validate(&registry).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let json = r#"{
            "name": {"profile": "language_literal", "predicate": "slipo:name", "language": "en"},
            "_": {"profile": "skip", "predicate": "slipo:other"}
        }"#;
        let model: MappingModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.len(), 2);
        assert!(model.catch_all().is_some());
        let back = serde_json::to_string(&model).unwrap();
        let again: MappingModel = serde_json::from_str(&back).unwrap();
        assert_eq!(again.len(), 2);
    }
}
