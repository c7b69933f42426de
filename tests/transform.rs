//! End-to-end transformation scenarios against a realistic mapping model

use std::collections::{BTreeMap, HashMap};

use geordf::{
    CategoryRef, CrsSettings, GeoVocabulary, MappingModel, MappingProfile, MappingRule,
    TransformConfig, TripleGenerator,
};

fn config() -> TransformConfig {
    let mut prefixes = HashMap::new();
    prefixes.insert("slipo".to_string(), "http://slipo.eu/def#".to_string());
    TransformConfig {
        feature_source: "OSM".to_string(),
        attr_key: "id".to_string(),
        attr_geometry: "wkt".to_string(),
        attr_category: "type".to_string(),
        default_lang: String::new(),
        ontology_ns: "http://slipo.eu/def#".to_string(),
        feature_ns: "http://slipo.eu/id/poi/".to_string(),
        feature_class_ns: "http://slipo.eu/id/term/".to_string(),
        classification_ns: "http://slipo.eu/id/classification/".to_string(),
        prefixes,
        geo_vocab: GeoVocabulary::default(),
        crs: CrsSettings::default(),
    }
}

fn record(entries: &[(&str, &str)]) -> HashMap<String, Option<String>> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), Some(v.to_string())))
        .collect()
}

fn rules(entries: Vec<(&str, MappingRule)>) -> BTreeMap<String, MappingRule> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// A mapping close to what a production profile for points of interest
/// looks like: generated URI, language-tagged names with a wildcard for
/// facets, composite address, repaired URLs and a category link.
fn poi_model() -> MappingModel {
    let mut name_facet = MappingRule::with_profile(MappingProfile::InstanceWithLanguage);
    name_facet.predicate = Some("slipo:name".to_string());
    name_facet.entity_type = Some("name".to_string());
    name_facet.resource_class = Some("Name".to_string());

    let mut website = MappingRule::with_profile(MappingProfile::TypedUrl);
    website.predicate = Some("slipo:homepage".to_string());

    let mut category = MappingRule::with_profile(MappingProfile::TypedUrl);
    category.predicate = Some("slipo:category".to_string());
    category.entity_type = Some("categoryURI".to_string());

    MappingModel::from_rules(rules(vec![
        (
            "id",
            MappingRule::uri_generator(
                "uuid",
                vec!["DATA_SOURCE".to_string(), "id".to_string()],
            ),
        ),
        ("name", MappingRule::language_literal("slipo:name", "en")),
        ("name%", name_facet),
        ("phone", MappingRule::plain_literal("slipo:phone")),
        ("website", website),
        ("street", MappingRule::part("address", "address", "slipo:street")),
        ("city", MappingRule::part("address", "address", "slipo:city")),
        ("type", MappingRule::plain_literal("slipo:kind")),
        ("CATEGORY_LINK", category),
    ]))
    .unwrap()
}

#[test]
fn test_poi_transformation_is_deterministic() {
    let run = || {
        let mut engine = TripleGenerator::new(config(), Some(poi_model())).unwrap();
        let lookup = |name: &str| (name == "restaurant").then(|| CategoryRef::new("C7"));
        let uri = engine
            .transform(
                &record(&[
                    ("id", "way/7"),
                    ("name", "Plaka"),
                    ("name_el", "Πλάκα"),
                    ("phone", "210 555 0100"),
                    ("website", "www.example.com"),
                    ("street", "Adrianou"),
                    ("city", "Athens"),
                    ("type", "restaurant"),
                ]),
                Some("POLYGON((0 0, 4 0, 4 3, 0 3, 0 0))"),
                Some(&lookup),
            )
            .unwrap();
        (uri, engine.take_triples())
    };

    let (uri_a, triples_a) = run();
    let (uri_b, triples_b) = run();
    assert_eq!(uri_a, uri_b);
    assert_eq!(triples_a, triples_b);
    assert!(uri_a.starts_with("http://slipo.eu/id/poi/"));
}

#[test]
fn test_poi_thematic_triples() {
    let mut engine = TripleGenerator::new(config(), Some(poi_model())).unwrap();
    let lookup = |name: &str| (name == "restaurant").then(|| CategoryRef::new("C7"));
    let uri = engine
        .transform(
            &record(&[
                ("id", "way/7"),
                ("name", "Plaka"),
                ("name_el", "Πλάκα"),
                ("website", "www.example.com"),
                ("type", "restaurant"),
            ]),
            None,
            Some(&lookup),
        )
        .unwrap();
    let triples = engine.take_triples();

    // Exact rule: language-tagged literal with the declared tag
    let name = triples
        .iter()
        .find(|t| t.subject == uri && t.object.as_literal() == Some("Plaka"))
        .unwrap();
    assert_eq!(name.predicate, "http://slipo.eu/def#name");
    assert_eq!(name.object.language(), Some("en"));

    // Wildcard facet: sub-entity carrying the inferred language
    let facet_uri = format!("{uri}/name_el");
    assert!(triples.iter().any(|t| {
        t.subject == uri
            && t.predicate == "http://slipo.eu/def#name"
            && t.object.as_iri() == Some(facet_uri.as_str())
    }));
    let facet_value = triples
        .iter()
        .find(|t| t.subject == facet_uri && t.predicate == "http://slipo.eu/def#NameValue")
        .unwrap();
    assert_eq!(facet_value.object.as_literal(), Some("Πλάκα"));
    assert_eq!(facet_value.object.language(), Some("el"));
    assert!(triples.iter().any(|t| {
        t.subject == facet_uri
            && t.predicate == "http://slipo.eu/def#language"
            && t.object.as_literal() == Some("el")
    }));
    assert!(triples.iter().any(|t| {
        t.subject == facet_uri && t.object.as_iri() == Some("http://slipo.eu/def#Name")
    }));

    // URL repair before emission
    assert!(triples.iter().any(|t| {
        t.predicate == "http://slipo.eu/def#homepage"
            && t.object.as_iri() == Some("http://www.example.com")
    }));

    // Resolved category link
    assert!(triples.iter().any(|t| {
        t.predicate == "http://slipo.eu/def#category"
            && t.object.as_iri() == Some("http://slipo.eu/id/term/C7")
    }));

    let stats = engine.statistics();
    assert_eq!(stats.get("name"), Some(&1));
    assert_eq!(stats.get("name_el"), Some(&1));
    assert_eq!(stats.get("CATEGORY_LINK"), Some(&1));
}

#[test]
fn test_composite_group_is_materialized_once() {
    let mut engine = TripleGenerator::new(config(), Some(poi_model())).unwrap();
    let uri = engine
        .transform(
            &record(&[("id", "way/7"), ("street", "Adrianou"), ("city", "Athens")]),
            None,
            None,
        )
        .unwrap();
    let triples = engine.take_triples();
    let group_uri = format!("{uri}/address");

    let links: Vec<_> = triples
        .iter()
        .filter(|t| {
            t.subject == uri
                && t.predicate == "http://slipo.eu/def#address"
                && t.object.as_iri() == Some(group_uri.as_str())
        })
        .collect();
    assert_eq!(links.len(), 1);

    let types: Vec<_> = triples
        .iter()
        .filter(|t| {
            t.subject == group_uri && t.object.as_iri() == Some("http://slipo.eu/def#address")
        })
        .collect();
    assert_eq!(types.len(), 1);

    assert!(triples.iter().any(|t| {
        t.subject == group_uri
            && t.predicate == "http://slipo.eu/def#street"
            && t.object.as_literal() == Some("Adrianou")
    }));
    assert!(triples.iter().any(|t| {
        t.subject == group_uri
            && t.predicate == "http://slipo.eu/def#city"
            && t.object.as_literal() == Some("Athens")
    }));
}

#[test]
fn test_derived_geometric_attribute() {
    let mut area_rule = MappingRule::plain_literal("slipo:area");
    area_rule.generator_function = Some("area".to_string());
    let model = MappingModel::from_rules(rules(vec![
        ("name", MappingRule::plain_literal("slipo:name")),
        ("calc_area", area_rule),
    ]))
    .unwrap();

    let mut engine = TripleGenerator::new(config(), Some(model)).unwrap();
    engine
        .transform(
            &record(&[("name", "Plaka")]),
            Some("POLYGON((0 0, 4 0, 4 3, 0 3, 0 0))"),
            None,
        )
        .unwrap();
    let triples = engine.take_triples();

    assert!(triples.iter().any(|t| {
        t.predicate == "http://slipo.eu/def#area" && t.object.as_literal() == Some("12")
    }));
    assert_eq!(engine.statistics().get("calc_area"), Some(&1));

    // Without a geometry the attribute is never injected
    engine.clear_statistics();
    engine
        .transform(&record(&[("name", "Plaka")]), None, None)
        .unwrap();
    assert_eq!(engine.statistics().get("calc_area"), None);
}

#[test]
fn test_multi_faceted_beats_catch_all() {
    // Language left unset: inferred from the attribute suffix
    let mut facet = MappingRule::with_profile(MappingProfile::LanguageLiteral);
    facet.predicate = Some("slipo:name".to_string());
    let mut catch_all = MappingRule::with_profile(MappingProfile::Skip);
    catch_all.predicate = Some("slipo:other".to_string());

    let model = MappingModel::from_rules(rules(vec![("name%", facet), ("_", catch_all)]))
        .unwrap();
    let mut engine = TripleGenerator::new(config(), Some(model)).unwrap();
    let uri = engine
        .transform(
            &record(&[("name_fr", "Athènes"), ("surface", "paved")]),
            None,
            None,
        )
        .unwrap();
    let triples = engine.take_triples();

    // Wildcard match: one tagged literal on the feature itself
    let name = triples
        .iter()
        .find(|t| t.object.as_literal() == Some("Athènes"))
        .unwrap();
    assert_eq!(name.subject, uri);
    assert_eq!(name.object.language(), Some("fr"));

    // Unmapped attribute falls through to the catch-all key/value shape
    let node = format!("{uri}/surface");
    assert!(triples.iter().any(|t| {
        t.subject == uri
            && t.predicate == "http://slipo.eu/def#other"
            && t.object.as_iri() == Some(node.as_str())
    }));
    assert!(triples.iter().any(|t| {
        t.subject == node
            && t.predicate == "http://slipo.eu/def#key"
            && t.object.as_literal() == Some("surface")
    }));
    assert!(triples.iter().any(|t| {
        t.subject == node
            && t.predicate == "http://slipo.eu/def#value"
            && t.object.as_literal() == Some("paved")
    }));
}

#[test]
fn test_unrecognized_facet_suffix_is_skipped() {
    let mut facet = MappingRule::with_profile(MappingProfile::LanguageLiteral);
    facet.predicate = Some("slipo:name".to_string());
    let mut catch_all = MappingRule::with_profile(MappingProfile::Skip);
    catch_all.predicate = Some("slipo:other".to_string());

    let model = MappingModel::from_rules(rules(vec![("name%", facet), ("_", catch_all)]))
        .unwrap();
    let mut engine = TripleGenerator::new(config(), Some(model)).unwrap();
    engine
        .transform(&record(&[("name_intl", "Athens")]), None, None)
        .unwrap();

    // The suffix is not a language code: no triples, no count, and no
    // catch-all fallback either
    assert!(engine.triples().is_empty());
    assert_eq!(engine.statistics().get("name_intl"), None);
}

#[test]
fn test_literal_scrubbing_in_custom_mode() {
    let model = MappingModel::from_rules(rules(vec![(
        "note",
        MappingRule::plain_literal("slipo:note"),
    )]))
    .unwrap();
    let mut engine = TripleGenerator::new(config(), Some(model)).unwrap();
    engine
        .transform(&record(&[("note", "  \"open\tlate\"\n")]), None, None)
        .unwrap();
    let note = engine
        .triples()
        .iter()
        .find(|t| t.predicate == "http://slipo.eu/def#note")
        .unwrap();
    assert_eq!(note.object.as_literal(), Some("open late"));
}

#[test]
fn test_typed_literal_expands_datatype() {
    let mut rule = MappingRule::plain_literal("slipo:capacity");
    rule.profile = MappingProfile::TypedLiteral;
    rule.data_type = Some("http://www.w3.org/2001/XMLSchema#integer".to_string());
    let model = MappingModel::from_rules(rules(vec![("capacity", rule)])).unwrap();

    let mut engine = TripleGenerator::new(config(), Some(model)).unwrap();
    engine
        .transform(&record(&[("capacity", "120")]), None, None)
        .unwrap();
    let t = engine
        .triples()
        .iter()
        .find(|t| t.predicate == "http://slipo.eu/def#capacity")
        .unwrap();
    assert_eq!(t.object.as_literal(), Some("120"));
    assert!(matches!(
        &t.object,
        geordf::RdfTerm::Literal { datatype: Some(dt), .. }
            if dt == "http://www.w3.org/2001/XMLSchema#integer"
    ));
}

#[test]
fn test_resource_type_none_only_suppressed_for_language_instances() {
    let mut contact = MappingRule::with_profile(MappingProfile::Instance);
    contact.predicate = Some("slipo:contact".to_string());
    contact.entity_type = Some("contact".to_string());
    contact.resource_class = Some("Contact".to_string());
    contact.resource_type = Some("NONE".to_string());

    let mut name = MappingRule::with_profile(MappingProfile::InstanceWithLanguage);
    name.predicate = Some("slipo:name".to_string());
    name.entity_type = Some("name".to_string());
    name.resource_class = Some("Name".to_string());
    name.resource_type = Some("NONE".to_string());
    name.language = Some("en".to_string());

    let model = MappingModel::from_rules(rules(vec![("email", contact), ("name", name)])).unwrap();
    let mut engine = TripleGenerator::new(config(), Some(model)).unwrap();
    let uri = engine
        .transform(
            &record(&[("email", "info@example.org"), ("name", "Plaka")]),
            None,
            None,
        )
        .unwrap();
    let triples = engine.take_triples();

    // The plain instance keeps its declared type literal verbatim
    let contact_uri = format!("{uri}/contact");
    assert!(triples.iter().any(|t| {
        t.subject == contact_uri
            && t.predicate == "http://slipo.eu/def#ContactType"
            && t.object.as_literal() == Some("NONE")
    }));

    // The language-aware instance honors the NONE sentinel
    assert!(!triples
        .iter()
        .any(|t| t.predicate == "http://slipo.eu/def#NameType"));
}

#[test]
fn test_statistics_merge_across_partitions() {
    let records = [
        record(&[("id", "1"), ("name", "a")]),
        record(&[("id", "2"), ("name", "b"), ("phone", "555")]),
    ];

    let mut whole = TripleGenerator::new(config(), None).unwrap();
    for r in &records {
        whole.transform(r, None, None).unwrap();
    }

    let mut merged: BTreeMap<String, u64> = BTreeMap::new();
    for r in &records {
        let mut part = TripleGenerator::new(config(), None).unwrap();
        part.transform(r, None, None).unwrap();
        for (k, v) in part.statistics() {
            *merged.entry(k.clone()).or_insert(0) += v;
        }
    }

    assert_eq!(&merged, whole.statistics());
}

#[test]
fn test_unknown_category_leaves_no_link() {
    let mut engine = TripleGenerator::new(config(), Some(poi_model())).unwrap();
    let lookup = |_: &str| None::<CategoryRef>;
    engine
        .transform(
            &record(&[("id", "way/7"), ("type", "spaceport")]),
            None,
            Some(&lookup),
        )
        .unwrap();
    assert!(!engine
        .triples()
        .iter()
        .any(|t| t.predicate == "http://slipo.eu/def#category"));
}
