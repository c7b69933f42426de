//! The mapping profile evaluator
//!
//! [`TripleGenerator`] turns one feature record (thematic attributes plus an
//! optional WKT geometry) into RDF triples: it mints the subject URI,
//! injects geometry-derived and classification attributes into a working
//! copy of the record, evaluates every attribute against its mapping rule,
//! and accumulates the resulting triples for the downstream sink while
//! counting transformed values per attribute.
//!
//! One feature is processed to completion before the next; the composite
//! sub-entity index and the triple buffer are feature-scoped, the mapping
//! model is immutable after construction, and statistics only grow.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, warn};

use crate::classify::ClassificationLookup;
use crate::clean;
use crate::config::{GeoVocabulary, TransformConfig};
use crate::error::Result;
use crate::functions::FunctionRegistry;
use crate::geometry::{self, GeometryKind};
use crate::mapping::{MappingModel, MappingProfile, MappingRule};
use crate::stats::StatsCollector;
use crate::triple::{Triple, TripleBuffer};
use crate::uri::UriMinter;
use crate::vocab;

/// Generates RDF triples from the spatial and thematic attributes of
/// features, one record at a time
#[derive(Debug)]
pub struct TripleGenerator {
    config: TransformConfig,
    model: Option<MappingModel>,
    registry: FunctionRegistry,
    minter: UriMinter,
    target_srid: u32,
    attr_category_uri: String,
    attr_data_source: String,
    buffer: TripleBuffer,
    stats: StatsCollector,
}

impl TripleGenerator {
    /// Create an engine with the default builtin registry
    ///
    /// The mapping model (when given) and the CRS settings are validated
    /// here; configuration and CRS errors are fatal before any feature is
    /// processed.
    pub fn new(config: TransformConfig, model: Option<MappingModel>) -> Result<Self> {
        Self::with_registry(config, model, FunctionRegistry::with_builtins())
    }

    /// Create an engine with a caller-extended function registry
    pub fn with_registry(
        config: TransformConfig,
        model: Option<MappingModel>,
        registry: FunctionRegistry,
    ) -> Result<Self> {
        let target_srid = config.crs.resolve()?;
        if let Some(model) = &model {
            model.validate(&registry)?;
        }
        let (attr_category_uri, attr_data_source) = match &model {
            Some(model) => (
                model.attr_category_uri().to_string(),
                model.attr_data_source().to_string(),
            ),
            None => ("CATEGORY_URI".to_string(), "DATA_SOURCE".to_string()),
        };
        let minter = UriMinter::new(&config);
        Ok(Self {
            config,
            model,
            registry,
            minter,
            target_srid,
            attr_category_uri,
            attr_data_source,
            buffer: TripleBuffer::new(),
            stats: StatsCollector::new(),
        })
    }

    /// Effective target EPSG code carried into WKT literals
    pub fn target_srid(&self) -> u32 {
        self.target_srid
    }

    /// Triples accumulated so far
    pub fn triples(&self) -> &[Triple] {
        self.buffer.as_slice()
    }

    /// Take ownership of the accumulated triples, leaving the buffer empty
    pub fn take_triples(&mut self) -> Vec<Triple> {
        self.buffer.take()
    }

    /// Discard the accumulated triples
    pub fn clear_triples(&mut self) {
        self.buffer.clear();
    }

    /// Per-attribute counts of transformed values
    pub fn statistics(&self) -> &BTreeMap<String, u64> {
        self.stats.snapshot()
    }

    /// Reset the statistics counters
    pub fn clear_statistics(&mut self) {
        self.stats.clear();
    }

    /// Convert one feature into RDF triples
    ///
    /// Returns the URI assigned to the feature, or `None` when minting
    /// failed and the feature was skipped. Failures past minting are
    /// absorbed and logged so one bad record never aborts a batch; the
    /// failing step contributes no triples.
    pub fn transform(
        &mut self,
        record: &HashMap<String, Option<String>>,
        wkt: Option<&str>,
        classification: Option<&dyn ClassificationLookup>,
    ) -> Option<String> {
        // Working copy; derived attributes are injected here, sorted order
        // keeps the emitted sequence deterministic
        let mut working: BTreeMap<String, String> = record
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.clone(), v.clone())))
            .collect();

        let uri = match self.mint_uri(&mut working) {
            Ok(uri) => uri,
            Err(e) => {
                warn!(error = %e, "failed to mint a URI for an input record; skipping the feature");
                return None;
            }
        };

        if let Some(wkt_text) = wkt {
            if let Err(e) = self.process_geometry(&uri, wkt_text, &mut working) {
                warn!(error = %e, "an error occurred during transformation of a geometry");
            }
        }

        let thematic = if self.model.is_some() {
            self.custom_thematic(&uri, &mut working, classification)
        } else {
            self.plain_thematic(&uri, &mut working)
        };
        if let Err(e) = thematic {
            warn!(error = %e, "an error occurred when transforming thematic attribute values");
        }

        Some(uri)
    }

    /// Transform a classification term into its hierarchy triples
    ///
    /// Always emits the classification-source link, the `Term` type triple
    /// and the name literal; the parent link only when a parent is given.
    pub fn emit_category(&mut self, id: &str, name: &str, parent: Option<&str>) {
        let encoded = clean::replace_whitespace(&clean::encode_fragment(id));
        let uri = format!("{}{}", self.config.feature_class_ns, encoded);
        let scheme = format!(
            "{}{}",
            self.config.classification_ns, self.config.feature_source
        );

        emit_resource(
            &self.config,
            &mut self.buffer,
            &uri,
            &format!("{}termClassification", self.config.ontology_ns),
            &scheme,
        );
        emit_resource(
            &self.config,
            &mut self.buffer,
            &uri,
            vocab::rdf::TYPE,
            &format!("{}Term", self.config.ontology_ns),
        );
        emit_plain(
            &self.config,
            &mut self.buffer,
            &uri,
            &format!("{}value", self.config.ontology_ns),
            name,
        );
        if let Some(parent) = parent {
            let parent_uri = format!(
                "{}{}",
                self.config.feature_class_ns,
                clean::replace_whitespace(&clean::encode_fragment(parent))
            );
            emit_resource(
                &self.config,
                &mut self.buffer,
                &uri,
                &format!("{}parent", self.config.ontology_ns),
                &parent_uri,
            );
        }
    }

    /// Assign a subject URI to the feature
    fn mint_uri(&self, working: &mut BTreeMap<String, String>) -> Result<String> {
        match &self.model {
            Some(model) => {
                if let Some(rule) = model.find(model.attr_uri()) {
                    if let Some(function) = rule.generator_function.as_deref() {
                        let argv = self.resolve_args(&rule.function_args, working);
                        return self
                            .minter
                            .mint_with_function(&self.registry, function, &argv);
                    }
                }
                Ok(self.minter.mint_random())
            }
            None => {
                let key_value = working
                    .get(&self.config.attr_key)
                    .cloned()
                    .unwrap_or_default();
                Ok(self.minter.mint_seeded(&key_value))
            }
        }
    }

    /// Resolve attribute names into positional argument values
    ///
    /// The datasource attribute is always available to generator functions;
    /// missing attributes resolve to the empty string.
    fn resolve_args(
        &self,
        args: &[String],
        working: &mut BTreeMap<String, String>,
    ) -> Vec<String> {
        working.insert(
            self.attr_data_source.clone(),
            self.config.feature_source.clone(),
        );
        args.iter()
            .map(|arg| working.get(arg).cloned().unwrap_or_default())
            .collect()
    }

    /// Geometry step: derived-attribute injection and geometry triples
    fn process_geometry(
        &mut self,
        uri: &str,
        wkt_text: &str,
        working: &mut BTreeMap<String, String>,
    ) -> Result<()> {
        let kind = GeometryKind::detect(wkt_text);

        if self.model.is_some() {
            self.inject_geometric_attrs(wkt_text, kind.as_ref(), working)?;
        }

        match self.config.geo_vocab {
            GeoVocabulary::GeoSparql => self.emit_wkt_geometry(uri, wkt_text, kind.as_ref()),
            GeoVocabulary::Wgs84Pos => self.emit_wgs84_point(uri, wkt_text)?,
            GeoVocabulary::Virtuoso => self.emit_virtuoso_point(uri, wkt_text),
        }

        // Features are typed as GeoSPARQL features regardless of the
        // geometry vocabulary in use
        emit_resource(
            &self.config,
            &mut self.buffer,
            uri,
            vocab::rdf::TYPE,
            vocab::geo::FEATURE,
        );
        Ok(())
    }

    /// Compute declared geometric measurements and inject them as ordinary
    /// attributes, ahead of thematic processing
    fn inject_geometric_attrs(
        &self,
        wkt_text: &str,
        kind: Option<&GeometryKind>,
        working: &mut BTreeMap<String, String>,
    ) -> Result<()> {
        let Some(model) = &self.model else {
            return Ok(());
        };
        let geo_args = vec![wkt_text.to_string(), self.target_srid.to_string()];

        if let Some(kind) = kind {
            if kind.is_areal() {
                if let Some(key) = model.extra_geometric_attr("area") {
                    let value = self.registry.invoke("area", &geo_args)?;
                    working.insert(key.to_string(), value);
                }
                if let Some(key) = model.extra_geometric_attr("length") {
                    let value = self.registry.invoke("length", &geo_args)?;
                    working.insert(key.to_string(), value);
                }
            } else if kind.is_linear() {
                if let Some(key) = model.extra_geometric_attr("length") {
                    let value = self.registry.invoke("length", &geo_args)?;
                    working.insert(key.to_string(), value);
                }
            }
        }

        if let Some(key) = model.extra_geometric_attr("longitude") {
            let value = self.registry.invoke("longitude", &geo_args)?;
            working.insert(key.to_string(), value);
        }
        if let Some(key) = model.extra_geometric_attr("latitude") {
            let value = self.registry.invoke("latitude", &geo_args)?;
            working.insert(key.to_string(), value);
        }
        Ok(())
    }

    /// GeoSPARQL emission: geometry sub-resource, kind type triple, and a
    /// CRS-prefixed WKT literal
    fn emit_wkt_geometry(&mut self, uri: &str, wkt_text: &str, kind: Option<&GeometryKind>) {
        let geom_uri = format!("{uri}{}", vocab::GEO_URI_SUFFIX);
        emit_resource(
            &self.config,
            &mut self.buffer,
            uri,
            vocab::geo::HAS_GEOMETRY,
            &geom_uri,
        );

        let kind_name = kind.map_or("Geometry", GeometryKind::keyword);
        emit_resource(
            &self.config,
            &mut self.buffer,
            &geom_uri,
            vocab::rdf::TYPE,
            &format!("{}{}", vocab::sf::NS, kind_name),
        );

        let literal = format!(
            "<{}{}> {}",
            vocab::EPSG_CRS_BASE,
            self.target_srid,
            wkt_text
        );
        self.buffer
            .push_typed(&geom_uri, vocab::geo::AS_WKT, literal, vocab::geo::WKT_LITERAL);
    }

    /// Legacy WGS84 Geoposition emission: lon/lat typed literals
    fn emit_wgs84_point(&mut self, uri: &str, wkt_text: &str) -> Result<()> {
        let geom = geometry::parse_wkt(wkt_text)?;
        let (lon, lat) = geometry::centroid(&geom)?;
        self.buffer.push_typed(
            uri,
            vocab::wgs84_pos::LONG,
            lon.to_string(),
            vocab::xsd::FLOAT,
        );
        self.buffer.push_typed(
            uri,
            vocab::wgs84_pos::LAT,
            lat.to_string(),
            vocab::xsd::FLOAT,
        );
        Ok(())
    }

    /// Legacy Virtuoso emission: one typed WKT literal
    fn emit_virtuoso_point(&mut self, uri: &str, wkt_text: &str) {
        self.buffer.push_typed(
            uri,
            vocab::wgs84_pos::GEOMETRY,
            wkt_text,
            vocab::virtrdf::GEOMETRY,
        );
    }

    /// Thematic evaluation against the mapping model
    fn custom_thematic(
        &mut self,
        uri: &str,
        working: &mut BTreeMap<String, String>,
        classification: Option<&dyn ClassificationLookup>,
    ) -> Result<()> {
        // Resolve the category attribute into a category URI; misses are
        // silent, the feature simply carries no category triple
        if let Some(classification) = classification {
            let category = working.get(&self.config.attr_category).cloned();
            if let Some(name) = category {
                match classification.resolve(&name) {
                    Some(term) => {
                        working.insert(
                            self.attr_category_uri.clone(),
                            format!("{}{}", self.config.feature_class_ns, term.id),
                        );
                    }
                    None => {
                        debug!(category = %name, "category not found in the classification scheme");
                    }
                }
            }
        }

        // Generate values for computed attributes
        let extra: Vec<String> = match &self.model {
            Some(model) => model.extra_thematic_attrs().map(str::to_string).collect(),
            None => Vec::new(),
        };
        for key in extra {
            let Some((function, args)) = self.model.as_ref().and_then(|m| {
                m.find(&key).and_then(|rule| {
                    rule.generator_function
                        .clone()
                        .map(|f| (f, rule.function_args.clone()))
                })
            }) else {
                continue;
            };
            let argv = self.resolve_args(&args, working);
            let value = self.registry.invoke(&function, &argv)?;
            working.insert(key, value);
        }

        // Evaluate each attribute against its rule; composite sub-entities
        // are materialized at most once per feature
        let Self {
            config,
            model,
            registry,
            buffer,
            stats,
            ..
        } = self;
        let Some(model) = model.as_ref() else {
            return Ok(());
        };
        let mut materialized: HashSet<String> = HashSet::new();

        for (key, raw) in working.iter() {
            if *key == config.attr_geometry {
                continue;
            }
            if clean::is_empty_value(Some(raw)) {
                continue;
            }
            let value = clean::scrub_literal(raw);

            if let Some(rule) = model.find(key) {
                stats.increment(key);
                let entity_type = rule.entity_type.clone().unwrap_or_default();
                evaluate_rule(
                    config,
                    buffer,
                    uri,
                    &value,
                    rule,
                    rule.language.as_deref(),
                    &entity_type,
                    &mut materialized,
                );
            } else if let Some((wildcard_key, rule)) = model
                .multi_faceted_key(key)
                .and_then(|wk| model.find(wk).map(|rule| (wk, rule)))
            {
                // Multi-faceted attribute: the language tag is inferred from
                // the suffix after the wildcard base
                let base_len = wildcard_key.len() - 1;
                let lang_fn = rule.language.as_deref().unwrap_or("lang_suffix");
                let lang = registry.invoke(lang_fn, &[key.clone(), base_len.to_string()])?;
                if lang.is_empty() {
                    continue;
                }
                stats.increment(key);
                // Sub-entity URIs carry the language so facets stay distinct
                let entity_type =
                    format!("{}_{}", rule.entity_type.as_deref().unwrap_or_default(), lang);
                evaluate_rule(
                    config,
                    buffer,
                    uri,
                    &value,
                    rule,
                    Some(&lang),
                    &entity_type,
                    &mut materialized,
                );
            } else if let Some(rule) = model.catch_all() {
                // Generic key/value emission for attributes the mapping does
                // not know
                let node = format!("{uri}/{key}");
                if let Some(predicate) = rule.predicate.as_deref() {
                    emit_resource(config, buffer, uri, predicate, &node);
                }
                emit_plain(
                    config,
                    buffer,
                    &node,
                    &format!("{}key", config.ontology_ns),
                    key,
                );
                emit_plain(
                    config,
                    buffer,
                    &node,
                    &format!("{}value", config.ontology_ns),
                    &value,
                );
                stats.increment(key);
            }
        }
        Ok(())
    }

    /// Trivial fallback when no mapping model is configured: one plain
    /// literal per attribute, keyed under the ontology namespace
    fn plain_thematic(
        &mut self,
        uri: &str,
        working: &mut BTreeMap<String, String>,
    ) -> Result<()> {
        working.insert(
            self.attr_data_source.clone(),
            self.config.feature_source.clone(),
        );
        for (key, value) in working.iter() {
            if *key == self.config.attr_geometry {
                continue;
            }
            if clean::is_empty_value(Some(value)) {
                continue;
            }
            let predicate = clean::replace_whitespace(&format!(
                "{}{}",
                self.config.ontology_ns,
                clean::encode_fragment(key)
            ));
            self.buffer.push_plain(uri, predicate, value);
            self.stats.increment(key);
        }
        Ok(())
    }
}

/// Append a resource triple, expanding a prefixed predicate
fn emit_resource(
    config: &TransformConfig,
    buffer: &mut TripleBuffer,
    subject: &str,
    predicate: &str,
    object: &str,
) {
    buffer.push_resource(subject, config.expand_namespace(predicate), object);
}

/// Append a plain-literal triple, expanding a prefixed predicate
fn emit_plain(
    config: &TransformConfig,
    buffer: &mut TripleBuffer,
    subject: &str,
    predicate: &str,
    value: &str,
) {
    buffer.push_plain(subject, config.expand_namespace(predicate), value);
}

/// Append a language-tagged triple, expanding a prefixed predicate
fn emit_lang(
    config: &TransformConfig,
    buffer: &mut TripleBuffer,
    subject: &str,
    predicate: &str,
    value: &str,
    lang: &str,
) {
    buffer.push_lang(subject, config.expand_namespace(predicate), value, lang);
}

/// Emit the triples for one attribute value according to its rule
#[allow(clippy::too_many_arguments)]
fn evaluate_rule(
    config: &TransformConfig,
    buffer: &mut TripleBuffer,
    uri: &str,
    value: &str,
    rule: &MappingRule,
    lang: Option<&str>,
    entity_type: &str,
    materialized: &mut HashSet<String>,
) {
    let predicate = rule.predicate.as_deref().unwrap_or_default();
    let class = rule.resource_class.as_deref().unwrap_or_default();

    match rule.profile {
        MappingProfile::InstanceWithLanguage => {
            let entity_uri = format!("{uri}/{entity_type}");
            emit_resource(config, buffer, uri, predicate, &entity_uri);

            let value_predicate = format!("{}{}Value", config.ontology_ns, class);
            match lang.filter(|l| clean::is_valid_iso_language(l)) {
                Some(lang) => {
                    emit_lang(config, buffer, &entity_uri, &value_predicate, value, lang);
                    emit_plain(
                        config,
                        buffer,
                        &entity_uri,
                        &format!("{}language", config.ontology_ns),
                        lang,
                    );
                }
                // Not actually a language code, treat the value as a plain
                // literal
                None => emit_plain(config, buffer, &entity_uri, &value_predicate, value),
            }

            emit_resource_type(config, buffer, &entity_uri, class, rule);
            emit_resource(
                config,
                buffer,
                &entity_uri,
                vocab::rdf::TYPE,
                &format!("{}{}", config.ontology_ns, class),
            );
        }
        MappingProfile::Instance => {
            let entity_uri = format!("{uri}/{entity_type}");
            emit_resource(config, buffer, uri, predicate, &entity_uri);
            emit_plain(
                config,
                buffer,
                &entity_uri,
                &format!("{}{}Value", config.ontology_ns, class),
                value,
            );
            // Plain instances emit the declared type literal as-is; the
            // NONE sentinel only applies to the language-aware profile
            if let Some(resource_type) = rule.resource_type.as_deref() {
                emit_plain(
                    config,
                    buffer,
                    &entity_uri,
                    &format!("{}{}Type", config.ontology_ns, class),
                    resource_type,
                );
            }
            emit_resource(
                config,
                buffer,
                &entity_uri,
                vocab::rdf::TYPE,
                &format!("{}{}", config.ontology_ns, class),
            );
        }
        MappingProfile::PartWithLanguage | MappingProfile::Part => {
            let Some(group) = rule.part_of.as_deref() else {
                return;
            };
            let group_uri = format!("{uri}/{group}");
            if materialized.insert(group.to_string()) {
                emit_resource(
                    config,
                    buffer,
                    uri,
                    &format!("{}{}", config.ontology_ns, entity_type),
                    &group_uri,
                );
                emit_resource(
                    config,
                    buffer,
                    &group_uri,
                    vocab::rdf::TYPE,
                    &format!("{}{}", config.ontology_ns, group),
                );
            }
            if rule.profile == MappingProfile::PartWithLanguage {
                let lang = lang.unwrap_or_else(|| config.default_language());
                emit_lang(config, buffer, &group_uri, predicate, value, lang);
            } else {
                emit_plain(config, buffer, &group_uri, predicate, value);
            }
        }
        MappingProfile::TypedUrl => {
            emit_resource(config, buffer, uri, predicate, &clean::cleanup_url(value));
        }
        MappingProfile::TypedLiteral => {
            let datatype = rule.data_type.as_deref().unwrap_or(vocab::xsd::STRING);
            buffer.push_typed(
                uri,
                config.expand_namespace(predicate),
                value,
                config.expand_namespace(datatype),
            );
        }
        MappingProfile::LanguageLiteral => {
            let lang = lang.unwrap_or_else(|| config.default_language());
            emit_lang(config, buffer, uri, predicate, value, lang);
        }
        MappingProfile::PlainLiteral => {
            emit_plain(config, buffer, uri, predicate, value);
        }
        MappingProfile::Skip => {}
    }
}

/// Resource-type literal for the language-aware instance profile,
/// suppressed by the reserved value `NONE`
fn emit_resource_type(
    config: &TransformConfig,
    buffer: &mut TripleBuffer,
    entity_uri: &str,
    class: &str,
    rule: &MappingRule,
) {
    if let Some(resource_type) = rule.resource_type.as_deref() {
        if !resource_type.trim().eq_ignore_ascii_case("NONE") {
            emit_plain(
                config,
                buffer,
                entity_uri,
                &format!("{}{}Type", config.ontology_ns, class),
                resource_type,
            );
        }
    }
}
