//! SKOS thesaurus publishing: compact the PoolParty export against the site
//! context, then annotate concepts with their thesaurus-mapping values.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ThesaurusError {
    #[error("thesaurus document has no @graph array")]
    MissingGraph,
    #[error("mapping document must be a JSON object")]
    MappingNotObject,
}

/// Adds `mapping[@id]` under `key` to every graph node whose `@id` is mapped.
/// Returns the number of annotated nodes. Applying it again is a no-op.
pub fn enrich(document: &mut Value, mapping: &Map<String, Value>, key: &str) -> Result<usize, ThesaurusError> {
    let graph = document
        .get_mut("@graph")
        .and_then(Value::as_array_mut)
        .ok_or(ThesaurusError::MissingGraph)?;

    let mut annotated = 0;
    for node in graph.iter_mut() {
        let Some(node) = node.as_object_mut() else {
            continue;
        };
        let Some(annotation) = node
            .get("@id")
            .and_then(Value::as_str)
            .and_then(|id| mapping.get(id))
        else {
            continue;
        };
        node.insert(key.to_string(), annotation.clone());
        annotated += 1;
    }
    Ok(annotated)
}

/// JSON-LD compaction of a thesaurus graph.
pub trait Compactor {
    fn compact(&self, document: &Value) -> Result<Value>;
}

/// IRI compaction against the term and prefix definitions of a context.
///
/// Covers what a flat SKOS export needs: property keys and `@type` values
/// become terms or CURIEs, `@id` values become CURIEs, single-element arrays
/// are unwrapped and plain `@value` objects collapse to their value. Type
/// coercion, containers and `@base` are not handled.
#[derive(Debug, Clone)]
pub struct PrefixCompactor {
    context: Value,
    terms: Vec<(String, String)>,
    prefixes: Vec<(String, String)>,
}

impl PrefixCompactor {
    /// Accepts `{"@context": {...}}` or a bare context object.
    pub fn from_context(document: &Value) -> Result<Self> {
        let context = document.get("@context").unwrap_or(document).clone();
        let definitions = context
            .as_object()
            .context("context must be a JSON object")?;

        let mut prefixes = Vec::new();
        let mut raw_terms = Vec::new();
        for (term, definition) in definitions {
            if term.starts_with('@') {
                continue;
            }
            let iri = match definition {
                Value::String(iri) => iri.as_str(),
                Value::Object(object) => match object.get("@id").and_then(Value::as_str) {
                    Some(iri) => iri,
                    None => continue,
                },
                _ => continue,
            };
            if iri.ends_with('/') || iri.ends_with('#') {
                prefixes.push((term.clone(), iri.to_string()));
            } else {
                raw_terms.push((term.clone(), iri.to_string()));
            }
        }
        // Longest namespace first so nested namespaces win.
        prefixes.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));

        let mut compactor = Self {
            context,
            terms: Vec::new(),
            prefixes,
        };
        let mut terms: Vec<(String, String)> = raw_terms
            .into_iter()
            .map(|(term, iri)| {
                let expanded = compactor.expand_curie(&iri);
                (term, expanded)
            })
            .collect();
        terms.sort();
        compactor.terms = terms;
        Ok(compactor)
    }

    fn expand_curie(&self, value: &str) -> String {
        if let Some((prefix, suffix)) = value.split_once(':') {
            if !suffix.starts_with("//") {
                if let Some((_, namespace)) = self.prefixes.iter().find(|(p, _)| p == prefix) {
                    return format!("{namespace}{suffix}");
                }
            }
        }
        value.to_string()
    }

    fn compact_iri(&self, iri: &str, vocab: bool) -> String {
        let iri = self.expand_curie(iri);
        if vocab {
            if let Some((term, _)) = self.terms.iter().find(|(_, full)| *full == iri) {
                return term.clone();
            }
        }
        for (prefix, namespace) in &self.prefixes {
            if let Some(suffix) = iri.strip_prefix(namespace.as_str()) {
                if !suffix.is_empty() {
                    return format!("{prefix}:{suffix}");
                }
            }
        }
        iri
    }

    fn compact_node(&self, node: &Value) -> Value {
        match node {
            Value::Array(items) if items.len() == 1 => self.compact_node(&items[0]),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.compact_node(v)).collect()),
            Value::Object(object) => {
                if object.len() == 1 {
                    if let Some(value) = object.get("@value") {
                        return value.clone();
                    }
                }
                let mut out = Map::new();
                for (key, value) in object {
                    let compacted = match key.as_str() {
                        "@id" => match value.as_str() {
                            Some(id) => Value::String(self.compact_iri(id, false)),
                            None => value.clone(),
                        },
                        "@type" => self.compact_types(value),
                        _ => self.compact_node(value),
                    };
                    let key = if key.starts_with('@') {
                        key.clone()
                    } else {
                        self.compact_iri(key, true)
                    };
                    out.insert(key, compacted);
                }
                Value::Object(out)
            }
            other => other.clone(),
        }
    }

    fn compact_types(&self, value: &Value) -> Value {
        match value {
            Value::String(iri) => Value::String(self.compact_iri(iri, true)),
            Value::Array(items) if items.len() == 1 => self.compact_types(&items[0]),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.compact_types(v)).collect()),
            other => other.clone(),
        }
    }
}

impl Compactor for PrefixCompactor {
    fn compact(&self, document: &Value) -> Result<Value> {
        let nodes = match document {
            Value::Array(nodes) => nodes.as_slice(),
            Value::Object(object) => object
                .get("@graph")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(std::slice::from_ref(document)),
            _ => anyhow::bail!("thesaurus must be a JSON-LD array or object"),
        };

        let graph: Vec<Value> = nodes
            .iter()
            .map(|node| match self.compact_node(node) {
                Value::Object(mut object) => {
                    object.remove("@context");
                    Value::Object(object)
                }
                other => other,
            })
            .collect();

        let mut out = Map::new();
        out.insert("@context".to_string(), self.context.clone());
        out.insert("@graph".to_string(), Value::Array(graph));
        Ok(Value::Object(out))
    }
}

/// Input and output files of one thesaurus run.
#[derive(Debug, Clone)]
pub struct ThesaurusFiles<'a> {
    pub thesaurus: &'a Path,
    pub mapping: &'a Path,
    pub context: &'a Path,
    pub output: &'a Path,
}

pub fn publish_thesaurus(files: &ThesaurusFiles<'_>, annotation_key: &str) -> Result<usize> {
    let thesaurus = read_json(files.thesaurus)?;
    let mapping = read_json(files.mapping)?;
    let context = read_json(files.context)?;

    let mapping = mapping.as_object().ok_or(ThesaurusError::MappingNotObject)?;
    let compactor = PrefixCompactor::from_context(&context)
        .with_context(|| format!("reading context {}", files.context.display()))?;
    let mut compacted = compactor.compact(&thesaurus)?;
    let annotated = enrich(&mut compacted, mapping, annotation_key)?;
    debug!(annotated, mapped = mapping.len(), "enriched thesaurus concepts");

    if let Some(parent) = files.output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(files.output, serde_json::to_string_pretty(&compacted)?)
        .with_context(|| format!("writing {}", files.output.display()))?;
    info!(output = %files.output.display(), annotated, "thesaurus written");
    Ok(annotated)
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";

    fn context() -> Value {
        json!({
            "@context": {
                "skos": SKOS,
                "dct": "http://purl.org/dc/terms/",
                "prefLabel": "skos:prefLabel",
                "Concept": { "@id": "skos:Concept" }
            }
        })
    }

    fn expanded_export() -> Value {
        json!([
            {
                "@id": "https://ex/concept/1",
                "@type": [format!("{SKOS}Concept")],
                format!("{SKOS}prefLabel"): [{ "@language": "nl", "@value": "Demonstratie" }],
                format!("{SKOS}broader"): [{ "@id": "https://ex/concept/0" }],
                format!("{SKOS}notation"): [{ "@value": "D1" }]
            },
            {
                "@id": "https://ex/concept/2",
                "@type": [format!("{SKOS}Concept")],
                format!("{SKOS}prefLabel"): [
                    { "@language": "nl", "@value": "Staking" },
                    { "@language": "en", "@value": "Strike" }
                ]
            }
        ])
    }

    #[test]
    fn compacts_keys_types_and_values() {
        let compactor = PrefixCompactor::from_context(&context()).unwrap();
        let compacted = compactor.compact(&expanded_export()).unwrap();

        assert_eq!(compacted["@context"]["skos"], SKOS);
        let first = &compacted["@graph"][0];
        assert_eq!(first["@id"], "https://ex/concept/1");
        assert_eq!(first["@type"], "Concept");
        assert_eq!(first["prefLabel"], json!({ "@language": "nl", "@value": "Demonstratie" }));
        assert_eq!(first["skos:broader"], json!({ "@id": "https://ex/concept/0" }));
        assert_eq!(first["skos:notation"], "D1");

        let second = &compacted["@graph"][1];
        assert_eq!(second["prefLabel"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn graph_object_input_is_accepted() {
        let compactor = PrefixCompactor::from_context(&context()).unwrap();
        let input = json!({ "@graph": expanded_export() });
        let compacted = compactor.compact(&input).unwrap();
        assert_eq!(compacted["@graph"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn single_node_still_gets_a_graph() {
        let compactor = PrefixCompactor::from_context(&context()).unwrap();
        let input = json!({ "@id": "https://ex/concept/1", "@type": format!("{SKOS}Concept") });
        let compacted = compactor.compact(&input).unwrap();
        assert_eq!(compacted["@graph"][0]["@type"], "Concept");
    }

    #[test]
    fn id_values_use_curies() {
        let context = json!({ "ex": "https://ex/concept/" });
        let compactor = PrefixCompactor::from_context(&context).unwrap();
        let compacted = compactor.compact(&json!([{ "@id": "https://ex/concept/7" }])).unwrap();
        assert_eq!(compacted["@graph"][0]["@id"], "ex:7");
    }

    fn mapping() -> Map<String, Value> {
        json!({
            "https://ex/concept/1": { "code": "TD-17" },
            "https://ex/unused": "x"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn enrich_annotates_only_mapped_concepts() {
        let mut document = json!({
            "@graph": [
                { "@id": "https://ex/concept/1", "prefLabel": "Demonstratie" },
                { "@id": "https://ex/concept/2", "prefLabel": "Staking" },
                { "prefLabel": "zonder id" }
            ]
        });
        let annotated = enrich(&mut document, &mapping(), "_TD").unwrap();
        assert_eq!(annotated, 1);
        assert_eq!(document["@graph"][0]["_TD"], json!({ "code": "TD-17" }));
        assert!(document["@graph"][1].get("_TD").is_none());
        assert!(document["@graph"][2].get("_TD").is_none());
    }

    #[test]
    fn enrich_is_idempotent() {
        let mut once = json!({
            "@context": { "skos": SKOS },
            "@graph": [{ "@id": "https://ex/concept/1" }, { "@id": "https://ex/concept/2" }]
        });
        enrich(&mut once, &mapping(), "_TD").unwrap();
        let mut twice = once.clone();
        enrich(&mut twice, &mapping(), "_TD").unwrap();
        assert_eq!(
            serde_json::to_string_pretty(&once).unwrap(),
            serde_json::to_string_pretty(&twice).unwrap()
        );
    }

    #[test]
    fn enrich_requires_graph() {
        let mut document = json!({ "@id": "https://ex/concept/1" });
        assert!(matches!(
            enrich(&mut document, &mapping(), "_TD"),
            Err(ThesaurusError::MissingGraph)
        ));
    }

    #[test]
    fn publish_writes_enriched_file() {
        let dir = tempfile::tempdir().unwrap();
        let thesaurus = dir.path().join("scheme.jsonld");
        let mapping_path = dir.path().join("td.json");
        let context_path = dir.path().join("context.json");
        let output = dir.path().join("thesaurus").join("thesaurus.json");
        fs::write(&thesaurus, expanded_export().to_string()).unwrap();
        fs::write(&mapping_path, Value::Object(mapping()).to_string()).unwrap();
        fs::write(&context_path, context().to_string()).unwrap();

        let files = ThesaurusFiles {
            thesaurus: &thesaurus,
            mapping: &mapping_path,
            context: &context_path,
            output: &output,
        };
        assert_eq!(publish_thesaurus(&files, "_TD").unwrap(), 1);

        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["@graph"][0]["_TD"]["code"], "TD-17");
        assert_eq!(written["@graph"][0]["prefLabel"]["@value"], "Demonstratie");
    }

    #[test]
    fn publish_rejects_array_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let thesaurus = dir.path().join("scheme.jsonld");
        let mapping_path = dir.path().join("td.json");
        let context_path = dir.path().join("context.json");
        let output = dir.path().join("thesaurus").join("thesaurus.json");
        fs::write(&thesaurus, expanded_export().to_string()).unwrap();
        fs::write(&mapping_path, json!([{ "code": "TD-17" }]).to_string()).unwrap();
        fs::write(&context_path, context().to_string()).unwrap();

        let files = ThesaurusFiles {
            thesaurus: &thesaurus,
            mapping: &mapping_path,
            context: &context_path,
            output: &output,
        };
        let err = publish_thesaurus(&files, "_TD").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ThesaurusError>(),
            Some(ThesaurusError::MappingNotObject)
        ));
        assert!(!output.exists());
    }
}
