use crate::schema::{ConceptDescriptor, ConceptRow, LangString};
use std::collections::HashMap;

const LABEL_SEPARATOR: &str = ", ";

/// Controlled vocabulary keyed by exact (trimmed) preferred label.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    by_label: HashMap<String, ConceptDescriptor>,
}

impl Vocabulary {
    /// Later rows with the same label replace earlier ones. Rows without a
    /// label or URI are ignored.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a ConceptRow>, language: &str) -> Self {
        let mut by_label = HashMap::new();
        for row in rows {
            let (Some(label), Some(uri)) = (row.pref_label.as_deref(), row.uri.as_deref()) else {
                continue;
            };
            let label = label.trim();
            by_label.insert(
                label.to_string(),
                ConceptDescriptor {
                    id: uri.trim().to_string(),
                    kind: "skos:Concept".to_string(),
                    pref_label: LangString {
                        language: language.to_string(),
                        value: label.to_string(),
                    },
                },
            );
        }
        Self { by_label }
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }

    pub fn resolve(&self, label: &str) -> Option<&ConceptDescriptor> {
        self.by_label.get(label.trim())
    }

    /// Matched concepts in the order their labels appear; misses are dropped.
    pub fn resolve_all(&self, labels: Option<&str>) -> Vec<&ConceptDescriptor> {
        split_labels(labels)
            .filter_map(|label| self.resolve(label))
            .collect()
    }

    /// The URIs of [`Vocabulary::resolve_all`], joined for a metadata value.
    pub fn joined_uris(&self, labels: Option<&str>) -> String {
        self.resolve_all(labels)
            .iter()
            .map(|concept| concept.id.as_str())
            .collect::<Vec<_>>()
            .join(LABEL_SEPARATOR)
    }
}

pub fn split_labels(labels: Option<&str>) -> impl Iterator<Item = &str> {
    labels
        .unwrap_or_default()
        .split(LABEL_SEPARATOR)
        .map(str::trim)
        .filter(|label| !label.is_empty())
}
