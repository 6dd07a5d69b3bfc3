use crate::model::{Collection, ManifestRef, ResourceType};
use protest_core::config::{PRESENTATION_CONTEXT, PipelineConfig};
use protest_core::metadata::language_map;

/// Collects manifest references in processing order.
#[derive(Debug, Clone)]
pub struct CollectionAggregator {
    id: String,
    label: String,
    summary: String,
    language: String,
    items: Vec<ManifestRef>,
}

impl CollectionAggregator {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            id: config.collection_uri(),
            label: config.collection.label.clone(),
            summary: config.collection.summary.clone(),
            language: config.language.clone(),
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, reference: ManifestRef) {
        self.items.push(reference);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(self) -> Collection {
        Collection {
            context: PRESENTATION_CONTEXT.to_string(),
            id: self.id,
            kind: ResourceType::Collection,
            label: language_map(&self.language, self.label),
            summary: language_map(&self.language, self.summary),
            items: self.items,
        }
    }
}
