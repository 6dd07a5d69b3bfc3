use crate::dates::date_prefix;
use crate::schema::{PhotoRecord, ProtestRecord};
use crate::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// IIIF language map: `{"nl": ["..."]}`.
pub type LanguageMap = BTreeMap<String, Vec<String>>;

pub fn language_map(language: &str, value: impl Into<String>) -> LanguageMap {
    BTreeMap::from([(language.to_string(), vec![value.into()])])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub label: LanguageMap,
    pub value: LanguageMap,
}

type FieldAccessor<R> = fn(&R) -> String;

pub const CLASSIFICATION_LABEL: &str = "Classificatie's";
pub const CLASSIFICATION_URI_LABEL: &str = "Classificatie's (URI)";

const PROTEST_FIELDS: &[(&str, FieldAccessor<ProtestRecord>)] = &[
    ("Datum (begin)", |p| date_prefix(p.start_date.as_deref())),
    ("Datum (eind)", |p| date_prefix(p.end_date.as_deref())),
    ("Locatie's", |p| text(&p.locations)),
    (CLASSIFICATION_LABEL, |p| text(&p.classifications)),
];

const PHOTO_FIELDS: &[(&str, FieldAccessor<PhotoRecord>)] = &[
    ("Naam", |p| text(&p.name)),
    ("Beschrijving", |p| text(&p.description)),
    ("Datum (begin)", |p| date_prefix(p.start_date.as_deref())),
    ("Datum (eind)", |p| date_prefix(p.end_date.as_deref())),
    ("Fotograaf", |p| text(&p.photographer)),
    ("Archief", |p| text(&p.archive)),
    ("URL", |p| text(&p.url)),
    ("Locatie", |p| text(&p.location)),
];

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Builds single-language metadata blocks. Every recognized field yields an
/// entry, blank ones included, so all documents share the same label order.
#[derive(Debug, Clone)]
pub struct MetadataAssembler {
    language: String,
}

impl MetadataAssembler {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn entry(&self, label: &str, value: impl Into<String>) -> MetadataEntry {
        MetadataEntry {
            label: language_map(&self.language, label),
            value: language_map(&self.language, value),
        }
    }

    pub fn entries<R>(&self, record: &R, fields: &[(&str, FieldAccessor<R>)]) -> Vec<MetadataEntry> {
        fields
            .iter()
            .map(|(label, accessor)| self.entry(label, accessor(record)))
            .collect()
    }

    /// Protest metadata followed by the URIs of the classifications that
    /// matched the vocabulary.
    pub fn protest(&self, record: &ProtestRecord, vocabulary: &Vocabulary) -> Vec<MetadataEntry> {
        let mut entries = self.entries(record, PROTEST_FIELDS);
        entries.push(self.entry(
            CLASSIFICATION_URI_LABEL,
            vocabulary.joined_uris(record.classifications.as_deref()),
        ));
        entries
    }

    pub fn photo(&self, record: &PhotoRecord) -> Vec<MetadataEntry> {
        self.entries(record, PHOTO_FIELDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ConceptRow;
    use serde_json::json;

    fn labels(entries: &[MetadataEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.label["nl"][0].as_str()).collect()
    }

    fn value<'a>(entries: &'a [MetadataEntry], label: &str) -> &'a str {
        entries
            .iter()
            .find(|e| e.label["nl"][0] == label)
            .map(|e| e.value["nl"][0].as_str())
            .unwrap()
    }

    fn vocabulary() -> Vocabulary {
        let rows = vec![ConceptRow {
            pref_label: Some("Demonstratie".to_string()),
            uri: Some("https://ex/concept/1".to_string()),
        }];
        Vocabulary::from_rows(&rows, "nl")
    }

    #[test]
    fn protest_metadata_keeps_label_order() {
        let record = ProtestRecord {
            slug: "dam-1968".to_string(),
            start_date: Some("1968-03-04 00:00:00".to_string()),
            end_date: Some("1968-03-05".to_string()),
            locations: Some("Dam".to_string()),
            classifications: Some("Demonstratie, Oproer".to_string()),
            ..ProtestRecord::default()
        };
        let entries = MetadataAssembler::new("nl").protest(&record, &vocabulary());
        assert_eq!(
            labels(&entries),
            [
                "Datum (begin)",
                "Datum (eind)",
                "Locatie's",
                "Classificatie's",
                "Classificatie's (URI)"
            ]
        );
        assert_eq!(value(&entries, "Datum (begin)"), "1968-03-04");
        assert_eq!(value(&entries, CLASSIFICATION_LABEL), "Demonstratie, Oproer");
        assert_eq!(value(&entries, CLASSIFICATION_URI_LABEL), "https://ex/concept/1");
    }

    #[test]
    fn blank_fields_render_empty() {
        let record = ProtestRecord {
            slug: "leeg".to_string(),
            ..ProtestRecord::default()
        };
        let entries = MetadataAssembler::new("nl").protest(&record, &vocabulary());
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| e.value["nl"] == [""]));
    }

    #[test]
    fn photo_metadata_has_every_field() {
        let photo = PhotoRecord {
            name: Some("Demonstranten op de Dam".to_string()),
            photographer: Some("Onbekend".to_string()),
            start_date: Some("1968-03-04T10:00:00".to_string()),
            ..PhotoRecord::default()
        };
        let entries = MetadataAssembler::new("nl").photo(&photo);
        assert_eq!(
            labels(&entries),
            [
                "Naam",
                "Beschrijving",
                "Datum (begin)",
                "Datum (eind)",
                "Fotograaf",
                "Archief",
                "URL",
                "Locatie"
            ]
        );
        assert_eq!(value(&entries, "Naam"), "Demonstranten op de Dam");
        assert_eq!(value(&entries, "Datum (begin)"), "1968-03-04");
        assert_eq!(value(&entries, "Datum (eind)"), "");
        assert_eq!(value(&entries, "Archief"), "");
    }

    #[test]
    fn entry_serializes_as_iiif_key_value() {
        let entry = MetadataAssembler::new("en").entry("Name", "Dam");
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({ "label": { "en": ["Name"] }, "value": { "en": ["Dam"] } })
        );
    }
}
