//! IIIF Presentation API 3 resources. Field order follows the published JSON examples.

use protest_core::metadata::{LanguageMap, MetadataEntry};
use protest_core::schema::EventDescription;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceType {
    Collection,
    Manifest,
    Canvas,
    AnnotationPage,
    Annotation,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub label: LanguageMap,
    pub summary: LanguageMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_date: Option<String>,
    pub metadata: Vec<MetadataEntry>,
    pub items: Vec<Canvas>,
}

/// A manifest as written to disk: linked-data contexts in front, the event
/// description behind.
#[derive(Debug, Serialize)]
pub struct ManifestDocument<'a> {
    #[serde(rename = "@context")]
    pub context: &'a [String],
    #[serde(flatten)]
    pub manifest: &'a Manifest,
    #[serde(rename = "seeAlso")]
    pub see_also: [&'a EventDescription; 1],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Canvas {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub label: LanguageMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    pub metadata: Vec<MetadataEntry>,
    pub items: Vec<AnnotationPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationPage {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub items: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub motivation: String,
    pub body: ImageBody,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBody {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    pub service: Vec<ImageService>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageService {
    pub id: String,
    pub kind: String,
    pub profile: String,
}

// Image API 2 services keep their JSON-LD keywords inside Presentation 3.
impl Serialize for ImageService {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (id_key, type_key) = if self.kind == "ImageService2" {
            ("@id", "@type")
        } else {
            ("id", "type")
        };
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(id_key, &self.id)?;
        map.serialize_entry(type_key, &self.kind)?;
        map.serialize_entry("profile", &self.profile)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    #[serde(rename = "@context")]
    pub context: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub label: LanguageMap,
    pub summary: LanguageMap,
    pub items: Vec<ManifestRef>,
}

/// Manifest entry of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub label: LanguageMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_date: Option<String>,
}
