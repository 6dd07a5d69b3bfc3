use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const INFO_SUFFIX: &str = "/info.json";

/// What a canvas needs to know about an IIIF Image API service.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub service_id: String,
    pub service_type: String,
    pub profile: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageInfo {
    /// Full-size JPEG rendering of the service.
    pub fn full_image_url(&self) -> String {
        let size = if self.service_type == "ImageService2" {
            "full"
        } else {
            "max"
        };
        format!("{}/full/{size}/0/default.jpg", self.service_id)
    }
}

pub trait ImageInfoSource {
    fn describe(&self, info_url: &str) -> Result<ImageInfo>;
}

/// Reads nothing: the service id is the descriptor URL minus `/info.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedImageInfo;

impl ImageInfoSource for DerivedImageInfo {
    fn describe(&self, info_url: &str) -> Result<ImageInfo> {
        Ok(derive(info_url))
    }
}

pub fn derive(info_url: &str) -> ImageInfo {
    let trimmed = info_url.trim().trim_end_matches('/');
    ImageInfo {
        service_id: trimmed.strip_suffix(INFO_SUFFIX).unwrap_or(trimmed).to_string(),
        service_type: "ImageService3".to_string(),
        profile: "level1".to_string(),
        width: None,
        height: None,
    }
}

/// Previously downloaded `info.json` documents keyed by descriptor URL.
/// Unknown URLs fall back to [`derive`].
#[derive(Debug, Clone, Default)]
pub struct CachedImageInfo {
    entries: HashMap<String, ImageInfo>,
}

impl CachedImageInfo {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading image info cache {}", path.display()))?;
        let documents: Map<String, Value> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing image info cache {}", path.display()))?;
        Ok(Self::from_documents(&documents))
    }

    pub fn from_documents(documents: &Map<String, Value>) -> Self {
        let entries = documents
            .iter()
            .map(|(url, document)| (url.clone(), parse_info(url, document)))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ImageInfoSource for CachedImageInfo {
    fn describe(&self, info_url: &str) -> Result<ImageInfo> {
        Ok(self
            .entries
            .get(info_url)
            .cloned()
            .unwrap_or_else(|| derive(info_url)))
    }
}

fn parse_info(url: &str, document: &Value) -> ImageInfo {
    let fallback = derive(url);
    let text = |key: &str| document.get(key).and_then(Value::as_str).map(str::to_string);

    let is_v2 = document
        .get("@context")
        .and_then(Value::as_str)
        .is_some_and(|context| context.contains("/image/2/"));
    let service_type = text("type").unwrap_or_else(|| {
        if is_v2 {
            "ImageService2".to_string()
        } else {
            fallback.service_type.clone()
        }
    });
    let profile = match document.get("profile") {
        Some(Value::String(profile)) => short_profile(profile),
        Some(Value::Array(items)) => items
            .iter()
            .find_map(Value::as_str)
            .map(short_profile)
            .unwrap_or_else(|| fallback.profile.clone()),
        _ => fallback.profile.clone(),
    };
    let dimension = |key: &str| {
        document
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|value| u32::try_from(value).ok())
    };

    ImageInfo {
        service_id: text("id").or_else(|| text("@id")).unwrap_or(fallback.service_id),
        service_type,
        profile,
        width: dimension("width"),
        height: dimension("height"),
    }
}

// "http://iiif.io/api/image/2/level2.json" -> "level2"
fn short_profile(profile: &str) -> String {
    profile
        .rsplit('/')
        .next()
        .and_then(|last| last.strip_suffix(".json"))
        .filter(|level| level.starts_with("level"))
        .unwrap_or(profile)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derives_service_from_url() {
        let info = derive("https://images.ex/iiif/3/foto-1/info.json");
        assert_eq!(info.service_id, "https://images.ex/iiif/3/foto-1");
        assert_eq!(info.service_type, "ImageService3");
        assert_eq!(
            info.full_image_url(),
            "https://images.ex/iiif/3/foto-1/full/max/0/default.jpg"
        );
        assert_eq!(info.width, None);
    }

    #[test]
    fn url_without_info_suffix_is_kept() {
        assert_eq!(derive("https://images.ex/foto-1/").service_id, "https://images.ex/foto-1");
    }

    #[test]
    fn cache_reads_v3_and_v2_documents() {
        let documents = json!({
            "https://images.ex/v3/info.json": {
                "@context": "http://iiif.io/api/image/3/context.json",
                "id": "https://images.ex/v3",
                "type": "ImageService3",
                "profile": "level2",
                "width": 4000,
                "height": 3000
            },
            "https://images.ex/v2/info.json": {
                "@context": "http://iiif.io/api/image/2/context.json",
                "@id": "https://images.ex/v2",
                "profile": ["http://iiif.io/api/image/2/level1.json", { "formats": ["jpg"] }],
                "width": 1200,
                "height": 800
            }
        });
        let cache = CachedImageInfo::from_documents(documents.as_object().unwrap());
        assert_eq!(cache.len(), 2);

        let v3 = cache.describe("https://images.ex/v3/info.json").unwrap();
        assert_eq!(v3.service_id, "https://images.ex/v3");
        assert_eq!(v3.profile, "level2");
        assert_eq!((v3.width, v3.height), (Some(4000), Some(3000)));

        let v2 = cache.describe("https://images.ex/v2/info.json").unwrap();
        assert_eq!(v2.service_type, "ImageService2");
        assert_eq!(v2.profile, "level1");
        assert_eq!(v2.full_image_url(), "https://images.ex/v2/full/full/0/default.jpg");
    }

    #[test]
    fn cache_miss_falls_back_to_derivation() {
        let cache = CachedImageInfo::default();
        let info = cache.describe("https://images.ex/x/info.json").unwrap();
        assert_eq!(info, derive("https://images.ex/x/info.json"));
    }
}
