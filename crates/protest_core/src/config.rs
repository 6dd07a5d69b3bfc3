use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const PRESENTATION_CONTEXT: &str = "http://iiif.io/api/presentation/3/context.json";
pub const NAVPLACE_CONTEXT: &str = "http://iiif.io/api/extension/navplace/context.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("uri_prefix must end with '/': {0}")]
    UriPrefix(String),
}

/// Settings threaded through every synthesis step. Defaults reproduce the
/// published Amsterdam in Motion 750 site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub uri_prefix: String,
    pub language: String,
    pub timezone: String,
    pub manifest_context: Vec<String>,
    pub collection: CollectionConfig,
    pub thesaurus: ThesaurusConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub file_name: String,
    pub label: String,
    pub summary: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThesaurusConfig {
    pub annotation_key: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            uri_prefix: "https://amsterdamtimemachine.github.io/amsterdam-in-motion-750/iiif/"
                .to_string(),
            language: "nl".to_string(),
            timezone: "Europe/Amsterdam".to_string(),
            manifest_context: vec![
                NAVPLACE_CONTEXT.to_string(),
                PRESENTATION_CONTEXT.to_string(),
            ],
            collection: CollectionConfig::default(),
            thesaurus: ThesaurusConfig::default(),
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            file_name: "collection.json".to_string(),
            label: "Protest - Amsterdam in Motion 750".to_string(),
            summary: "Overzicht van protestfoto's uit Amsterdam.".to_string(),
        }
    }
}

impl Default for ThesaurusConfig {
    fn default() -> Self {
        Self {
            annotation_key: "_TD".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: PipelineConfig = toml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tz()?;
        if !self.uri_prefix.ends_with('/') {
            return Err(ConfigError::UriPrefix(self.uri_prefix.clone()));
        }
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(self.timezone.clone()))
    }

    pub fn manifest_uri(&self, slug: &str) -> String {
        format!("{}{}.json", self.uri_prefix, slug)
    }

    pub fn collection_uri(&self) -> String {
        format!("{}{}", self.uri_prefix, self.collection.file_name)
    }
}
