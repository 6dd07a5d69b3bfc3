use crate::schema::{ConceptRow, PhotoRecord, ProtestRecord};
use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const PROTESTS_STEM: &str = "protests";
pub const PHOTOS_STEM: &str = "photos";
pub const CONCEPTS_STEM: &str = "concepts";

const EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// The three sheets of the source workbook, in sheet row order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub protests: Vec<ProtestRecord>,
    pub photos: Vec<PhotoRecord>,
    pub concepts: Vec<ConceptRow>,
}

impl Dataset {
    /// Reads `protests`, `photos` and `concepts` row files from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        Ok(Self {
            protests: load_rows(&find_sheet(dir, PROTESTS_STEM)?)?,
            photos: load_rows(&find_sheet(dir, PHOTOS_STEM)?)?,
            concepts: load_rows(&find_sheet(dir, CONCEPTS_STEM)?)?,
        })
    }
}

fn find_sheet(dir: &Path, stem: &str) -> Result<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
        .with_context(|| format!("no {stem}.json or {stem}.yaml in {}", dir.display()))
}

/// Reads an array of row objects from a JSON or YAML file.
pub fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading rows {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let rows = match ext.as_str() {
        "json" => serde_json::from_str(&raw)
            .with_context(|| format!("parsing JSON rows {}", path.display()))?,
        "yaml" | "yml" => serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing YAML rows {}", path.display()))?,
        _ => bail!("unsupported row file {}", path.display()),
    };
    Ok(rows)
}
