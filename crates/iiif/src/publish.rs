use crate::builder::ManifestBuilder;
use crate::collection::CollectionAggregator;
use crate::manifest::ManifestSynthesizer;
use anyhow::{Context, Result, bail};
use protest_core::config::PipelineConfig;
use protest_core::loader::Dataset;
use protest_core::vocabulary::Vocabulary;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct OutputPaths {
    pub root: PathBuf,
}

impl OutputPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("creating output dir {}", self.root.display()))?;
        Ok(())
    }

    /// Manifest file for `slug`, which must name a file directly under the root.
    pub fn manifest(&self, slug: &str) -> Result<PathBuf> {
        if slug.is_empty() || slug == "." || slug == ".." || slug.contains(['/', '\\']) {
            bail!("protest slug {slug:?} is not a plain file name");
        }
        Ok(self.root.join(format!("{slug}.json")))
    }

    pub fn collection(&self, config: &PipelineConfig) -> PathBuf {
        self.root.join(&config.collection.file_name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub manifests: usize,
    pub canvases: usize,
}

/// Writes one manifest per protest and the collection that lists them.
/// Files already written stay in place when a later protest fails.
pub fn publish_iiif<B: ManifestBuilder>(
    dataset: &Dataset,
    config: &PipelineConfig,
    builder: &B,
    out_dir: &Path,
) -> Result<PublishSummary> {
    let paths = OutputPaths::new(out_dir);
    paths.ensure()?;

    let vocabulary = Vocabulary::from_rows(&dataset.concepts, &config.language);
    debug!(concepts = vocabulary.len(), "vocabulary loaded");

    let synthesizer = ManifestSynthesizer::new(config, &vocabulary)?;
    let mut collection = CollectionAggregator::new(config);
    let mut summary = PublishSummary::default();

    for protest in &dataset.protests {
        let synthesized = synthesizer.synthesize(builder, protest, &dataset.photos)?;
        let json = builder.serialize(
            &synthesized.manifest,
            &config.manifest_context,
            &synthesized.description,
        )?;

        let path = paths.manifest(&synthesized.slug)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(
            manifest = %config.manifest_uri(&synthesized.slug),
            canvases = synthesized.canvases,
            "manifest written"
        );

        collection.push(builder.reference(&synthesized.manifest));
        summary.manifests += 1;
        summary.canvases += synthesized.canvases;
    }

    let path = paths.collection(config);
    let json = serde_json::to_string_pretty(&collection.finish())?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(
        collection = %path.display(),
        manifests = summary.manifests,
        "collection written"
    );

    Ok(summary)
}
