use crate::builder::{ManifestBuilder, ManifestHeader};
use crate::canvas::CanvasSynthesizer;
use anyhow::Result;
use protest_core::config::PipelineConfig;
use protest_core::dates::{DateNormalizer, date_prefix};
use protest_core::metadata::MetadataAssembler;
use protest_core::schema::{EventDescription, PhotoRecord, Place, ProtestRecord, TypedLiteral};
use protest_core::vocabulary::Vocabulary;

/// A manifest ready to be serialized, with the event description that goes
/// into its `seeAlso`.
#[derive(Debug, Clone)]
pub struct SynthesizedManifest<M> {
    pub slug: String,
    pub manifest: M,
    pub description: EventDescription,
    pub canvases: usize,
}

pub struct ManifestSynthesizer<'a> {
    config: &'a PipelineConfig,
    vocabulary: &'a Vocabulary,
    dates: DateNormalizer,
    assembler: MetadataAssembler,
}

impl<'a> ManifestSynthesizer<'a> {
    pub fn new(config: &'a PipelineConfig, vocabulary: &'a Vocabulary) -> Result<Self> {
        Ok(Self {
            config,
            vocabulary,
            dates: DateNormalizer::new(config.tz()?),
            assembler: MetadataAssembler::new(&config.language),
        })
    }

    pub fn header(&self, protest: &ProtestRecord) -> ManifestHeader {
        ManifestHeader {
            id: self.config.manifest_uri(&protest.slug),
            label: protest.name.clone().unwrap_or_default(),
            summary: protest.description.clone().unwrap_or_default(),
            nav_date: self.dates.nav_date(protest.start_date.as_deref()),
            metadata: self.assembler.protest(protest, self.vocabulary),
        }
    }

    pub fn event_description(&self, protest: &ProtestRecord) -> EventDescription {
        EventDescription {
            kind: "schema:Event".to_string(),
            name: protest.name.clone().unwrap_or_default(),
            description: protest.description.clone().unwrap_or_default(),
            start_date: TypedLiteral::date(date_prefix(protest.start_date.as_deref())),
            end_date: TypedLiteral::date(date_prefix(protest.end_date.as_deref())),
            location: vec![Place::named(protest.locations.clone().unwrap_or_default())],
            additional_type: self
                .vocabulary
                .resolve_all(protest.classifications.as_deref())
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    pub fn synthesize<B: ManifestBuilder>(
        &self,
        builder: &B,
        protest: &ProtestRecord,
        photos: &[PhotoRecord],
    ) -> Result<SynthesizedManifest<B::Manifest>> {
        let mut manifest = builder.construct_manifest(self.header(protest));
        let canvases = CanvasSynthesizer::new(&self.config.uri_prefix, &self.assembler)
            .add_canvases(builder, &mut manifest, protest, photos)?;
        Ok(SynthesizedManifest {
            slug: protest.slug.clone(),
            manifest,
            description: self.event_description(protest),
            canvases,
        })
    }
}
