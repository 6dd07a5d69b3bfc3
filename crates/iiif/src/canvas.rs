use crate::builder::{CanvasSpec, ManifestBuilder};
use anyhow::Result;
use protest_core::metadata::MetadataAssembler;
use protest_core::schema::{PhotoRecord, ProtestRecord};
use tracing::debug;

pub fn canvas_id(uri_prefix: &str, slug: &str, position: usize) -> String {
    format!("{uri_prefix}{slug}/p1/canvas/{position}")
}

/// Photos of `protest`, in dataset order. Photos point at their protest by
/// name (`Foto.protest == Protest.naam`), so a protest without a name has
/// no photos.
pub fn photos_for<'a>(
    protest: &'a ProtestRecord,
    photos: &'a [PhotoRecord],
) -> impl Iterator<Item = &'a PhotoRecord> + 'a {
    photos.iter().filter(move |photo| {
        matches!(
            (photo.protest.as_deref(), protest.name.as_deref()),
            (Some(owner), Some(name)) if owner == name
        )
    })
}

pub struct CanvasSynthesizer<'a> {
    uri_prefix: &'a str,
    assembler: &'a MetadataAssembler,
}

impl<'a> CanvasSynthesizer<'a> {
    pub fn new(uri_prefix: &'a str, assembler: &'a MetadataAssembler) -> Self {
        Self {
            uri_prefix,
            assembler,
        }
    }

    /// One canvas per photo with an image-service descriptor. Numbering counts
    /// every photo of the protest, so photos without a descriptor leave a gap
    /// and the other canvas ids do not shift when one is added later.
    pub fn specs(&self, protest: &ProtestRecord, photos: &[PhotoRecord]) -> Vec<CanvasSpec> {
        photos_for(protest, photos)
            .enumerate()
            .filter_map(|(i, photo)| {
                let Some(info_url) = photo.image_info_url.as_deref() else {
                    debug!(slug = %protest.slug, position = i + 1, "photo without image service skipped");
                    return None;
                };
                let id = canvas_id(self.uri_prefix, &protest.slug, i + 1);
                Some(CanvasSpec {
                    anno_page_id: format!("{id}/page"),
                    anno_id: format!("{id}/anno"),
                    id,
                    label: photo.name.clone().unwrap_or_default(),
                    image_info_url: info_url.to_string(),
                    metadata: self.assembler.photo(photo),
                })
            })
            .collect()
    }

    /// Adds the canvases of [`CanvasSynthesizer::specs`] to `manifest`.
    pub fn add_canvases<B: ManifestBuilder>(
        &self,
        builder: &B,
        manifest: &mut B::Manifest,
        protest: &ProtestRecord,
        photos: &[PhotoRecord],
    ) -> Result<usize> {
        let specs = self.specs(protest, photos);
        let count = specs.len();
        for spec in specs {
            debug!(canvas = %spec.id, "adding canvas");
            builder.add_canvas(manifest, spec)?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn protest() -> ProtestRecord {
        ProtestRecord {
            slug: "dam-1968".to_string(),
            name: Some("Damprotest".to_string()),
            ..ProtestRecord::default()
        }
    }

    fn photo(owner: &str, name: &str, info: Option<&str>) -> PhotoRecord {
        PhotoRecord {
            protest: Some(owner.to_string()),
            name: Some(name.to_string()),
            image_info_url: info.map(str::to_string),
            ..PhotoRecord::default()
        }
    }

    fn ids(specs: &[CanvasSpec]) -> Vec<&str> {
        specs.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn photos_match_on_exact_protest_name() {
        let photos = vec![
            photo("Damprotest", "a", None),
            photo("damprotest", "b", None),
            photo("Damprotest ", "c", None),
            photo("Maagdenhuis", "d", None),
            photo("Damprotest", "e", None),
        ];
        let protest = protest();
        let names: Vec<_> = photos_for(&protest, &photos)
            .map(|p| p.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, ["a", "e"]);
    }

    #[test]
    fn unnamed_protest_has_no_photos() {
        let protest = ProtestRecord {
            slug: "naamloos".to_string(),
            ..ProtestRecord::default()
        };
        let photos = vec![PhotoRecord::default()];
        assert_eq!(photos_for(&protest, &photos).count(), 0);
    }

    #[test]
    fn skipped_photos_keep_their_number() {
        let assembler = MetadataAssembler::new("nl");
        let synthesizer = CanvasSynthesizer::new("https://ex/iiif/", &assembler);
        let photos = vec![
            photo("Damprotest", "een", Some("https://images.ex/1/info.json")),
            photo("Elders", "vreemd", Some("https://images.ex/x/info.json")),
            photo("Damprotest", "twee", None),
            photo("Damprotest", "drie", Some("https://images.ex/3/info.json")),
        ];
        let specs = synthesizer.specs(&protest(), &photos);
        assert_eq!(
            ids(&specs),
            [
                "https://ex/iiif/dam-1968/p1/canvas/1",
                "https://ex/iiif/dam-1968/p1/canvas/3"
            ]
        );
        assert_eq!(specs[1].label, "drie");
        assert_eq!(specs[1].anno_page_id, "https://ex/iiif/dam-1968/p1/canvas/3/page");
        assert_eq!(specs[1].anno_id, "https://ex/iiif/dam-1968/p1/canvas/3/anno");
        assert_eq!(specs[1].image_info_url, "https://images.ex/3/info.json");
        assert_eq!(specs[1].metadata.len(), 8);
    }

    #[test]
    fn canvas_ids_are_unique() {
        let assembler = MetadataAssembler::new("nl");
        let synthesizer = CanvasSynthesizer::new("https://ex/iiif/", &assembler);
        let photos: Vec<_> = (0..25)
            .map(|i| {
                let info = (i % 4 != 0).then(|| format!("https://images.ex/{i}/info.json"));
                photo("Damprotest", &format!("foto {i}"), info.as_deref())
            })
            .collect();
        let specs = synthesizer.specs(&protest(), &photos);
        let unique: HashSet<_> = specs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(unique.len(), specs.len());
        assert_eq!(specs.len(), 18);
    }
}
