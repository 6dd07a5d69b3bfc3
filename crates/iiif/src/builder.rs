use crate::image_service::ImageInfoSource;
use crate::model::{
    Annotation, AnnotationPage, Canvas, ImageBody, ImageService, Manifest, ManifestDocument,
    ManifestRef, ResourceType,
};
use anyhow::Result;
use protest_core::metadata::{MetadataEntry, language_map};
use protest_core::schema::EventDescription;

/// Everything a manifest carries apart from its canvases.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestHeader {
    pub id: String,
    pub label: String,
    pub summary: String,
    pub nav_date: Option<String>,
    pub metadata: Vec<MetadataEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSpec {
    pub id: String,
    pub anno_page_id: String,
    pub anno_id: String,
    pub label: String,
    pub image_info_url: String,
    pub metadata: Vec<MetadataEntry>,
}

/// The manifest object model as seen by the synthesis code.
pub trait ManifestBuilder {
    type Manifest;

    fn construct_manifest(&self, header: ManifestHeader) -> Self::Manifest;

    fn add_canvas(&self, manifest: &mut Self::Manifest, canvas: CanvasSpec) -> Result<()>;

    /// Collection entry pointing at `manifest`.
    fn reference(&self, manifest: &Self::Manifest) -> ManifestRef;

    fn serialize(
        &self,
        manifest: &Self::Manifest,
        context: &[String],
        see_also: &EventDescription,
    ) -> Result<String>;
}

/// Builds IIIF Presentation 3 resources, asking `images` for service details.
#[derive(Debug, Clone)]
pub struct Presentation3Builder<S> {
    language: String,
    images: S,
}

impl<S: ImageInfoSource> Presentation3Builder<S> {
    pub fn new(language: impl Into<String>, images: S) -> Self {
        Self {
            language: language.into(),
            images,
        }
    }
}

impl<S: ImageInfoSource> ManifestBuilder for Presentation3Builder<S> {
    type Manifest = Manifest;

    fn construct_manifest(&self, header: ManifestHeader) -> Manifest {
        Manifest {
            id: header.id,
            kind: ResourceType::Manifest,
            label: language_map(&self.language, header.label),
            summary: language_map(&self.language, header.summary),
            nav_date: header.nav_date,
            metadata: header.metadata,
            items: Vec::new(),
        }
    }

    fn add_canvas(&self, manifest: &mut Manifest, canvas: CanvasSpec) -> Result<()> {
        let info = self.images.describe(&canvas.image_info_url)?;
        let body = ImageBody {
            id: info.full_image_url(),
            kind: ResourceType::Image,
            format: "image/jpeg".to_string(),
            height: info.height,
            width: info.width,
            service: vec![ImageService {
                id: info.service_id.clone(),
                kind: info.service_type.clone(),
                profile: info.profile.clone(),
            }],
        };
        manifest.items.push(Canvas {
            label: language_map(&self.language, canvas.label),
            height: info.height,
            width: info.width,
            metadata: canvas.metadata,
            items: vec![AnnotationPage {
                id: canvas.anno_page_id,
                kind: ResourceType::AnnotationPage,
                items: vec![Annotation {
                    id: canvas.anno_id,
                    kind: ResourceType::Annotation,
                    motivation: "painting".to_string(),
                    body,
                    target: canvas.id.clone(),
                }],
            }],
            id: canvas.id,
            kind: ResourceType::Canvas,
        });
        Ok(())
    }

    fn reference(&self, manifest: &Manifest) -> ManifestRef {
        ManifestRef {
            id: manifest.id.clone(),
            kind: ResourceType::Manifest,
            label: manifest.label.clone(),
            nav_date: manifest.nav_date.clone(),
        }
    }

    fn serialize(
        &self,
        manifest: &Manifest,
        context: &[String],
        see_also: &EventDescription,
    ) -> Result<String> {
        let document = ManifestDocument {
            context,
            manifest,
            see_also: [see_also],
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}
