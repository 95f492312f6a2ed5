//! Async load pipeline: fetch the document, wait for the image, validate.

use std::future::Future;

use crate::error::{LoadError, ValidationError};
use crate::geometry::Size;
use crate::schema::{ConfigDocument, OverlayConfig};

/// Source of configuration documents.
pub trait DocumentStore {
    fn load_config(&self, path: &str) -> impl Future<Output = Result<ConfigDocument, LoadError>> + Send;
}

/// Resolves a base image and reports its natural size once it is ready.
pub trait ImageProbe {
    /// `src` is relative to the document at `document_path`.
    fn probe(&self, document_path: &str, src: &str) -> impl Future<Output = Result<Size, LoadError>> + Send;
}

/// A document that loaded, with its image ready.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedOverlay {
    pub path: String,
    pub config: OverlayConfig,
    pub warnings: Vec<ValidationError>,
    /// Natural size of the base image
    pub image: Size,
}

/// Load one overlay document. Geometry is never computed before both the
/// document and its image are available. No retries.
pub async fn load_overlay<S, P>(store: &S, probe: &P, path: &str) -> Result<LoadedOverlay, LoadError>
where
    S: DocumentStore,
    P: ImageProbe,
{
    tracing::debug!("Loading overlay configuration {}", path);
    let doc = store.load_config(path).await?;
    let image = probe.probe(path, &doc.base_image.src).await?;

    if image.width != doc.base_image.width || image.height != doc.base_image.height {
        tracing::debug!(
            "{}: image is {}x{}, document was authored at {}x{}",
            path,
            image.width,
            image.height,
            doc.base_image.width,
            doc.base_image.height
        );
    }

    let validated = OverlayConfig::from_document(doc);
    Ok(LoadedOverlay {
        path: path.to_string(),
        config: validated.config,
        warnings: validated.warnings,
        image,
    })
}
