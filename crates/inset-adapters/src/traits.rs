//! Trait definitions for render adapters.

use inset_overlay::{Diagnostic, HotspotGeometry, Size, Theme};

/// The base image an overlay is drawn over.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    /// Image URL as written into the output
    pub src: String,
    pub alt: String,
    /// Size the image is displayed at, the space geometry was laid out in
    pub display: Size,
}

/// Context for rendering one overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub image: ImageInfo,
    /// Theme the inline colors were resolved against
    pub theme: Theme,
    /// Start in show-all mode instead of hover mode
    pub show_all: bool,
}

/// Output of an adapter.
#[derive(Debug, Clone)]
pub struct RenderedOverlay {
    pub markup: String,
    pub hotspot_count: usize,
}

/// Errors that can occur while rendering.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Duplicate hotspot id: {0}")]
    DuplicateId(String),

    #[error("Hotspot {0} has non-finite geometry")]
    NonFinite(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Trait for target-specific adapters.
pub trait OverlayAdapter: Send + Sync {
    /// Adapter identifier (e.g., "html")
    fn name(&self) -> &'static str;

    /// Render the hotspots of one image.
    fn render(
        &self,
        hotspots: &[HotspotGeometry],
        ctx: &RenderContext,
    ) -> Result<RenderedOverlay, AdapterError>;

    /// Render the inline message shown when an overlay failed to load.
    fn render_diagnostic(&self, diagnostic: &Diagnostic) -> String;
}
