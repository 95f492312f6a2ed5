//! Render adapters for overlay geometry.
//!
//! The overlay crate produces pure geometry descriptors. Adapters in this
//! crate turn those descriptors into a concrete target: static HTML with
//! inline positioning, plus the small browser runtime that flips tiers and
//! re-resolves colors.

pub mod generator;
pub mod html;
pub mod traits;

pub use generator::generate_runtime;
pub use html::HtmlAdapter;
pub use traits::{AdapterError, ImageInfo, OverlayAdapter, RenderContext, RenderedOverlay};
