//! Hotspot overlay geometry.
//!
//! Turns a configuration document (hotspot rectangles authored against a
//! reference screenshot, each with a constrained connector path and a
//! markdown description) into display-space drawing descriptors at any
//! rendered size.

pub mod color;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod path;
pub mod render;
pub mod scale;
pub mod schema;

pub use color::{ColorSpec, Theme, ThemeContext, ThemePreference};
pub use engine::{Commit, DisplayMode, EngineState, LoadTicket, OverlayEngine, Phase, Visibility};
pub use error::{Diagnostic, DiagnosticKind, LoadError, ScaleError, ValidationError};
pub use geometry::{Point, Rect, Size};
pub use loader::{load_overlay, DocumentStore, ImageProbe, LoadedOverlay};
pub use path::{Distances, ResolvedPath, Segment, SegmentKind};
pub use render::{render_hotspot, render_overlay, HotspotGeometry};
pub use scale::Scale;
pub use schema::{ConfigDocument, Hotspot, Line, OverlayConfig};
