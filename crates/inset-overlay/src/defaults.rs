//! Default values substituted when a document leaves a field out.

/// Highlight corner radius in pixels
pub const BORDER_RADIUS: f64 = 4.0;

/// Connector stroke thickness in reference pixels
pub const LINE_THICKNESS: f64 = 2.0;

/// Palette key given to newly created hotspots
pub const HOTSPOT_COLOR: &str = "green";

/// Palette key for connectors on hotspots without any color
pub const LINE_COLOR: &str = "cyan";

/// Fill opacity of the highlight box
pub const HIGHLIGHT_ALPHA: f64 = 0.1;

/// Horizontal distance of a new hotspot's connector
pub const NEW_HORIZONTAL_DISTANCE: f64 = -120.0;

/// Description given to newly created hotspots
pub const PLACEHOLDER_DESCRIPTION: &str =
    "Add description here with **bold** and _italic_ formatting";
