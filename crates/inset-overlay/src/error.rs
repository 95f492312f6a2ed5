//! Error taxonomy for loading, validating and scaling overlays.

use serde::Serialize;

/// A document or image could not be fetched, parsed or decoded.
///
/// Recovered by rendering an inline [`Diagnostic`] in place of the overlay.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to fetch configuration {path}: {message}")]
    Fetch { path: String, message: String },

    #[error("Failed to parse configuration {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Failed to load image {src}: {message}")]
    Image { src: String, message: String },
}

impl LoadError {
    /// The path or image source the failure refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::Fetch { path, .. } | Self::Parse { path, .. } => path,
            Self::Image { src, .. } => src,
        }
    }

    /// The underlying cause without the path prefix.
    pub fn cause(&self) -> &str {
        match self {
            Self::Fetch { message, .. }
            | Self::Parse { message, .. }
            | Self::Image { message, .. } => message,
        }
    }
}

/// A hotspot field is malformed. Never fatal: a default is substituted and
/// the error is logged as a warning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Hotspot {id}: invalid segment pattern {found}, expected [H] or [H,V,H]")]
    InvalidPattern { id: String, found: String },

    #[error("Hotspot {id}: missing required field `{field}`")]
    MissingField { id: String, field: &'static str },

    #[error("Hotspot {id}: width and height must be positive, got {width}x{height}")]
    NonPositiveSize { id: String, width: f64, height: f64 },

    #[error("Hotspot at index {index} has an empty id")]
    EmptyId { index: usize },

    #[error("Hotspot id `{id}` is already in use")]
    DuplicateId { id: String },
}

/// Scale factors cannot be computed. Fatal for the current render pass.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ScaleError {
    #[error("Reference image has no positive size ({width}x{height})")]
    ZeroReference { width: f64, height: f64 },

    #[error("Rendered image has no size ({width}x{height})")]
    EmptyDisplay { width: f64, height: f64 },
}

/// What a [`Diagnostic`] failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Config,
    Image,
}

/// Inline error shown where an overlay failed to load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Document path or image source that failed
    pub path: String,
    /// Human readable cause
    pub cause: String,
    /// Headline shown above path and cause
    pub title: String,
}

impl From<&LoadError> for Diagnostic {
    fn from(err: &LoadError) -> Self {
        let (kind, title) = match err {
            LoadError::Fetch { .. } | LoadError::Parse { .. } => {
                (DiagnosticKind::Config, "Failed to load overlay configuration.")
            }
            LoadError::Image { .. } => (DiagnosticKind::Image, "Failed to load image."),
        };
        Self {
            kind,
            path: err.path().to_string(),
            cause: err.cause().to_string(),
            title: title.to_string(),
        }
    }
}
