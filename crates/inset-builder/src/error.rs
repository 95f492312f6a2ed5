use inset_overlay::{ScaleError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No base image loaded")]
    NoImage,

    #[error("No hotspot selected")]
    NoSelection,

    #[error("Unknown hotspot: {0}")]
    UnknownHotspot(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scale(#[from] ScaleError),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}
