//! Error taxonomy for the editing core.
//!
//! None of these are fatal. Editor entry points recover from [`EditError`]
//! locally (no-op, snap-back, or clamp) and only log what happened.

use crate::element::ElementId;
use thiserror::Error;

/// Errors produced by scene and gesture operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// The id refers to an element that is not (or no longer) in the scene.
    #[error("Element not found: {0}")]
    NotFound(ElementId),
    /// A resize would collapse the element below the minimum box size.
    #[error("Degenerate geometry: {width:.1}x{height:.1} is below the {min:.1} unit minimum")]
    InvalidGeometry { width: f64, height: f64, min: f64 },
    /// A time span with a negative start or non-positive duration.
    #[error("Invalid time span: start {start}, duration {duration}")]
    InvalidTimeSpan { start: f64, duration: f64 },
    /// The rendering collaborator could not resolve an element's content.
    #[error("Asset unavailable: {0}")]
    AssetUnavailable(String),
}

/// Result type for scene and gesture operations.
pub type EditResult<T> = Result<T, EditError>;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors reported by an export collaborator.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: the scene is empty")]
    EmptyScene,
    #[error("Export failed: {0}")]
    Failed(String),
}
