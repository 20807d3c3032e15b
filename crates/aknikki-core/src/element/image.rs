//! Image element content.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// An image referenced by URI. The pixels belong to the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    /// Source reference (URL or data URI).
    pub source: String,
}

impl ImageContent {
    /// Box size used until the renderer reports the decoded size.
    pub const PLACEHOLDER_SIZE: Size = Size::new(200.0, 200.0);

    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Partial update of an image's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePatch {
    pub source: Option<String>,
}

impl ImagePatch {
    pub fn apply(&self, content: &mut ImageContent) {
        if let Some(source) = &self.source {
            content.source = source.clone();
        }
    }
}

/// Scale `natural` to fit within `max` while preserving aspect ratio.
///
/// Sizes that already fit are returned unchanged; images are never upscaled.
pub fn fit_within(natural: Size, max: Size) -> Size {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return natural;
    }
    if natural.width <= max.width && natural.height <= max.height {
        return natural;
    }

    let aspect = natural.width / natural.height;
    let target_aspect = max.width / max.height;

    if aspect > target_aspect {
        // Wider than the target - fit to width
        Size::new(max.width, max.width / aspect)
    } else {
        Size::new(max.height * aspect, max.height)
    }
}

/// Scale `natural` so it covers `target` entirely while preserving aspect ratio.
pub fn cover(natural: Size, target: Size) -> Size {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return target;
    }
    let factor = (target.width / natural.width).max(target.height / natural.height);
    Size::new(natural.width * factor, natural.height * factor)
}
