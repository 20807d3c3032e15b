//! Editable scene elements.

mod image;
mod text;

pub use image::{ImageContent, ImagePatch, cover, fit_within};
pub use text::{SerializableColor, TextContent, TextPatch};

use crate::geometry::{Geometry, GeometryPatch};
use crate::timeline::TimeSpan;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub Uuid);

impl ElementId {
    /// Create a new random element ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Variant tag of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Image,
    Text,
}

/// Variant-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementContent {
    Image(ImageContent),
    Text(TextContent),
}

impl ElementContent {
    /// Image content from a source URI.
    pub fn image(source: impl Into<String>) -> Self {
        ElementContent::Image(ImageContent::new(source))
    }

    /// Text content with default styling.
    pub fn text(body: impl Into<String>) -> Self {
        ElementContent::Text(TextContent::new(body))
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementContent::Image(_) => ElementKind::Image,
            ElementContent::Text(_) => ElementKind::Text,
        }
    }

    /// Unscaled box size to use before the renderer has measured anything.
    pub fn initial_size(&self) -> Size {
        match self {
            ElementContent::Image(_) => ImageContent::PLACEHOLDER_SIZE,
            ElementContent::Text(text) => text.approximate_size(),
        }
    }
}

/// Partial content update. Must match the element's kind to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentPatch {
    Image(ImagePatch),
    Text(TextPatch),
}

impl ContentPatch {
    pub fn kind(&self) -> ElementKind {
        match self {
            ContentPatch::Image(_) => ElementKind::Image,
            ContentPatch::Text(_) => ElementKind::Text,
        }
    }
}

/// Fields to replace on an element. Unnamed fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    pub geometry: GeometryPatch,
    pub content: Option<ContentPatch>,
}

impl ElementPatch {
    /// Patch that replaces the whole geometry.
    pub fn geometry(geometry: Geometry) -> Self {
        Self {
            geometry: geometry.into(),
            content: None,
        }
    }

    /// Patch that only moves the element.
    pub fn position(position: Point) -> Self {
        Self {
            geometry: GeometryPatch::position(position),
            content: None,
        }
    }

    /// Patch that only edits text.
    pub fn text(patch: TextPatch) -> Self {
        Self {
            geometry: GeometryPatch::default(),
            content: Some(ContentPatch::Text(patch)),
        }
    }

    /// Patch that only swaps an image source.
    pub fn image_source(source: impl Into<String>) -> Self {
        Self {
            geometry: GeometryPatch::default(),
            content: Some(ContentPatch::Image(ImagePatch {
                source: Some(source.into()),
            })),
        }
    }
}

/// One editable visual object on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ElementId,
    /// Placement in canvas space.
    pub geometry: Geometry,
    /// Unscaled content box size.
    pub size: Size,
    /// Image source or text body.
    pub content: ElementContent,
    /// Placement on the time axis.
    pub time_span: TimeSpan,
}

impl Element {
    /// Create an element with the content's initial box size.
    pub fn new(id: ElementId, geometry: Geometry, content: ElementContent, time_span: TimeSpan) -> Self {
        Self {
            id,
            geometry,
            size: content.initial_size(),
            content,
            time_span,
        }
    }

    /// Override the unscaled box size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// Rendered box size (scale applied, sign kept).
    pub fn scaled_size(&self) -> Size {
        self.geometry.scaled_size(self.size)
    }

    /// Axis-aligned bounding box in canvas space.
    pub fn bounds(&self) -> Rect {
        self.geometry.bounds(self.size)
    }

    /// Check if a point (in canvas coordinates) hits this element.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.geometry.contains(self.size, point, tolerance)
    }

    /// Full copy under a new id, moved by `offset`.
    pub fn duplicate(&self, id: ElementId, offset: kurbo::Vec2) -> Self {
        Self {
            id,
            geometry: self.geometry.translated(offset),
            ..self.clone()
        }
    }

    /// Apply a patch, returning the updated element.
    ///
    /// A content patch whose kind does not match is ignored; geometry fields
    /// still apply.
    pub fn patched(&self, patch: &ElementPatch) -> Self {
        let mut element = self.clone();
        element.geometry = patch.geometry.apply(&self.geometry);

        match (&mut element.content, &patch.content) {
            (_, None) => {}
            (ElementContent::Image(image), Some(ContentPatch::Image(p))) => p.apply(image),
            (ElementContent::Text(text), Some(ContentPatch::Text(p))) => {
                p.apply(text);
                if p.affects_layout() {
                    element.size = text.approximate_size();
                }
            }
            (content, Some(p)) => {
                log::debug!(
                    "Ignoring {:?} content patch on {:?} element {}",
                    p.kind(),
                    content.kind(),
                    self.id
                );
            }
        }

        element
    }
}
