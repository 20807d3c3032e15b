//! Text element content.

use kurbo::Size;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A text body with its font size and fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// The text content.
    pub body: String,
    /// Font size in canvas units.
    pub font_size: f64,
    /// Fill color.
    pub fill: SerializableColor,
}

impl TextContent {
    /// Default font size for new text.
    pub const DEFAULT_FONT_SIZE: f64 = 32.0;

    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            fill: SerializableColor::black(),
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the fill color.
    pub fn with_fill(mut self, fill: impl Into<SerializableColor>) -> Self {
        self.fill = fill.into();
        self
    }

    /// The fill as a peniko color, for renderers.
    pub fn fill_color(&self) -> Color {
        self.fill.into()
    }

    /// Approximate layout size based on character count and font size.
    ///
    /// Used until the renderer measures the laid-out text.
    pub fn approximate_size(&self) -> Size {
        let widest = self
            .body
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let mut lines = self.body.lines().count().max(1);
        if self.body.ends_with('\n') {
            lines += 1;
        }
        // Average glyph advance is roughly 0.55em for sans-serif faces
        let width = (widest as f64 * self.font_size * 0.55).max(20.0);
        // Line height is typically 1.2 * font_size
        let height = lines as f64 * self.font_size * 1.2;
        Size::new(width, height)
    }
}

/// Partial update of a text body or its style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextPatch {
    pub body: Option<String>,
    pub font_size: Option<f64>,
    pub fill: Option<SerializableColor>,
}

impl TextPatch {
    pub fn apply(&self, content: &mut TextContent) {
        if let Some(body) = &self.body {
            content.body = body.clone();
        }
        if let Some(font_size) = self.font_size {
            // Font sizes below one unit are unreadable and unselectable
            content.font_size = font_size.max(1.0);
        }
        if let Some(fill) = self.fill {
            content.fill = fill;
        }
    }

    /// Whether applying this patch changes the text layout.
    pub fn affects_layout(&self) -> bool {
        self.body.is_some() || self.font_size.is_some()
    }
}
