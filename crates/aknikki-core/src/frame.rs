//! Fixed logical output size of the canvas.

use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Aspect-ratio presets offered by the header selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectPreset {
    /// 4:5, sized for Instagram feed posts.
    #[default]
    Portrait4x5,
    /// 16:9, sized for YouTube.
    Landscape16x9,
    /// 9:16, sized for Reels and Shorts.
    Vertical9x16,
}

impl AspectPreset {
    /// Logical canvas size for this preset.
    pub fn size(self) -> Size {
        match self {
            AspectPreset::Portrait4x5 => Size::new(360.0, 450.0),
            AspectPreset::Landscape16x9 => Size::new(640.0, 360.0),
            AspectPreset::Vertical9x16 => Size::new(360.0, 640.0),
        }
    }

    /// Display label for the selector.
    pub fn label(self) -> &'static str {
        match self {
            AspectPreset::Portrait4x5 => "4:5 (Insta)",
            AspectPreset::Landscape16x9 => "16:9 (YouTube)",
            AspectPreset::Vertical9x16 => "9:16 (Reels)",
        }
    }

    /// All presets in selector order.
    pub fn all() -> &'static [AspectPreset] {
        &[
            AspectPreset::Portrait4x5,
            AspectPreset::Landscape16x9,
            AspectPreset::Vertical9x16,
        ]
    }
}

/// The canvas output frame, either a preset or a custom size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CanvasFrame {
    Preset(AspectPreset),
    Custom { width: f64, height: f64 },
}

impl Default for CanvasFrame {
    fn default() -> Self {
        CanvasFrame::Preset(AspectPreset::default())
    }
}

impl CanvasFrame {
    /// Custom frame. Non-positive or non-finite dimensions fall back to 1 unit.
    pub fn custom(width: f64, height: f64) -> Self {
        let sanitize = |v: f64| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        CanvasFrame::Custom {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    pub fn size(&self) -> Size {
        match *self {
            CanvasFrame::Preset(preset) => preset.size(),
            CanvasFrame::Custom { width, height } => Size::new(width, height),
        }
    }

    /// Frame rectangle with its origin at the canvas origin.
    pub fn rect(&self) -> Rect {
        self.size().to_rect()
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        let size = self.size();
        size.width / size.height
    }
}
