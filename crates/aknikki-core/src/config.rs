//! Editor configuration.
//!
//! Every tunable constant of the editing engine lives here. All sections use
//! `#[serde(default)]`, so a config file only has to name what it overrides.

use crate::camera::CameraConfig;
use crate::element::{SerializableColor, TextContent};
use crate::error::ConfigError;
use crate::frame::CanvasFrame;
use crate::timeline::{TimeSpan, TimelineConfig};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Where new and duplicated elements land.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Anchor for newly added elements (canvas units).
    pub default_position: Point,
    /// Offset applied to a duplicate relative to its source.
    pub duplicate_offset: Vec2,
    /// Place background images at the origin, sized to cover the frame.
    pub backgrounds_fill_frame: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            default_position: Point::new(50.0, 50.0),
            duplicate_offset: Vec2::new(20.0, 20.0),
            backgrounds_fill_frame: true,
        }
    }
}

/// Body and style of the "add text" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultTextConfig {
    pub body: String,
    pub font_size: f64,
    pub fill: SerializableColor,
}

impl Default for DefaultTextConfig {
    fn default() -> Self {
        Self {
            body: "Double-click to edit".to_string(),
            font_size: TextContent::DEFAULT_FONT_SIZE,
            fill: SerializableColor::black(),
        }
    }
}

impl DefaultTextConfig {
    /// Text content with this style and the given body.
    pub fn content(&self, body: impl Into<String>) -> TextContent {
        TextContent::new(body)
            .with_font_size(self.font_size)
            .with_fill(self.fill)
    }
}

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Output frame of new sessions.
    pub frame: CanvasFrame,
    pub placement: PlacementConfig,
    /// Smallest rendered width/height a resize may commit, in canvas units.
    pub min_box_size: f64,
    /// Time span given to new elements.
    pub default_time_span: TimeSpan,
    pub default_text: DefaultTextConfig,
    pub timeline: TimelineConfig,
    pub camera: CameraConfig,
    /// Handle hit radius in screen pixels.
    pub handle_tolerance_px: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            frame: CanvasFrame::default(),
            placement: PlacementConfig::default(),
            min_box_size: 5.0,
            default_time_span: TimeSpan::default(),
            default_text: DefaultTextConfig::default(),
            timeline: TimelineConfig::default(),
            camera: CameraConfig::default(),
            handle_tolerance_px: 12.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        }

        positive("min_box_size", self.min_box_size)?;
        positive("timeline.pixels_per_second", self.timeline.pixels_per_second)?;
        positive("timeline.min_duration_px", self.timeline.min_duration_px)?;
        positive("timeline.edge_tolerance_px", self.timeline.edge_tolerance_px)?;
        positive("camera.min_zoom", self.camera.min_zoom)?;
        positive("camera.max_zoom", self.camera.max_zoom)?;
        positive("camera.wheel_factor", self.camera.wheel_factor)?;
        positive("default_text.font_size", self.default_text.font_size)?;
        positive("handle_tolerance_px", self.handle_tolerance_px)?;

        if self.camera.max_zoom < self.camera.min_zoom {
            return Err(ConfigError::Invalid {
                field: "camera.max_zoom",
                reason: format!(
                    "{} is below camera.min_zoom {}",
                    self.camera.max_zoom, self.camera.min_zoom
                ),
            });
        }

        TimeSpan::try_new(self.default_time_span.start, self.default_time_span.duration)
            .map_err(|e| ConfigError::Invalid {
                field: "default_time_span",
                reason: e.to_string(),
            })?;

        if self.default_time_span.duration < self.timeline.min_duration() {
            return Err(ConfigError::Invalid {
                field: "default_time_span",
                reason: format!(
                    "duration {} is below the timeline minimum {}",
                    self.default_time_span.duration,
                    self.timeline.min_duration()
                ),
            });
        }

        Ok(())
    }
}
