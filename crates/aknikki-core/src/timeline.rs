//! Timeline model: per-element time spans, bar layout, and drag editing.
//!
//! Bars live in timeline-track pixel space where `x = seconds * pixels_per_second`.
//! Rows are listed front-to-back, so the topmost canvas layer is the top row.

use crate::element::{ElementContent, ElementId, ElementKind};
use crate::error::{EditError, EditResult};
use crate::scene::Scene;
use serde::{Deserialize, Serialize};

/// Placement of an element on the time axis, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: f64,
    pub duration: f64,
}

impl Default for TimeSpan {
    fn default() -> Self {
        Self {
            start: 0.0,
            duration: 5.0,
        }
    }
}

impl TimeSpan {
    /// Validate a span without adjusting it.
    pub fn try_new(start: f64, duration: f64) -> EditResult<Self> {
        if start.is_finite() && duration.is_finite() && start >= 0.0 && duration > 0.0 {
            Ok(Self { start, duration })
        } else {
            Err(EditError::InvalidTimeSpan { start, duration })
        }
    }

    /// Build a span, clamping `start` to zero and `duration` to `min_duration`.
    pub fn clamped(start: f64, duration: f64, min_duration: f64) -> Self {
        let start = if start.is_finite() { start.max(0.0) } else { 0.0 };
        let duration = if duration.is_finite() {
            duration.max(min_duration)
        } else {
            min_duration
        };
        Self { start, duration }
    }

    /// End time in seconds.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Whether `time` falls within `[start, end)`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end()
    }
}

/// Pixel scale of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Horizontal pixels per second of timeline.
    pub pixels_per_second: f64,
    /// Narrowest a bar may be dragged, in pixels.
    pub min_duration_px: f64,
    /// Grab distance around a bar's trailing edge, in pixels.
    pub edge_tolerance_px: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            pixels_per_second: 30.0,
            min_duration_px: 30.0,
            edge_tolerance_px: 6.0,
        }
    }
}

impl TimelineConfig {
    /// Minimum duration in seconds.
    pub fn min_duration(&self) -> f64 {
        self.min_duration_px / self.pixels_per_second
    }

    pub fn seconds_to_px(&self, seconds: f64) -> f64 {
        seconds * self.pixels_per_second
    }

    pub fn px_to_seconds(&self, px: f64) -> f64 {
        px / self.pixels_per_second
    }

    /// Bar geometry for a span.
    pub fn bar(&self, span: TimeSpan) -> TimelineBar {
        TimelineBar {
            left: self.seconds_to_px(span.start),
            width: self.seconds_to_px(span.duration),
        }
    }
}

/// Horizontal placement of a timeline bar, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineBar {
    pub left: f64,
    pub width: f64,
}

impl TimelineBar {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Whether `x` is within `tolerance` pixels of the trailing edge.
    pub fn hits_trailing_edge(&self, x: f64, tolerance: f64) -> bool {
        (x - self.right()).abs() <= tolerance
    }

    /// Whether `x` is on the bar body.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.left && x <= self.right()
    }
}

/// One row of the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRow {
    pub id: ElementId,
    pub kind: ElementKind,
    pub label: String,
    pub bar: TimelineBar,
    pub selected: bool,
}

/// Build timeline rows for a scene, topmost layer first.
pub fn rows(scene: &Scene, config: &TimelineConfig, selected: Option<ElementId>) -> Vec<TimelineRow> {
    scene
        .iter()
        .rev()
        .map(|element| TimelineRow {
            id: element.id(),
            kind: element.kind(),
            label: row_label(&element.content),
            bar: config.bar(element.time_span),
            selected: selected == Some(element.id()),
        })
        .collect()
}

fn row_label(content: &ElementContent) -> String {
    match content {
        ElementContent::Image(image) => image
            .source
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("Image")
            .to_string(),
        ElementContent::Text(text) => {
            let first = text.body.lines().next().unwrap_or("").trim();
            if first.is_empty() {
                "Text".to_string()
            } else {
                first.to_string()
            }
        }
    }
}

/// End of the last element on the timeline, in seconds.
pub fn total_duration(scene: &Scene) -> f64 {
    scene
        .iter()
        .map(|element| element.time_span.end())
        .fold(0.0, f64::max)
}

/// Format seconds as `HH:MM:SS.cc`.
pub fn format_timecode(seconds: f64) -> String {
    let centis = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 100.0).round() as u64
    } else {
        0
    };
    let hours = centis / 360_000;
    let minutes = (centis / 6_000) % 60;
    let secs = (centis / 100) % 60;
    let cs = centis % 100;
    format!("{hours:02}:{minutes:02}:{secs:02}.{cs:02}")
}

/// What a timeline drag is doing to its bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineDragKind {
    /// Dragging the trailing edge changes the duration.
    ResizeEnd,
    /// Dragging the body moves the start; `grab_offset` is the pointer's
    /// distance from the bar's left edge in pixels.
    Move { grab_offset: f64 },
}

/// An in-progress drag on one timeline bar.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineDrag {
    pub id: ElementId,
    pub kind: TimelineDragKind,
    /// Span before the drag started.
    pub original: TimeSpan,
    /// Span with the latest pointer position applied.
    pub live: TimeSpan,
}

impl TimelineDrag {
    /// Start dragging the trailing edge.
    pub fn resize(id: ElementId, span: TimeSpan) -> Self {
        Self {
            id,
            kind: TimelineDragKind::ResizeEnd,
            original: span,
            live: span,
        }
    }

    /// Start dragging the bar body, grabbed at `grab_x` pixels.
    pub fn moving(id: ElementId, span: TimeSpan, grab_x: f64, config: &TimelineConfig) -> Self {
        let grab_offset = grab_x - config.seconds_to_px(span.start);
        Self {
            id,
            kind: TimelineDragKind::Move { grab_offset },
            original: span,
            live: span,
        }
    }

    /// Apply a pointer position and return the live span.
    pub fn update(&mut self, mouse_x: f64, config: &TimelineConfig) -> TimeSpan {
        match self.kind {
            TimelineDragKind::ResizeEnd => {
                let start_px = config.seconds_to_px(self.live.start);
                let width_px = (mouse_x - start_px).max(config.min_duration_px);
                self.live.duration = config.px_to_seconds(width_px);
            }
            TimelineDragKind::Move { grab_offset } => {
                let left_px = mouse_x - grab_offset;
                self.live.start = config.px_to_seconds(left_px).max(0.0);
            }
        }
        self.live
    }
}
