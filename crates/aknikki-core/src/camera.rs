//! Viewport camera for authoring pan/zoom.
//!
//! The camera is presentation only. It never touches element geometry and is
//! never handed to an exporter.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Camera limits and wheel behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
    /// Multiplicative zoom step per wheel notch.
    pub wheel_factor: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.2,
            max_zoom: 2.0,
            wheel_factor: 1.1,
        }
    }
}

impl CameraConfig {
    /// Usable `(min, max)` zoom bounds.
    ///
    /// Non-positive or non-finite limits fall back to the defaults and an
    /// inverted range is swapped, so clamping into it never fails.
    pub fn zoom_range(&self) -> (f64, f64) {
        let defaults = Self::default();
        let sane = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        let min = sane(self.min_zoom, defaults.min_zoom);
        let max = sane(self.max_zoom, defaults.max_zoom);
        if min <= max { (min, max) } else { (max, min) }
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        let (min, max) = self.zoom_range();
        if zoom.is_nan() { 1.0_f64.clamp(min, max) } else { zoom.clamp(min, max) }
    }
}

/// Pan/zoom transform from canvas space to screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportCamera {
    /// Current translation (pan) in screen pixels.
    pub pan: Vec2,
    /// Current zoom level (1.0 = one canvas unit per pixel).
    pub zoom: f64,
    /// Zoom limits and wheel step.
    pub config: CameraConfig,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl ViewportCamera {
    /// Create a camera at the origin with zoom 1.0 (clamped into range).
    pub fn new(config: CameraConfig) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: config.clamp_zoom(1.0),
            config,
        }
    }

    /// Canvas-to-screen transform for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Screen-to-canvas transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Convert a screen-space distance (e.g. handle tolerance) to canvas units.
    pub fn screen_distance_to_canvas(&self, distance: f64) -> f64 {
        distance / self.zoom
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Zoom by `factor`, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_zoom = self.config.clamp_zoom(self.zoom * factor);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let canvas_point = self.screen_to_canvas(screen_point);
        self.zoom = new_zoom;

        // Adjust pan so canvas_point stays under screen_point
        let new_screen = self.canvas_to_screen(canvas_point);
        self.pan += screen_point - new_screen;
    }

    /// Apply wheel input centred on the cursor.
    ///
    /// Positive `notches` zoom in, negative zoom out, one `wheel_factor` per notch.
    pub fn wheel(&mut self, cursor: Point, notches: f64) {
        self.zoom_at(cursor, self.config.wheel_factor.powf(notches));
    }

    /// Reset to the origin at zoom 1.0.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Fit the canvas frame into a viewport, centred, with padding.
    pub fn fit_frame(&mut self, frame: Size, viewport: Size, padding: f64) {
        let bounds = frame.to_rect();
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded.width / bounds.width();
        let scale_y = padded.height / bounds.height();
        self.zoom = self.config.clamp_zoom(scale_x.min(scale_y));

        let center = bounds.center();
        self.pan = Vec2::new(
            viewport.width / 2.0 - center.x * self.zoom,
            viewport.height / 2.0 - center.y * self.zoom,
        );
    }
}
