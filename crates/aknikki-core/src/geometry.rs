//! Geometry value types for element placement.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Position, scale, and rotation of an element in canvas space.
///
/// The anchor is the element's top-left corner: rotation and scale are
/// applied around `(x, y)`, which matches how the rendering surface places
/// a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Left edge in canvas units.
    pub x: f64,
    /// Top edge in canvas units.
    pub y: f64,
    /// Horizontal scale factor (negative = mirrored).
    pub scale_x: f64,
    /// Vertical scale factor (negative = mirrored).
    pub scale_y: f64,
    /// Clockwise rotation in degrees around the anchor.
    pub rotation_degrees: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation_degrees: 0.0,
        }
    }
}

impl Geometry {
    /// Unscaled, unrotated geometry at a position.
    pub fn at(position: Point) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..Self::default()
        }
    }

    /// Whether every field is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.scale_x, self.scale_y, self.rotation_degrees]
            .iter()
            .all(|v| v.is_finite())
    }

    /// The anchor position.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Copy of this geometry moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }

    /// Rotation in radians.
    pub fn rotation_radians(&self) -> f64 {
        self.rotation_degrees.to_radians()
    }

    /// Element-local to canvas-space transform.
    pub fn affine(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y))
            * Affine::rotate(self.rotation_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// Rendered box size for content of the given unscaled size.
    ///
    /// Signs are kept, so a mirrored element reports a negative width.
    pub fn scaled_size(&self, size: Size) -> Size {
        Size::new(size.width * self.scale_x, size.height * self.scale_y)
    }

    /// The four corners of the rendered box in canvas space, in the order
    /// top-left, top-right, bottom-left, bottom-right (element-local).
    pub fn corners(&self, size: Size) -> [Point; 4] {
        let affine = self.affine();
        [
            affine * Point::new(0.0, 0.0),
            affine * Point::new(size.width, 0.0),
            affine * Point::new(0.0, size.height),
            affine * Point::new(size.width, size.height),
        ]
    }

    /// Axis-aligned bounding box of the rendered element.
    pub fn bounds(&self, size: Size) -> Rect {
        let corners = self.corners(size);
        let mut rect = Rect::from_points(corners[0], corners[1]);
        rect = rect.union_pt(corners[2]);
        rect.union_pt(corners[3])
    }

    /// Whether a canvas-space point falls inside the rotated box.
    pub fn contains(&self, size: Size, point: Point, tolerance: f64) -> bool {
        let det = self.affine().determinant();
        if det.abs() < f64::EPSILON {
            return false;
        }
        let local = self.affine().inverse() * point;
        let local_box = Rect::new(
            0.0_f64.min(size.width),
            0.0_f64.min(size.height),
            0.0_f64.max(size.width),
            0.0_f64.max(size.height),
        );
        // Tolerance is in canvas units; convert to local units per axis.
        let tx = tolerance / self.scale_x.abs().max(f64::EPSILON);
        let ty = tolerance / self.scale_y.abs().max(f64::EPSILON);
        local_box.inflate(tx, ty).contains(local)
    }
}

/// A partial geometry update. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub rotation_degrees: Option<f64>,
}

impl GeometryPatch {
    /// Patch that only moves the anchor.
    pub fn position(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply this patch on top of `base`.
    pub fn apply(&self, base: &Geometry) -> Geometry {
        Geometry {
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
            scale_x: self.scale_x.unwrap_or(base.scale_x),
            scale_y: self.scale_y.unwrap_or(base.scale_y),
            rotation_degrees: self.rotation_degrees.unwrap_or(base.rotation_degrees),
        }
    }
}

impl From<Geometry> for GeometryPatch {
    fn from(geometry: Geometry) -> Self {
        Self {
            x: Some(geometry.x),
            y: Some(geometry.y),
            scale_x: Some(geometry.scale_x),
            scale_y: Some(geometry.scale_y),
            rotation_degrees: Some(geometry.rotation_degrees),
        }
    }
}
