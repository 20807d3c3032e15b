//! Transform handles and the gesture commit protocol.
//!
//! The rendering surface owns the live proxy while a gesture runs. The core
//! only records the pre-gesture pose on start and receives the final pose on
//! release; nothing is written to the scene in between.

use crate::element::{Element, ElementId};
use crate::error::{EditError, EditResult};
use crate::geometry::Geometry;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Distance from the top edge to the rotation handle (in canvas units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Corner positions, in element-local terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Type of transform handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner resize handle.
    Corner(Corner),
    /// Rotation handle above the top edge.
    Rotate,
}

/// A transform handle with its canvas-space position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a canvas-space point hits this handle.
    /// `tolerance` should already be adjusted for camera zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Corner and rotation handles for an element's rotated box.
pub fn handles(element: &Element) -> Vec<Handle> {
    let [tl, tr, bl, br] = element.geometry.corners(element.size);
    let top_center = tl.midpoint(tr);
    let rotation = element.geometry.rotation_radians();
    let up = Vec2::new(rotation.sin(), -rotation.cos());

    vec![
        Handle::new(tl, HandleKind::Corner(Corner::TopLeft)),
        Handle::new(tr, HandleKind::Corner(Corner::TopRight)),
        Handle::new(bl, HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(br, HandleKind::Corner(Corner::BottomRight)),
        Handle::new(top_center + up * ROTATE_HANDLE_OFFSET, HandleKind::Rotate),
    ]
}

/// Find which handle (if any) is hit at the given canvas-space point.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles(element)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// What a gesture is doing to the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    /// Moving the whole element.
    Drag,
    /// Resizing from a corner handle.
    Resize(Corner),
    /// Rotating with the rotation handle.
    Rotate,
}

impl From<HandleKind> for GestureKind {
    fn from(handle: HandleKind) -> Self {
        match handle {
            HandleKind::Corner(corner) => GestureKind::Resize(corner),
            HandleKind::Rotate => GestureKind::Rotate,
        }
    }
}

/// A gesture in progress on one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub id: ElementId,
    pub kind: GestureKind,
    /// Geometry before the gesture started (snap-back target).
    pub start_geometry: Geometry,
    /// Unscaled box size at gesture start.
    pub start_size: Size,
}

/// Result of a gesture commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommitOutcome {
    /// Write this geometry to the element.
    Committed { id: ElementId, geometry: Geometry },
    /// The result was rejected; the proxy must return to this geometry.
    Reverted { id: ElementId, geometry: Geometry },
    /// No gesture is active for this element (cancelled, stale, or never started).
    Ignored,
}

/// Tracks the single in-flight gesture and decides what a release commits.
#[derive(Debug, Clone)]
pub struct TransformSync {
    active: Option<Gesture>,
    min_box_size: f64,
}

impl Default for TransformSync {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl TransformSync {
    /// Create an engine that rejects rendered boxes narrower than `min_box_size`.
    pub fn new(min_box_size: f64) -> Self {
        Self {
            active: None,
            min_box_size,
        }
    }

    pub fn min_box_size(&self) -> f64 {
        self.min_box_size
    }

    /// The gesture in progress, if any.
    pub fn active(&self) -> Option<&Gesture> {
        self.active.as_ref()
    }

    /// Whether a gesture is in progress on `id`.
    pub fn is_active_on(&self, id: ElementId) -> bool {
        self.active.as_ref().is_some_and(|g| g.id == id)
    }

    /// Record the pre-gesture pose. Does not touch the scene.
    ///
    /// Starting a gesture while another is active replaces it; only one
    /// element is manipulated at a time.
    pub fn begin(&mut self, element: &Element, kind: GestureKind) {
        if let Some(previous) = &self.active {
            log::debug!("Gesture on {} superseded by a new gesture", previous.id);
        }
        log::debug!("Gesture {:?} started on {}", kind, element.id());
        self.active = Some(Gesture {
            id: element.id(),
            kind,
            start_geometry: element.geometry,
            start_size: element.size,
        });
    }

    /// Abandon the gesture without committing.
    ///
    /// Returns the gesture so the caller can snap the proxy back.
    pub fn cancel(&mut self) -> Option<Gesture> {
        let cancelled = self.active.take();
        if let Some(gesture) = &cancelled {
            log::debug!("Gesture {:?} on {} cancelled", gesture.kind, gesture.id);
        }
        cancelled
    }

    /// Check a rendered box against the minimum size. Non-finite boxes fail.
    pub fn validate_box(&self, rendered: Size) -> EditResult<()> {
        let too_small = |v: f64| !v.is_finite() || v.abs() < self.min_box_size;
        if too_small(rendered.width) || too_small(rendered.height) {
            Err(EditError::InvalidGeometry {
                width: rendered.width,
                height: rendered.height,
                min: self.min_box_size,
            })
        } else {
            Ok(())
        }
    }

    /// Live bound-box filter for a resize in progress: a degenerate `new`
    /// box is replaced with `old`.
    pub fn bound_box(&self, old: Size, new: Size) -> Size {
        match self.validate_box(new) {
            Ok(()) => new,
            Err(_) => old,
        }
    }

    /// Finish a drag at the proxy's final anchor position.
    pub fn commit_drag(&mut self, id: ElementId, position: Point) -> CommitOutcome {
        let Some(gesture) = self.take_for(id) else {
            return CommitOutcome::Ignored;
        };
        let geometry = Geometry {
            x: position.x,
            y: position.y,
            ..gesture.start_geometry
        };
        self.checked(&gesture, geometry)
    }

    /// Finish a resize or rotation with the proxy's final geometry.
    pub fn commit_transform(&mut self, id: ElementId, geometry: Geometry) -> CommitOutcome {
        let Some(gesture) = self.take_for(id) else {
            return CommitOutcome::Ignored;
        };
        self.checked(&gesture, geometry)
    }

    /// Commit `geometry` unless it is non-finite or collapses the box.
    fn checked(&self, gesture: &Gesture, geometry: Geometry) -> CommitOutcome {
        let id = gesture.id;
        let rendered = geometry.scaled_size(gesture.start_size);
        let valid = if geometry.is_finite() {
            self.validate_box(rendered)
        } else {
            Err(EditError::InvalidGeometry {
                width: rendered.width,
                height: rendered.height,
                min: self.min_box_size,
            })
        };

        match valid {
            Ok(()) => CommitOutcome::Committed { id, geometry },
            Err(e) => {
                log::warn!("Reverting {:?} of {id}: {e}", gesture.kind);
                CommitOutcome::Reverted {
                    id,
                    geometry: gesture.start_geometry,
                }
            }
        }
    }

    fn take_for(&mut self, id: ElementId) -> Option<Gesture> {
        match &self.active {
            Some(gesture) if gesture.id == id => self.active.take(),
            Some(gesture) => {
                log::debug!("Ignoring commit for {id}; active gesture is on {}", gesture.id);
                None
            }
            None => {
                log::debug!("Ignoring commit for {id}; no active gesture");
                None
            }
        }
    }
}
