//! Input events delivered to the editor.
//!
//! Canvas pointer positions are in screen pixels relative to the canvas
//! area; the editor inverts the camera before interpreting them. Timeline
//! positions are in timeline-track pixels.

use crate::element::ElementId;
use crate::geometry::Geometry;
use crate::transform::HandleKind;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Raw pointer input on the canvas area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

impl PointerEvent {
    /// Screen position of the event.
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Scroll { position, .. } => *position,
        }
    }
}

/// Wheel notches for a scroll delta: one notch per event, scrolling up zooms in.
pub fn wheel_notches(delta: Vec2) -> f64 {
    if delta.y > 0.0 {
        -1.0
    } else if delta.y < 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Gesture lifecycle and measurement reports from the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RendererEvent {
    /// The surface resolved a press to an element (or to the background).
    Pressed {
        target: Option<ElementId>,
        position: Point,
    },
    DragStart {
        id: ElementId,
    },
    DragMove {
        id: ElementId,
        position: Point,
    },
    /// Drag released with the proxy's final anchor position (canvas space).
    DragEnd {
        id: ElementId,
        position: Point,
    },
    TransformStart {
        id: ElementId,
        handle: HandleKind,
    },
    /// Resize/rotate released with the proxy's final geometry.
    TransformEnd {
        id: ElementId,
        geometry: Geometry,
    },
    /// Unscaled content size after the surface decoded or laid out the content.
    ContentMeasured {
        id: ElementId,
        size: Size,
    },
    /// The surface could not resolve the element's content source.
    AssetLoadFailed {
        id: ElementId,
        source: String,
    },
}

/// Pointer input on the timeline area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimelineEvent {
    /// A press at track position `x` on a row; the editor resolves whether
    /// it hit the trailing edge, the bar body, or empty track.
    Pressed { id: ElementId, x: f64 },
    /// A row (anywhere outside the bar handles) was clicked.
    RowClicked { id: ElementId },
    /// The trailing-edge handle of a bar was pressed.
    EdgePressed { id: ElementId, x: f64 },
    /// The body of a bar was pressed.
    BarPressed { id: ElementId, x: f64 },
    PointerMove { x: f64 },
    PointerUp { x: f64 },
    /// The drag was interrupted (pointer left the window, escape, etc.).
    Cancel,
}
