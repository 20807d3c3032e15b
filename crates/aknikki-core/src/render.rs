//! Contract with the rendering surface.
//!
//! The surface draws what a [`RenderFrame`] describes and reports gestures
//! back as [`RendererEvent`](crate::input::RendererEvent)s. The core never
//! reaches into surface-owned nodes; when a proxy has to return to a
//! committed pose the surface is told through [`RenderSurface::reset_proxy`].

use crate::element::{Element, ElementId};
use crate::frame::CanvasFrame;
use crate::geometry::Geometry;
use crate::mode::PanelKind;
use crate::transform::Handle;
use kurbo::{Affine, Point, Rect};
use std::sync::Arc;

/// Entries of the floating action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditAction {
    Delete,
    Duplicate,
    BringForward,
    SendBackward,
}

impl EditAction {
    /// All actions in menu order.
    pub fn all() -> &'static [EditAction] {
        &[
            EditAction::BringForward,
            EditAction::SendBackward,
            EditAction::Duplicate,
            EditAction::Delete,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            EditAction::Delete => "Delete",
            EditAction::Duplicate => "Duplicate",
            EditAction::BringForward => "Forward",
            EditAction::SendBackward => "Backward",
        }
    }
}

/// Floating action menu placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMenu {
    /// Element the actions apply to.
    pub target: ElementId,
    /// Anchor in screen coordinates (the element's position through the camera).
    pub anchor: Point,
}

/// Everything a surface needs to draw one frame.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    /// Output frame (drawn as the white page).
    pub frame: CanvasFrame,
    /// Canvas-to-screen transform from the viewport camera.
    pub camera: Affine,
    /// Elements in paint order, back to front.
    pub elements: Arc<Vec<Element>>,
    pub selection: Option<ElementId>,
    /// Axis-aligned outline of the selected element (canvas space).
    pub selection_bounds: Option<Rect>,
    /// Transform handles of the selected element (canvas space).
    pub handles: Vec<Handle>,
    pub action_menu: Option<ActionMenu>,
    pub panel: Option<PanelKind>,
}

impl RenderFrame {
    /// Elements visible at `time` seconds, back to front.
    pub fn visible_at(&self, time: f64) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |element| element.time_span.contains(time))
    }
}

/// Trait for rendering backends.
pub trait RenderSurface {
    /// Draw a frame.
    fn draw(&mut self, frame: &RenderFrame);

    /// Return a live proxy to a committed pose (after a rejected or
    /// cancelled gesture).
    fn reset_proxy(&mut self, id: ElementId, geometry: Geometry) {
        let _ = (id, geometry);
    }
}
