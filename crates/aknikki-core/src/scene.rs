//! The scene: an ordered, copy-on-write stack of elements.
//!
//! Index 0 is the back of the stack; the last element paints on top.
//! Every operation takes the current snapshot and returns the next one, so a
//! render pass holding an older [`Scene`] or [`Scene::snapshot`] never sees a
//! partial update. Operations are keyed by [`ElementId`] and leave the scene
//! untouched when the id is unknown.

use crate::element::{Element, ElementId, ElementPatch};
use crate::error::{EditError, EditResult};
use crate::timeline::TimeSpan;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Direction for a single-step layer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerDirection {
    /// One step towards the front (+1).
    Forward,
    /// One step towards the back (-1).
    Backward,
}

/// Ordered stack of elements, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    elements: Arc<Vec<Element>>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from elements in back-to-front order.
    ///
    /// Later elements whose id is already taken are dropped.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut unique: Vec<Element> = Vec::new();
        for element in elements {
            if unique.iter().any(|e| e.id == element.id) {
                log::warn!("Dropping element with duplicate id {}", element.id);
                continue;
            }
            unique.push(element);
        }
        Self {
            elements: Arc::new(unique),
        }
    }

    /// Shared, immutable view of the current elements for a render pass.
    pub fn snapshot(&self) -> Arc<Vec<Element>> {
        Arc::clone(&self.elements)
    }

    /// Elements in paint order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Iterate elements back to front.
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get an element by ID.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Stack index of an element (0 = back).
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// IDs in paint order.
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id).collect()
    }

    /// Find elements at a canvas-space point, front to back.
    pub fn elements_at_point(&self, point: Point, tolerance: f64) -> Vec<ElementId> {
        self.elements
            .iter()
            .rev()
            .filter(|e| e.hit_test(point, tolerance))
            .map(|e| e.id)
            .collect()
    }

    /// The topmost element at a canvas-space point.
    pub fn topmost_at_point(&self, point: Point, tolerance: f64) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.hit_test(point, tolerance))
            .map(|e| e.id)
    }

    fn modify(&self, f: impl FnOnce(&mut Vec<Element>)) -> Scene {
        let mut next = self.clone();
        f(Arc::make_mut(&mut next.elements));
        next
    }

    fn require(&self, id: ElementId) -> EditResult<usize> {
        self.index_of(id).ok_or(EditError::NotFound(id))
    }

    /// Append an element on top of the stack.
    ///
    /// An element whose id is already present leaves the scene unchanged.
    pub fn with_element(&self, element: Element) -> Scene {
        if self.contains(element.id) {
            log::warn!("Element {} already in scene; not adding", element.id);
            return self.clone();
        }
        self.modify(|elements| elements.push(element))
    }

    /// Replace the fields named in `patch`.
    pub fn try_updated(&self, id: ElementId, patch: &ElementPatch) -> EditResult<Scene> {
        let index = self.require(id)?;
        let updated = self.elements[index].patched(patch);
        Ok(self.modify(|elements| elements[index] = updated))
    }

    /// [`Scene::try_updated`], treating an unknown id as a no-op.
    pub fn updated(&self, id: ElementId, patch: &ElementPatch) -> Scene {
        self.try_updated(id, patch).unwrap_or_else(|e| self.stale(e))
    }

    /// Remove an element.
    pub fn try_removed(&self, id: ElementId) -> EditResult<Scene> {
        let index = self.require(id)?;
        Ok(self.modify(|elements| {
            elements.remove(index);
        }))
    }

    /// [`Scene::try_removed`], treating an unknown id as a no-op.
    pub fn removed(&self, id: ElementId) -> Scene {
        self.try_removed(id).unwrap_or_else(|e| self.stale(e))
    }

    /// Copy an element under `new_id`, moved by `offset`, directly above the source.
    pub fn try_duplicated(&self, id: ElementId, new_id: ElementId, offset: Vec2) -> EditResult<Scene> {
        let index = self.require(id)?;
        if self.contains(new_id) {
            log::warn!("Duplicate id {} already in scene; not duplicating", new_id);
            return Ok(self.clone());
        }
        let copy = self.elements[index].duplicate(new_id, offset);
        Ok(self.modify(|elements| elements.insert(index + 1, copy)))
    }

    /// [`Scene::try_duplicated`], treating an unknown id as a no-op.
    pub fn duplicated(&self, id: ElementId, new_id: ElementId, offset: Vec2) -> Scene {
        self.try_duplicated(id, new_id, offset)
            .unwrap_or_else(|e| self.stale(e))
    }

    /// Swap an element with its neighbour in `direction`.
    ///
    /// Moving the back element backward or the front element forward is a no-op.
    pub fn try_moved_layer(&self, id: ElementId, direction: LayerDirection) -> EditResult<Scene> {
        let index = self.require(id)?;
        let target = match direction {
            LayerDirection::Forward if index + 1 < self.len() => index + 1,
            LayerDirection::Backward if index > 0 => index - 1,
            _ => return Ok(self.clone()),
        };
        Ok(self.modify(|elements| elements.swap(index, target)))
    }

    /// [`Scene::try_moved_layer`], treating an unknown id as a no-op.
    pub fn moved_layer(&self, id: ElementId, direction: LayerDirection) -> Scene {
        self.try_moved_layer(id, direction)
            .unwrap_or_else(|e| self.stale(e))
    }

    /// Replace an element's time span.
    pub fn try_with_time_span(&self, id: ElementId, span: TimeSpan) -> EditResult<Scene> {
        let index = self.require(id)?;
        Ok(self.modify(|elements| elements[index].time_span = span))
    }

    /// [`Scene::try_with_time_span`], treating an unknown id as a no-op.
    pub fn with_time_span(&self, id: ElementId, span: TimeSpan) -> Scene {
        self.try_with_time_span(id, span)
            .unwrap_or_else(|e| self.stale(e))
    }

    /// Replace an element's unscaled box size.
    pub fn with_size(&self, id: ElementId, size: Size) -> Scene {
        match self.require(id) {
            Ok(index) => self.modify(|elements| elements[index].size = size),
            Err(e) => self.stale(e),
        }
    }

    fn stale(&self, error: EditError) -> Scene {
        log::debug!("Ignoring scene edit: {error}");
        self.clone()
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
