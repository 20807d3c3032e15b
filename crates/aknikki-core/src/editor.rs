//! The editor session.
//!
//! [`Editor`] owns the scene, the mode state, the in-flight gesture and
//! timeline drag, and the viewport camera. Hosts feed it pointer, renderer,
//! and timeline events and read back [`RenderFrame`]s and timeline rows.
//! Every entry point is keyed by [`ElementId`] and treats an unknown id as a
//! logged no-op.

use crate::camera::ViewportCamera;
use crate::catalog::{AssetCandidate, AssetCatalog};
use crate::config::EditorConfig;
use crate::element::{
    Element, ElementContent, ElementId, ElementKind, ElementPatch, cover, fit_within,
};
use crate::error::{ConfigError, EditError, ExportError};
use crate::export::{ExportRequest, Exporter};
use crate::frame::CanvasFrame;
use crate::geometry::Geometry;
use crate::input::{MouseButton, PointerEvent, RendererEvent, TimelineEvent, wheel_notches};
use crate::mode::{Mode, ModeState, PanelKind};
use crate::render::{ActionMenu, EditAction, RenderFrame, RenderSurface};
use crate::scene::{LayerDirection, Scene};
use crate::timeline::{self, TimeSpan, TimelineDrag, TimelineRow};
use crate::transform::{self, CommitOutcome, GestureKind, HandleKind, TransformSync};
use kurbo::{Point, Size};
use std::collections::HashSet;

/// What a canvas pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerHit {
    /// A transform handle of the selected element.
    Handle(ElementId, HandleKind),
    /// The body of an element (now selected).
    Element(ElementId),
    /// Empty canvas.
    Background,
}

/// One editing session.
#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    scene: Scene,
    mode: ModeState,
    transform: TransformSync,
    timeline_drag: Option<TimelineDrag>,
    camera: ViewportCamera,
    frame: CanvasFrame,
    /// Playhead in seconds.
    playhead: f64,
    /// Last screen position of an active pan drag.
    pan_anchor: Option<Point>,
    /// Proxies that must return to a committed pose on the next render.
    pending_resets: Vec<(ElementId, Geometry)>,
    /// Images sized to cover the frame once measured.
    frame_fills: HashSet<ElementId>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an empty session.
    ///
    /// Out-of-range camera limits are normalised rather than rejected; use
    /// [`Editor::try_new`] to refuse an invalid config instead.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            scene: Scene::new(),
            mode: ModeState::new(),
            transform: TransformSync::new(config.min_box_size),
            timeline_drag: None,
            camera: ViewportCamera::new(config.camera),
            frame: config.frame,
            playhead: 0.0,
            pan_anchor: None,
            pending_resets: Vec::new(),
            frame_fills: HashSet::new(),
            config,
        }
    }

    /// Create an empty session after validating `config`.
    pub fn try_new(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The current scene snapshot.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Replace the whole scene (e.g. restoring a saved session).
    ///
    /// Selection and gestures on elements that no longer exist are dropped.
    pub fn replace_scene(&mut self, scene: Scene) {
        self.scene = scene;
        self.mode.retain_valid(&self.scene);
        if self
            .transform
            .active()
            .is_some_and(|gesture| !self.scene.contains(gesture.id))
        {
            self.transform.cancel();
        }
        if self
            .timeline_drag
            .as_ref()
            .is_some_and(|drag| !self.scene.contains(drag.id))
        {
            self.timeline_drag = None;
        }
        let scene = &self.scene;
        self.frame_fills.retain(|id| scene.contains(*id));
    }

    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.mode.selection()
    }

    pub fn panel(&self) -> Option<PanelKind> {
        self.mode.panel()
    }

    pub fn action_menu_visible(&self) -> bool {
        self.mode.action_menu_visible()
    }

    pub fn camera(&self) -> &ViewportCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut ViewportCamera {
        &mut self.camera
    }

    pub fn frame(&self) -> CanvasFrame {
        self.frame
    }

    /// Change the output frame. Element geometry is left as is.
    pub fn set_frame(&mut self, frame: CanvasFrame) {
        log::info!("Canvas frame set to {:?}", frame.size());
        self.frame = frame;
    }

    /// Fit the output frame into a viewport of the given screen size.
    pub fn fit_to_viewport(&mut self, viewport: Size, padding: f64) {
        self.camera.fit_frame(self.frame.size(), viewport, padding);
    }

    /// The transform engine, for inspecting the gesture in progress.
    pub fn transform(&self) -> &TransformSync {
        &self.transform
    }

    /// The timeline drag in progress, if any.
    pub fn timeline_drag(&self) -> Option<&TimelineDrag> {
        self.timeline_drag.as_ref()
    }

    // --- Scene operations ---

    /// Add an element at the default position on top of the stack.
    ///
    /// The new element becomes the selection and any open panel closes.
    pub fn add_element(&mut self, content: ElementContent) -> ElementId {
        let geometry = Geometry::at(self.config.placement.default_position);
        let element = Element::new(
            ElementId::new(),
            geometry,
            content,
            self.config.default_time_span,
        );
        self.insert(element)
    }

    /// Add a text element with the configured default body and style.
    pub fn add_default_text(&mut self) -> ElementId {
        let text = &self.config.default_text;
        let content = ElementContent::Text(text.content(text.body.clone()));
        self.add_element(content)
    }

    /// Add an element for a panel entry.
    ///
    /// Returns `None` for panels without a visual element (audio).
    pub fn pick_asset(&mut self, panel: PanelKind, candidate: &AssetCandidate) -> Option<ElementId> {
        match panel.element_kind() {
            None => {
                log::debug!("Ignoring {} pick {:?}; no visual element", panel.label(), candidate.name);
                None
            }
            Some(ElementKind::Text) => {
                let content = self.config.default_text.content(candidate.name.clone());
                Some(self.add_element(ElementContent::Text(content)))
            }
            Some(ElementKind::Image)
                if panel == PanelKind::Background && self.config.placement.backgrounds_fill_frame =>
            {
                let element = Element::new(
                    ElementId::new(),
                    Geometry::default(),
                    ElementContent::image(candidate.url.clone()),
                    self.config.default_time_span,
                )
                .with_size(self.frame.size());
                self.frame_fills.insert(element.id());
                Some(self.insert(element))
            }
            Some(ElementKind::Image) => Some(self.add_element(ElementContent::image(candidate.url.clone()))),
        }
    }

    fn insert(&mut self, element: Element) -> ElementId {
        let id = element.id();
        log::info!("Added {:?} element {}", element.kind(), id);
        self.scene = self.scene.with_element(element);
        self.mode.select(id);
        self.mode.close_panel();
        id
    }

    /// Replace the named fields of an element.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) {
        self.scene = self.scene.updated(id, patch);
    }

    /// Remove an element and every reference to it.
    pub fn delete_element(&mut self, id: ElementId) {
        if !self.scene.contains(id) {
            log::debug!("Ignoring delete of missing element {id}");
            return;
        }
        self.scene = self.scene.removed(id);
        self.mode.forget(id);
        if self.transform.is_active_on(id) {
            self.transform.cancel();
        }
        if self.timeline_drag.as_ref().is_some_and(|drag| drag.id == id) {
            self.timeline_drag = None;
        }
        self.frame_fills.remove(&id);
        log::info!("Deleted element {id}");
    }

    /// Copy an element directly above itself and select the copy.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        if !self.scene.contains(id) {
            log::debug!("Ignoring duplicate of missing element {id}");
            return None;
        }
        let new_id = ElementId::new();
        self.scene = self
            .scene
            .duplicated(id, new_id, self.config.placement.duplicate_offset);
        if self.frame_fills.contains(&id) {
            self.frame_fills.insert(new_id);
        }
        self.mode.select(new_id);
        log::info!("Duplicated element {id} as {new_id}");
        Some(new_id)
    }

    /// Set an element's time span from raw values.
    ///
    /// A negative start or a duration below the timeline minimum is clamped.
    pub fn set_time_span(&mut self, id: ElementId, start: f64, duration: f64) {
        let span = TimeSpan::try_new(start, duration)
            .ok()
            .filter(|span| span.duration >= self.config.timeline.min_duration())
            .unwrap_or_else(|| {
                log::debug!("Clamping time span start {start}, duration {duration} for {id}");
                TimeSpan::clamped(start, duration, self.config.timeline.min_duration())
            });
        self.scene = self.scene.with_time_span(id, span);
    }

    /// Move an element one step in the stack.
    pub fn move_layer(&mut self, id: ElementId, direction: LayerDirection) {
        self.scene = self.scene.moved_layer(id, direction);
    }

    /// Run an action-menu entry on the current selection.
    pub fn apply_action(&mut self, action: EditAction) {
        let Some(id) = self.mode.selection() else {
            log::debug!("Ignoring {} with nothing selected", action.label());
            return;
        };
        match action {
            EditAction::Delete => self.delete_element(id),
            EditAction::Duplicate => {
                self.duplicate_element(id);
            }
            EditAction::BringForward => self.move_layer(id, LayerDirection::Forward),
            EditAction::SendBackward => self.move_layer(id, LayerDirection::Backward),
        }
    }

    // --- Mode operations ---

    /// Select an element. Unknown ids are ignored.
    pub fn select(&mut self, id: ElementId) {
        if self.scene.contains(id) {
            self.mode.select(id);
        } else {
            log::debug!("Ignoring selection of missing element {id}");
        }
    }

    /// Clear the selection, as a click on empty canvas does.
    pub fn click_background(&mut self) {
        self.mode.clear_selection();
    }

    /// Hide the action menu but keep the selection.
    pub fn dismiss_action_menu(&mut self) {
        self.mode.dismiss_action_menu();
    }

    /// Open a panel, replacing any other. Cancels the gesture in progress.
    pub fn open_panel(&mut self, panel: PanelKind) {
        self.cancel_gesture();
        if let Some(previous) = self.mode.open_panel(panel) {
            log::debug!("Panel {} replaced by {}", previous.label(), panel.label());
        }
    }

    /// Open `panel`, or close it if already open.
    pub fn toggle_panel(&mut self, panel: PanelKind) {
        self.cancel_gesture();
        self.mode.toggle_panel(panel);
    }

    pub fn close_panel(&mut self) {
        self.mode.close_panel();
    }

    /// Entries of the open panel matching `query`. Empty when no panel is open.
    pub fn search<'a, C>(&self, catalog: &'a C, query: Option<&str>) -> Box<dyn Iterator<Item = AssetCandidate> + 'a>
    where
        C: AssetCatalog + ?Sized,
    {
        match self.mode.panel() {
            Some(panel) => catalog.search(panel, query),
            None => Box::new(std::iter::empty()),
        }
    }

    /// Abandon the gesture in progress. The proxy is reset on the next render.
    pub fn cancel_gesture(&mut self) {
        if let Some(gesture) = self.transform.cancel() {
            self.pending_resets.push((gesture.id, gesture.start_geometry));
        }
    }

    // --- Input ---

    /// Handle raw pointer input on the canvas area.
    ///
    /// Returns what a left-button press landed on; other events return `None`.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<PointerHit> {
        match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => Some(self.pointer_down(position)),
            PointerEvent::Down { .. } => None,
            PointerEvent::Move { position } => {
                if let Some(anchor) = self.pan_anchor {
                    self.camera.pan_by(position - anchor);
                    self.pan_anchor = Some(position);
                }
                None
            }
            PointerEvent::Up { .. } => {
                self.pan_anchor = None;
                None
            }
            PointerEvent::Scroll { position, delta } => {
                self.camera.wheel(position, wheel_notches(delta));
                None
            }
        }
    }

    fn pointer_down(&mut self, screen: Point) -> PointerHit {
        let point = self.camera.screen_to_canvas(screen);
        let selected_at_down = self.mode.selection();

        if let Some(element) = selected_at_down.and_then(|id| self.scene.get(id)) {
            let tolerance = self
                .camera
                .screen_distance_to_canvas(self.config.handle_tolerance_px);
            if let Some(kind) = transform::hit_test_handles(element, point, tolerance) {
                return PointerHit::Handle(element.id(), kind);
            }
        }

        if let Some(id) = self.scene.topmost_at_point(point, 0.0) {
            self.mode.select(id);
            return PointerHit::Element(id);
        }

        self.mode.clear_selection();
        if selected_at_down.is_none() {
            self.pan_anchor = Some(screen);
        }
        PointerHit::Background
    }

    /// Handle a gesture or measurement report from the rendering surface.
    pub fn handle_renderer_event(&mut self, event: &RendererEvent) {
        match event {
            RendererEvent::Pressed { target: Some(id), .. } => self.select(*id),
            RendererEvent::Pressed { target: None, .. } => self.click_background(),
            RendererEvent::DragStart { id } => {
                if let Some(element) = self.scene.get(*id) {
                    self.transform.begin(element, GestureKind::Drag);
                    self.mode.select(*id);
                } else {
                    log::debug!("Ignoring drag start on missing element {id}");
                }
            }
            // The surface owns the proxy until release
            RendererEvent::DragMove { .. } => {}
            RendererEvent::DragEnd { id, position } => {
                let outcome = self.transform.commit_drag(*id, *position);
                self.apply_outcome(outcome);
            }
            RendererEvent::TransformStart { id, handle } => {
                if !self.mode.is_selected(*id) {
                    log::debug!("Ignoring transform start on unselected element {id}");
                    return;
                }
                if let Some(element) = self.scene.get(*id) {
                    self.transform.begin(element, GestureKind::from(*handle));
                }
            }
            RendererEvent::TransformEnd { id, geometry } => {
                let outcome = self.transform.commit_transform(*id, *geometry);
                self.apply_outcome(outcome);
            }
            RendererEvent::ContentMeasured { id, size } => self.content_measured(*id, *size),
            RendererEvent::AssetLoadFailed { id, source } => {
                let error = EditError::AssetUnavailable(source.clone());
                log::warn!("{error} (element {id} kept)");
            }
        }
    }

    fn apply_outcome(&mut self, outcome: CommitOutcome) {
        match outcome {
            CommitOutcome::Committed { id, geometry } => {
                self.scene = self.scene.updated(id, &ElementPatch::geometry(geometry));
            }
            CommitOutcome::Reverted { id, geometry } => self.pending_resets.push((id, geometry)),
            CommitOutcome::Ignored => {}
        }
    }

    fn content_measured(&mut self, id: ElementId, measured: Size) {
        let Some(element) = self.scene.get(id) else {
            log::debug!("Ignoring measurement of missing element {id}");
            return;
        };
        if measured.width <= 0.0 || measured.height <= 0.0 {
            log::debug!("Ignoring empty measurement {measured:?} for {id}");
            return;
        }
        let size = match element.kind() {
            ElementKind::Image if self.frame_fills.contains(&id) => cover(measured, self.frame.size()),
            ElementKind::Image => fit_within(measured, self.frame.size()),
            ElementKind::Text => measured,
        };
        self.scene = self.scene.with_size(id, size);
    }

    /// Handle pointer input on the timeline area.
    ///
    /// Drags update a live span that is only written to the scene on release.
    pub fn handle_timeline_event(&mut self, event: &TimelineEvent) {
        match *event {
            TimelineEvent::Pressed { id, x } => {
                let Some(element) = self.scene.get(id) else {
                    log::debug!("Ignoring timeline press on missing element {id}");
                    return;
                };
                let timeline = &self.config.timeline;
                let bar = timeline.bar(element.time_span);
                let resolved = if bar.hits_trailing_edge(x, timeline.edge_tolerance_px) {
                    TimelineEvent::EdgePressed { id, x }
                } else if bar.contains(x) {
                    TimelineEvent::BarPressed { id, x }
                } else {
                    TimelineEvent::RowClicked { id }
                };
                self.handle_timeline_event(&resolved);
            }
            TimelineEvent::RowClicked { id } => self.select(id),
            TimelineEvent::EdgePressed { id, .. } => {
                if let Some(element) = self.scene.get(id) {
                    self.timeline_drag = Some(TimelineDrag::resize(id, element.time_span));
                    self.mode.select(id);
                }
            }
            TimelineEvent::BarPressed { id, x } => {
                if let Some(element) = self.scene.get(id) {
                    self.timeline_drag = Some(TimelineDrag::moving(
                        id,
                        element.time_span,
                        x,
                        &self.config.timeline,
                    ));
                    self.mode.select(id);
                }
            }
            TimelineEvent::PointerMove { x } => {
                if let Some(drag) = &mut self.timeline_drag {
                    drag.update(x, &self.config.timeline);
                }
            }
            TimelineEvent::PointerUp { x } => {
                if let Some(mut drag) = self.timeline_drag.take() {
                    let span = drag.update(x, &self.config.timeline);
                    log::debug!("Timeline drag on {} committed as {:?}", drag.id, span);
                    self.scene = self.scene.with_time_span(drag.id, span);
                }
            }
            TimelineEvent::Cancel => {
                if let Some(drag) = self.timeline_drag.take() {
                    log::debug!("Timeline drag on {} cancelled", drag.id);
                }
            }
        }
    }

    // --- Output ---

    /// Timeline rows, topmost layer first, with any live drag applied.
    pub fn timeline_rows(&self) -> Vec<TimelineRow> {
        let mut rows = timeline::rows(&self.scene, &self.config.timeline, self.mode.selection());
        if let Some(drag) = &self.timeline_drag {
            if let Some(row) = rows.iter_mut().find(|row| row.id == drag.id) {
                row.bar = self.config.timeline.bar(drag.live);
            }
        }
        rows
    }

    /// End of the last element, in seconds.
    pub fn total_duration(&self) -> f64 {
        timeline::total_duration(&self.scene)
    }

    /// Playhead position, clamped to the current total duration.
    pub fn playhead(&self) -> f64 {
        self.playhead.min(self.total_duration())
    }

    pub fn set_playhead(&mut self, seconds: f64) {
        self.playhead = if seconds.is_finite() {
            seconds.clamp(0.0, self.total_duration())
        } else {
            0.0
        };
    }

    /// Elements on screen at the playhead, back to front.
    pub fn visible_at_playhead(&self) -> Vec<ElementId> {
        let time = self.playhead();
        self.scene
            .iter()
            .filter(|element| element.time_span.contains(time))
            .map(Element::id)
            .collect()
    }

    /// Header timecode, `current / total`.
    pub fn timecode(&self) -> String {
        format!(
            "{} / {}",
            timeline::format_timecode(self.playhead()),
            timeline::format_timecode(self.total_duration())
        )
    }

    /// Describe the current state for a render pass.
    pub fn render_frame(&self) -> RenderFrame {
        let selected = self.mode.selection().and_then(|id| self.scene.get(id));
        let handles = selected.map(transform::handles).unwrap_or_default();
        let action_menu = selected
            .filter(|_| self.mode.action_menu_visible())
            .map(|element| ActionMenu {
                target: element.id(),
                anchor: self.camera.canvas_to_screen(element.geometry.position()),
            });

        RenderFrame {
            frame: self.frame,
            camera: self.camera.transform(),
            elements: self.scene.snapshot(),
            selection: selected.map(Element::id),
            selection_bounds: selected.map(Element::bounds),
            handles,
            action_menu,
            panel: self.mode.panel(),
        }
    }

    /// Flush pending proxy resets and draw the current state.
    pub fn render(&mut self, surface: &mut dyn RenderSurface) {
        for (id, geometry) in self.pending_resets.drain(..) {
            surface.reset_proxy(id, geometry);
        }
        surface.draw(&self.render_frame());
    }

    /// Export the current scene. The camera is not part of the request.
    pub fn export<E: Exporter>(&self, exporter: &mut E) -> Result<E::Artifact, ExportError> {
        let request = ExportRequest {
            elements: self.scene.snapshot(),
            frame: self.frame,
            total_duration: self.total_duration(),
        };
        log::info!(
            "Exporting {} elements ({:.2}s)",
            request.elements.len(),
            request.total_duration
        );
        exporter.export(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::export::JsonManifestExporter;
    use crate::timeline::TimelineDragKind;
    use crate::transform::Corner;
    use kurbo::Vec2;

    #[derive(Default)]
    struct RecordingSurface {
        frames: usize,
        resets: Vec<(ElementId, Geometry)>,
    }

    impl RenderSurface for RecordingSurface {
        fn draw(&mut self, _frame: &RenderFrame) {
            self.frames += 1;
        }

        fn reset_proxy(&mut self, id: ElementId, geometry: Geometry) {
            self.resets.push((id, geometry));
        }
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_add_selects_and_closes_panel() {
        let mut editor = Editor::default();
        editor.open_panel(PanelKind::Character);
        let id = editor.add_element(ElementContent::image("a.png"));
        assert_eq!(editor.mode(), Mode::ElementSelected(id));
        let element = editor.scene().get(id).unwrap();
        assert_eq!(element.geometry.position(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_pick_background_covers_frame() {
        let mut editor = Editor::default();
        let catalog = StaticCatalog::with_placeholders();
        editor.open_panel(PanelKind::Background);
        let candidate = editor.search(&catalog, None).next().unwrap();
        let id = editor.pick_asset(PanelKind::Background, &candidate).unwrap();

        let element = editor.scene().get(id).unwrap();
        assert_eq!(element.geometry.position(), Point::ZERO);
        assert_eq!(element.size, Size::new(360.0, 450.0));

        editor.handle_renderer_event(&RendererEvent::ContentMeasured {
            id,
            size: Size::new(1920.0, 1080.0),
        });
        let element = editor.scene().get(id).unwrap();
        assert!((element.size.height - 450.0).abs() < 1e-9);
        assert!(element.size.width >= 360.0);
    }

    #[test]
    fn test_pick_text_preset_and_audio() {
        let mut editor = Editor::default();
        let catalog = StaticCatalog::with_placeholders();
        editor.open_panel(PanelKind::Text);
        let heading = editor.search(&catalog, Some("heading")).next().unwrap();
        let id = editor.pick_asset(PanelKind::Text, &heading).unwrap();
        match &editor.scene().get(id).unwrap().content {
            ElementContent::Text(text) => assert_eq!(text.body, "Add a heading"),
            other => panic!("expected text, got {other:?}"),
        }

        let before = editor.scene().clone();
        assert!(editor.pick_asset(PanelKind::Audio, &AssetCandidate::new("beat", "a.mp3")).is_none());
        assert_eq!(editor.scene(), &before);
    }

    #[test]
    fn test_search_without_panel_is_empty() {
        let editor = Editor::default();
        let catalog = StaticCatalog::with_placeholders();
        assert_eq!(editor.search(&catalog, None).count(), 0);
    }

    #[test]
    fn test_measured_image_fits_frame() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementContent::image("big.png"));
        editor.handle_renderer_event(&RendererEvent::ContentMeasured {
            id,
            size: Size::new(1080.0, 1920.0),
        });
        let size = editor.scene().get(id).unwrap().size;
        assert!((size.height - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_commit_writes_position_once() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementContent::image("a.png"));
        editor.handle_renderer_event(&RendererEvent::DragStart { id });
        editor.handle_renderer_event(&RendererEvent::DragMove {
            id,
            position: Point::new(90.0, 90.0),
        });
        // Nothing written mid-gesture
        assert_eq!(
            editor.scene().get(id).unwrap().geometry.position(),
            Point::new(50.0, 50.0)
        );
        editor.handle_renderer_event(&RendererEvent::DragEnd {
            id,
            position: Point::new(120.0, 80.0),
        });
        assert_eq!(
            editor.scene().get(id).unwrap().geometry.position(),
            Point::new(120.0, 80.0)
        );
    }

    #[test]
    fn test_degenerate_resize_snaps_back() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementContent::image("a.png"));
        let before = editor.scene().get(id).unwrap().geometry;
        editor.handle_renderer_event(&RendererEvent::TransformStart {
            id,
            handle: HandleKind::Corner(Corner::BottomRight),
        });
        editor.handle_renderer_event(&RendererEvent::TransformEnd {
            id,
            geometry: Geometry {
                scale_x: 0.01,
                ..before
            },
        });
        assert_eq!(editor.scene().get(id).unwrap().geometry, before);

        let mut surface = RecordingSurface::default();
        editor.render(&mut surface);
        assert_eq!(surface.resets, vec![(id, before)]);
        assert_eq!(surface.frames, 1);

        // Resets are flushed once
        editor.render(&mut surface);
        assert_eq!(surface.resets.len(), 1);
    }

    #[test]
    fn test_opening_panel_cancels_gesture() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementContent::image("a.png"));
        editor.handle_renderer_event(&RendererEvent::DragStart { id });
        editor.open_panel(PanelKind::Upload);
        editor.handle_renderer_event(&RendererEvent::DragEnd {
            id,
            position: Point::new(300.0, 300.0),
        });
        assert_eq!(
            editor.scene().get(id).unwrap().geometry.position(),
            Point::new(50.0, 50.0)
        );
        assert_eq!(editor.mode(), Mode::ElementSelectedWithPanel(id, PanelKind::Upload));

        let mut surface = RecordingSurface::default();
        editor.render(&mut surface);
        assert_eq!(surface.resets.len(), 1);
    }

    #[test]
    fn test_transform_start_requires_selection() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementContent::image("a.png"));
        editor.click_background();
        editor.handle_renderer_event(&RendererEvent::TransformStart {
            id,
            handle: HandleKind::Rotate,
        });
        assert!(editor.transform().active().is_none());
    }

    #[test]
    fn test_pointer_hits_through_camera() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementContent::image("a.png"));
        editor.click_background();
        editor.camera_mut().zoom = 2.0;
        editor.camera_mut().pan = Vec2::new(10.0, 10.0);

        // Canvas (100, 100) is inside the placeholder box at (50, 50)
        assert_eq!(editor.handle_pointer(&down(210.0, 210.0)), Some(PointerHit::Element(id)));
        assert_eq!(editor.selection(), Some(id));

        // Bottom-right corner handle at canvas (250, 250)
        assert_eq!(
            editor.handle_pointer(&down(510.0, 510.0)),
            Some(PointerHit::Handle(id, HandleKind::Corner(Corner::BottomRight)))
        );
    }

    #[test]
    fn test_pan_only_when_nothing_selected_at_down() {
        let mut editor = Editor::default();
        editor.add_element(ElementContent::image("a.png"));

        // Selected at down: clears selection, no pan
        assert_eq!(editor.handle_pointer(&down(600.0, 600.0)), Some(PointerHit::Background));
        assert_eq!(editor.selection(), None);
        editor.handle_pointer(&PointerEvent::Move {
            position: Point::new(650.0, 650.0),
        });
        assert_eq!(editor.camera().pan, Vec2::ZERO);
        editor.handle_pointer(&PointerEvent::Up {
            position: Point::new(650.0, 650.0),
            button: MouseButton::Left,
        });

        // Nothing selected at down: pans
        editor.handle_pointer(&down(600.0, 600.0));
        editor.handle_pointer(&PointerEvent::Move {
            position: Point::new(630.0, 610.0),
        });
        assert_eq!(editor.camera().pan, Vec2::new(30.0, 10.0));
        editor.handle_pointer(&PointerEvent::Up {
            position: Point::new(630.0, 610.0),
            button: MouseButton::Left,
        });
        editor.handle_pointer(&PointerEvent::Move {
            position: Point::new(700.0, 700.0),
        });
        assert_eq!(editor.camera().pan, Vec2::new(30.0, 10.0));
    }

    #[test]
    fn test_scroll_zooms_about_cursor() {
        let mut editor = Editor::default();
        let cursor = Point::new(100.0, 100.0);
        editor.handle_pointer(&PointerEvent::Scroll {
            position: cursor,
            delta: Vec2::new(0.0, -1.0),
        });
        assert!((editor.camera().zoom - 1.1).abs() < 1e-10);
        let back = editor.camera().canvas_to_screen(Point::new(100.0, 100.0));
        assert!((back - cursor).hypot() < 1e-9);
    }

    #[test]
    fn test_timeline_move_and_cancel() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementContent::image("a.png"));

        editor.handle_timeline_event(&TimelineEvent::BarPressed { id, x: 30.0 });
        editor.handle_timeline_event(&TimelineEvent::PointerMove { x: 90.0 });
        // Live bar moves, scene does not
        assert!((editor.timeline_rows()[0].bar.left - 60.0).abs() < 1e-9);
        assert!(editor.scene().get(id).unwrap().time_span.start.abs() < f64::EPSILON);

        editor.handle_timeline_event(&TimelineEvent::Cancel);
        assert!(editor.timeline_drag().is_none());
        assert!(editor.timeline_rows()[0].bar.left.abs() < f64::EPSILON);

        editor.handle_timeline_event(&TimelineEvent::BarPressed { id, x: 30.0 });
        editor.handle_timeline_event(&TimelineEvent::PointerUp { x: 90.0 });
        assert!((editor.scene().get(id).unwrap().time_span.start - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_action_menu_anchor_follows_camera() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementContent::image("a.png"));
        editor.camera_mut().pan = Vec2::new(5.0, -5.0);
        let frame = editor.render_frame();
        let menu = frame.action_menu.unwrap();
        assert_eq!(menu.target, id);
        assert_eq!(menu.anchor, Point::new(55.0, 45.0));
        assert_eq!(frame.handles.len(), 5);

        editor.dismiss_action_menu();
        let frame = editor.render_frame();
        assert!(frame.action_menu.is_none());
        assert_eq!(frame.selection, Some(id));
    }

    #[test]
    fn test_playhead_and_timecode() {
        let mut editor = Editor::default();
        assert_eq!(editor.timecode(), "00:00:00.00 / 00:00:00.00");
        let id = editor.add_default_text();
        editor.set_playhead(12.0);
        assert!((editor.playhead() - 5.0).abs() < f64::EPSILON);
        assert_eq!(editor.timecode(), "00:00:05.00 / 00:00:05.00");

        editor.delete_element(id);
        assert!(editor.playhead().abs() < f64::EPSILON);
    }

    #[test]
    fn test_export_excludes_camera() {
        let mut editor = Editor::default();
        let mut exporter = JsonManifestExporter::default();
        assert!(matches!(editor.export(&mut exporter), Err(ExportError::EmptyScene)));

        editor.add_default_text();
        editor.camera_mut().zoom = 1.7;
        let json = editor.export(&mut exporter).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_duration"], 5.0);
        assert!(value.get("camera").is_none());
    }

    #[test]
    fn test_set_time_span_clamps() {
        let mut editor = Editor::default();
        let id = editor.add_default_text();
        editor.set_time_span(id, -2.0, 0.1);
        let span = editor.scene().get(id).unwrap().time_span;
        assert!(span.start.abs() < f64::EPSILON);
        assert!((span.duration - 1.0).abs() < f64::EPSILON);

        editor.set_time_span(id, 1.5, 3.0);
        let span = editor.scene().get(id).unwrap().time_span;
        assert!((span.end() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_swaps_image_and_keeps_element_on_load_failure() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementContent::image("a.png"));
        editor.update_element(id, &ElementPatch::image_source("b.png"));
        editor.handle_renderer_event(&RendererEvent::AssetLoadFailed {
            id,
            source: "b.png".into(),
        });
        match &editor.scene().get(id).unwrap().content {
            ElementContent::Image(image) => assert_eq!(image.source, "b.png"),
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn test_action_menu_entries() {
        let mut editor = Editor::default();
        let back = editor.add_element(ElementContent::image("a.png"));
        editor.apply_action(EditAction::Duplicate);
        let copy = editor.selection().unwrap();
        assert_eq!(editor.scene().ids(), vec![back, copy]);

        editor.apply_action(EditAction::SendBackward);
        assert_eq!(editor.scene().ids(), vec![copy, back]);
        editor.apply_action(EditAction::BringForward);
        assert_eq!(editor.scene().ids(), vec![back, copy]);

        editor.apply_action(EditAction::Delete);
        assert_eq!(editor.scene().ids(), vec![back]);
        assert_eq!(editor.selection(), None);

        // Nothing selected: no-op
        editor.apply_action(EditAction::Delete);
        assert_eq!(editor.scene().len(), 1);
    }

    #[test]
    fn test_duplicated_background_still_covers_frame() {
        let mut editor = Editor::default();
        let background = AssetCandidate::new("bg", "bg.png");
        let id = editor.pick_asset(PanelKind::Background, &background).unwrap();
        let natural = Size::new(1920.0, 1080.0);
        editor.handle_renderer_event(&RendererEvent::ContentMeasured { id, size: natural });

        let copy = editor.duplicate_element(id).unwrap();
        editor.handle_renderer_event(&RendererEvent::ContentMeasured {
            id: copy,
            size: natural,
        });
        assert_eq!(
            editor.scene().get(copy).unwrap().size,
            editor.scene().get(id).unwrap().size
        );
        assert!((editor.scene().get(copy).unwrap().size.height - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_timeline_press_resolves_edge_body_and_track() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementContent::image("a.png"));
        editor.click_background();

        // Bar spans 0..150 px
        editor.handle_timeline_event(&TimelineEvent::Pressed { id, x: 400.0 });
        assert_eq!(editor.selection(), Some(id));
        assert!(editor.timeline_drag().is_none());

        editor.handle_timeline_event(&TimelineEvent::Pressed { id, x: 148.0 });
        assert_eq!(
            editor.timeline_drag().map(|drag| drag.kind),
            Some(TimelineDragKind::ResizeEnd)
        );
        editor.handle_timeline_event(&TimelineEvent::Cancel);

        editor.handle_timeline_event(&TimelineEvent::Pressed { id, x: 40.0 });
        assert!(matches!(
            editor.timeline_drag().map(|drag| drag.kind),
            Some(TimelineDragKind::Move { .. })
        ));
    }

    #[test]
    fn test_render_frame_outlines_selection() {
        let mut editor = Editor::default();
        assert!(editor.render_frame().selection_bounds.is_none());
        editor.add_element(ElementContent::image("a.png"));
        let bounds = editor.render_frame().selection_bounds.unwrap();
        assert_eq!(bounds, kurbo::Rect::new(50.0, 50.0, 250.0, 250.0));
    }

    #[test]
    fn test_visible_at_playhead() {
        let mut editor = Editor::default();
        let early = editor.add_default_text();
        let late = editor.add_element(ElementContent::image("late.png"));
        editor.set_time_span(late, 3.0, 4.0);

        editor.set_playhead(1.0);
        assert_eq!(editor.visible_at_playhead(), vec![early]);
        editor.set_playhead(6.0);
        assert_eq!(editor.visible_at_playhead(), vec![late]);
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let mut config = EditorConfig::default();
        config.camera.min_zoom = 3.0;
        config.camera.max_zoom = 1.0;
        assert!(matches!(
            Editor::try_new(config.clone()),
            Err(ConfigError::Invalid { field: "camera.max_zoom", .. })
        ));
        // The infallible constructor normalises instead of panicking
        let editor = Editor::new(config);
        assert!((editor.camera().zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_replace_scene_drops_stale_selection() {
        let mut editor = Editor::default();
        editor.add_default_text();
        editor.replace_scene(Scene::new());
        assert_eq!(editor.mode(), Mode::Idle);
    }
}
