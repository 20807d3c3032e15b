use std::collections::HashSet;

use aknikki_core::transform::Corner;
use aknikki_core::{
    CameraConfig, ConfigError, Editor, EditorConfig, ElementContent, ElementId, ElementPatch,
    Geometry, HandleKind, LayerDirection, Mode, MouseButton, PanelKind, PointerEvent, PointerHit,
    RendererEvent, TimelineEvent,
};
use kurbo::{Point, Vec2};

fn editor() -> Editor {
    let _ = env_logger::builder().is_test(true).try_init();
    Editor::default()
}

fn ids(editor: &Editor) -> Vec<ElementId> {
    editor.scene().ids()
}

#[test]
fn ids_stay_unique_across_adds_and_duplicates() {
    let mut editor = editor();
    let first = editor.add_element(ElementContent::image("a"));
    let second = editor.add_default_text();
    let mut seen = vec![first, second];
    for _ in 0..5 {
        let last = *seen.last().unwrap();
        seen.push(editor.duplicate_element(last).unwrap());
        seen.push(editor.duplicate_element(first).unwrap());
    }

    let unique: HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), seen.len());
    assert_eq!(editor.scene().len(), seen.len());
}

#[test]
fn deleting_the_selection_clears_it() {
    let mut editor = editor();
    let keep = editor.add_element(ElementContent::image("a"));
    let doomed = editor.add_element(ElementContent::image("b"));
    editor.open_panel(PanelKind::Text);
    assert_eq!(editor.selection(), Some(doomed));

    editor.delete_element(doomed);
    assert_eq!(editor.selection(), None);
    assert!(!editor.action_menu_visible());
    assert_eq!(ids(&editor), vec![keep]);
    assert_eq!(editor.mode(), Mode::PanelOpen(PanelKind::Text));
}

#[test]
fn stale_ids_leave_the_scene_unchanged() {
    let mut editor = editor();
    editor.add_element(ElementContent::image("a"));
    editor.add_default_text();
    let before = editor.scene().clone();
    let stale = ElementId::new();

    editor.update_element(stale, &ElementPatch::position(Point::new(9.0, 9.0)));
    editor.delete_element(stale);
    editor.move_layer(stale, LayerDirection::Forward);
    assert!(editor.duplicate_element(stale).is_none());
    editor.handle_renderer_event(&RendererEvent::DragEnd {
        id: stale,
        position: Point::ZERO,
    });
    editor.handle_timeline_event(&TimelineEvent::EdgePressed { id: stale, x: 10.0 });
    editor.handle_timeline_event(&TimelineEvent::PointerUp { x: 300.0 });

    assert_eq!(editor.scene(), &before);
}

#[test]
fn layer_moves_stop_at_the_ends() {
    let mut editor = editor();
    let back = editor.add_element(ElementContent::image("a"));
    let front = editor.add_element(ElementContent::image("b"));
    let before = editor.scene().clone();

    editor.move_layer(back, LayerDirection::Backward);
    editor.move_layer(front, LayerDirection::Forward);
    assert_eq!(editor.scene(), &before);
}

#[test]
fn resize_drag_never_goes_below_minimum_duration() {
    let mut editor = editor();
    let id = editor.add_element(ElementContent::image("a"));
    let pps = editor.config().timeline.pixels_per_second;
    let min_px = editor.config().timeline.min_duration_px;

    for mouse_x in [-500.0, -1.0, 0.0, 10.0, 29.9, 30.0, 31.0, 600.0] {
        editor.handle_timeline_event(&TimelineEvent::EdgePressed { id, x: 150.0 });
        editor.handle_timeline_event(&TimelineEvent::PointerMove { x: mouse_x });
        let live = editor.timeline_drag().unwrap().live;
        assert!(live.duration * pps >= min_px - 1e-9);
        editor.handle_timeline_event(&TimelineEvent::PointerUp { x: mouse_x });

        let duration = editor.scene().get(id).unwrap().time_span.duration;
        assert!(duration >= 1.0 - 1e-9, "duration {duration} at x={mouse_x}");
    }
}

#[test]
fn degenerate_resize_keeps_pre_gesture_geometry() {
    let mut editor = editor();
    let id = editor.add_element(ElementContent::image("a"));
    let before = editor.scene().get(id).unwrap().geometry;

    for (scale_x, scale_y) in [(0.02, 1.0), (1.0, -0.01), (0.0, 0.0)] {
        editor.handle_renderer_event(&RendererEvent::TransformStart {
            id,
            handle: HandleKind::Corner(Corner::TopLeft),
        });
        editor.handle_renderer_event(&RendererEvent::TransformEnd {
            id,
            geometry: Geometry {
                scale_x,
                scale_y,
                ..before
            },
        });
        assert_eq!(editor.scene().get(id).unwrap().geometry, before);
    }

    // A valid resize still commits
    editor.handle_renderer_event(&RendererEvent::TransformStart {
        id,
        handle: HandleKind::Corner(Corner::TopLeft),
    });
    let resized = Geometry {
        scale_x: 0.5,
        scale_y: 0.5,
        ..before
    };
    editor.handle_renderer_event(&RendererEvent::TransformEnd {
        id,
        geometry: resized,
    });
    assert_eq!(editor.scene().get(id).unwrap().geometry, resized);
}

#[test]
fn scenario_a_add_selects_new_element() {
    let mut editor = editor();
    let e1 = editor.add_element(ElementContent::image("a"));
    assert_eq!(editor.scene().len(), 1);
    assert_eq!(editor.selection(), Some(e1));
}

#[test]
fn scenario_b_move_forward_swaps() {
    let mut editor = editor();
    let e1 = editor.add_element(ElementContent::image("a"));
    let e2 = editor.add_element(ElementContent::image("b"));
    assert_eq!(ids(&editor), vec![e1, e2]);

    editor.move_layer(e1, LayerDirection::Forward);
    assert_eq!(ids(&editor), vec![e2, e1]);
    // Timeline lists the front layer first
    let rows: Vec<_> = editor.timeline_rows().into_iter().map(|row| row.id).collect();
    assert_eq!(rows, vec![e1, e2]);
}

#[test]
fn scenario_c_trailing_edge_drag_sets_duration() {
    let mut editor = editor();
    let e1 = editor.add_element(ElementContent::image("a"));

    let bar = editor.timeline_rows()[0].bar;
    assert!(bar.left.abs() < f64::EPSILON);
    assert!((bar.width - 150.0).abs() < f64::EPSILON);

    editor.handle_timeline_event(&TimelineEvent::EdgePressed { id: e1, x: 150.0 });
    editor.handle_timeline_event(&TimelineEvent::PointerMove { x: 60.0 });
    editor.handle_timeline_event(&TimelineEvent::PointerUp { x: 60.0 });

    let span = editor.scene().get(e1).unwrap().time_span;
    assert!((span.duration - 2.0).abs() < f64::EPSILON);
    assert!(span.start.abs() < f64::EPSILON);
}

#[test]
fn scenario_d_delete_selected() {
    let mut editor = editor();
    let e1 = editor.add_element(ElementContent::image("a"));
    editor.click_background();
    editor.handle_timeline_event(&TimelineEvent::RowClicked { id: e1 });
    assert_eq!(editor.selection(), Some(e1));

    editor.delete_element(e1);
    assert_eq!(editor.selection(), None);
    assert!(!editor.scene().contains(e1));
}

#[test]
fn scenario_e_duplicate_offsets_copy() {
    let mut editor = editor();
    let e1 = editor.add_element(ElementContent::image("a"));
    assert!((editor.scene().get(e1).unwrap().geometry.x - 50.0).abs() < f64::EPSILON);

    let copy = editor.duplicate_element(e1).unwrap();
    assert_ne!(copy, e1);
    assert!((editor.scene().get(copy).unwrap().geometry.x - 70.0).abs() < f64::EPSILON);
    assert_eq!(editor.selection(), Some(copy));
    assert_eq!(editor.scene().index_of(copy), Some(1));
}

#[test]
fn panels_and_selection_are_independent() {
    let mut editor = editor();
    let e1 = editor.add_element(ElementContent::image("a"));

    editor.open_panel(PanelKind::Background);
    editor.open_panel(PanelKind::Character);
    assert_eq!(editor.mode(), Mode::ElementSelectedWithPanel(e1, PanelKind::Character));

    // Re-opening keeps it open
    editor.open_panel(PanelKind::Character);
    assert_eq!(editor.panel(), Some(PanelKind::Character));

    editor.click_background();
    assert_eq!(editor.mode(), Mode::PanelOpen(PanelKind::Character));

    editor.close_panel();
    assert_eq!(editor.mode(), Mode::Idle);

    editor.toggle_panel(PanelKind::Audio);
    editor.toggle_panel(PanelKind::Audio);
    assert_eq!(editor.panel(), None);
}

#[test]
fn broken_renderer_geometry_never_commits() {
    let mut editor = editor();
    let id = editor.add_element(ElementContent::image("a"));
    let before = editor.scene().get(id).unwrap().geometry;

    let cases = [
        (
            HandleKind::Corner(Corner::BottomRight),
            Geometry {
                scale_x: f64::NAN,
                ..before
            },
        ),
        (
            HandleKind::Rotate,
            Geometry {
                scale_x: 0.0,
                rotation_degrees: 30.0,
                ..before
            },
        ),
        (
            HandleKind::Rotate,
            Geometry {
                rotation_degrees: f64::NAN,
                ..before
            },
        ),
    ];
    for (handle, geometry) in cases {
        editor.handle_renderer_event(&RendererEvent::TransformStart { id, handle });
        editor.handle_renderer_event(&RendererEvent::TransformEnd { id, geometry });
        assert_eq!(editor.scene().get(id).unwrap().geometry, before);
    }

    editor.handle_renderer_event(&RendererEvent::DragStart { id });
    editor.handle_renderer_event(&RendererEvent::DragEnd {
        id,
        position: Point::new(f64::INFINITY, 0.0),
    });
    assert_eq!(editor.scene().get(id).unwrap().geometry, before);

    // Still selectable where it was
    editor.click_background();
    let hit = editor.handle_pointer(&PointerEvent::Down {
        position: Point::new(60.0, 60.0),
        button: MouseButton::Left,
    });
    assert_eq!(hit, Some(PointerHit::Element(id)));
}

#[test]
fn unvalidated_config_does_not_panic() {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = EditorConfig {
        camera: CameraConfig {
            min_zoom: 3.0,
            max_zoom: 1.0,
            ..CameraConfig::default()
        },
        ..EditorConfig::default()
    };
    assert!(matches!(
        Editor::try_new(config.clone()),
        Err(ConfigError::Invalid { .. })
    ));

    let mut editor = Editor::new(config);
    editor.handle_pointer(&PointerEvent::Scroll {
        position: Point::new(10.0, 10.0),
        delta: Vec2::new(0.0, -1.0),
    });
    let zoom = editor.camera().zoom;
    assert!((1.0..=3.0).contains(&zoom));
}
