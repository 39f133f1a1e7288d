#![allow(clippy::float_cmp)]

use std::convert::Infallible;

use super::*;
use crate::config::GestureConfig;
use crate::input::{MouseAction, TouchPhase, WheelInput};
use crate::map::CellKind;
use crate::render::{Stroke, TextStyle};
use crate::view::fit_zoom;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn cell(id: &str, q: i32, r: i32) -> Cell {
    Cell { id: id.to_owned(), q, r, kind: CellKind::Room, connections: Vec::new() }
}

fn sample_cells() -> Vec<Cell> {
    vec![cell("a", 0, 0), cell("b", 1, 0), cell("c", 3, 2)]
}

fn desktop() -> Viewport {
    Viewport::new(800.0, 600.0)
}

/// Core with cells loaded into an 800×600 desktop viewport.
fn loaded() -> EngineCore {
    let mut core = EngineCore::new(ViewConfig::default());
    core.set_viewport(desktop(), DeviceClass::Desktop);
    core.load_cells(sample_cells());
    core.take_dirty();
    core
}

/// Screen position of a cell's center under the current view.
fn screen_of(core: &EngineCore, q: i32, r: i32) -> Point {
    let center = crate::geometry::AxialCoord::new(q, r).to_pixel(core.config().hex_size);
    core.scene().view.map_to_screen(center, &core.layout())
}

fn mouse(action: MouseAction, pos: Point) -> MouseInput {
    MouseInput::new(action, pos)
}

fn touch(phase: TouchPhase, touches: &[Point], changed: &[Point]) -> TouchInput {
    TouchInput::new(phase, touches.to_vec(), changed.to_vec())
}

fn expected_fit(core: &EngineCore) -> f64 {
    fit_zoom(core.view_state().viewport, core.layout().size, core.device())
}

/// Counts draw calls.
#[derive(Default)]
struct Counter {
    calls: usize,
}

impl Surface for Counter {
    type Error = Infallible;

    fn clear(&mut self, _: Viewport, _: &str) -> Result<(), Infallible> {
        self.calls += 1;
        Ok(())
    }

    fn line(&mut self, _: Point, _: Point, _: Stroke<'_>) -> Result<(), Infallible> {
        self.calls += 1;
        Ok(())
    }

    fn polygon(&mut self, _: &[Point], _: &str, _: Stroke<'_>) -> Result<(), Infallible> {
        self.calls += 1;
        Ok(())
    }

    fn text(&mut self, _: &str, _: Point, _: TextStyle<'_>) -> Result<(), Infallible> {
        self.calls += 1;
        Ok(())
    }
}

fn drawn(res: Result<bool, Infallible>) -> bool {
    match res {
        Ok(drawn) => drawn,
        Err(never) => match never {},
    }
}

// =============================================================
// EngineCore: construction
// =============================================================

#[test]
fn core_new_is_idle_and_clean() {
    let core = EngineCore::new(ViewConfig::default());
    assert!(core.cells().is_empty());
    assert_eq!(core.hovered_cell_id(), None);
    assert_eq!(core.view_state(), ViewState::default());
    assert_eq!(core.gesture_state(), GestureState::Idle);
    assert!(!core.is_dirty());
}

// =============================================================
// EngineCore: auto-fit triggers
// =============================================================

#[test]
fn load_with_viewport_fits_immediately() {
    let core = loaded();
    let state = core.view_state();
    assert_eq!(state.zoom, expected_fit(&core));
    assert_eq!(state.pan, Point::ORIGIN);
}

#[test]
fn load_before_viewport_defers_fit() {
    let mut core = EngineCore::new(ViewConfig::default());
    let actions = core.load_cells(sample_cells());
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.view_state().zoom, 1.0);

    let actions = core.set_viewport(desktop(), DeviceClass::Desktop);
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.view_state().zoom, expected_fit(&core));
}

#[test]
fn load_empty_set_does_not_fit() {
    let mut core = EngineCore::new(ViewConfig::default());
    core.set_viewport(desktop(), DeviceClass::Desktop);
    core.load_cells(Vec::new());
    assert_eq!(core.view_state().zoom, 1.0);
}

#[test]
fn plain_resize_keeps_zoom_and_pan() {
    let mut core = loaded();
    core.zoom_out();
    core.on_mouse(mouse(MouseAction::Down, pt(0.0, 0.0)));
    core.on_mouse(mouse(MouseAction::Move, pt(10.0, 0.0)));
    core.on_mouse(mouse(MouseAction::Up, pt(10.0, 0.0)));
    let before = core.view_state();

    let actions = core.set_viewport(Viewport::new(1024.0, 768.0), DeviceClass::Tablet);
    assert_eq!(actions, vec![Action::RenderNeeded]);
    let after = core.view_state();
    assert_eq!(after.zoom, before.zoom);
    assert_eq!(after.pan, before.pan);
}

#[test]
fn same_viewport_is_a_noop() {
    let mut core = loaded();
    assert!(core.set_viewport(desktop(), DeviceClass::Desktop).is_empty());
}

#[test]
fn entering_mobile_refits() {
    let mut core = loaded();
    core.zoom_out();
    let actions = core.set_viewport(desktop(), DeviceClass::Mobile);
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.view_state().zoom, expected_fit(&core));
    assert_eq!(core.view_state().pan, Point::ORIGIN);
}

#[test]
fn staying_mobile_does_not_refit() {
    let mut core = loaded();
    core.set_viewport(desktop(), DeviceClass::Mobile);
    core.zoom_out();
    let zoom = core.view_state().zoom;
    core.set_viewport(Viewport::new(400.0, 700.0), DeviceClass::Mobile);
    assert_eq!(core.view_state().zoom, zoom);
}

#[test]
fn reset_view_refits() {
    let mut core = loaded();
    core.zoom_out();
    core.on_wheel(1.0);
    assert_ne!(core.view_state().zoom, expected_fit(&core));
    let actions = core.reset_view();
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.view_state().zoom, expected_fit(&core));
    assert_eq!(core.view_state().pan, Point::ORIGIN);
}

#[test]
fn reset_view_without_cells_is_noop() {
    let mut core = EngineCore::new(ViewConfig::default());
    core.set_viewport(desktop(), DeviceClass::Desktop);
    assert!(core.reset_view().is_empty());
}

// =============================================================
// EngineCore: zoom controls
// =============================================================

#[test]
fn zoom_buttons_step_by_fixed_factor() {
    let mut core = loaded();
    let zoom = core.view_state().zoom;
    assert_eq!(core.zoom_out(), vec![Action::RenderNeeded]);
    assert!((core.view_state().zoom - zoom / 1.2).abs() < 1e-9);
    assert!(core.is_dirty());
}

#[test]
fn zoom_in_at_ceiling_reports_nothing() {
    let mut core = loaded();
    for _ in 0..50 {
        core.zoom_in();
    }
    assert_eq!(core.view_state().zoom, 3.0);
    assert!(core.zoom_in().is_empty());
}

// =============================================================
// EngineCore: mouse
// =============================================================

#[test]
fn mouse_pan_sets_cursor_and_moves_view() {
    let mut core = loaded();
    let actions = core.on_mouse(mouse(MouseAction::Down, pt(100.0, 100.0)));
    assert_eq!(actions, vec![Action::SetCursor("grabbing".into())]);

    let actions = core.on_mouse(mouse(MouseAction::Move, pt(130.0, 80.0)));
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.view_state().pan, pt(30.0, -20.0));

    let actions = core.on_mouse(mouse(MouseAction::Up, pt(130.0, 80.0)));
    assert_eq!(actions, vec![Action::SetCursor("grab".into())]);
}

#[test]
fn mouse_hover_updates_hovered_cell_once() {
    let mut core = loaded();
    let pos = screen_of(&core, 1, 0);
    let actions = core.on_mouse(mouse(MouseAction::Move, pos));
    assert_eq!(actions, vec![Action::HoverChanged(Some("b".into())), Action::RenderNeeded]);
    assert_eq!(core.hovered_cell_id(), Some("b"));

    assert!(core.on_mouse(mouse(MouseAction::Move, pos + pt(1.0, 1.0))).is_empty());
}

#[test]
fn mouse_hover_off_map_clears() {
    let mut core = loaded();
    core.on_mouse(mouse(MouseAction::Move, screen_of(&core, 0, 0)));
    let actions = core.on_mouse(mouse(MouseAction::Move, pt(-500.0, -500.0)));
    assert_eq!(actions, vec![Action::HoverChanged(None), Action::RenderNeeded]);
    assert_eq!(core.hovered_cell_id(), None);
}

#[test]
fn mouse_leave_clears_hover_and_ends_pan() {
    let mut core = loaded();
    core.on_mouse(mouse(MouseAction::Move, screen_of(&core, 0, 0)));
    core.on_mouse(mouse(MouseAction::Down, pt(10.0, 10.0)));
    let actions = core.on_mouse(mouse(MouseAction::Leave, pt(10.0, 10.0)));
    assert_eq!(
        actions,
        vec![Action::HoverChanged(None), Action::RenderNeeded, Action::SetCursor("grab".into())]
    );
    assert_eq!(core.gesture_state(), GestureState::Idle);
}

#[test]
fn hover_with_no_cells_hits_nothing() {
    let mut core = EngineCore::new(ViewConfig::default());
    core.set_viewport(desktop(), DeviceClass::Desktop);
    assert!(core.on_mouse(mouse(MouseAction::Move, pt(400.0, 300.0))).is_empty());
}

// =============================================================
// EngineCore: touch
// =============================================================

#[test]
fn tap_selects_cell_under_finger() {
    let mut core = loaded();
    let pos = screen_of(&core, 3, 2);
    core.on_touch(&touch(TouchPhase::Start, &[pos], &[pos]));
    let moved = pos + pt(3.0, 0.0);
    core.on_touch(&touch(TouchPhase::Move, &[moved], &[moved]));
    let actions = core.on_touch(&touch(TouchPhase::End, &[], &[moved]));
    assert_eq!(actions, vec![Action::HoverChanged(Some("c".into())), Action::RenderNeeded]);
    assert_eq!(core.view_state().pan, Point::ORIGIN);
}

#[test]
fn touch_drag_pans_without_selecting() {
    let mut core = loaded();
    let pos = screen_of(&core, 3, 2);
    core.on_touch(&touch(TouchPhase::Start, &[pos], &[pos]));
    let moved = pos + pt(6.0, 0.0);
    assert_eq!(core.on_touch(&touch(TouchPhase::Move, &[moved], &[moved])), vec![Action::RenderNeeded]);
    assert!(core.on_touch(&touch(TouchPhase::End, &[], &[moved])).is_empty());
    assert_eq!(core.hovered_cell_id(), None);
    assert_eq!(core.view_state().pan, pt(6.0, 0.0));
}

#[test]
fn pinch_zooms_view() {
    let mut core = loaded();
    let zoom = core.view_state().zoom;
    core.on_touch(&touch(TouchPhase::Start, &[pt(100.0, 100.0), pt(200.0, 100.0)], &[]));
    let actions = core.on_touch(&touch(TouchPhase::Move, &[pt(100.0, 100.0), pt(180.0, 100.0)], &[]));
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert!((core.view_state().zoom - zoom * 0.8).abs() < 1e-9);
}

#[test]
fn load_resets_gesture_and_hover() {
    let mut core = loaded();
    core.on_mouse(mouse(MouseAction::Move, screen_of(&core, 0, 0)));
    core.on_touch(&touch(TouchPhase::Start, &[pt(1.0, 1.0)], &[]));
    let actions = core.load_cells(vec![cell("z", 5, 5)]);
    assert_eq!(actions, vec![Action::HoverChanged(None), Action::RenderNeeded]);
    assert_eq!(core.gesture_state(), GestureState::Idle);
}

// =============================================================
// EngineCore: on_input
// =============================================================

#[test]
fn on_input_dispatches_recorded_events() {
    let mut core = loaded();
    let zoom = core.view_state().zoom;
    let event: InputEvent = serde_json::from_str(r#"{"type":"wheel","delta_y":-1.0}"#).unwrap();
    assert_eq!(core.on_input(&event), vec![Action::RenderNeeded]);
    assert!((core.view_state().zoom - (zoom * 1.1).min(3.0)).abs() < 1e-9);

    let down = InputEvent::Mouse(mouse(MouseAction::Down, pt(0.0, 0.0)));
    assert_eq!(core.on_input(&down), vec![Action::SetCursor("grabbing".into())]);
}

#[test]
fn wheel_at_floor_is_quiet() {
    let mut core = loaded();
    for _ in 0..100 {
        core.on_input(&InputEvent::Wheel(WheelInput { delta_y: 1.0 }));
    }
    assert!(core.on_wheel(1.0).is_empty());
}

// =============================================================
// EngineCore: render loop
// =============================================================

#[test]
fn repaint_only_when_dirty() {
    let mut core = EngineCore::new(ViewConfig::default());
    core.set_viewport(desktop(), DeviceClass::Desktop);
    core.load_cells(sample_cells());
    let mut surface = Counter::default();

    assert!(drawn(core.repaint(&mut surface)));
    assert!(surface.calls > 0);
    let calls = surface.calls;

    assert!(!drawn(core.repaint(&mut surface)));
    assert_eq!(surface.calls, calls);

    core.zoom_out();
    assert!(drawn(core.repaint(&mut surface)));
    assert!(surface.calls > calls);
}

#[test]
fn render_without_viewport_draws_nothing() {
    let mut core = EngineCore::new(ViewConfig::default());
    core.load_cells(sample_cells());
    let mut surface = Counter::default();
    assert!(!drawn(core.render_to(&mut surface)));
    assert_eq!(surface.calls, 0);
}

#[test]
fn scene_reflects_hover() {
    let mut core = loaded();
    core.on_mouse(mouse(MouseAction::Move, screen_of(&core, 1, 0)));
    assert_eq!(core.scene().hovered, Some("b"));
}

#[test]
fn custom_hex_size_changes_layout() {
    let mut small = EngineCore::new(ViewConfig { hex_size: 10.0, ..ViewConfig::default() });
    small.load_cells(sample_cells());
    let big = loaded();
    assert!(small.layout().size.width < big.layout().size.width);
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let bad = ViewConfig {
        hex_size: 0.0,
        padding: f64::NAN,
        gesture: GestureConfig { tap_slop_px: f64::NAN, min_pinch_distance_px: 1.0 },
    };
    let mut core = EngineCore::new(bad);
    assert_eq!(core.config(), ViewConfig::default());

    core.set_viewport(desktop(), DeviceClass::Desktop);
    core.load_cells(sample_cells());
    let pos = screen_of(&core, 0, 0);
    core.on_touch(&touch(TouchPhase::Start, &[pos], &[pos]));
    let moved = pos + pt(2.0, 0.0);
    core.on_touch(&touch(TouchPhase::Move, &[moved], &[moved]));
    let actions = core.on_touch(&touch(TouchPhase::End, &[], &[moved]));
    assert_eq!(actions, vec![Action::HoverChanged(Some("a".into())), Action::RenderNeeded]);
}

// =============================================================
// Canvas sizing
// =============================================================

#[test]
fn canvas_resize_skips_unchanged_size() {
    assert_eq!(canvas_resize((800, 600), desktop()), None);
    assert_eq!(canvas_resize((800, 600), Viewport::new(800.4, 599.6)), None);
}

#[test]
fn canvas_resize_reports_new_size() {
    assert_eq!(canvas_resize((300, 150), desktop()), Some((800, 600)));
    assert_eq!(canvas_resize((800, 600), Viewport::new(801.0, 600.0)), Some((801, 600)));
}

#[test]
fn canvas_resize_ignores_empty_viewport() {
    assert_eq!(canvas_resize((800, 600), Viewport::new(0.0, 600.0)), None);
}

#[test]
fn device_switch_at_same_size_requests_nothing_until_invalidated() {
    let mut core = loaded();
    assert!(core.set_viewport(desktop(), DeviceClass::Tablet).is_empty());
    assert!(!core.is_dirty());
    assert_eq!(core.invalidate(), vec![Action::RenderNeeded]);
    assert!(core.take_dirty());
}

// =============================================================
// Snapshot naming
// =============================================================

#[test]
fn snapshot_name_uses_whole_millis() {
    assert_eq!(snapshot_file_name(1_700_000_000_123.7), "hexmap-1700000000123.png");
}

#[test]
fn snapshot_name_never_negative() {
    assert_eq!(snapshot_file_name(-5.0), "hexmap-0.png");
}

#[test]
fn actions_serialize_tagged() {
    assert_eq!(serde_json::to_value(Action::RenderNeeded).unwrap(), serde_json::json!({ "action": "render_needed" }));
    assert_eq!(
        serde_json::to_value(Action::HoverChanged(Some("a".into()))).unwrap(),
        serde_json::json!({ "action": "hover_changed", "value": "a" })
    );
}

#[test]
fn set_hovered_cell_accepts_known_ids_only() {
    let mut core = loaded();
    assert_eq!(core.set_hovered_cell(Some("c")), vec![Action::HoverChanged(Some("c".into())), Action::RenderNeeded]);
    assert!(core.set_hovered_cell(Some("c")).is_empty());
    assert_eq!(core.set_hovered_cell(Some("nope")), vec![Action::HoverChanged(None), Action::RenderNeeded]);
    assert_eq!(core.hovered_cell_id(), None);
}
