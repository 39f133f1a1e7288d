use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::ViewConfig;
use crate::geometry::{MapLayout, Point};
use crate::gesture::{GestureController, GestureOutput, GestureState};
use crate::hit;
use crate::input::{InputEvent, MouseInput, TouchInput, route_mouse, route_touch};
use crate::map::{Cell, CellId, CellSet};
use crate::render::{self, Scene, Surface};
use crate::view::{DeviceClass, ViewState, ViewTransform, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine calls for the host to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// Something visible changed; schedule a repaint.
    RenderNeeded,
    /// The hovered cell changed (`None` when cleared).
    HoverChanged(Option<CellId>),
    /// CSS cursor name for the canvas element.
    SetCursor(String),
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    cells: CellSet,
    layout: MapLayout,
    view: ViewTransform,
    gesture: GestureController,
    device: DeviceClass,
    config: ViewConfig,
    hovered: Option<CellId>,
    /// Auto-fit is owed once a viewport and cells are both present.
    fit_pending: bool,
    dirty: bool,
}

impl EngineCore {
    /// Invalid config fields fall back to their defaults.
    #[must_use]
    pub fn new(config: ViewConfig) -> Self {
        let config = config.sanitized();
        Self { gesture: GestureController::new(config.gesture), config, ..Self::default() }
    }

    // --- Data inputs ---

    /// Replace the cell set. Resets gesture and hover state and schedules an auto-fit.
    pub fn load_cells(&mut self, cells: impl Into<CellSet>) -> Vec<Action> {
        let cells = cells.into();
        self.layout = MapLayout::compute(cells.coords(), self.config.hex_size, self.config.padding);
        self.fit_pending = !cells.is_empty();
        self.cells = cells;
        self.gesture.reset();
        tracing::debug!(cells = self.cells.len(), size = ?self.layout.size, "cells loaded");

        let mut actions = Vec::new();
        self.set_hovered(None, &mut actions);
        self.apply_pending_fit();
        self.dirty = true;
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Update the container size and device class.
    ///
    /// Entering the mobile class while cells are loaded re-fits the view; other
    /// resizes keep the current zoom and pan.
    pub fn set_viewport(&mut self, viewport: Viewport, device: DeviceClass) -> Vec<Action> {
        let entering_mobile = device.is_mobile() && !self.device.is_mobile();
        self.device = device;
        if entering_mobile && !self.cells.is_empty() {
            tracing::debug!("device became mobile; re-fitting");
            self.fit_pending = true;
        }
        let resized = self.view.set_viewport(viewport);
        let fitted = self.apply_pending_fit();
        self.render_if(resized || fitted)
    }

    // --- View controls ---

    /// Re-run auto-fit for the current cell set. No-op without cells.
    pub fn reset_view(&mut self) -> Vec<Action> {
        if self.cells.is_empty() {
            return Vec::new();
        }
        self.fit_pending = true;
        let fitted = self.apply_pending_fit();
        self.render_if(fitted)
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        let changed = self.view.zoom_in();
        self.render_if(changed)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        let changed = self.view.zoom_out();
        self.render_if(changed)
    }

    /// Set the hovered cell directly, e.g. from a host-side list. Unknown ids clear it.
    pub fn set_hovered_cell(&mut self, id: Option<&str>) -> Vec<Action> {
        let id = id.and_then(|id| self.cells.get(id)).map(|cell| cell.id.clone());
        let mut actions = Vec::new();
        self.set_hovered(id, &mut actions);
        if !actions.is_empty() {
            self.dirty = true;
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Input events ---

    pub fn on_wheel(&mut self, delta_y: f64) -> Vec<Action> {
        let outputs = self.gesture.wheel(&mut self.view, delta_y);
        self.apply(outputs)
    }

    /// Mouse event. Emits cursor changes when a pan starts or ends.
    pub fn on_mouse(&mut self, input: MouseInput) -> Vec<Action> {
        let was_panning = self.gesture.is_panning();
        let outputs = route_mouse(&mut self.gesture, &mut self.view, input);
        let mut actions = self.apply(outputs);
        match (was_panning, self.gesture.is_panning()) {
            (false, true) => actions.push(Action::SetCursor("grabbing".into())),
            (true, false) => actions.push(Action::SetCursor("grab".into())),
            _ => {}
        }
        actions
    }

    pub fn on_touch(&mut self, input: &TouchInput) -> Vec<Action> {
        let outputs = route_touch(&mut self.gesture, &mut self.view, input);
        self.apply(outputs)
    }

    /// Dispatch any recorded or live [`InputEvent`].
    pub fn on_input(&mut self, event: &InputEvent) -> Vec<Action> {
        match event {
            InputEvent::Mouse(input) => self.on_mouse(*input),
            InputEvent::Touch(input) => self.on_touch(input),
            InputEvent::Wheel(input) => self.on_wheel(input.delta_y),
        }
    }

    // --- Render loop ---

    /// Consume the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Draw the frame if anything changed since the last draw.
    ///
    /// # Errors
    ///
    /// Propagates the surface's error.
    pub fn repaint<S: Surface>(&mut self, surface: &mut S) -> Result<bool, S::Error> {
        if !self.take_dirty() {
            return Ok(false);
        }
        self.render_to(surface)
    }

    /// Draw the frame unconditionally, applying any owed auto-fit first.
    ///
    /// # Errors
    ///
    /// Propagates the surface's error.
    pub fn render_to<S: Surface>(&mut self, surface: &mut S) -> Result<bool, S::Error> {
        self.apply_pending_fit();
        self.dirty = false;
        render::draw(surface, &self.scene())
    }

    #[must_use]
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            cells: &self.cells,
            layout: &self.layout,
            view: &self.view,
            hex_size: self.config.hex_size,
            hovered: self.hovered.as_deref(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn hovered_cell_id(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// The cell under a screen point, if any.
    #[must_use]
    pub fn hit_test_screen(&self, screen: Point) -> Option<&Cell> {
        hit::hit_test_screen(screen, &self.view, &self.layout, &self.cells, self.config.hex_size)
    }

    #[must_use]
    pub fn cells(&self) -> &CellSet {
        &self.cells
    }

    #[must_use]
    pub fn layout(&self) -> MapLayout {
        self.layout
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.view.state()
    }

    #[must_use]
    pub fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    #[must_use]
    pub fn device(&self) -> DeviceClass {
        self.device
    }

    #[must_use]
    pub fn config(&self) -> ViewConfig {
        self.config
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // --- Internals ---

    /// Resolve gesture outputs against the cell set.
    fn apply(&mut self, outputs: Vec<GestureOutput>) -> Vec<Action> {
        let mut actions = Vec::new();
        let mut view_changed = false;
        for output in outputs {
            match output {
                GestureOutput::ViewChanged => view_changed = true,
                GestureOutput::Hover(pos) | GestureOutput::Tap(pos) => {
                    let id = self.hit_test_screen(pos).map(|cell| cell.id.clone());
                    self.set_hovered(id, &mut actions);
                }
                GestureOutput::ClearHover => self.set_hovered(None, &mut actions),
            }
        }
        if view_changed || !actions.is_empty() {
            self.dirty = true;
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn set_hovered(&mut self, id: Option<CellId>, actions: &mut Vec<Action>) {
        if self.hovered == id {
            return;
        }
        self.hovered.clone_from(&id);
        actions.push(Action::HoverChanged(id));
    }

    fn apply_pending_fit(&mut self) -> bool {
        if !self.fit_pending || self.cells.is_empty() || self.view.viewport().is_empty() {
            return false;
        }
        self.view.auto_fit(self.layout.size, self.device);
        self.fit_pending = false;
        true
    }

    /// Force a repaint, e.g. after the host cleared the surface.
    pub fn invalidate(&mut self) -> Vec<Action> {
        self.render_if(true)
    }

    fn render_if(&mut self, changed: bool) -> Vec<Action> {
        if !changed {
            return Vec::new();
        }
        self.dirty = true;
        vec![Action::RenderNeeded]
    }
}

/// PNG export of the current canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub data_url: String,
    pub file_name: String,
}

/// New backing-store size for `viewport`, or `None` when the canvas already
/// has it or the viewport is empty.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn canvas_resize(current: (u32, u32), viewport: Viewport) -> Option<(u32, u32)> {
    if viewport.is_empty() {
        return None;
    }
    let target = (viewport.width.round() as u32, viewport.height.round() as u32);
    (target != current).then_some(target)
}

/// Download name for a snapshot taken at `timestamp_ms` (Unix epoch millis).
#[must_use]
pub fn snapshot_file_name(timestamp_ms: f64) -> String {
    format!("hexmap-{:.0}.png", timestamp_ms.max(0.0).floor())
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, config: ViewConfig) -> Self {
        Self { canvas, core: EngineCore::new(config) }
    }

    // --- Delegated data inputs ---

    pub fn load_cells(&mut self, cells: Vec<Cell>) -> Vec<Action> {
        self.core.load_cells(cells)
    }

    // --- Viewport ---

    /// Resize the backing canvas to the container and update the core.
    ///
    /// Writing the canvas size clears its bitmap, so the canvas is only
    /// touched when its pixel size changes, and a repaint is always requested
    /// when it was.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, device: DeviceClass) -> Vec<Action> {
        let viewport = Viewport::new(width_css, height_css);
        let resize = canvas_resize((self.canvas.width(), self.canvas.height()), viewport);
        if let Some((width, height)) = resize {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        let mut actions = self.core.set_viewport(viewport, device);
        if resize.is_some() && !actions.contains(&Action::RenderNeeded) {
            actions.extend(self.core.invalidate());
        }
        actions
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.core.reset_view()
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.core.zoom_in()
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.core.zoom_out()
    }

    // --- Input events ---

    pub fn on_input(&mut self, event: &InputEvent) -> Vec<Action> {
        self.core.on_input(event)
    }

    pub fn on_mouse(&mut self, input: MouseInput) -> Vec<Action> {
        self.core.on_mouse(input)
    }

    pub fn on_touch(&mut self, input: &TouchInput) -> Vec<Action> {
        self.core.on_touch(input)
    }

    pub fn on_wheel(&mut self, delta_y: f64) -> Vec<Action> {
        self.core.on_wheel(delta_y)
    }

    // --- Render ---

    /// Draw the current state to the canvas. A canvas without a 2D context is skipped.
    ///
    /// # Errors
    ///
    /// Returns `Err` if obtaining the context or any `Canvas2D` call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let Some(mut ctx) = self.context()? else {
            tracing::debug!("canvas has no 2d context; skipping draw");
            return Ok(());
        };
        self.core.render_to(&mut ctx)?;
        Ok(())
    }

    /// Encode the visible canvas as a PNG data URL.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas refuses to encode (e.g. it is tainted).
    pub fn request_snapshot(&self) -> Result<Snapshot, JsValue> {
        let data_url = self.canvas.to_data_url_with_type("image/png")?;
        Ok(Snapshot { data_url, file_name: snapshot_file_name(js_sys::Date::now()) })
    }

    fn context(&self) -> Result<Option<CanvasRenderingContext2d>, JsValue> {
        self.canvas
            .get_context("2d")?
            .map(|obj| obj.dyn_into::<CanvasRenderingContext2d>().map_err(JsValue::from))
            .transpose()
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn hovered_cell_id(&self) -> Option<&str> {
        self.core.hovered_cell_id()
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.core.view_state()
    }
}
