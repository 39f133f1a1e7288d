//! Rendering: draws the cell set onto a [`Surface`].
//!
//! The renderer receives read-only views of the cell set, layout and view
//! transform and issues draw calls in a fixed order:
//!
//! 1. clear the surface,
//! 2. connection lines,
//! 3. cell fills and outlines,
//! 4. the coordinate label of the hovered cell, if any.
//!
//! Every point is mapped through [`ViewTransform::map_to_screen`] before it
//! reaches the surface, so surfaces work purely in screen pixels. Line widths
//! and the label size are given in map pixels and scaled by zoom here.
//!
//! The browser's [`CanvasRenderingContext2d`] implements [`Surface`]; the host
//! binary provides an SVG one.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{
    CELL_DRAW_SCALE, CELL_LINE_WIDTH, CONNECTION_LINE_WIDTH, HOVER_LINE_WIDTH, LABEL_BASELINE_OFFSET, LABEL_FONT_PX,
};
use crate::geometry::{MapLayout, Point, hex_vertices};
use crate::map::{Cell, CellKind, CellSet};
use crate::view::{ViewTransform, Viewport};

pub const BACKGROUND: &str = "#000000";
pub const CONNECTION_COLOR: &str = "#00ffff40";
pub const LABEL_COLOR: &str = "#ffffff";
pub const LABEL_FONT_FAMILY: &str = "monospace";

/// Outline color and width in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
}

/// Centered text style. `size_px` is in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle<'a> {
    pub color: &'a str,
    pub size_px: f64,
    pub family: &'a str,
}

/// A 2D drawing target addressed in screen pixels.
pub trait Surface {
    type Error;

    /// Reset the whole viewport to `color`.
    fn clear(&mut self, viewport: Viewport, color: &str) -> Result<(), Self::Error>;

    fn line(&mut self, from: Point, to: Point, stroke: Stroke<'_>) -> Result<(), Self::Error>;

    /// Closed, filled and stroked polygon.
    fn polygon(&mut self, points: &[Point], fill: &str, stroke: Stroke<'_>) -> Result<(), Self::Error>;

    /// Text horizontally centered on `at`, baseline at `at.y`.
    fn text(&mut self, text: &str, at: Point, style: TextStyle<'_>) -> Result<(), Self::Error>;
}

/// Fill and stroke colors of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
}

/// Palette lookup by kind and hover state.
#[must_use]
pub fn cell_style(kind: CellKind, hovered: bool) -> CellStyle {
    match (kind, hovered) {
        (CellKind::Room, false) => CellStyle { fill: "#ff880044", stroke: "#ff8800aa" },
        (CellKind::Room, true) => CellStyle { fill: "#ff8800aa", stroke: "#ff8800" },
        (CellKind::Corridor, false) => CellStyle { fill: "#00ffff22", stroke: "#00ffff88" },
        (CellKind::Corridor, true) => CellStyle { fill: "#00ffff44", stroke: "#00ffff" },
    }
}

/// Everything one frame is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub cells: &'a CellSet,
    pub layout: &'a MapLayout,
    pub view: &'a ViewTransform,
    pub hex_size: f64,
    pub hovered: Option<&'a str>,
}

impl Scene<'_> {
    fn to_screen(&self, map_pt: Point) -> Point {
        self.view.map_to_screen(map_pt, self.layout)
    }

    fn is_hovered(&self, cell: &Cell) -> bool {
        self.hovered == Some(cell.id.as_str())
    }
}

/// Draw one frame. Returns `Ok(false)` without touching the surface when the
/// viewport or the cell set is empty.
///
/// # Errors
///
/// Returns the surface's error from the first draw call that fails.
pub fn draw<S: Surface>(surface: &mut S, scene: &Scene<'_>) -> Result<bool, S::Error> {
    let viewport = scene.view.viewport();
    if viewport.is_empty() || scene.cells.is_empty() {
        tracing::debug!(?viewport, cells = scene.cells.len(), "skipping draw");
        return Ok(false);
    }

    surface.clear(viewport, BACKGROUND)?;
    draw_links(surface, scene)?;
    for cell in scene.cells {
        draw_cell(surface, scene, cell)?;
    }
    if let Some(cell) = scene.hovered.and_then(|id| scene.cells.get(id)) {
        draw_label(surface, scene, cell)?;
    }
    Ok(true)
}

// =============================================================
// Layers
// =============================================================

fn draw_links<S: Surface>(surface: &mut S, scene: &Scene<'_>) -> Result<(), S::Error> {
    let zoom = scene.view.zoom();
    let stroke = Stroke { color: CONNECTION_COLOR, width: CONNECTION_LINE_WIDTH * zoom };
    for (from, to) in scene.cells.links() {
        let a = scene.to_screen(from.coord().to_pixel(scene.hex_size));
        let b = scene.to_screen(to.coord().to_pixel(scene.hex_size));
        surface.line(a, b, stroke)?;
    }
    Ok(())
}

fn draw_cell<S: Surface>(surface: &mut S, scene: &Scene<'_>, cell: &Cell) -> Result<(), S::Error> {
    let hovered = scene.is_hovered(cell);
    let style = cell_style(cell.kind, hovered);
    let width = if hovered { HOVER_LINE_WIDTH } else { CELL_LINE_WIDTH };

    let center = cell.coord().to_pixel(scene.hex_size);
    let vertices = hex_vertices(center, scene.hex_size * CELL_DRAW_SCALE).map(|v| scene.to_screen(v));
    surface.polygon(&vertices, style.fill, Stroke { color: style.stroke, width: width * scene.view.zoom() })
}

fn draw_label<S: Surface>(surface: &mut S, scene: &Scene<'_>, cell: &Cell) -> Result<(), S::Error> {
    let center = cell.coord().to_pixel(scene.hex_size);
    let at = scene.to_screen(center + Point::new(0.0, LABEL_BASELINE_OFFSET));
    let style = TextStyle { color: LABEL_COLOR, size_px: LABEL_FONT_PX * scene.view.zoom(), family: LABEL_FONT_FAMILY };
    surface.text(&format!("{},{}", cell.q, cell.r), at, style)
}

// =============================================================
// Canvas2D
// =============================================================

impl Surface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn clear(&mut self, viewport: Viewport, color: &str) -> Result<(), JsValue> {
        self.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        self.clear_rect(0.0, 0.0, viewport.width, viewport.height);
        self.set_fill_style_str(color);
        self.fill_rect(0.0, 0.0, viewport.width, viewport.height);
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke<'_>) -> Result<(), JsValue> {
        self.begin_path();
        self.move_to(from.x, from.y);
        self.line_to(to.x, to.y);
        apply_stroke(self, stroke);
        self.stroke();
        Ok(())
    }

    fn polygon(&mut self, points: &[Point], fill: &str, stroke: Stroke<'_>) -> Result<(), JsValue> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.begin_path();
        self.move_to(first.x, first.y);
        for p in rest {
            self.line_to(p.x, p.y);
        }
        self.close_path();

        self.set_fill_style_str(fill);
        self.fill();
        apply_stroke(self, stroke);
        self.stroke();
        Ok(())
    }

    fn text(&mut self, text: &str, at: Point, style: TextStyle<'_>) -> Result<(), JsValue> {
        self.set_fill_style_str(style.color);
        self.set_font(&format!("{}px {}", style.size_px, style.family));
        self.set_text_align("center");
        self.fill_text(text, at.x, at.y)
    }
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: Stroke<'_>) {
    ctx.set_stroke_style_str(stroke.color);
    ctx.set_line_width(stroke.width);
}
