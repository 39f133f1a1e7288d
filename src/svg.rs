//! SVG drawing surface for headless snapshots.

use std::fmt::Write;

use hexcanvas::geometry::Point;
use hexcanvas::render::{Stroke, Surface, TextStyle};
use hexcanvas::view::Viewport;

/// Accumulates draw calls as SVG elements.
#[derive(Debug, Default)]
pub struct SvgSurface {
    viewport: Viewport,
    body: String,
}

impl SvgSurface {
    /// Surface sized to `viewport` until the first clear.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport, body: String::new() }
    }

    /// Wrap the recorded elements in an `<svg>` document sized to the last
    /// cleared viewport, or the initial one when nothing was drawn.
    #[must_use]
    pub fn finish(self) -> String {
        let Viewport { width, height } = self.viewport;
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
             viewBox=\"0 0 {width} {height}\">\n{}</svg>\n",
            self.body
        )
    }
}

impl Surface for SvgSurface {
    type Error = std::fmt::Error;

    fn clear(&mut self, viewport: Viewport, color: &str) -> Result<(), Self::Error> {
        self.viewport = viewport;
        self.body.clear();
        writeln!(self.body, "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{color}\"/>", viewport.width, viewport.height)
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke<'_>) -> Result<(), Self::Error> {
        writeln!(
            self.body,
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{:.2}\"/>",
            from.x, from.y, to.x, to.y, stroke.color, stroke.width
        )
    }

    fn polygon(&mut self, points: &[Point], fill: &str, stroke: Stroke<'_>) -> Result<(), Self::Error> {
        if points.is_empty() {
            return Ok(());
        }
        self.body.push_str("<polygon points=\"");
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                self.body.push(' ');
            }
            write!(self.body, "{:.2},{:.2}", p.x, p.y)?;
        }
        writeln!(self.body, "\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"{:.2}\"/>", stroke.color, stroke.width)
    }

    fn text(&mut self, text: &str, at: Point, style: TextStyle<'_>) -> Result<(), Self::Error> {
        writeln!(
            self.body,
            "<text x=\"{:.2}\" y=\"{:.2}\" fill=\"{}\" font-size=\"{:.2}\" font-family=\"{}\" text-anchor=\"middle\">{}</text>",
            at.x,
            at.y,
            style.color,
            style.size_px,
            style.family,
            escape(text)
        )
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "svg_test.rs"]
mod tests;
