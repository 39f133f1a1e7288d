//! Pan/zoom view transform and auto-fit.
//!
//! The view maps map-space points (see [`crate::geometry`]) to screen pixels:
//!
//! ```text
//! screen = viewport_center + zoom · (map + pan + offset − map_center)
//! ```
//!
//! where `offset` and `map_center` come from the current [`MapLayout`]. The
//! inverse is the exact algebraic reverse of that expression, so a point drawn
//! at some screen position hit-tests back to the same map point.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    BUTTON_ZOOM_STEP, FIT_FILL, FIT_FILL_MOBILE, FIT_MAX_ZOOM, FIT_MAX_ZOOM_MOBILE, FIT_MIN_ZOOM, MAX_ZOOM, MIN_ZOOM,
};
use crate::geometry::{MapLayout, MapSize, Point};

/// Container dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when there is nothing to draw into.
    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite())
    }
}

/// Responsive device class, supplied by the host's layout logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl DeviceClass {
    /// Build from the host's `is_mobile` / `is_tablet` flags. Mobile wins if both are set.
    #[must_use]
    pub fn from_flags(is_mobile: bool, is_tablet: bool) -> Self {
        if is_mobile {
            Self::Mobile
        } else if is_tablet {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }

    #[must_use]
    pub fn is_mobile(self) -> bool {
        self == Self::Mobile
    }
}

/// Closed zoom interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    /// Limits for wheel, pinch and the +/− controls.
    pub const INTERACTIVE: Self = Self { min: MIN_ZOOM, max: MAX_ZOOM };

    /// Union of every range a live view can reach.
    pub const ANY: Self = Self { min: MIN_ZOOM, max: FIT_MAX_ZOOM_MOBILE };

    /// Limits for auto-fit on `device`.
    #[must_use]
    pub fn fit(device: DeviceClass) -> Self {
        let max = if device.is_mobile() { FIT_MAX_ZOOM_MOBILE } else { FIT_MAX_ZOOM };
        Self { min: FIT_MIN_ZOOM, max }
    }

    #[must_use]
    pub fn clamp(self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

/// Snapshot of the view: everything needed to reproduce a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub zoom: f64,
    pub pan: Point,
    pub viewport: Viewport,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { zoom: 1.0, pan: Point::ORIGIN, viewport: Viewport::default() }
    }
}

/// Zoom that frames `map` inside `viewport` with the device's margin.
///
/// The result always lies within [`ZoomRange::fit`] for `device`.
#[must_use]
pub fn fit_zoom(viewport: Viewport, map: MapSize, device: DeviceClass) -> f64 {
    let fill = if device.is_mobile() { FIT_FILL_MOBILE } else { FIT_FILL };
    let avail_w = viewport.width * fill;
    let avail_h = viewport.height * fill;
    let candidate = (avail_w / map.width).min(avail_h / map.height);
    let range = ZoomRange::fit(device);
    if candidate.is_finite() { range.clamp(candidate) } else { range.min }
}

/// Owner of the live [`ViewState`]. All mutation goes through its methods so
/// the zoom and pan invariants hold.
#[derive(Debug, Clone, Default)]
pub struct ViewTransform {
    state: ViewState,
}

impl ViewTransform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a previously captured state. A non-positive or non-finite zoom
    /// falls back to 1.0, any other zoom is clamped to [`ZoomRange::ANY`] and a
    /// non-finite pan becomes the origin.
    #[must_use]
    pub fn with_state(state: ViewState) -> Self {
        let zoom = if state.zoom.is_finite() && state.zoom > 0.0 { ZoomRange::ANY.clamp(state.zoom) } else { 1.0 };
        let pan = if state.pan.is_finite() { state.pan } else { Point::ORIGIN };
        Self { state: ViewState { zoom, pan, viewport: state.viewport } }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> ViewState {
        self.state
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        self.state.pan
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    // --- Coordinate conversion ---

    /// Map-space point to screen pixels.
    #[must_use]
    pub fn map_to_screen(&self, map_pt: Point, layout: &MapLayout) -> Point {
        let ViewState { zoom, pan, viewport } = self.state;
        viewport.center() + (map_pt + pan + layout.offset - layout.center()) * zoom
    }

    /// Screen pixels to a map-space point. Inverse of [`Self::map_to_screen`].
    #[must_use]
    pub fn screen_to_map(&self, screen: Point, layout: &MapLayout) -> Point {
        let ViewState { zoom, pan, viewport } = self.state;
        (screen - viewport.center()) / zoom - pan - layout.offset + layout.center()
    }

    // --- Mutation ---

    /// Returns `true` if the viewport changed.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if self.state.viewport == viewport {
            return false;
        }
        self.state.viewport = viewport;
        true
    }

    /// Set the pan offset. Non-finite values are ignored. Returns `true` if the pan changed.
    pub fn set_pan(&mut self, pan: Point) -> bool {
        if !pan.is_finite() {
            tracing::debug!(?pan, "ignoring non-finite pan");
            return false;
        }
        if self.state.pan == pan {
            return false;
        }
        self.state.pan = pan;
        true
    }

    /// Multiply zoom by `factor`, clamped to [`ZoomRange::INTERACTIVE`].
    ///
    /// Non-finite or non-positive factors are ignored. Returns `true` if the zoom changed.
    pub fn scale_zoom(&mut self, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            tracing::debug!(factor, "ignoring degenerate zoom factor");
            return false;
        }
        let next = ZoomRange::INTERACTIVE.clamp(self.state.zoom * factor);
        if next.total_cmp(&self.state.zoom).is_eq() {
            return false;
        }
        self.state.zoom = next;
        true
    }

    /// One step of the + control.
    pub fn zoom_in(&mut self) -> bool {
        self.scale_zoom(BUTTON_ZOOM_STEP)
    }

    /// One step of the − control.
    pub fn zoom_out(&mut self) -> bool {
        self.scale_zoom(1.0 / BUTTON_ZOOM_STEP)
    }

    /// Frame `map` in the current viewport and recenter.
    pub fn auto_fit(&mut self, map: MapSize, device: DeviceClass) {
        let zoom = fit_zoom(self.state.viewport, map, device);
        tracing::debug!(zoom, ?device, width = map.width, height = map.height, "auto-fit");
        self.state.zoom = zoom;
        self.state.pan = Point::ORIGIN;
    }
}
