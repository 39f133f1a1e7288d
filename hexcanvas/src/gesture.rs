//! Gesture state machine: tap vs. drag, pan vs. pinch.
//!
//! [`GestureController`] exposes one abstract pointer interface (`press`,
//! `drag`, `release`, `cancel`, the pinch calls and `wheel`). The mouse and
//! touch adapters in [`crate::input`] translate raw events into these calls,
//! so pan and zoom logic exists exactly once.
//!
//! The controller mutates the [`ViewTransform`] directly for pan and zoom and
//! reports everything else (hit-test requests, hover clearing) as
//! [`GestureOutput`]s for the engine to resolve against the cell set.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::config::GestureConfig;
use crate::consts::{WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};
use crate::geometry::Point;
use crate::view::ViewTransform;

/// Which kind of device produced a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    /// Mouse presses start panning immediately.
    Mouse,
    /// Touch presses wait for the tap slop before panning.
    Touch,
}

/// Active gesture, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// Nothing pressed.
    #[default]
    Idle,
    /// One finger down that has not yet moved past the tap slop.
    TentativePan {
        /// Screen position where the finger went down.
        start: Point,
        /// `start − pan` at press time; `pan = pos − anchor` once committed.
        anchor: Point,
        /// False when re-entered after a pinch: lifting then is not a tap.
        tap_armed: bool,
    },
    /// Dragging the map.
    Panning {
        /// Pointer position minus pan at the moment panning began.
        anchor: Point,
    },
    /// Two fingers down.
    Pinching {
        /// Finger separation at the previous pinch event, in screen pixels.
        distance: f64,
    },
}

/// Side effects the engine must resolve after a gesture call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutput {
    /// Zoom or pan changed; the frame needs repainting.
    ViewChanged,
    /// Pointer hovering at a screen point; hit-test and update the hovered cell.
    Hover(Point),
    /// A tap was released at a screen point; hit-test and update the hovered cell.
    Tap(Point),
    /// The pointer left the surface; clear the hovered cell.
    ClearHover,
}

/// Owner of the [`GestureState`].
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    state: GestureState,
    config: GestureConfig,
}

impl GestureController {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self { state: GestureState::Idle, config }
    }

    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self.state, GestureState::Panning { .. })
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        matches!(self.state, GestureState::Pinching { .. })
    }

    /// Drop any in-flight gesture without side effects.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }

    // --- Wheel ---

    /// One wheel notch. Never changes the gesture state.
    pub fn wheel(&mut self, view: &mut ViewTransform, delta_y: f64) -> Vec<GestureOutput> {
        if !delta_y.is_finite() {
            return Vec::new();
        }
        let factor = if delta_y > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
        view_changed(view.scale_zoom(factor))
    }

    // --- Single pointer ---

    /// Primary button or first finger down at `pos`. Ignored unless idle.
    pub fn press(&mut self, view: &ViewTransform, pos: Point, source: PointerSource) -> Vec<GestureOutput> {
        if self.state != GestureState::Idle || !pos.is_finite() {
            return Vec::new();
        }
        let anchor = pos - view.pan();
        self.state = match source {
            PointerSource::Mouse => GestureState::Panning { anchor },
            PointerSource::Touch => GestureState::TentativePan { start: pos, anchor, tap_armed: true },
        };
        Vec::new()
    }

    /// Pointer or single finger moved to `pos`.
    pub fn drag(&mut self, view: &mut ViewTransform, pos: Point, source: PointerSource) -> Vec<GestureOutput> {
        if !pos.is_finite() {
            return Vec::new();
        }
        match self.state {
            GestureState::Idle => match source {
                PointerSource::Mouse => vec![GestureOutput::Hover(pos)],
                PointerSource::Touch => Vec::new(),
            },
            GestureState::TentativePan { start, anchor, .. } => {
                if pos.distance(start) <= self.config.tap_slop_px {
                    return Vec::new();
                }
                tracing::debug!(?start, ?pos, "touch committed to pan");
                self.state = GestureState::Panning { anchor };
                view_changed(view.set_pan(pos - anchor))
            }
            GestureState::Panning { anchor } => view_changed(view.set_pan(pos - anchor)),
            GestureState::Pinching { .. } => Vec::new(),
        }
    }

    /// Last pointer lifted. `pos` is the release point when known.
    ///
    /// A touch that never left the tap slop becomes a [`GestureOutput::Tap`].
    pub fn release(&mut self, pos: Option<Point>) -> Vec<GestureOutput> {
        let prev = std::mem::take(&mut self.state);
        match (prev, pos) {
            (GestureState::TentativePan { tap_armed: true, .. }, Some(pos)) if pos.is_finite() => {
                vec![GestureOutput::Tap(pos)]
            }
            _ => Vec::new(),
        }
    }

    /// Abandon the gesture (touch cancel).
    pub fn cancel(&mut self) -> Vec<GestureOutput> {
        self.reset();
        Vec::new()
    }

    /// Pointer left the surface: abandon the gesture and clear hover.
    pub fn leave(&mut self) -> Vec<GestureOutput> {
        self.reset();
        vec![GestureOutput::ClearHover]
    }

    // --- Pinch ---

    /// Two fingers down at `a` and `b`. Any pan anchor is discarded.
    pub fn pinch_start(&mut self, a: Point, b: Point) -> Vec<GestureOutput> {
        let distance = a.distance(b);
        self.state = GestureState::Pinching { distance: if distance.is_finite() { distance } else { 0.0 } };
        Vec::new()
    }

    /// Fingers moved to `a` and `b`: zoom by the change in separation.
    ///
    /// A ratio whose previous or current separation is below the configured
    /// minimum is discarded; the new separation is still recorded so the next
    /// move can zoom normally.
    pub fn pinch_move(&mut self, view: &mut ViewTransform, a: Point, b: Point) -> Vec<GestureOutput> {
        let GestureState::Pinching { distance: prev } = self.state else {
            return Vec::new();
        };
        let current = a.distance(b);
        if !current.is_finite() {
            return Vec::new();
        }
        self.state = GestureState::Pinching { distance: current };

        let min = self.config.min_pinch_distance_px;
        if prev < min || current < min {
            tracing::debug!(prev, current, "discarding degenerate pinch delta");
            return Vec::new();
        }
        view_changed(view.scale_zoom(current / prev))
    }

    /// One finger lifted from a pinch; the other at `remaining` stays down.
    ///
    /// Re-anchors a tentative pan on the remaining finger. Lifting that finger
    /// later is not treated as a tap.
    pub fn pinch_end(&mut self, view: &ViewTransform, remaining: Point) -> Vec<GestureOutput> {
        if !self.is_pinching() || !remaining.is_finite() {
            return Vec::new();
        }
        self.state =
            GestureState::TentativePan { start: remaining, anchor: remaining - view.pan(), tap_armed: false };
        Vec::new()
    }
}

fn view_changed(changed: bool) -> Vec<GestureOutput> {
    if changed { vec![GestureOutput::ViewChanged] } else { Vec::new() }
}
