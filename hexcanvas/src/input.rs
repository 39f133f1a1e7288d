//! Raw input events and the adapters that feed them to the gesture controller.
//!
//! Hosts translate DOM (or any other) events into these types; positions are
//! in CSS pixels relative to the canvas. The types are serde-friendly so input
//! sequences can be recorded and replayed.
//!
//! [`route_mouse`] and [`route_touch`] are the two adapters. Neither holds
//! state: everything about the active gesture lives in the
//! [`GestureController`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::gesture::{GestureController, GestureOutput, PointerSource};
use crate::view::ViewTransform;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button.
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseAction {
    Down,
    Move,
    Up,
    Leave,
}

/// A mouse event at `pos`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseInput {
    pub action: MouseAction,
    pub pos: Point,
    #[serde(default)]
    pub button: Button,
}

impl MouseInput {
    #[must_use]
    pub fn new(action: MouseAction, pos: Point) -> Self {
        Self { action, pos, button: Button::Primary }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// A touch event, modelled on the DOM's `touches` / `changedTouches` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchInput {
    pub phase: TouchPhase,
    /// Fingers still on the surface after this event, in contact order.
    #[serde(default)]
    pub touches: Vec<Point>,
    /// Fingers that changed in this event (for `End`, the lifted ones).
    #[serde(default)]
    pub changed: Vec<Point>,
}

impl TouchInput {
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<Point>, changed: Vec<Point>) -> Self {
        Self { phase, touches, changed }
    }
}

/// Wheel / trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    /// Vertical scroll amount (positive = away from the user).
    pub delta_y: f64,
}

/// Any input the viewport understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputEvent {
    Mouse(MouseInput),
    Touch(TouchInput),
    Wheel(WheelInput),
}

/// Mouse adapter. Only the primary button pans; up never produces a tap.
pub fn route_mouse(gesture: &mut GestureController, view: &mut ViewTransform, input: MouseInput) -> Vec<GestureOutput> {
    match input.action {
        MouseAction::Down if input.button == Button::Primary => gesture.press(view, input.pos, PointerSource::Mouse),
        MouseAction::Down => Vec::new(),
        MouseAction::Move => gesture.drag(view, input.pos, PointerSource::Mouse),
        MouseAction::Up => gesture.release(None),
        MouseAction::Leave => gesture.leave(),
    }
}

/// Touch adapter. Finger count decides between single-pointer and pinch calls.
pub fn route_touch(gesture: &mut GestureController, view: &mut ViewTransform, input: &TouchInput) -> Vec<GestureOutput> {
    match (input.phase, input.touches.as_slice()) {
        (TouchPhase::Start, [only]) => gesture.press(view, *only, PointerSource::Touch),
        (TouchPhase::Start | TouchPhase::End, [a, b, ..]) => gesture.pinch_start(*a, *b),
        (TouchPhase::Move, [only]) => gesture.drag(view, *only, PointerSource::Touch),
        (TouchPhase::Move, [a, b, ..]) => gesture.pinch_move(view, *a, *b),
        (TouchPhase::End, []) => gesture.release(input.changed.first().copied()),
        (TouchPhase::End, [remaining]) => gesture.pinch_end(view, *remaining),
        (TouchPhase::Cancel, _) => gesture.cancel(),
        (TouchPhase::Start | TouchPhase::Move, []) => Vec::new(),
    }
}

/// Route any [`InputEvent`] to the matching adapter.
pub fn route(gesture: &mut GestureController, view: &mut ViewTransform, event: &InputEvent) -> Vec<GestureOutput> {
    match event {
        InputEvent::Mouse(input) => route_mouse(gesture, view, *input),
        InputEvent::Touch(input) => route_touch(gesture, view, input),
        InputEvent::Wheel(input) => gesture.wheel(view, input.delta_y),
    }
}
