//! Shared numeric constants for the hex canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// √3 — vertical spacing factor of the flat-top axial layout.
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Default pixel radius of one hex cell, center to vertex.
pub const DEFAULT_HEX_SIZE: f64 = 30.0;

/// Default margin around the map content, in map pixels.
pub const DEFAULT_MAP_PADDING: f64 = 50.0;

/// Width and height reported for an empty cell set.
pub const EMPTY_MAP_SIZE: f64 = 400.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Lower bound for interactive zoom (wheel, pinch, buttons).
pub const MIN_ZOOM: f64 = 0.1;

/// Upper bound for interactive zoom (wheel, pinch, buttons).
pub const MAX_ZOOM: f64 = 3.0;

/// Lower bound for auto-fit zoom on every device class.
pub const FIT_MIN_ZOOM: f64 = 0.2;

/// Upper bound for auto-fit zoom on desktop and tablet.
pub const FIT_MAX_ZOOM: f64 = 4.0;

/// Upper bound for auto-fit zoom on mobile.
pub const FIT_MAX_ZOOM_MOBILE: f64 = 5.0;

/// Share of the viewport the fitted map may occupy on desktop and tablet.
pub const FIT_FILL: f64 = 0.80;

/// Share of the viewport the fitted map may occupy on mobile.
pub const FIT_FILL_MOBILE: f64 = 0.85;

/// Zoom multiplier for one wheel notch away from the user (`delta_y > 0`).
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Zoom multiplier for one wheel notch toward the user.
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Zoom multiplier of the +/− controls.
pub const BUTTON_ZOOM_STEP: f64 = 1.2;

// ── Gestures ────────────────────────────────────────────────────

/// Single-finger travel, in screen pixels, beyond which a touch becomes a pan.
pub const TAP_SLOP_PX: f64 = 5.0;

/// Finger separation below which a pinch ratio is discarded.
pub const MIN_PINCH_DISTANCE_PX: f64 = 1.0;

// ── Rendering ───────────────────────────────────────────────────

/// Cells are drawn slightly smaller than their hit radius so neighbours show a gap.
pub const CELL_DRAW_SCALE: f64 = 0.9;

/// Connection line width in map pixels.
pub const CONNECTION_LINE_WIDTH: f64 = 2.0;

/// Cell outline width in map pixels.
pub const CELL_LINE_WIDTH: f64 = 2.0;

/// Outline width of the hovered cell in map pixels.
pub const HOVER_LINE_WIDTH: f64 = 3.0;

/// Coordinate label size in map pixels.
pub const LABEL_FONT_PX: f64 = 12.0;

/// Downward nudge of the label so it sits visually centered.
pub const LABEL_BASELINE_OFFSET: f64 = 4.0;
