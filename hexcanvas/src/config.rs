//! Tunable parameters for the viewport and gesture recognizer.
//!
//! Defaults come from [`crate::consts`]. Hosts may deserialize overrides from
//! any serde source; missing fields fall back to the defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEX_SIZE, DEFAULT_MAP_PADDING, MIN_PINCH_DISTANCE_PX, TAP_SLOP_PX};

/// Thresholds used to disambiguate touch gestures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Maximum single-finger travel, in screen pixels, that still counts as a tap.
    pub tap_slop_px: f64,
    /// Pinch distances below this are treated as degenerate and ignored.
    pub min_pinch_distance_px: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { tap_slop_px: TAP_SLOP_PX, min_pinch_distance_px: MIN_PINCH_DISTANCE_PX }
    }
}

impl GestureConfig {
    /// Replace non-finite or negative thresholds with their defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            tap_slop_px: non_negative_or(self.tap_slop_px, TAP_SLOP_PX),
            min_pinch_distance_px: non_negative_or(self.min_pinch_distance_px, MIN_PINCH_DISTANCE_PX),
        }
    }
}

/// Map and gesture configuration for one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Cell radius in map pixels.
    pub hex_size: f64,
    /// Margin around the map content in map pixels.
    pub padding: f64,
    pub gesture: GestureConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { hex_size: DEFAULT_HEX_SIZE, padding: DEFAULT_MAP_PADDING, gesture: GestureConfig::default() }
    }
}

impl ViewConfig {
    /// Copy with every unusable field replaced by its default. `hex_size` must
    /// be finite and positive; the rest finite and non-negative.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let hex_size = if self.hex_size.is_finite() && self.hex_size > 0.0 { self.hex_size } else { DEFAULT_HEX_SIZE };
        let sanitized = Self {
            hex_size,
            padding: non_negative_or(self.padding, DEFAULT_MAP_PADDING),
            gesture: self.gesture.sanitized(),
        };
        if sanitized != self {
            tracing::warn!(given = ?self, using = ?sanitized, "invalid view config replaced with defaults");
        }
        sanitized
    }
}

fn non_negative_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value >= 0.0 { value } else { default }
}
