//! Viewer configuration parsed from environment variables.

use hexcanvas::config::{GestureConfig, ViewConfig};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but does not parse.
    #[error("invalid {var}: {value:?} is not a valid {expected}")]
    Parse { var: &'static str, value: String, expected: &'static str },

    /// A variable parses but is outside its allowed range.
    #[error("invalid {var}: {value} must be {rule}")]
    OutOfRange { var: &'static str, value: String, rule: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewerConfig {
    pub view: ViewConfig,
    pub timeouts: HttpTimeouts,
}

impl ViewerConfig {
    /// Build typed viewer config from environment variables.
    ///
    /// All optional; absent values use the library defaults:
    /// - `HEXMAP_HEX_SIZE`: cell radius in map pixels (> 0)
    /// - `HEXMAP_MAP_PADDING`: map margin in map pixels (≥ 0)
    /// - `HEXMAP_TAP_SLOP_PX`: tap travel threshold (≥ 0)
    /// - `HEXMAP_MIN_PINCH_PX`: degenerate pinch threshold (≥ 0)
    /// - `HEXMAP_REQUEST_TIMEOUT_SECS`: default 30
    /// - `HEXMAP_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a caller-supplied variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ViewConfig::default();
        let hex_size = positive(&lookup, "HEXMAP_HEX_SIZE", defaults.hex_size)?;
        let padding = non_negative(&lookup, "HEXMAP_MAP_PADDING", defaults.padding)?;
        let tap_slop_px = non_negative(&lookup, "HEXMAP_TAP_SLOP_PX", defaults.gesture.tap_slop_px)?;
        let min_pinch_distance_px =
            non_negative(&lookup, "HEXMAP_MIN_PINCH_PX", defaults.gesture.min_pinch_distance_px)?;

        let timeouts = HttpTimeouts {
            request_secs: secs(&lookup, "HEXMAP_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: secs(&lookup, "HEXMAP_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self {
            view: ViewConfig { hex_size, padding, gesture: GestureConfig { tap_slop_px, min_pinch_distance_px } },
            timeouts,
        })
    }
}

fn env_parse<F, T>(lookup: &F, var: &'static str, default: T, expected: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Parse { var, value: raw, expected }),
    }
}

fn positive<F>(lookup: &F, var: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = env_parse(lookup, var, default, "number")?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange { var, value: value.to_string(), rule: "a finite number above zero" })
    }
}

fn non_negative<F>(lookup: &F, var: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = env_parse(lookup, var, default, "number")?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange { var, value: value.to_string(), rule: "a finite number, zero or above" })
    }
}

fn secs<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = env_parse(lookup, var, default, "whole number of seconds")?;
    if value == 0 {
        return Err(ConfigError::OutOfRange { var, value: value.to_string(), rule: "at least one second" });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
