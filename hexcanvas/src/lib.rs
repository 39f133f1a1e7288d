//! Viewport engine for hexagonal-grid maps.
//!
//! This crate compiles to WebAssembly for the browser and to a native library
//! for headless hosts. It places axial-grid cells in pixel space, keeps the
//! pan/zoom view transform and its inverse, frames freshly loaded maps,
//! disambiguates taps, drags and pinches, and resolves screen points to cells.
//! Hosts wire raw input events to the engine and act on the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`map`] | Cell set and the generation service's wire types |
//! | [`geometry`] | Axial/pixel conversion, hex outlines, map sizing |
//! | [`view`] | Pan/zoom transform, zoom ranges and auto-fit |
//! | [`gesture`] | Tap/pan/pinch state machine |
//! | [`input`] | Raw input event types and the mouse/touch adapters |
//! | [`hit`] | Nearest-cell hit testing |
//! | [`render`] | Draw order, palette and the [`render::Surface`] trait |
//! | [`config`] | Tunable sizes and gesture thresholds |
//! | [`consts`] | Shared numeric constants (zoom limits, fill factors, etc.) |

pub mod config;
pub mod consts;
pub mod engine;
pub mod geometry;
pub mod gesture;
pub mod hit;
pub mod input;
pub mod map;
pub mod render;
pub mod view;
