//! Hex grid geometry: axial ↔ pixel conversion, cell outlines, and map sizing.
//!
//! Everything here is a pure function of its inputs. The layout is flat-top:
//! columns advance by `1.5 · size` along x, rows by `√3 · size` along y, and
//! each column is shifted down half a row relative to the previous one.
//!
//! "Map space" is the coordinate system produced by [`axial_to_pixel`] before
//! any offset or view transform is applied.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::f64::consts::FRAC_PI_3;
use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::{EMPTY_MAP_SIZE, SQRT_3};

/// A point in map, canvas, or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// True when both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// Grid address of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    #[must_use]
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Center of this cell in map space.
    #[must_use]
    pub fn to_pixel(self, size: f64) -> Point {
        axial_to_pixel(self.q, self.r, size)
    }
}

/// Inclusive range of axial coordinates covered by a cell set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_q: i32,
    pub max_q: i32,
    pub min_r: i32,
    pub max_r: i32,
}

/// Pixel extent of a rendered map, padding included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSize {
    pub width: f64,
    pub height: f64,
}

impl MapSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for MapSize {
    fn default() -> Self {
        Self::new(EMPTY_MAP_SIZE, EMPTY_MAP_SIZE)
    }
}

/// Size and offset of one cell set, computed once per load and reused by every
/// draw and hit test.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapLayout {
    pub size: MapSize,
    pub offset: Point,
}

impl MapLayout {
    #[must_use]
    pub fn compute<I>(coords: I, hex_size: f64, padding: f64) -> Self
    where
        I: IntoIterator<Item = AxialCoord>,
    {
        match pixel_extent(coords, hex_size) {
            Some((min, max)) => Self {
                size: padded_size(min, max, hex_size, padding),
                offset: padded_offset(min, hex_size, padding),
            },
            None => Self::default(),
        }
    }

    /// Midpoint of the padded map rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        self.size.center()
    }
}

/// Convert an axial grid address to its pixel center.
#[must_use]
pub fn axial_to_pixel(q: i32, r: i32, size: f64) -> Point {
    let q = f64::from(q);
    let r = f64::from(r);
    Point::new(size * 1.5 * q, size * SQRT_3 * (q / 2.0 + r))
}

/// The six outline vertices of a flat-top hex, starting at angle 0 and
/// proceeding clockwise in screen coordinates (y grows downward).
#[must_use]
pub fn hex_vertices(center: Point, size: f64) -> [Point; 6] {
    std::array::from_fn(|i| {
        #[allow(clippy::cast_precision_loss)]
        let angle = FRAC_PI_3 * i as f64;
        Point::new(center.x + size * angle.cos(), center.y + size * angle.sin())
    })
}

/// Axial bounds of `coords`. All zero when `coords` is empty.
#[must_use]
pub fn bounding_box<I>(coords: I) -> BoundingBox
where
    I: IntoIterator<Item = AxialCoord>,
{
    let mut iter = coords.into_iter();
    let Some(first) = iter.next() else {
        return BoundingBox::default();
    };
    iter.fold(
        BoundingBox { min_q: first.q, max_q: first.q, min_r: first.r, max_r: first.r },
        |bb, c| BoundingBox {
            min_q: bb.min_q.min(c.q),
            max_q: bb.max_q.max(c.q),
            min_r: bb.min_r.min(c.r),
            max_r: bb.max_r.max(c.r),
        },
    )
}

/// Pixel size needed to draw every cell with room for the hex radius and
/// `padding` on each edge. Returns [`EMPTY_MAP_SIZE`] square for no cells.
#[must_use]
pub fn map_pixel_size<I>(coords: I, hex_size: f64, padding: f64) -> MapSize
where
    I: IntoIterator<Item = AxialCoord>,
{
    MapLayout::compute(coords, hex_size, padding).size
}

/// Translation that moves the top-left-most cell center to
/// `(hex_size + padding, hex_size + padding)`. Zero for no cells.
#[must_use]
pub fn map_offset<I>(coords: I, hex_size: f64, padding: f64) -> Point
where
    I: IntoIterator<Item = AxialCoord>,
{
    MapLayout::compute(coords, hex_size, padding).offset
}

// =============================================================
// Helpers
// =============================================================

/// Min and max pixel centers over `coords`, or `None` when empty.
fn pixel_extent<I>(coords: I, hex_size: f64) -> Option<(Point, Point)>
where
    I: IntoIterator<Item = AxialCoord>,
{
    let mut pixels = coords.into_iter().map(|c| c.to_pixel(hex_size));
    let first = pixels.next()?;
    Some(pixels.fold((first, first), |(min, max), p| {
        (Point::new(min.x.min(p.x), min.y.min(p.y)), Point::new(max.x.max(p.x), max.y.max(p.y)))
    }))
}

fn padded_size(min: Point, max: Point, hex_size: f64, padding: f64) -> MapSize {
    let margin = 2.0 * hex_size + 2.0 * padding;
    // Never below one pixel, so the fit ratio can't divide by zero.
    MapSize::new(
        (max.x - min.x + margin).ceil().max(1.0),
        (max.y - min.y + margin).ceil().max(1.0),
    )
}

fn padded_offset(min: Point, hex_size: f64, padding: f64) -> Point {
    Point::new(-min.x + hex_size + padding, -min.y + hex_size + padding)
}
