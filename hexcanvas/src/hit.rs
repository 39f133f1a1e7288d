//! Nearest-cell hit testing.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geometry::{MapLayout, Point};
use crate::map::{Cell, CellSet};
use crate::view::ViewTransform;

/// The cell whose center is nearest to `map_pt`, if any lies within `hex_size`.
///
/// Candidates must be strictly closer than `hex_size`. On an exact distance
/// tie the cell encountered first in `cells` wins.
#[must_use]
pub fn hit_test<'a, I>(map_pt: Point, cells: I, hex_size: f64) -> Option<&'a Cell>
where
    I: IntoIterator<Item = &'a Cell>,
{
    if !map_pt.is_finite() {
        return None;
    }
    let mut best: Option<(&Cell, f64)> = None;
    for cell in cells {
        let distance = map_pt.distance(cell.coord().to_pixel(hex_size));
        if distance >= hex_size {
            continue;
        }
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((cell, distance));
        }
    }
    best.map(|(cell, _)| cell)
}

/// Resolve a screen point to a cell through the inverse view transform.
#[must_use]
pub fn hit_test_screen<'a>(
    screen: Point,
    view: &ViewTransform,
    layout: &MapLayout,
    cells: &'a CellSet,
    hex_size: f64,
) -> Option<&'a Cell> {
    if cells.is_empty() {
        return None;
    }
    hit_test(view.screen_to_map(screen, layout), cells, hex_size)
}
