//! Map model: cells as delivered by the generation service, and the read-only
//! store the viewport draws from.
//!
//! `Cell` and the `Map*` types mirror the service's JSON exactly (camelCase,
//! `type` for the cell kind). The viewport never mutates cells; a new map is a
//! new [`CellSet`].

#[cfg(test)]
#[path = "map_test.rs"]
mod map_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{AxialCoord, BoundingBox};

/// Unique identifier of a cell, e.g. `"hex-0-0"`.
pub type CellId = String;

/// What a cell represents in the generated layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellKind {
    Room,
    Corridor,
}

/// One hex cell of a generated map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub q: i32,
    pub r: i32,
    #[serde(rename = "type")]
    pub kind: CellKind,
    /// Ids of connected cells. May name cells that are not in the set.
    #[serde(default)]
    pub connections: Vec<CellId>,
}

impl Cell {
    #[must_use]
    pub fn coord(&self) -> AxialCoord {
        AxialCoord::new(self.q, self.r)
    }
}

/// Parameters for one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapGenerationRequest {
    pub hexagon_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

/// Summary numbers computed by the generator. Carried through, never derived here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStatistics {
    pub actual_hexagons: u32,
    pub corridor_hexagons: u32,
    pub room_hexagons: u32,
    pub average_connections: f64,
    pub max_connections: u32,
    pub longest_path: u32,
    pub bounding_box: BoundingBox,
}

/// Provenance of a generated map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMetadata {
    pub seed: String,
    pub hexagon_count: u32,
    pub generated_at: String,
    pub version: String,
    pub cached: bool,
    /// Milliseconds spent generating.
    pub generation_time: f64,
    pub statistics: MapStatistics,
}

/// Body of a successful generation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapResponse {
    pub metadata: MapMetadata,
    pub hexagons: Vec<Cell>,
}

/// Cells in delivery order plus an id index for connection lookup.
///
/// Iteration order is the order the cells were delivered in; hit testing
/// relies on it for tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct CellSet {
    cells: Vec<Cell>,
    index: HashMap<CellId, usize>,
}

impl CellSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from delivered cells. With duplicate ids, lookups resolve to the
    /// first occurrence; every occurrence is still drawn.
    #[must_use]
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        let mut index = HashMap::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            index.entry(cell.id.clone()).or_insert(i);
        }
        Self { cells, index }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Cell> {
        self.index.get(id).and_then(|&i| self.cells.get(i))
    }

    /// Axial coordinates in delivery order.
    pub fn coords(&self) -> impl Iterator<Item = AxialCoord> + Clone + '_ {
        self.cells.iter().map(Cell::coord)
    }

    /// Every `(from, to)` pair whose target exists. Connections to unknown ids
    /// are skipped. A link listed on both cells yields two pairs.
    pub fn links(&self) -> impl Iterator<Item = (&Cell, &Cell)> + '_ {
        self.cells
            .iter()
            .flat_map(move |from| from.connections.iter().filter_map(move |id| self.get(id).map(|to| (from, to))))
    }
}

impl<'a> IntoIterator for &'a CellSet {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl From<Vec<Cell>> for CellSet {
    fn from(cells: Vec<Cell>) -> Self {
        Self::from_cells(cells)
    }
}
