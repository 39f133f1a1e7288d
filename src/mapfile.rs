//! Map files on disk: either a saved service response or a bare cell array.

use std::path::{Path, PathBuf};

use hexcanvas::map::{Cell, MapResponse};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum MapFileError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("{} is neither a map response nor a cell array: {source}", path.display())]
    Decode { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MapFile {
    Response(MapResponse),
    Cells(Vec<Cell>),
}

impl MapFile {
    /// # Errors
    ///
    /// Returns an error when the text is not one of the accepted shapes.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    #[must_use]
    pub fn into_cells(self) -> Vec<Cell> {
        match self {
            Self::Response(resp) => resp.hexagons,
            Self::Cells(cells) => cells,
        }
    }
}

/// Read the cells of a map file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load(path: &Path) -> Result<Vec<Cell>, MapFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| MapFileError::Read { path: path.to_owned(), source })?;
    let file = MapFile::parse(&text).map_err(|source| MapFileError::Decode { path: path.to_owned(), source })?;
    let cells = file.into_cells();
    tracing::info!(path = %path.display(), cells = cells.len(), "map loaded");
    Ok(cells)
}

#[cfg(test)]
#[path = "mapfile_test.rs"]
mod tests;
