//! Replay recorded input events (JSON lines) through the engine.
//!
//! One [`InputEvent`] per line; blank lines and lines starting with `#` are
//! skipped.

use std::io::BufRead;

use hexcanvas::engine::{Action, EngineCore};
use hexcanvas::input::InputEvent;
use hexcanvas::view::ViewState;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read events: {0}")]
    Read(#[from] std::io::Error),

    #[error("line {line}: invalid event: {source}")]
    Event { line: usize, source: serde_json::Error },
}

/// Actions produced by one replayed event.
#[derive(Debug, Serialize)]
pub struct Step {
    pub line: usize,
    pub actions: Vec<Action>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub steps: Vec<Step>,
    pub view: ViewState,
    pub hovered: Option<String>,
}

fn parse_line(line: &str) -> Result<Option<InputEvent>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

/// Parse every event up front so a malformed file changes nothing.
///
/// # Errors
///
/// Returns the first read failure or malformed line (1-based).
pub fn parse_events<R: BufRead>(reader: R) -> Result<Vec<(usize, InputEvent)>, ReplayError> {
    let mut events = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        if let Some(event) = parse_line(&line).map_err(|source| ReplayError::Event { line: line_no, source })? {
            events.push((line_no, event));
        }
    }
    Ok(events)
}

/// Feed `events` to `core` in order.
pub fn run(core: &mut EngineCore, events: &[(usize, InputEvent)]) -> Report {
    let steps = events
        .iter()
        .map(|(line, event)| {
            let actions = core.on_input(event);
            tracing::debug!(line, ?event, ?actions, "replayed");
            Step { line: *line, actions }
        })
        .collect();
    Report { steps, view: core.view_state(), hovered: core.hovered_cell_id().map(str::to_owned) }
}

#[cfg(test)]
#[path = "replay_test.rs"]
mod tests;
