mod api;
mod config;
mod mapfile;
mod replay;
mod svg;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use hexcanvas::engine::EngineCore;
use hexcanvas::geometry::Point;
use hexcanvas::map::MapGenerationRequest;
use hexcanvas::view::{DeviceClass, Viewport};
use serde_json::json;

use crate::api::{ApiError, MapClient};
use crate::config::{ConfigError, ViewerConfig};
use crate::mapfile::MapFileError;
use crate::replay::ReplayError;
use crate::svg::SvgSurface;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    MapFile(#[from] MapFileError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("viewport must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: std::io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("snapshot encoding failed")]
    Snapshot(#[from] std::fmt::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "hexmap", about = "Headless hex map viewport: generate, fit, pick, snapshot and replay")]
struct Cli {
    /// Viewport width in CSS pixels.
    #[arg(long, global = true, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in CSS pixels.
    #[arg(long, global = true, default_value_t = 600.0)]
    height: f64,

    #[arg(long, global = true, default_value_t = false)]
    mobile: bool,

    #[arg(long, global = true, default_value_t = false)]
    tablet: bool,

    #[arg(long, global = true, env = "HEXMAP_API_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, global = true, env = "HEXMAP_API_KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request a new map from the generation service.
    Generate {
        #[arg(long)]
        count: u32,
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, help = "Output file; stdout when absent")]
        out: Option<PathBuf>,
    },
    /// Print the auto-fitted view and layout for a map.
    Fit { map: PathBuf },
    /// Print the cell under a screen point after auto-fit.
    Pick {
        map: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
    /// Write an SVG snapshot of the auto-fitted map.
    Snapshot {
        map: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, help = "Cell id to draw highlighted")]
        hover: Option<String>,
    },
    /// Feed JSON-lines input events through the engine.
    Replay { map: PathBuf, events: PathBuf },
}

/// Viewport and config shared by every map-based subcommand.
struct Viewer {
    config: ViewerConfig,
    viewport: Viewport,
    device: DeviceClass,
}

impl Viewer {
    fn from_cli(cli: &Cli, config: ViewerConfig) -> Result<Self, CliError> {
        let viewport = Viewport::new(cli.width, cli.height);
        if viewport.is_empty() {
            return Err(CliError::InvalidViewport { width: cli.width, height: cli.height });
        }
        Ok(Self { config, viewport, device: DeviceClass::from_flags(cli.mobile, cli.tablet) })
    }

    /// Load `map` into a fresh engine sized to the viewport.
    fn open(&self, map: &Path) -> Result<EngineCore, CliError> {
        let cells = mapfile::load(map)?;
        let mut core = EngineCore::new(self.config.view);
        core.set_viewport(self.viewport, self.device);
        core.load_cells(cells);
        Ok(core)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = ViewerConfig::from_env()?;

    match &cli.command {
        Command::Generate { count, seed, out } => {
            let client = MapClient::new(&cli.base_url, cli.api_key.clone(), config.timeouts)?;
            run_generate(&client, *count, seed.clone(), out.as_deref()).await
        }
        Command::Fit { map } => run_fit(&Viewer::from_cli(&cli, config)?, map),
        Command::Pick { map, x, y } => run_pick(&Viewer::from_cli(&cli, config)?, map, Point::new(*x, *y)),
        Command::Snapshot { map, out, hover } => {
            run_snapshot(&Viewer::from_cli(&cli, config)?, map, out, hover.as_deref())
        }
        Command::Replay { map, events } => run_replay(&Viewer::from_cli(&cli, config)?, map, events),
    }
}

async fn run_generate(
    client: &MapClient,
    count: u32,
    seed: Option<String>,
    out: Option<&Path>,
) -> Result<(), CliError> {
    let response = client.generate(&MapGenerationRequest { hexagon_count: count, seed }).await?;
    tracing::info!(
        endpoint = client.endpoint(),
        seed = %response.metadata.seed,
        cells = response.hexagons.len(),
        cached = response.metadata.cached,
        "map generated"
    );
    let rendered = serde_json::to_string_pretty(&response)?;
    match out {
        Some(path) => write_file(path, &rendered),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

fn run_fit(viewer: &Viewer, map: &Path) -> Result<(), CliError> {
    let core = viewer.open(map)?;
    print_json(&json!({
        "device": viewer.device,
        "cells": core.cells().len(),
        "layout": core.layout(),
        "view": core.view_state(),
    }))
}

fn run_pick(viewer: &Viewer, map: &Path, screen: Point) -> Result<(), CliError> {
    let core = viewer.open(map)?;
    let cell = core.hit_test_screen(screen);
    if cell.is_none() {
        tracing::warn!(x = screen.x, y = screen.y, "no cell under point");
    }
    print_json(&json!({ "screen": screen, "cell": cell }))
}

fn run_snapshot(viewer: &Viewer, map: &Path, out: &Path, hover: Option<&str>) -> Result<(), CliError> {
    let mut core = viewer.open(map)?;
    if hover.is_some() && core.set_hovered_cell(hover).is_empty() {
        tracing::warn!(id = ?hover, "hover id not in map");
    }
    let mut surface = SvgSurface::new(viewer.viewport);
    if !core.render_to(&mut surface)? {
        tracing::warn!("nothing to draw; writing an empty snapshot");
    }
    write_file(out, &surface.finish())?;
    tracing::info!(path = %out.display(), "snapshot written");
    Ok(())
}

fn run_replay(viewer: &Viewer, map: &Path, events: &Path) -> Result<(), CliError> {
    let file = File::open(events).map_err(|source| CliError::Open { path: events.to_owned(), source })?;
    let events = replay::parse_events(BufReader::new(file))?;
    let mut core = viewer.open(map)?;
    let report = replay::run(&mut core, &events);
    tracing::info!(events = report.steps.len(), "replay finished");
    print_json(&serde_json::to_value(&report)?)
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|source| CliError::Write { path: path.to_owned(), source })
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
