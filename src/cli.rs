//! Headless runner: load a level, auto-play it, report the result.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use serde::Serialize;

use crate::core::{LevelData, SimulationConfig};
use crate::engine::{GameLogic, GameSnapshot, Placement};
use crate::types::{FrameResult, GameEvent};

/// Auto-play a blockweld level with straight-drop placements.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct RunArgs {
    /// Level JSON file.
    pub level: PathBuf,
    /// Optional simulation config JSON; missing fields keep their defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Frame cap (env: BLOCKWELD_MAX_FRAMES).
    #[arg(long)]
    pub max_frames: Option<u32>,
    /// Simulation frames per second.
    #[arg(long, default_value_t = 60)]
    pub fps: u32,
    /// Print the snapshot as compact JSON.
    #[arg(long)]
    pub compact: bool,
}

impl RunArgs {
    pub fn frame_cap(&self) -> u32 {
        self.max_frames
            .or_else(|| {
                std::env::var("BLOCKWELD_MAX_FRAMES")
                    .ok()
                    .and_then(|s| s.trim().parse().ok())
            })
            .unwrap_or(100_000)
    }

    pub fn frame_secs(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

/// Counters and final state of one headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcome: FrameResult,
    pub frames: u32,
    pub pieces_landed: u32,
    pub rows_cleared: u32,
    pub detonations: u32,
    pub max_cascade: u32,
    pub snapshot: GameSnapshot,
}

pub fn load_level(path: &Path) -> Result<LevelData> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading level {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing level {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: SimulationConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("checking config {}", path.display()))?;
    Ok(config)
}

/// Lowest suggestion first, leftmost on ties.
fn pick_placement(placements: &[Placement]) -> Option<Placement> {
    placements.iter().copied().min_by_key(|p| (p.row, p.col))
}

pub fn run_level(
    level: &LevelData,
    config: SimulationConfig,
    frame_cap: u32,
    dt: f32,
) -> Result<RunReport> {
    let mut logic = GameLogic::new(level, config).context("building level")?;
    let mut report = RunReport {
        outcome: FrameResult::Running,
        frames: 0,
        pieces_landed: 0,
        rows_cleared: 0,
        detonations: 0,
        max_cascade: 0,
        snapshot: logic.snapshot(),
    };
    let mut placed = None;

    while report.frames < frame_cap {
        let active = logic.falling().map(|f| f.id);
        if active.is_some() && active != placed {
            placed = active;
            if let Some(p) = pick_placement(logic.placements()) {
                if let Err(err) = logic.apply_placement(p) {
                    debug!("placement {:?} rejected: {}", p, err);
                }
            }
        }

        report.outcome = logic.update(dt);
        report.frames += 1;
        for event in logic.take_events() {
            match event {
                GameEvent::PieceLanded { .. } => report.pieces_landed += 1,
                GameEvent::RowsCleared { rows, .. } => report.rows_cleared += rows.len() as u32,
                GameEvent::BombDetonated { .. } => report.detonations += 1,
                GameEvent::Cascade { level } => report.max_cascade = report.max_cascade.max(level),
                _ => {}
            }
        }
        if report.outcome.is_finished() {
            break;
        }
    }

    info!(
        "{:?} after {} frame(s), {} piece(s), {} row(s)",
        report.outcome, report.frames, report.pieces_landed, report.rows_cleared
    );
    report.snapshot = logic.snapshot();
    Ok(report)
}

pub fn run(args: &RunArgs) -> Result<RunReport> {
    let level = load_level(&args.level)?;
    let config = load_config(args.config.as_deref())?;
    run_level(&level, config, args.frame_cap(), args.frame_secs())
}
