// src/pipeline.rs
//! Pipeline entry point: configuration, cancellation, and the run itself.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{error, info};

use crate::data::PointCloud;
use crate::error::{Error, Result};
use crate::tiling::{
    assemble, compute_bounds, emit_tiles, BoundsMode, GridSpec, LatticeKind, TileKey,
};

/// Everything a run needs, gathered up front. Validation happens once,
/// before any I/O, and aborts the whole run on failure.
#[derive(Debug, Clone)]
pub struct TilingConfig {
    /// Cube edge length in the cloud's coordinate units. Must be > 0.
    pub cube_size: f64,
    /// Symmetric overlap margin added to every tile face. Must be >= 0.
    pub overlap: f64,
    pub lattice: LatticeKind,
    pub bounds: BoundsMode,
    pub output_dir: PathBuf,
    /// Naming prefix, normally the input file's stem.
    pub base_name: String,
    /// Output extension without the dot, normally taken from the input.
    pub extension: String,
}

impl TilingConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.cube_size.is_finite() || self.cube_size <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "cube_size must be a positive number, got {}",
                self.cube_size
            )));
        }
        if !self.overlap.is_finite() || self.overlap < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "overlap must be a non-negative number, got {}",
                self.overlap
            )));
        }
        if self.base_name.is_empty() {
            return Err(Error::InvalidParameter("base_name must not be empty".into()));
        }
        Ok(())
    }
}

/// Cooperative cancellation token, checked once per tile boundary. Cheap to
/// clone and safe to trip from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What a run did.
#[derive(Debug)]
pub struct RunSummary {
    /// Non-empty tiles found during assembly.
    pub tile_count: usize,
    pub written: Vec<PathBuf>,
    pub failed: Vec<(TileKey, Error)>,
    pub point_count: usize,
    /// Total point-to-tile assignments; equals `point_count` when overlap is
    /// zero, larger when overlap duplicated border points.
    pub assignments: usize,
    pub cancelled: bool,
}

/// Runs the full pipeline: bounds -> grid plan -> assignment -> emission.
///
/// Per-tile write failures are collected in the summary rather than aborting
/// the run; everything before emission fails fast.
pub fn run(cloud: &PointCloud, cfg: &TilingConfig, cancel: &CancelFlag) -> Result<RunSummary> {
    cfg.validate()?;

    let bounds = compute_bounds(cloud, cfg.bounds)?;
    let grid = GridSpec::plan(&bounds, cfg.cube_size, cfg.overlap, cfg.lattice)?;

    info!(
        "planned {}x{}x{} lattice (cube {} m, overlap {} m) over {} points",
        grid.bins(0),
        grid.bins(1),
        grid.bins(2),
        cfg.cube_size,
        cfg.overlap,
        cloud.len()
    );

    let tiles = assemble(cloud, &grid);
    let assignments: usize = tiles.iter().map(|t| t.len()).sum();

    if cfg.overlap == 0.0 && assignments != cloud.len() {
        // Without overlap the assignment is a strict partition; anything
        // else means points were lost or duplicated.
        error!(
            "partition mismatch: {} points but {} assignments",
            cloud.len(),
            assignments
        );
    }

    let outcome = emit_tiles(cloud, &tiles, cfg, cancel);

    Ok(RunSummary {
        tile_count: tiles.len(),
        written: outcome.written,
        failed: outcome.failed,
        point_count: cloud.len(),
        assignments,
        cancelled: outcome.cancelled,
    })
}
