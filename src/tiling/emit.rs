// src/tiling/emit.rs
//! Writes each non-empty tile as an independent LAS file.

use std::path::PathBuf;

use log::{info, warn};
use rayon::prelude::*;

use crate::data::{save_point_cloud, PointCloud};
use crate::error::Error;
use crate::pipeline::{CancelFlag, TilingConfig};
use crate::tiling::assemble::Tile;
use crate::tiling::grid::TileKey;
use crate::tiling::naming::tile_file_names;

/// What happened to each tile. Failures are isolated per tile; a bad path or
/// full disk on one output never aborts the rest of the run.
#[derive(Debug, Default)]
pub struct EmitOutcome {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(TileKey, Error)>,
    /// True when cancellation was observed before every tile was attempted.
    pub cancelled: bool,
}

enum TileWrite {
    Written(PathBuf),
    Failed(TileKey, Error),
    Skipped,
}

/// Writes all tiles, in parallel. Tile writes share only the read-only
/// header and point data, so they are embarrassingly parallel. Names are
/// assigned for the whole run up front so no two tiles ever target the same
/// path. Cancellation is checked once per tile boundary.
pub fn emit_tiles(
    cloud: &PointCloud,
    tiles: &[Tile],
    cfg: &TilingConfig,
    cancel: &CancelFlag,
) -> EmitOutcome {
    let names = tile_file_names(&cfg.base_name, &cfg.extension, tiles, cfg.overlap);

    let results: Vec<TileWrite> = tiles
        .par_iter()
        .zip(names.par_iter())
        .map(|(tile, name)| {
            if cancel.is_cancelled() {
                return TileWrite::Skipped;
            }

            let path = cfg.output_dir.join(name);
            let subset = tile.points.iter().map(|&i| &cloud.points[i]);

            match save_point_cloud(&path, &cloud.header, subset) {
                Ok(()) => {
                    info!("wrote {} ({} points)", path.display(), tile.len());
                    TileWrite::Written(path)
                }
                Err(e) => {
                    warn!("tile {} failed: {e:#}", tile.key);
                    TileWrite::Failed(tile.key, e)
                }
            }
        })
        .collect();

    let mut outcome = EmitOutcome::default();
    for r in results {
        match r {
            TileWrite::Written(path) => outcome.written.push(path),
            TileWrite::Failed(key, e) => outcome.failed.push((key, e)),
            TileWrite::Skipped => outcome.cancelled = true,
        }
    }
    outcome
}
