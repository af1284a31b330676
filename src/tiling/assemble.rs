// src/tiling/assemble.rs
//! Groups indexed points into per-tile subsets.

use std::collections::BTreeMap;

use crate::data::PointCloud;
use crate::tiling::bounds::BoundingBox;
use crate::tiling::grid::{GridSpec, TileKey};
use crate::tiling::index::TileIndexer;

/// One cubic partition of the point set.
///
/// Holds indices into the source cloud rather than copies; the points are
/// only materialized when the tile is written out. `points` preserves source
/// order, which keeps output deterministic.
#[derive(Debug)]
pub struct Tile {
    pub key: TileKey,
    /// Core cube bounds of the cell.
    pub core: BoundingBox,
    /// Bounds used for membership testing (core grown by the overlap).
    pub query: BoundingBox,
    pub points: Vec<usize>,
}

impl Tile {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Single pass over the cloud, bucketing point indices by tile key.
///
/// Only cells that receive at least one point ever get a bucket, so empty
/// tiles are never materialized. The `BTreeMap` keeps tile enumeration order
/// deterministic across runs.
pub fn assemble(cloud: &PointCloud, grid: &GridSpec) -> Vec<Tile> {
    let indexer = TileIndexer::new(grid);
    let mut buckets: BTreeMap<TileKey, Vec<usize>> = BTreeMap::new();

    for (i, p) in cloud.points.iter().enumerate() {
        for key in indexer.keys_for(p.x, p.y, p.z) {
            buckets.entry(key).or_default().push(i);
        }
    }

    buckets
        .into_iter()
        .map(|(key, points)| Tile {
            key,
            core: grid.core_bounds(key),
            query: grid.query_bounds(key),
            points,
        })
        .collect()
}
