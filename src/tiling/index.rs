// src/tiling/index.rs
//! Per-point tile membership.
//!
//! Without overlap each point lands in exactly one tile (a strict partition).
//! With overlap a point near a tile face is duplicated into every tile whose
//! expanded bounds contain it; duplication is the whole purpose of overlap.
//!
//! The membership test decomposes per axis: the set of tiles containing a
//! point is the cartesian product of the per-axis candidate bin sets, and the
//! candidates on an axis are confined to the primary bin plus the
//! `ceil(overlap / cube_size)` bins on either side. That keeps the whole
//! assignment pass O(N) instead of re-scanning the cloud once per tile.

use smallvec::SmallVec;

use crate::tiling::grid::{GridSpec, TileKey};

pub struct TileIndexer<'a> {
    grid: &'a GridSpec,
    /// How many bins an expanded tile face can reach past its own cell.
    reach: usize,
}

impl<'a> TileIndexer<'a> {
    pub fn new(grid: &'a GridSpec) -> Self {
        let reach = if grid.overlap > 0.0 {
            (grid.overlap / grid.cube_size).ceil() as usize
        } else {
            0
        };
        Self { grid, reach }
    }

    /// All tiles the point at (x, y, z) is a member of.
    ///
    /// The primary (clamped) bin is always included, so every point appears
    /// in at least one tile even when it sits exactly on the lattice's outer
    /// boundary. Neighbor bins are admitted by the half-open expanded-bounds
    /// test `coord >= min - overlap && coord < max + overlap`.
    pub fn keys_for(&self, x: f64, y: f64, z: f64) -> SmallVec<[TileKey; 8]> {
        let coords = [x, y, z];
        let mut axis_bins: [SmallVec<[u32; 4]>; 3] = Default::default();

        for axis in 0..3 {
            let primary = self.grid.bin_index(axis, coords[axis]);
            axis_bins[axis].push(primary as u32);

            if self.reach > 0 {
                let lo = primary.saturating_sub(self.reach);
                let hi = (primary + self.reach).min(self.grid.bins(axis) - 1);
                for i in lo..=hi {
                    if i == primary {
                        continue;
                    }
                    let (bmin, bmax) = self.grid.bin_bounds(axis, i);
                    let c = coords[axis];
                    if c >= bmin - self.grid.overlap && c < bmax + self.grid.overlap {
                        axis_bins[axis].push(i as u32);
                    }
                }
            }
        }

        let mut keys = SmallVec::new();
        for &ix in &axis_bins[0] {
            for &iy in &axis_bins[1] {
                for &iz in &axis_bins[2] {
                    keys.push(TileKey { ix, iy, iz });
                }
            }
        }
        keys
    }
}
