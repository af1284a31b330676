// src/tiling/grid.rs
//! Tile lattice derived from the bounding box and cube size.
//!
//! Two equivalent but distinct constructions are supported, because the
//! downstream naming and indexing depend on which one is in use:
//!
//! - **Edge lattice**: per axis, half-open bin edges starting at
//!   `floor(min/cube)*cube` and stepping by `cube` until past `max + cube`.
//!   A coordinate's bin is the count of edges <= it, minus one (right-open
//!   digitize), so every coordinate maps to exactly one bin and a boundary
//!   coordinate belongs to the bin whose lower edge it sits on.
//! - **Center lattice**: bounds snapped outward to cube multiples, bin
//!   centers spaced `cube` apart starting at `snapped_min + cube/2`.
//!   Enumeration order over the center arrays yields the sequential (i,j,k)
//!   indices used for naming.

use glam::DVec3;

use crate::error::{Error, Result};
use crate::tiling::bounds::BoundingBox;

/// Which lattice construction to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatticeKind {
    Edge,
    Center,
}

/// Integer coordinate of a cell in the lattice. Unique per cell; `Ord` so
/// that enumeration order is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey {
    pub ix: u32,
    pub iy: u32,
    pub iz: u32,
}

impl std::fmt::Display for TileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.ix, self.iy, self.iz)
    }
}

/// The per-axis lattice arrays.
#[derive(Debug, Clone)]
pub enum Lattice {
    /// Half-open bin edges per axis; axis `a` has `edges[a].len() - 1` bins.
    Edge { edges: [Vec<f64>; 3] },
    /// Snapped lower bound plus bin centers per axis.
    Center { origin: DVec3, centers: [Vec<f64>; 3] },
}

/// Grid geometry: cube edge length, overlap margin, and the lattice.
///
/// Invariant: the lattice fully covers the bounding box it was planned from,
/// so every in-bounds coordinate has a bin on every axis.
#[derive(Debug, Clone)]
pub struct GridSpec {
    pub cube_size: f64,
    pub overlap: f64,
    lattice: Lattice,
}

impl GridSpec {
    /// Plans the lattice for `bounds`.
    ///
    /// Validates parameters up front: `cube_size` must be finite and
    /// positive, `overlap` finite and non-negative. A degenerate extent
    /// (`cube_size` >= the bounding box on an axis, or a flat axis) still
    /// yields at least one bin on that axis.
    pub fn plan(
        bounds: &BoundingBox,
        cube_size: f64,
        overlap: f64,
        kind: LatticeKind,
    ) -> Result<Self> {
        if !cube_size.is_finite() || cube_size <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "cube_size must be a positive number, got {cube_size}"
            )));
        }
        if !overlap.is_finite() || overlap < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "overlap must be a non-negative number, got {overlap}"
            )));
        }

        let min = bounds.min.to_array();
        let max = bounds.max.to_array();

        let lattice = match kind {
            LatticeKind::Edge => Lattice::Edge {
                edges: [
                    edge_axis(min[0], max[0], cube_size),
                    edge_axis(min[1], max[1], cube_size),
                    edge_axis(min[2], max[2], cube_size),
                ],
            },
            LatticeKind::Center => {
                let (ox, cx) = center_axis(min[0], max[0], cube_size);
                let (oy, cy) = center_axis(min[1], max[1], cube_size);
                let (oz, cz) = center_axis(min[2], max[2], cube_size);
                Lattice::Center {
                    origin: DVec3::new(ox, oy, oz),
                    centers: [cx, cy, cz],
                }
            }
        };

        Ok(Self {
            cube_size,
            overlap,
            lattice,
        })
    }

    pub fn kind(&self) -> LatticeKind {
        match self.lattice {
            Lattice::Edge { .. } => LatticeKind::Edge,
            Lattice::Center { .. } => LatticeKind::Center,
        }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Number of bins along `axis` (0 = x, 1 = y, 2 = z).
    pub fn bins(&self, axis: usize) -> usize {
        match &self.lattice {
            Lattice::Edge { edges } => edges[axis].len() - 1,
            Lattice::Center { centers, .. } => centers[axis].len(),
        }
    }

    /// Total cell count of the lattice (occupied or not).
    pub fn cell_count(&self) -> usize {
        self.bins(0) * self.bins(1) * self.bins(2)
    }

    /// Bin index of `coord` along `axis`, clamped into the lattice.
    ///
    /// Clamping folds a coordinate exactly on the lattice's upper boundary
    /// into the last bin, so the globally maximal point on an axis is never
    /// dropped by the half-open membership rule.
    pub fn bin_index(&self, axis: usize, coord: f64) -> usize {
        let last = self.bins(axis) - 1;
        match &self.lattice {
            Lattice::Edge { edges } => edges[axis]
                .partition_point(|e| *e <= coord)
                .saturating_sub(1)
                .min(last),
            Lattice::Center { origin, .. } => {
                let i = ((coord - origin[axis]) / self.cube_size).floor();
                if i < 0.0 {
                    0
                } else {
                    (i as usize).min(last)
                }
            }
        }
    }

    /// Core cube bounds of bin `i` along `axis`, as `(min, max)`.
    pub fn bin_bounds(&self, axis: usize, i: usize) -> (f64, f64) {
        match &self.lattice {
            Lattice::Edge { edges } => (edges[axis][i], edges[axis][i + 1]),
            Lattice::Center { centers, .. } => {
                let c = centers[axis][i];
                let half = self.cube_size / 2.0;
                (c - half, c + half)
            }
        }
    }

    /// Core cube bounds of a tile.
    pub fn core_bounds(&self, key: TileKey) -> BoundingBox {
        let (x0, x1) = self.bin_bounds(0, key.ix as usize);
        let (y0, y1) = self.bin_bounds(1, key.iy as usize);
        let (z0, z1) = self.bin_bounds(2, key.iz as usize);
        BoundingBox {
            min: DVec3::new(x0, y0, z0),
            max: DVec3::new(x1, y1, z1),
        }
    }

    /// Membership-test bounds of a tile: the core cube grown by the overlap
    /// margin on every face. Equal to the core bounds when overlap is zero.
    pub fn query_bounds(&self, key: TileKey) -> BoundingBox {
        self.core_bounds(key).inflate(self.overlap)
    }
}

fn edge_axis(min: f64, max: f64, cube: f64) -> Vec<f64> {
    let start = (min / cube).floor() * cube;
    // Integer stepping avoids accumulating float error over long axes. The
    // last edge lands at least one full step past `max`.
    let steps = ((max - start) / cube).floor().max(0.0) as usize + 2;
    (0..=steps).map(|k| start + k as f64 * cube).collect()
}

fn center_axis(min: f64, max: f64, cube: f64) -> (f64, Vec<f64>) {
    let lo = (min / cube).floor() * cube;
    let mut hi = (max / cube).ceil() * cube;
    if hi - lo < cube {
        hi = lo + cube;
    }
    let count = ((hi - lo) / cube).round() as usize;
    let centers = (0..count).map(|k| lo + (k as f64 + 0.5) * cube).collect();
    (lo, centers)
}
