// src/tiling/mod.rs
//! The tiling core.
//!
//! Control flow: bounding box -> grid plan -> per-point tile membership ->
//! per-tile point buckets -> named output files. Each stage lives in its own
//! submodule and is independently testable.

pub mod assemble;
pub mod bounds;
pub mod emit;
pub mod grid;
pub mod index;
pub mod naming;

pub use assemble::{assemble, Tile};
pub use bounds::{compute_bounds, BoundingBox, BoundsMode};
pub use emit::{emit_tiles, EmitOutcome};
pub use grid::{GridSpec, LatticeKind, TileKey};
pub use index::TileIndexer;
pub use naming::{overlap_suffix, tile_file_name, tile_file_names};
