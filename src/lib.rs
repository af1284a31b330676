// src/lib.rs
//! Cubic tiling of LAS point clouds.
//!
//! This library partitions a point cloud into a regular grid of cubic tiles,
//! each emitted as an independent LAS file that reuses the source header's
//! scale/offset metadata. Tiles may optionally be grown by a symmetric
//! overlap margin so that neighboring tiles share border points.

pub mod data;
pub mod error;
pub mod pipeline;
pub mod tiling;

pub use error::{Error, Result};
pub use pipeline::{CancelFlag, RunSummary, TilingConfig};
