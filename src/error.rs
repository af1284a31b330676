// src/error.rs
//! Error taxonomy for the tiling pipeline.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The source point cloud contains no points.
    #[error("input point cloud contains no points")]
    EmptyInput,

    /// A pipeline parameter failed validation before any I/O happened.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The input file could not be read or parsed.
    #[error("failed to read {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: las::Error,
    },

    /// A single tile failed to write. Other tiles are unaffected.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: las::Error,
    },
}
