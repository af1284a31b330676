// src/data/mod.rs
//! Data handling for the tiler.
//!
//! This module provides:
//! - The in-memory point cloud representation
//! - Loading and saving of LAS files via the external codec

pub mod point_cloud;

pub use point_cloud::{load_point_cloud, save_point_cloud, PointCloud};
