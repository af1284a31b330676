// src/data/point_cloud.rs
//! In-memory point cloud plus the load/save seam around the LAS codec.
//!
//! The tiling core never touches the binary format itself; everything goes
//! through [`load_point_cloud`] and [`save_point_cloud`]. Emitted tiles are
//! written under a clone of the source header, so the scale factors, offsets,
//! point format and version carry over unchanged and integer-to-real
//! coordinate conversion stays bit-consistent across tiles.

use std::path::Path;

use las::{Header, Point, Reader, Writer};

use crate::error::{Error, Result};

/// A fully loaded point cloud: immutable header metadata plus the ordered
/// point records. Loaded once, read-only for the duration of tiling.
#[derive(Debug)]
pub struct PointCloud {
    pub header: Header,
    pub points: Vec<Point>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Parses a LAS file into header + points.
pub fn load_point_cloud(path: &Path) -> Result<PointCloud> {
    let wrap = |source: las::Error| Error::Load {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = Reader::from_path(path).map_err(wrap)?;
    let header = reader.header().clone();

    let mut points = Vec::with_capacity(header.number_of_points() as usize);
    for point in reader.points() {
        points.push(point.map_err(wrap)?);
    }

    Ok(PointCloud { header, points })
}

/// Serializes a point subset under the given header to a new file.
///
/// The header is cloned as-is; the codec updates the point count and stored
/// extrema on close but leaves scale/offset/format untouched.
pub fn save_point_cloud<'a, I>(path: &Path, header: &Header, points: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Point>,
{
    let wrap = |source: las::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = Writer::from_path(path, header.clone()).map_err(wrap)?;
    for point in points {
        writer.write_point(point.clone()).map_err(wrap)?;
    }
    writer.close().map_err(wrap)?;

    Ok(())
}
