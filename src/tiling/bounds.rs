// src/tiling/bounds.rs
//! Axis-aligned bounding box of the source cloud.

use glam::DVec3;

use crate::data::PointCloud;
use crate::error::{Error, Result};

/// Where the bounding box comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsMode {
    /// Trust the per-axis extrema stored in the LAS header.
    Header,
    /// Recompute the extrema by scanning every point. Authoritative; use
    /// this unless a full scan is too expensive.
    Scan,
}

/// Min/max per axis, derived once and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    pub fn extent(&self) -> DVec3 {
        self.max - self.min
    }

    /// Grows the box by `margin` on every face.
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            min: self.min - DVec3::splat(margin),
            max: self.max + DVec3::splat(margin),
        }
    }
}

/// Derives the bounding box of the cloud.
///
/// The only error condition is an empty point set, which both modes reject:
/// an empty cloud has no meaningful extrema regardless of what the header
/// claims.
pub fn compute_bounds(cloud: &PointCloud, mode: BoundsMode) -> Result<BoundingBox> {
    if cloud.is_empty() {
        return Err(Error::EmptyInput);
    }

    match mode {
        BoundsMode::Header => {
            let b = cloud.header.bounds();
            Ok(BoundingBox {
                min: DVec3::new(b.min.x, b.min.y, b.min.z),
                max: DVec3::new(b.max.x, b.max.y, b.max.z),
            })
        }
        BoundsMode::Scan => {
            let mut min = DVec3::splat(f64::INFINITY);
            let mut max = DVec3::splat(f64::NEG_INFINITY);

            for p in &cloud.points {
                let v = DVec3::new(p.x, p.y, p.z);
                min = min.min(v);
                max = max.max(v);
            }

            Ok(BoundingBox { min, max })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use las::{Builder, Point};

    fn cloud_of(coords: &[[f64; 3]]) -> PointCloud {
        let header = Builder::from((1, 2)).into_header().unwrap();
        let points = coords
            .iter()
            .map(|&[x, y, z]| Point {
                x,
                y,
                z,
                ..Default::default()
            })
            .collect();
        PointCloud { header, points }
    }

    #[test]
    fn scan_finds_extrema() {
        let cloud = cloud_of(&[[1.0, 2.0, 3.0], [-4.0, 5.0, 0.5], [0.0, -1.0, 9.0]]);
        let bb = compute_bounds(&cloud, BoundsMode::Scan).unwrap();
        assert_eq!(bb.min, DVec3::new(-4.0, -1.0, 0.5));
        assert_eq!(bb.max, DVec3::new(1.0, 5.0, 9.0));
    }

    #[test]
    fn empty_cloud_is_rejected_in_both_modes() {
        let cloud = cloud_of(&[]);
        assert!(matches!(
            compute_bounds(&cloud, BoundsMode::Scan),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            compute_bounds(&cloud, BoundsMode::Header),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn inflate_grows_every_face() {
        let bb = BoundingBox {
            min: DVec3::ZERO,
            max: DVec3::splat(10.0),
        };
        let grown = bb.inflate(1.5);
        assert_eq!(grown.min, DVec3::splat(-1.5));
        assert_eq!(grown.max, DVec3::splat(11.5));
    }
}
