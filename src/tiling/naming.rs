// src/tiling/naming.rs
//! Deterministic output names per tile.
//!
//! Two shapes, selected by whether the run uses overlap:
//! - `{base}_{i}_{j}_{k}.{ext}` from the lattice indices, and
//! - `{base}_{xmin}_{ymin}_{zmin}_{xmax}_{ymax}_{zmax}_OV{value}{unit}.{ext}`
//!   from the integer-floored expanded bounds plus the overlap size.
//!
//! Index names never collide because keys are unique per cell. Floored
//! bounds are coarser than keys: with a cube edge below one unit, adjacent
//! tiles can floor to the same six integers. [`tile_file_names`] detects
//! those collisions across the whole run and qualifies only the affected
//! names with the lattice key, so every tile keeps its own file while the
//! historical name shape survives wherever it is unambiguous.

use std::collections::HashMap;

use crate::tiling::assemble::Tile;

/// Formats the overlap margin (meters) in the smallest convenient unit,
/// without decimals: `2.1` -> `"21dm"`, `0.35` -> `"35cm"`, `0.007` ->
/// `"7mm"`.
///
/// The final branch scales by 1e4 rather than a true micrometre factor
/// (1e6). Downstream consumers match on the exact historical names, so the
/// factor stays as-is.
pub fn overlap_suffix(overlap: f64) -> String {
    if overlap >= 1.0 {
        format!("{}dm", (overlap * 10.0) as i64)
    } else if overlap >= 0.1 {
        format!("{}cm", (overlap * 100.0) as i64)
    } else if overlap >= 0.01 {
        format!("{}mm", (overlap * 1000.0) as i64)
    } else {
        format!("{}um", (overlap * 10_000.0) as i64)
    }
}

fn overlap_name(base: &str, ext: &str, tile: &Tile, overlap: f64, with_key: bool) -> String {
    let q = &tile.query;
    let key = if with_key {
        format!("_{}_{}_{}", tile.key.ix, tile.key.iy, tile.key.iz)
    } else {
        String::new()
    };
    format!(
        "{base}_{}_{}_{}_{}_{}_{}{key}_OV{}.{ext}",
        q.min.x.floor() as i64,
        q.min.y.floor() as i64,
        q.min.z.floor() as i64,
        q.max.x.floor() as i64,
        q.max.y.floor() as i64,
        q.max.z.floor() as i64,
        overlap_suffix(overlap),
    )
}

/// File name for one tile, in the historical shape.
///
/// Collision-blind: with overlap and a sub-unit cube edge, two tiles can
/// produce the same floored bounds. Callers emitting a whole run must go
/// through [`tile_file_names`] instead.
pub fn tile_file_name(base: &str, ext: &str, tile: &Tile, overlap: f64) -> String {
    if overlap > 0.0 {
        overlap_name(base, ext, tile, overlap, false)
    } else {
        format!(
            "{base}_{}_{}_{}.{ext}",
            tile.key.ix, tile.key.iy, tile.key.iz
        )
    }
}

/// File names for a whole run, guaranteed unique.
///
/// Names that would collide under the floored-bounds shape are qualified
/// with the tile's lattice key (unique by construction); all others keep
/// the historical shape unchanged.
pub fn tile_file_names(base: &str, ext: &str, tiles: &[Tile], overlap: f64) -> Vec<String> {
    let mut names: Vec<String> = tiles
        .iter()
        .map(|t| tile_file_name(base, ext, t, overlap))
        .collect();

    if overlap > 0.0 {
        let colliding: Vec<bool> = {
            let mut seen: HashMap<&str, usize> = HashMap::new();
            for n in &names {
                *seen.entry(n.as_str()).or_default() += 1;
            }
            names.iter().map(|n| seen[n.as_str()] > 1).collect()
        };

        for (i, collides) in colliding.iter().enumerate() {
            if *collides {
                names[i] = overlap_name(base, ext, &tiles[i], overlap, true);
            }
        }
    }

    names
}
