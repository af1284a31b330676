//! End-to-end runs against real LAS files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use las::{Builder, Point, Transform, Vector, Writer};
use tempfile::TempDir;

use lascube::data::load_point_cloud;
use lascube::pipeline::{run, CancelFlag, TilingConfig};
use lascube::tiling::{BoundsMode, LatticeKind, TileKey};
use lascube::Error;

/// Writes a LAS 1.2 file with millimetre scaling and the given coordinates.
fn write_las(path: &Path, coords: &[[f64; 3]]) {
    let mut builder = Builder::from((1, 2));
    builder.transforms = Vector {
        x: Transform { scale: 0.001, offset: 0.0 },
        y: Transform { scale: 0.001, offset: 0.0 },
        z: Transform { scale: 0.001, offset: 0.0 },
    };
    let header = builder.into_header().unwrap();

    let mut writer = Writer::from_path(path, header).unwrap();
    for &[x, y, z] in coords {
        writer
            .write_point(Point { x, y, z, ..Default::default() })
            .unwrap();
    }
    writer.close().unwrap();
}

fn config(cube: f64, overlap: f64, out: &Path) -> TilingConfig {
    TilingConfig {
        cube_size: cube,
        overlap,
        lattice: LatticeKind::Center,
        bounds: BoundsMode::Scan,
        output_dir: out.to_path_buf(),
        base_name: "cloud".into(),
        extension: "las".into(),
    }
}

/// A 2x2x1 spread: one point well inside each quadrant plus one exactly on
/// the (5,5) boundary.
fn quadrant_coords() -> Vec<[f64; 3]> {
    vec![
        [0.5, 0.5, 0.5],
        [9.5, 0.5, 0.5],
        [0.5, 9.5, 0.5],
        [9.5, 9.5, 0.5],
        [5.0, 5.0, 0.5],
    ]
}

#[test]
fn no_overlap_run_partitions_into_named_tiles() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cloud.las");
    write_las(&input, &quadrant_coords());

    let out = dir.path().join("tiles");
    fs::create_dir(&out).unwrap();

    let cloud = load_point_cloud(&input).unwrap();
    let summary = run(&cloud, &config(5.0, 0.0, &out), &CancelFlag::new()).unwrap();

    assert_eq!(summary.tile_count, 4);
    assert_eq!(summary.written.len(), 4);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.assignments, summary.point_count);

    let mut names: Vec<String> = summary
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "cloud_0_0_0.las",
            "cloud_0_1_0.las",
            "cloud_1_0_0.las",
            "cloud_1_1_0.las",
        ]
    );

    // Union of the emitted tiles is the source set, each point exactly once.
    let mut reloaded = 0usize;
    for p in &summary.written {
        reloaded += load_point_cloud(p).unwrap().len();
    }
    assert_eq!(reloaded, 5);

    // The boundary point belongs to (1,1,0) only.
    let corner = load_point_cloud(&out.join("cloud_1_1_0.las")).unwrap();
    assert!(corner.points.iter().any(|p| p.x == 5.0 && p.y == 5.0));
    for name in ["cloud_0_0_0.las", "cloud_0_1_0.las", "cloud_1_0_0.las"] {
        let tile = load_point_cloud(&out.join(name)).unwrap();
        assert!(!tile.points.iter().any(|p| p.x == 5.0 && p.y == 5.0));
    }
}

#[test]
fn emitted_tiles_keep_source_header_metadata() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cloud.las");
    write_las(&input, &quadrant_coords());

    let out = dir.path().join("tiles");
    fs::create_dir(&out).unwrap();

    let cloud = load_point_cloud(&input).unwrap();
    let summary = run(&cloud, &config(5.0, 0.0, &out), &CancelFlag::new()).unwrap();

    for p in &summary.written {
        let tile = load_point_cloud(p).unwrap();
        assert_eq!(tile.header.transforms(), cloud.header.transforms());
        assert_eq!(tile.header.point_format(), cloud.header.point_format());
        assert_eq!(tile.header.version(), cloud.header.version());
    }
}

#[test]
fn overlap_run_duplicates_border_points_and_tags_names() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cloud.las");
    let mut coords = quadrant_coords();
    coords.push([4.5, 4.5, 0.5]);
    write_las(&input, &coords);

    let out = dir.path().join("tiles");
    fs::create_dir(&out).unwrap();

    let cloud = load_point_cloud(&input).unwrap();
    let summary = run(&cloud, &config(5.0, 1.0, &out), &CancelFlag::new()).unwrap();

    assert!(summary.failed.is_empty());
    assert!(summary.assignments > summary.point_count);

    // Every output name carries the overlap tag.
    for p in &summary.written {
        let name = p.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.contains("_OV10dm.las"), "unexpected name {name}");
    }

    // The point within 1 unit of both boundaries shows up in four tiles.
    let mut carrying = 0usize;
    for p in &summary.written {
        let tile = load_point_cloud(p).unwrap();
        if tile.points.iter().any(|q| q.x == 4.5 && q.y == 4.5) {
            carrying += 1;
        }
    }
    assert_eq!(carrying, 4);

    // Every source point appears in at least one tile.
    let mut total = 0usize;
    for p in &summary.written {
        total += load_point_cloud(p).unwrap().len();
    }
    assert_eq!(total, summary.assignments);
    assert!(total >= cloud.len());
}

#[test]
fn sub_unit_cube_overlap_run_keeps_every_tile() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cloud.las");
    // Two points, one per 0.5 m cell. Their expanded bounds floor to the
    // same six integers, so without qualification the second write would
    // clobber the first.
    write_las(&input, &[[0.75, 0.25, 0.25], [1.25, 0.25, 0.25]]);

    let out = dir.path().join("tiles");
    fs::create_dir(&out).unwrap();

    let cloud = load_point_cloud(&input).unwrap();
    let summary = run(&cloud, &config(0.5, 0.1, &out), &CancelFlag::new()).unwrap();

    assert_eq!(summary.tile_count, 2);
    assert_eq!(summary.written.len(), 2);
    assert!(summary.failed.is_empty());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 2);

    // No points were lost to a shared path.
    let mut total = 0usize;
    for p in &summary.written {
        total += load_point_cloud(p).unwrap().len();
    }
    assert_eq!(total, cloud.len());
}

#[test]
fn one_failed_tile_does_not_abort_the_rest() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cloud.las");
    write_las(&input, &quadrant_coords());

    let out = dir.path().join("tiles");
    fs::create_dir(&out).unwrap();
    // A directory squatting on one tile's output path makes that single
    // write fail while its siblings stay writable.
    fs::create_dir(out.join("cloud_0_0_0.las")).unwrap();

    let cloud = load_point_cloud(&input).unwrap();
    let summary = run(&cloud, &config(5.0, 0.0, &out), &CancelFlag::new()).unwrap();

    assert_eq!(summary.tile_count, 4);
    assert_eq!(summary.written.len(), 3);
    assert_eq!(summary.failed.len(), 1);

    let (key, err) = &summary.failed[0];
    assert_eq!(*key, TileKey { ix: 0, iy: 0, iz: 0 });
    assert!(matches!(err, Error::Write { .. }));

    // The surviving tiles are intact on disk.
    let mut reloaded = 0usize;
    for p in &summary.written {
        reloaded += load_point_cloud(p).unwrap().len();
    }
    assert_eq!(reloaded, 4);
}

#[test]
fn edge_lattice_run_partitions_at_file_level() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cloud.las");
    write_las(&input, &quadrant_coords());

    let out = dir.path().join("tiles");
    fs::create_dir(&out).unwrap();

    let cloud = load_point_cloud(&input).unwrap();
    let mut cfg = config(5.0, 0.0, &out);
    cfg.lattice = LatticeKind::Edge;
    let summary = run(&cloud, &cfg, &CancelFlag::new()).unwrap();

    assert_eq!(summary.tile_count, 4);
    assert_eq!(summary.assignments, summary.point_count);

    let mut names: Vec<String> = summary
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "cloud_0_0_0.las",
            "cloud_0_1_0.las",
            "cloud_1_0_0.las",
            "cloud_1_1_0.las",
        ]
    );

    // Boundary point sits on the x=5, y=5 edges and belongs to (1,1,0).
    let corner = load_point_cloud(&out.join("cloud_1_1_0.las")).unwrap();
    assert!(corner.points.iter().any(|p| p.x == 5.0 && p.y == 5.0));

    let mut reloaded = 0usize;
    for p in &summary.written {
        reloaded += load_point_cloud(p).unwrap().len();
    }
    assert_eq!(reloaded, cloud.len());
}

#[test]
fn reruns_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cloud.las");
    write_las(&input, &quadrant_coords());

    let cloud = load_point_cloud(&input).unwrap();

    let mut dirs: Vec<PathBuf> = Vec::new();
    for name in ["a", "b"] {
        let out = dir.path().join(name);
        fs::create_dir(&out).unwrap();
        run(&cloud, &config(5.0, 1.0, &out), &CancelFlag::new()).unwrap();
        dirs.push(out);
    }

    let mut names: Vec<String> = fs::read_dir(&dirs[0])
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert!(!names.is_empty());

    for name in &names {
        let a = fs::read(dirs[0].join(name)).unwrap();
        let b = fs::read(dirs[1].join(name)).unwrap();
        assert_eq!(a, b, "{name} differs between runs");
    }
}

#[test]
fn no_file_is_written_for_an_empty_cell() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cloud.las");
    // Opposite corners only: the two mixed quadrants stay empty.
    write_las(&input, &[[0.5, 0.5, 0.5], [9.5, 9.5, 0.5]]);

    let out = dir.path().join("tiles");
    fs::create_dir(&out).unwrap();

    let cloud = load_point_cloud(&input).unwrap();
    let summary = run(&cloud, &config(5.0, 0.0, &out), &CancelFlag::new()).unwrap();

    assert_eq!(summary.tile_count, 2);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
}

#[test]
fn invalid_parameters_abort_before_any_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cloud.las");
    write_las(&input, &quadrant_coords());

    let out = dir.path().join("tiles");
    fs::create_dir(&out).unwrap();

    let cloud = load_point_cloud(&input).unwrap();
    let err = run(&cloud, &config(-5.0, 0.0, &out), &CancelFlag::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn empty_cloud_is_reported() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cloud.las");
    write_las(&input, &[]);

    let out = dir.path().join("tiles");
    fs::create_dir(&out).unwrap();

    let cloud = load_point_cloud(&input).unwrap();
    let err = run(&cloud, &config(5.0, 0.0, &out), &CancelFlag::new()).unwrap_err();
    assert!(matches!(err, Error::EmptyInput));
}

#[test]
fn cancelled_run_writes_nothing_further() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cloud.las");
    write_las(&input, &quadrant_coords());

    let out = dir.path().join("tiles");
    fs::create_dir(&out).unwrap();

    let cloud = load_point_cloud(&input).unwrap();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let summary = run(&cloud, &config(5.0, 0.0, &out), &cancel).unwrap();
    assert!(summary.cancelled);
    assert!(summary.written.is_empty());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}
