use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use lascube::data::load_point_cloud;
use lascube::pipeline::{run, CancelFlag, TilingConfig};
use lascube::tiling::{BoundsMode, LatticeKind};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LatticeArg {
    /// Half-open bin edges per axis; strict partition addressing.
    Edge,
    /// Bin centers snapped to cube multiples; sequential (i,j,k) addressing.
    Center,
}

impl From<LatticeArg> for LatticeKind {
    fn from(v: LatticeArg) -> Self {
        match v {
            LatticeArg::Edge => LatticeKind::Edge,
            LatticeArg::Center => LatticeKind::Center,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BoundsArg {
    /// Recompute extrema from the points (authoritative).
    Scan,
    /// Trust the extrema stored in the LAS header.
    Header,
}

impl From<BoundsArg> for BoundsMode {
    fn from(v: BoundsArg) -> Self {
        match v {
            BoundsArg::Scan => BoundsMode::Scan,
            BoundsArg::Header => BoundsMode::Header,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lascube", version)]
struct Args {
    /// Input LAS file.
    input: PathBuf,

    /// Output directory. Defaults to the input file's directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Cube edge length, in the cloud's units (meters).
    #[arg(long, default_value_t = 1.0)]
    cube_size: f64,

    /// Overlap margin added to every tile face (meters).
    #[arg(long, default_value_t = 0.0)]
    overlap: f64,

    #[arg(long, value_enum, default_value_t = LatticeArg::Center)]
    lattice: LatticeArg,

    #[arg(long, value_enum, default_value_t = BoundsArg::Scan)]
    bounds: BoundsArg,

    /// Naming prefix for output tiles. Defaults to the input file stem.
    #[arg(long)]
    base_name: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        args.input
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let base_name = match args.base_name {
        Some(b) => b,
        None => args
            .input
            .file_stem()
            .context("input path has no file name")?
            .to_string_lossy()
            .into_owned(),
    };

    let extension = args
        .input
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_else(|| "las".to_string());

    let cfg = TilingConfig {
        cube_size: args.cube_size,
        overlap: args.overlap,
        lattice: args.lattice.into(),
        bounds: args.bounds.into(),
        output_dir,
        base_name,
        extension,
    };
    cfg.validate()?;

    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("creating {}", cfg.output_dir.display()))?;

    let cloud = load_point_cloud(&args.input)?;
    info!("loaded {} points from {}", cloud.len(), args.input.display());

    let summary = run(&cloud, &cfg, &CancelFlag::new())?;

    info!(
        "done: {} tiles, {} written, {} points ({} assignments)",
        summary.tile_count,
        summary.written.len(),
        summary.point_count,
        summary.assignments
    );

    if !summary.failed.is_empty() {
        for (key, e) in &summary.failed {
            warn!("tile {key} was not written: {e:#}");
        }
        bail!("{} of {} tiles failed to write", summary.failed.len(), summary.tile_count);
    }

    Ok(())
}
