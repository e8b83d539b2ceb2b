//! csgshell: hollow an STL model into a printable shell with a drain slot.
//!
//! # Logging
//!
//! Set `RUST_LOG` to control log output, or pass `-v` (info), `-vv` (debug)
//! or `-vvv` (trace):
//!
//! ```bash
//! RUST_LOG=csgshell=debug csgshell model.stl --wall-thickness 1.5 --slot 10 10 0.02
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser};
use csgshell::io::stl::{read_stl_file, write_stl_file};
use csgshell::params::scale_for_wall_thickness;
use csgshell::{
    BooleanEngine, HollowParams, MinkowskiDilator, ShellBuilder, SlotSpec, Transform, Transformer,
    float_types::{Real, set_tolerance},
    hollow_centered, hollow_with,
};
use nalgebra::Vector3;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Hollow a closed STL model.
///
/// The inner cavity is the model scaled about its origin and dilated by a
/// sphere. The scale comes from `--scale` or is derived from
/// `--wall-thickness` and the model's bounding box.
#[derive(Parser)]
#[command(name = "csgshell")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("thickness").required(true).args(["scale", "wall_thickness"])))]
struct Cli {
    /// Input STL file (ASCII or binary)
    input: PathBuf,

    /// Output STL file [default: <input>_hollow.stl]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Per-axis scale of the inner cavity, each in (0, 1)
    #[arg(long, num_args = 3, value_names = ["SX", "SY", "SZ"])]
    scale: Option<Vec<Real>>,

    /// Wall thickness; the scale is (d - 2t) / d per axis, applied about
    /// the model's bounding-box centre
    #[arg(long)]
    wall_thickness: Option<Real>,

    /// Radius of the dilating sphere
    #[arg(long, default_value = "0")]
    radius: Real,

    /// Sphere slices around the pole axis
    #[arg(long, default_value = "16")]
    sphere_segments: usize,

    /// Sphere bands from pole to pole
    #[arg(long, default_value = "8")]
    sphere_stacks: usize,

    /// Drain slot box width, depth and height, centred under the model
    #[arg(long, num_args = 3, value_names = ["W", "D", "H"])]
    slot: Option<Vec<Real>>,

    /// How far the slot box sinks below the model's floor
    #[arg(long, default_value = "0.01")]
    slot_sink: Real,

    /// Move the model's bounding-box centre to the origin before hollowing
    #[arg(long)]
    center: bool,

    /// Weld and classification tolerance
    #[arg(long)]
    tolerance: Option<Real>,

    /// Write ASCII instead of binary STL
    #[arg(long)]
    ascii: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "csgshell=info",
            2 => "csgshell=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    input.with_file_name(format!("{stem}_hollow.stl"))
}

fn vector(values: &[Real], what: &str) -> Result<Vector3<Real>> {
    match values {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => bail!("{what} takes exactly three values"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(tolerance) = cli.tolerance {
        set_tolerance(tolerance);
    }

    let mut model = read_stl_file(&cli.input).with_context(|| format!("failed to load {}", cli.input.display()))?;
    if cli.center {
        model = Transformer::center(&model);
    }
    let bounds = model.bounding_box();

    let scale = match (&cli.scale, cli.wall_thickness) {
        (Some(values), _) => vector(values, "--scale")?,
        (None, Some(thickness)) => scale_for_wall_thickness(bounds.extents(), thickness)?,
        (None, None) => bail!("either --scale or --wall-thickness is required"),
    };

    // slot sits under the model's footprint centre, relative to its floor
    let slot = match &cli.slot {
        Some(values) => {
            let size = vector(values, "--slot")?;
            let spec = SlotSpec::bottom_opening(size.x, size.y, size.z, cli.slot_sink);
            let under_model = Transform::translation(Vector3::new(
                bounds.center().x,
                bounds.center().y,
                bounds.mins.z,
            ));
            Some(SlotSpec::new(spec.size, spec.placement.then(&under_model)))
        },
        None => None,
    };

    let builder = ShellBuilder::new(
        MinkowskiDilator::new(cli.sphere_segments, cli.sphere_stacks),
        BooleanEngine::default(),
    );
    let params = HollowParams {
        scale,
        dilation_radius: cli.radius,
        slot,
    };
    // a derived scale only gives the requested wall about the model's centre
    let report = if cli.wall_thickness.is_some() {
        hollow_centered(&builder, &model, &params)?
    } else {
        hollow_with(&builder, &model, &params)?
    };

    let output = cli.output.clone().unwrap_or_else(|| default_output(&cli.input));
    let name = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csgshell".to_string());
    write_stl_file(&report.solid, &output, &name, cli.ascii)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("scale:        {:.4} {:.4} {:.4}", scale.x, scale.y, scale.z);
    println!("model volume: {:.4}", report.model_volume);
    println!("shell volume: {:.4}", report.shell_volume);
    println!("final volume: {:.4}", report.final_volume);
    println!(
        "triangles:    {} -> {} -> {}",
        report.model_triangles, report.shell_triangles, report.final_triangles
    );
    println!("written:      {}", output.display());
    Ok(())
}
