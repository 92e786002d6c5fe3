/// # Raster-Shape-Mask
/// Rasterize the polygons of a shapefile onto the pixel
/// grid of a reference raster. Pixels whose center lies in
/// a polygon are marked `1`, all others `0`.
use mask_tools::{arg, args_parser, opt};
use anyhow::Context;
use log::{info, warn};
use std::path::PathBuf;

use mask_tools::{utils::*, Result};
use raster_masks::prelude::*;

// Main function
mask_tools::sync_main!(run());

fn run() -> Result<()> {
    // Parse command line args
    let args = parse_cmd_line();
    mask_tools::cli::init_logger(args.verbose);

    // Reference grid
    let ds = open_dataset(&args.reference)?;
    let (cols, rows) = ds.raster_size();
    let meta = read_metadata(&ds);
    let transform = meta.transform.with_context(|| {
        format!("{}: reference raster has no geo transform", args.reference.display())
    })?;
    if meta.projection.is_none() {
        warn!("{}: reference raster has no projection", args.reference.display());
    }

    info!(
        "rasterizing {} onto {}x{} grid",
        args.shapefile.display(),
        rows,
        cols
    );
    let mask = shapefile_mask(&args.shapefile, (rows, cols), &transform)?;
    write_mask_raster(&args.output.path, &mask, &meta, &args.output.driver)?;

    print_json(&MaskSummary::of(&mask))?;
    Ok(())
}

/// Program arguments
pub struct Args {
    /// Polygons to rasterize (vector dataset)
    pub shapefile: PathBuf,
    /// Raster providing the output grid
    pub reference: PathBuf,
    /// Output filename
    pub output: OutputArgs,
    /// Debug logging
    pub verbose: bool,
}

use clap::value_t;
fn parse_cmd_line() -> Args {
    let matches = args_parser!("raster-shape-mask")
        .about("Rasterizes shapefile polygons onto the grid of a reference raster.")
        .arg(
            arg!("shapefile")
                .required(true)
                .help("Polygons path (vector dataset)"),
        )
        .arg(
            arg!("reference")
                .required(true)
                .help("Reference raster path (grid and georeferencing)"),
        )
        .arg(
            arg!("output")
                .required(true)
                .help("Output Mask Raster path (raster dataset)"),
        )
        .arg(
            opt!("driver")
                .short("d")
                .help("Output driver (default: GTiff)"),
        )
        .arg(
            opt!("verbose")
                .short("v")
                .takes_value(false)
                .help("Enable debug logging"),
        )
        .get_matches();

    let shapefile = value_t!(matches, "shapefile", PathBuf).unwrap_or_else(|e| e.exit());
    let reference = value_t!(matches, "reference", PathBuf).unwrap_or_else(|e| e.exit());
    let output = value_t!(matches, "output", PathBuf).unwrap_or_else(|e| e.exit());
    let driver = value_t!(matches, "driver", String).unwrap_or_else(|_| String::from(DEFAULT_DRIVER));

    Args {
        shapefile,
        reference,
        output: OutputArgs {
            path: output,
            driver,
        },
        verbose: matches.is_present("verbose"),
    }
}
