/// # Raster-Window-Mask
/// Tile a raster into fixed-size windows and mark the
/// windows to analyze, either by thresholding the mean
/// intensity of a band or by an Otsu threshold on a
/// normalized difference index.
use mask_tools::{arg, args_parser, opt};
use log::info;
use ndarray::Array2;
use std::path::PathBuf;

use mask_tools::cli::args::{parallelism, parse_step};
use mask_tools::{utils::*, Result};
use raster_masks::prelude::*;

mod report;
use report::Report;

// Main function
mask_tools::sync_main!(run());

fn run() -> Result<()> {
    // Parse command line args
    let args = parse_cmd_line();
    mask_tools::cli::init_logger(args.verbose);

    // Read the bands the mode needs and derive the mask
    let (mask, meta, step, report) = match &args.mode {
        Mode::Mean { band, config } => {
            let (image, meta) = read_image(&args.input, &[*band])?;
            info!("mean intensity mask over band {} of {}", band, args.input.display());
            let mask = mean_intensity_mask(&image, config)?;
            (mask, meta, config.step, Report::mean(&args.input, *band, config))
        }
        Mode::Index {
            a_band,
            b_band,
            config,
        } => {
            let (image, meta) = read_image(&args.input, &[*a_band, *b_band])?;
            info!(
                "index mask over bands ({}, {}) of {}",
                a_band,
                b_band,
                args.input.display()
            );
            let mask = index_mask(&image, config)?;
            (mask, meta, config.step, Report::index(&args.input, (*a_band, *b_band), config))
        }
    };

    // Tag the output with the window grid's georeferencing
    let out_meta = GeoMetadata {
        projection: meta.projection,
        transform: meta.transform.map(|gt| window_grid_transform(&gt, step)),
    };
    write_mask_raster(&args.output.path, &mask, &out_meta, &args.output.driver)?;

    print_json(&report.with_mask(&args.output.path, summarize(&mask)))?;
    Ok(())
}

fn summarize(mask: &Array2<bool>) -> MaskSummary {
    let summary = MaskSummary::of(mask);
    info!(
        "{} of {} windows included",
        summary.included,
        summary.rows * summary.cols
    );
    summary
}

/// Mask derivation mode, with band numbers in GDAL
/// (1-based) numbering.
pub enum Mode {
    Mean { band: isize, config: MeanMaskConfig },
    Index {
        a_band: isize,
        b_band: isize,
        config: IndexMaskConfig,
    },
}

/// Program arguments
pub struct Args {
    /// Input filename
    pub input: PathBuf,
    /// Output filename
    pub output: OutputArgs,
    /// Mode and its configuration
    pub mode: Mode,
    /// Debug logging
    pub verbose: bool,
}

use clap::value_t;
fn parse_cmd_line() -> Args {
    use clap::Error;
    use clap::ErrorKind::InvalidValue;
    let matches = args_parser!("raster-window-mask")
        .about("Creates a mask marking the windows of a raster to analyze.")
        .arg(
            arg!("input")
                .required(true)
                .help("Input path (raster dataset)"),
        )
        .arg(
            arg!("output")
                .required(true)
                .help("Output Mask Raster path (raster dataset)"),
        )
        .arg(
            opt!("mode")
                .short("m")
                .possible_values(&["mean", "index"])
                .help("Mask mode: mean intensity or normalized difference index (default: mean)"),
        )
        .arg(
            opt!("step")
                .short("s")
                .required(true)
                .help("Window step in pixels, N or H,W"),
        )
        .arg(opt!("band").help("Band to average in mean mode (default: 1)"))
        .arg(
            opt!("threshold")
                .short("t")
                .allow_hyphen_values(true)
                .help("Mean intensity cutoff in mean mode (default: 0.8)"),
        )
        .arg(opt!("a band").help("Band A of (A - B) / (A + B) in index mode (default: 4, NIR)"))
        .arg(opt!("b band").help("Band B of (A - B) / (A + B) in index mode (default: 3, red)"))
        .arg(opt!("bins").help("Histogram bins of the Otsu threshold (default: 256)"))
        .arg(
            opt!("jobs")
                .short("j")
                .help("Worker threads; 0 for all cores (default: 1 in mean mode, all in index mode)"),
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

    let input = value_t!(matches, "input", PathBuf).unwrap_or_else(|e| e.exit());
    let output = value_t!(matches, "output", PathBuf).unwrap_or_else(|e| e.exit());
    let driver = value_t!(matches, "driver", String).unwrap_or_else(|_| String::from(DEFAULT_DRIVER));
    let step = value_t!(matches, "step", String).unwrap_or_else(|e| e.exit());
    let step = parse_step(&step).unwrap_or_else(|e| Error::with_description(&e, InvalidValue).exit());
    let jobs = value_t!(matches, "jobs", usize).ok();

    let mode = match matches.value_of("mode").unwrap_or("mean") {
        "index" => {
            let a_band = value_t!(matches, "a band", isize).unwrap_or(NIR_BAND as isize + 1);
            let b_band = value_t!(matches, "b band", isize).unwrap_or(RED_BAND as isize + 1);
            let mut config = IndexMaskConfig::new(step).with_bands(0, 1);
            config.bins = value_t!(matches, "bins", usize).unwrap_or(OTSU_BINS);
            config.parallelism = parallelism(jobs, config.parallelism);
            Mode::Index {
                a_band,
                b_band,
                config,
            }
        }
        _ => {
            let band = value_t!(matches, "band", isize).unwrap_or(1);
            let mut config = MeanMaskConfig::new(step).with_band(0);
            config.threshold = value_t!(matches, "threshold", f64).unwrap_or(DEFAULT_MEAN_THRESHOLD);
            config.parallelism = parallelism(jobs, config.parallelism);
            Mode::Mean { band, config }
        }
    };

    let output = OutputArgs {
        path: output,
        driver,
    };

    Args {
        input,
        output,
        mode,
        verbose: matches.is_present("verbose"),
    }
}
