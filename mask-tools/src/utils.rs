//! Output helpers shared by the tools.

use ndarray::Array2;
use raster_masks::Result;
use serde_derive::Serialize;
use std::path::PathBuf;

pub struct OutputArgs {
    pub path: PathBuf,
    pub driver: String,
}

/// Counts of a boolean mask, reported by the tools.
#[derive(Serialize, Debug, PartialEq)]
pub struct MaskSummary {
    pub rows: usize,
    pub cols: usize,
    pub included: usize,
    pub excluded: usize,
}

impl MaskSummary {
    pub fn of(mask: &Array2<bool>) -> Self {
        let (rows, cols) = mask.dim();
        let included = mask.iter().filter(|&&m| m).count();
        MaskSummary {
            rows,
            cols,
            included,
            excluded: rows * cols - included,
        }
    }
}

use serde::Serialize;
pub fn print_json<T: Serialize>(json: &T) -> Result<()> {
    let writer = std::io::BufWriter::new(std::io::stdout());
    Ok(serde_json::to_writer(writer, json)?)
}
