use mask_tools::utils::MaskSummary;
use raster_masks::prelude::{IndexMaskConfig, MeanMaskConfig};
use serde_derive::Serialize;
use std::path::{Path, PathBuf};

/// JSON report printed once the mask is written.
///
/// `bands` lists the input bands in GDAL (1-based)
/// numbering; band indices inside `mean` / `index` refer to
/// the loaded bands, in that order.
#[derive(Serialize)]
pub struct Report {
    pub input: PathBuf,
    pub bands: Vec<isize>,
    pub mean: Option<MeanMaskConfig>,
    pub index: Option<IndexMaskConfig>,
    pub output: Option<PathBuf>,
    pub mask: Option<MaskSummary>,
}

impl Report {
    pub fn mean(input: &Path, band: isize, config: &MeanMaskConfig) -> Self {
        Report {
            input: input.into(),
            bands: vec![band],
            mean: Some(config.clone()),
            index: None,
            output: None,
            mask: None,
        }
    }

    pub fn index(input: &Path, (a_band, b_band): (isize, isize), config: &IndexMaskConfig) -> Self {
        Report {
            input: input.into(),
            bands: vec![a_band, b_band],
            mean: None,
            index: Some(config.clone()),
            output: None,
            mask: None,
        }
    }

    pub fn with_mask(mut self, output: &Path, summary: MaskSummary) -> Self {
        self.output = Some(output.into());
        self.mask = Some(summary);
        self
    }
}
