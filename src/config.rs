//! Parameters of the mask pipelines.
//!
//! Defaults are carried by these values and passed
//! explicitly to [`crate::mask`]; nothing is read from
//! module-level state.

use crate::extract::Parallelism;
use crate::feature::{WindowSize, NIR_BAND, RED_BAND};
use crate::image::MultiBandImage;
use crate::threshold::{MIN_OTSU_BINS, OTSU_BINS};
use crate::Result;
use anyhow::bail;
use serde_derive::{Deserialize, Serialize};

/// Default cutoff of the mean intensity mask.
pub const DEFAULT_MEAN_THRESHOLD: f64 = 0.8;

/// Mask windows whose mean intensity exceeds a fixed cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanMaskConfig {
    /// Window step `(height, width)` in pixels.
    pub step: WindowSize,
    /// Band the mean is taken over (e.g. panchromatic).
    pub band: usize,
    pub threshold: f64,
    /// Sequential by default so the output order never
    /// depends on scheduling.
    pub parallelism: Parallelism,
}

impl MeanMaskConfig {
    pub fn new(step: WindowSize) -> Self {
        MeanMaskConfig {
            step,
            band: 0,
            threshold: DEFAULT_MEAN_THRESHOLD,
            parallelism: Parallelism::Sequential,
        }
    }

    pub fn with_band(mut self, band: usize) -> Self {
        self.band = band;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn validate(&self, image: &MultiBandImage) -> Result<()> {
        check_step(self.step)?;
        check_band("band", self.band, image)
    }
}

/// Mask windows whose normalized difference index falls
/// below its Otsu threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMaskConfig {
    pub step: WindowSize,
    /// Minuend band of `(a - b) / (a + b)`; NIR by default.
    pub a_band: usize,
    /// Subtrahend band; red by default.
    pub b_band: usize,
    /// Histogram bins for the Otsu threshold.
    pub bins: usize,
    pub parallelism: Parallelism,
}

impl IndexMaskConfig {
    pub fn new(step: WindowSize) -> Self {
        IndexMaskConfig {
            step,
            a_band: NIR_BAND,
            b_band: RED_BAND,
            bins: OTSU_BINS,
            parallelism: Parallelism::Default,
        }
    }

    pub fn with_bands(mut self, a_band: usize, b_band: usize) -> Self {
        self.a_band = a_band;
        self.b_band = b_band;
        self
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn validate(&self, image: &MultiBandImage) -> Result<()> {
        check_step(self.step)?;
        if self.bins < MIN_OTSU_BINS {
            bail!(
                "otsu threshold requires at least {} bins (got {})",
                MIN_OTSU_BINS,
                self.bins
            );
        }
        check_band("a_band", self.a_band, image)?;
        check_band("b_band", self.b_band, image)
    }
}

fn check_step(step: WindowSize) -> Result<()> {
    if step.0 < 1 || step.1 < 1 {
        bail!("window step must be at least 1x1 (got {}x{})", step.0, step.1);
    }
    Ok(())
}

fn check_band(name: &str, band: usize, image: &MultiBandImage) -> Result<()> {
    if band >= image.band_count() {
        bail!(
            "{} index {} out of range for image with {} band(s)",
            name,
            band,
            image.band_count()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn defaults() {
        let mean = MeanMaskConfig::new((8, 8));
        assert_eq!(mean.threshold, 0.8);
        assert_eq!(mean.parallelism, Parallelism::Sequential);

        let index = IndexMaskConfig::new((8, 8));
        assert_eq!((index.a_band, index.b_band), (NIR_BAND, RED_BAND));
        assert_eq!(index.bins, 256);
        assert_eq!(index.parallelism, Parallelism::Default);
    }

    #[test]
    fn validate_rejects_missing_band() {
        let img = MultiBandImage::new(vec![Array2::zeros((4, 4))]).unwrap();
        assert!(MeanMaskConfig::new((2, 2)).validate(&img).is_ok());
        assert!(MeanMaskConfig::new((2, 2)).with_band(1).validate(&img).is_err());
        assert!(IndexMaskConfig::new((2, 2)).validate(&img).is_err());
        assert!(MeanMaskConfig::new((0, 2)).validate(&img).is_err());
    }

    #[test]
    fn validate_rejects_single_bin() {
        let img = MultiBandImage::new(vec![Array2::zeros((4, 4)), Array2::zeros((4, 4))]).unwrap();
        let cfg = IndexMaskConfig::new((2, 2)).with_bands(0, 1);
        assert!(cfg.clone().with_bins(MIN_OTSU_BINS).validate(&img).is_ok());
        assert!(cfg.clone().with_bins(1).validate(&img).is_err());
        assert!(cfg.with_bins(0).validate(&img).is_err());
    }
}
