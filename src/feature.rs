//! Window features: reductions of an image window to scalars.

use crate::geometry::GridShape;
use crate::image::ImageWindow;
use crate::stats::WindowStats;
use serde_derive::{Deserialize, Serialize};

/// Size `(height, width)` of the window a feature reduces.
pub type WindowSize = GridShape;

/// Band index of the near-infrared channel in the default
/// band order (blue, green, red, nir).
pub const NIR_BAND: usize = 3;
/// Band index of the red channel in the default band order.
pub const RED_BAND: usize = 2;

/// A per-window feature as consumed by
/// [`extract`](crate::extract::extract).
///
/// The feature is evaluated once per tile and per declared
/// window size. Each evaluation writes `output_arity`
/// values; `None` marks an output that is undefined for the
/// window (e.g. no usable pixel).
pub trait Feature: Sync {
    fn window_sizes(&self) -> &[WindowSize];

    fn output_arity(&self) -> usize {
        1
    }

    fn reduce(&self, window: &ImageWindow<'_>, out: &mut [Option<f64>]);
}

/// Arithmetic mean of all pixels of one band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanIntensity {
    pub band: usize,
    pub windows: Vec<WindowSize>,
}

impl MeanIntensity {
    pub fn new(band: usize, window: WindowSize) -> Self {
        MeanIntensity {
            band,
            windows: vec![window],
        }
    }
}

impl Feature for MeanIntensity {
    fn window_sizes(&self) -> &[WindowSize] {
        &self.windows
    }

    fn reduce(&self, window: &ImageWindow<'_>, out: &mut [Option<f64>]) {
        let mut stats = WindowStats::default();
        for &val in window.band(self.band) {
            stats += val;
        }
        out[0] = stats.mean();
    }
}

/// Window mean of the per-pixel index `(a - b) / (a + b)`.
///
/// Pixels flagged as no-data, or with `a + b == 0`, are
/// skipped. A window without any remaining pixel is
/// undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDifference {
    pub a: usize,
    pub b: usize,
    pub windows: Vec<WindowSize>,
}

impl NormalizedDifference {
    pub fn new(a: usize, b: usize, window: WindowSize) -> Self {
        NormalizedDifference {
            a,
            b,
            windows: vec![window],
        }
    }

    /// Vegetation index over the near-infrared and red bands.
    pub fn nir_ndvi(window: WindowSize) -> Self {
        NormalizedDifference::new(NIR_BAND, RED_BAND, window)
    }
}

/// Normalized difference of two values; `None` where the
/// denominator vanishes.
#[inline]
pub fn normalized_difference(a: f64, b: f64) -> Option<f64> {
    let sum = a + b;
    if sum == 0. {
        None
    } else {
        Some((a - b) / sum)
    }
}

impl Feature for NormalizedDifference {
    fn window_sizes(&self) -> &[WindowSize] {
        &self.windows
    }

    fn reduce(&self, window: &ImageWindow<'_>, out: &mut [Option<f64>]) {
        let a = window.band(self.a);
        let b = window.band(self.b);
        let mut stats = WindowStats::default();
        for ((&a, &b), &valid) in a.iter().zip(b.iter()).zip(window.validity().iter()) {
            stats += if valid { normalized_difference(a, b) } else { None };
        }
        out[0] = stats.mean();
    }
}
