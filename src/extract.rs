//! Evaluate a [`Feature`] on every tile of a [`Tiling`].

use crate::feature::Feature;
use crate::geometry::GridShape;
use crate::image::MultiBandImage;
use crate::signal::{reshape_grid, MaskedSignal};
use crate::tiling::{Tile, Tiling};
use crate::{MaskError, Result};
use anyhow::Context;
use log::debug;
use serde_derive::{Deserialize, Serialize};

/// Degree of parallelism used to walk the tiles. Results
/// are in row-major tile order in every mode.
///
/// Without the "use-rayon" feature every mode runs
/// sequentially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parallelism {
    /// Single threaded, in order.
    Sequential,
    /// A dedicated pool with the given number of threads.
    Threads(usize),
    /// The global rayon pool.
    Default,
}

impl Default for Parallelism {
    fn default() -> Self {
        Parallelism::Default
    }
}

/// Extracted values of one feature. Stored flat in row-major
/// tile order; each tile contributes `depth` consecutive
/// entries (one per window size and output).
#[derive(Debug, Clone)]
pub struct FeatureVector {
    shape: GridShape,
    depth: usize,
    values: Vec<f64>,
    invalid: Vec<bool>,
}

impl FeatureVector {
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Flat values; undefined entries hold NaN.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn invalid(&self) -> &[bool] {
        &self.invalid
    }

    /// Lay the values out on the tile grid. Only a feature
    /// with a single window size and output has exactly one
    /// value per tile; anything else fails with
    /// [`MaskError::ShapeMismatch`].
    pub fn into_signal(self) -> Result<MaskedSignal> {
        let values = reshape_grid(self.values, self.shape)?;
        let invalid = reshape_grid(self.invalid, self.shape)?;
        MaskedSignal::new(values, invalid)
    }
}

/// Evaluate `feature` on every tile of `tiling` over `image`.
pub fn extract<F: Feature + ?Sized>(
    feature: &F,
    tiling: &Tiling,
    image: &MultiBandImage,
    parallelism: Parallelism,
) -> Result<FeatureVector> {
    let dims = (tiling.height(), tiling.width());
    if image.dim() != dims {
        return Err(MaskError::shape_mismatch(image.dim().0 * image.dim().1, dims))
            .context("tiling does not match image dimensions");
    }

    let depth = feature.window_sizes().len() * feature.output_arity();
    debug!(
        "extracting {} tiles of depth {} ({:?})",
        tiling.len(),
        depth,
        parallelism
    );

    let outputs = walk(tiling, parallelism, |tile| {
        tile_outputs(feature, tiling, image, &tile)
    })?;

    let mut values = Vec::with_capacity(tiling.len() * depth);
    let mut invalid = Vec::with_capacity(tiling.len() * depth);
    for out in outputs.into_iter().flatten() {
        values.push(out.unwrap_or(f64::NAN));
        invalid.push(out.is_none());
    }

    Ok(FeatureVector {
        shape: tiling.grid_shape(),
        depth,
        values,
        invalid,
    })
}

fn tile_outputs<F: Feature + ?Sized>(
    feature: &F,
    tiling: &Tiling,
    image: &MultiBandImage,
    tile: &Tile,
) -> Vec<Option<f64>> {
    let arity = feature.output_arity();
    let mut out = vec![None; feature.window_sizes().len() * arity];
    for (k, &size) in feature.window_sizes().iter().enumerate() {
        if let Some((offset, size)) = tiling.window(tile, size) {
            feature.reduce(&image.window(offset, size), &mut out[k * arity..(k + 1) * arity]);
        }
    }
    out
}

#[cfg(not(feature = "use-rayon"))]
fn walk<T, M>(tiling: &Tiling, _parallelism: Parallelism, map: M) -> Result<Vec<T>>
where
    M: Fn(Tile) -> T,
{
    Ok(tiling.iter().map(map).collect())
}

#[cfg(feature = "use-rayon")]
fn walk<T, M>(tiling: &Tiling, parallelism: Parallelism, map: M) -> Result<Vec<T>>
where
    T: Send,
    M: Fn(Tile) -> T + Send + Sync,
{
    use rayon::prelude::*;
    Ok(match parallelism {
        Parallelism::Sequential | Parallelism::Threads(1) => tiling.iter().map(map).collect(),
        Parallelism::Threads(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .context("building extraction thread pool")?;
            pool.install(|| tiling.par_iter().map(map).collect())
        }
        Parallelism::Default => tiling.par_iter().map(map).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{MeanIntensity, WindowSize};
    use crate::image::ImageWindow;
    use ndarray::Array2;

    fn ramp(rows: usize, cols: usize) -> MultiBandImage {
        MultiBandImage::new(vec![Array2::from_shape_fn((rows, cols), |(i, j)| {
            (i * cols + j) as f64
        })])
        .unwrap()
    }

    #[test]
    fn one_value_per_tile() {
        let img = ramp(4, 4);
        let tiling = Tiling::with_dims(4, 4).with_step(2, 2);
        let fv = extract(&MeanIntensity::new(0, (2, 2)), &tiling, &img, Parallelism::Sequential)
            .unwrap();
        assert_eq!(fv.shape(), (2, 2));
        assert_eq!(fv.depth(), 1);
        assert_eq!(fv.values(), &[2.5, 4.5, 10.5, 12.5]);
        assert!(fv.invalid().iter().all(|&v| !v));
    }

    #[test]
    fn parallel_matches_sequential() {
        let img = ramp(37, 23);
        let tiling = Tiling::with_dims(37, 23).with_step(5, 4);
        let feature = MeanIntensity::new(0, (5, 4));
        let seq = extract(&feature, &tiling, &img, Parallelism::Sequential).unwrap();
        let par = extract(&feature, &tiling, &img, Parallelism::Threads(4)).unwrap();
        assert_eq!(seq.values(), par.values());
    }

    #[test]
    fn tiling_must_match_image() {
        let img = ramp(4, 4);
        let tiling = Tiling::with_dims(5, 4).with_step(2, 2);
        let err = extract(&MeanIntensity::new(0, (2, 2)), &tiling, &img, Parallelism::Sequential)
            .unwrap_err();
        assert!(matches!(
            crate::error::kind(&err),
            Some(MaskError::ShapeMismatch { .. })
        ));
    }

    struct TwoScales([WindowSize; 2]);
    impl Feature for TwoScales {
        fn window_sizes(&self) -> &[WindowSize] {
            &self.0
        }
        fn reduce(&self, window: &ImageWindow<'_>, out: &mut [Option<f64>]) {
            out[0] = Some(window.band(0).len() as f64);
        }
    }

    #[test]
    fn multiple_windows_cannot_form_a_signal() {
        let img = ramp(4, 4);
        let tiling = Tiling::with_dims(4, 4).with_step(2, 2);
        let fv = extract(&TwoScales([(2, 2), (4, 4)]), &tiling, &img, Parallelism::Sequential)
            .unwrap();
        assert_eq!(fv.depth(), 2);
        assert_eq!(&fv.values()[..2], &[4., 9.]);
        let err = fv.into_signal().unwrap_err();
        assert!(matches!(
            crate::error::kind(&err),
            Some(MaskError::ShapeMismatch { len: 8, rows: 2, cols: 2 })
        ));
    }
}
