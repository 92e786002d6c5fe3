//! End to end mask derivation.

use crate::config::{IndexMaskConfig, MeanMaskConfig};
use crate::image::MultiBandImage;
use crate::signal::{index_signal, mean_signal};
use crate::threshold::{fixed_threshold_mask, otsu_mask};
use crate::tiling::Tiling;
use crate::Result;
use anyhow::{bail, Context};
use log::debug;
use ndarray::Array2;

fn tiling_for(image: &MultiBandImage, step: (usize, usize)) -> Result<Tiling> {
    let (rows, cols) = image.dim();
    if rows < 1 || cols < 1 {
        bail!("cannot tile an empty image ({}x{})", rows, cols);
    }
    Ok(Tiling::with_dims(rows, cols).with_step(step.0, step.1))
}

/// Windows whose mean intensity over `config.band` is
/// strictly above `config.threshold`.
pub fn mean_intensity_mask(image: &MultiBandImage, config: &MeanMaskConfig) -> Result<Array2<bool>> {
    config.validate(image)?;
    let tiling = tiling_for(image, config.step)?;
    debug!(
        "mean intensity mask: band {} step {:?} grid {:?}",
        config.band,
        config.step,
        tiling.grid_shape()
    );
    let grid = mean_signal(image, &tiling, config.band, config.parallelism)
        .context("extracting mean intensity")?;
    Ok(fixed_threshold_mask(&grid, config.threshold))
}

/// Windows whose normalized difference index is below the
/// Otsu threshold of all usable windows. Windows without
/// usable pixels are excluded.
pub fn index_mask(image: &MultiBandImage, config: &IndexMaskConfig) -> Result<Array2<bool>> {
    config.validate(image)?;
    let tiling = tiling_for(image, config.step)?;
    debug!(
        "index mask: bands ({}, {}) step {:?} grid {:?}",
        config.a_band,
        config.b_band,
        config.step,
        tiling.grid_shape()
    );
    let signal = index_signal(image, &tiling, config.a_band, config.b_band, config.parallelism)
        .context("extracting normalized difference index")?;
    otsu_mask(&signal, config.bins).context("thresholding index")
}

#[cfg(feature = "gdal")]
pub use self::vector_mask::shapefile_mask;

#[cfg(feature = "gdal")]
mod vector_mask {
    use crate::geometry::{GeoTransform, GridShape};
    use crate::rasterize::rasterize_polygons;
    use crate::vector::load_polygons;
    use crate::Result;
    use ndarray::Array2;
    use std::path::Path;

    /// Rasterize the polygons of the vector dataset at `path`
    /// onto a `shape` grid placed by `transform`.
    pub fn shapefile_mask(path: &Path, shape: GridShape, transform: &GeoTransform) -> Result<Array2<bool>> {
        let (polygons, _crs) = load_polygons(path)?;
        rasterize_polygons(&polygons, shape, transform)
    }
}
