//! Persist masks as single band rasters.

use crate::error::MaskError;
use crate::geometry::GeoMetadata;
use crate::Result;
use gdal::raster::{Buffer, GdalType};
use gdal::DriverManager;
use log::info;
use ndarray::Array2;
use std::path::Path;

/// Driver used when none is requested.
pub const DEFAULT_DRIVER: &str = "GTiff";

/// Element types that can be written to a raster band.
/// Booleans have no native raster type and are narrowed to
/// `u8` (`false` → 0, `true` → 1).
pub trait RasterValue: Copy {
    type Stored: GdalType + Copy;

    fn to_stored(self) -> Self::Stored;
}

impl RasterValue for bool {
    type Stored = u8;

    #[inline]
    fn to_stored(self) -> u8 {
        self as u8
    }
}

macro_rules! stored_as_is {
    ($($t:ty),*) => {
        $(
            impl RasterValue for $t {
                type Stored = $t;

                #[inline]
                fn to_stored(self) -> $t {
                    self
                }
            }
        )*
    };
}
stored_as_is!(u8, u16, i16, u32, i32, f32, f64);

/// Write `mask` as band 1 of a new raster at `path`, tagged
/// with the projection and geo transform of `meta` when
/// present. Any GDAL failure is reported as
/// [`MaskError::IoFailure`].
pub fn write_mask_raster<T: RasterValue>(
    path: &Path,
    mask: &Array2<T>,
    meta: &GeoMetadata,
    driver: &str,
) -> Result<()> {
    let (rows, cols) = mask.dim();
    let driver = DriverManager::get_driver_by_name(driver)
        .map_err(MaskError::io("loading output driver for", path))?;

    let mut ds = driver
        .create_with_band_type::<T::Stored, _>(path, cols as isize, rows as isize, 1)
        .map_err(MaskError::io("creating dataset", path))?;

    if let Some(gt) = &meta.transform {
        ds.set_geo_transform(gt)
            .map_err(MaskError::io("setting geo transform of", path))?;
    }
    if let Some(projection) = &meta.projection {
        ds.set_projection(projection)
            .map_err(MaskError::io("setting projection of", path))?;
    }

    let data: Vec<T::Stored> = mask.iter().map(|v| v.to_stored()).collect();
    let mut band = ds
        .rasterband(1)
        .map_err(MaskError::io("opening band 1 of", path))?;
    band.write((0, 0), (cols, rows), &Buffer::new((cols, rows), data))
        .map_err(MaskError::io("writing", path))?;

    info!("wrote {}x{} mask to {}", rows, cols, path.display());
    Ok(())
}
