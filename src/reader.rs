//! Read masks and multi-band images from GDAL datasets.

use crate::error::MaskError;
use crate::geometry::GeoMetadata;
use crate::image::MultiBandImage;
use crate::Result;
use anyhow::{bail, Context};
use gdal::errors::GdalError;
use gdal::raster::{GdalDataType, GdalType, RasterBand};
use gdal::Dataset;
use log::debug;
use ndarray::Array2;
use std::path::Path;

/// Band data of a mask raster in its stored element type.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterMask {
    U8(Array2<u8>),
    U16(Array2<u16>),
    I16(Array2<i16>),
    U32(Array2<u32>),
    I32(Array2<i32>),
    F32(Array2<f32>),
    F64(Array2<f64>),
}

impl RasterMask {
    /// `(rows, cols)` of the mask.
    pub fn dim(&self) -> (usize, usize) {
        use RasterMask::*;
        match self {
            U8(a) => a.dim(),
            U16(a) => a.dim(),
            I16(a) => a.dim(),
            U32(a) => a.dim(),
            I32(a) => a.dim(),
            F32(a) => a.dim(),
            F64(a) => a.dim(),
        }
    }

    /// Interpret the mask as boolean: every non-zero entry is
    /// `true`.
    pub fn to_bool(&self) -> Array2<bool> {
        use RasterMask::*;
        match self {
            U8(a) => a.mapv(|v| v != 0),
            U16(a) => a.mapv(|v| v != 0),
            I16(a) => a.mapv(|v| v != 0),
            U32(a) => a.mapv(|v| v != 0),
            I32(a) => a.mapv(|v| v != 0),
            F32(a) => a.mapv(|v| v != 0.),
            F64(a) => a.mapv(|v| v != 0.),
        }
    }
}

/// A mask read back from disk together with its
/// georeferencing.
#[derive(Debug, Clone)]
pub struct LoadedMask {
    pub mask: RasterMask,
    pub meta: GeoMetadata,
}

pub fn open_dataset(path: &Path) -> Result<Dataset> {
    Ok(Dataset::open(path).map_err(MaskError::io("opening dataset", path))?)
}

/// Projection and geo transform of `ds`. An empty
/// projection, or a missing transform, yields `None`.
pub fn read_metadata(ds: &Dataset) -> GeoMetadata {
    let projection = ds.projection();
    GeoMetadata {
        projection: if projection.is_empty() {
            None
        } else {
            Some(projection)
        },
        transform: ds.geo_transform().ok(),
    }
}

/// Read the whole band as a `(rows, cols)` array.
pub fn read_band_array<T: GdalType + Copy>(band: &RasterBand) -> Result<Array2<T>> {
    let (cols, rows) = band.size();
    let buf = band
        .read_as::<T>((0, 0), (cols, rows), (cols, rows), None)
        .with_context(|| format!("reading band window ({}x{})", cols, rows))?;
    Ok(Array2::from_shape_vec((rows, cols), buf.data)?)
}

/// Read band 1 of the raster at `path`, preserving its
/// element type. No resampling or reprojection is done.
pub fn read_mask_raster(path: &Path) -> Result<LoadedMask> {
    let ds = open_dataset(path)?;
    let band = ds
        .rasterband(1)
        .map_err(MaskError::io("opening band 1 of", path))?;
    let io = |e: crate::Error| -> crate::Error {
        match e.downcast::<GdalError>() {
            Ok(source) => MaskError::IoFailure {
                op: "reading",
                path: path.into(),
                source,
            }
            .into(),
            Err(e) => e,
        }
    };

    use RasterMask::*;
    let mask = match band.band_type() {
        GdalDataType::UInt8 => U8(read_band_array(&band).map_err(io)?),
        GdalDataType::UInt16 => U16(read_band_array(&band).map_err(io)?),
        GdalDataType::Int16 => I16(read_band_array(&band).map_err(io)?),
        GdalDataType::UInt32 => U32(read_band_array(&band).map_err(io)?),
        GdalDataType::Int32 => I32(read_band_array(&band).map_err(io)?),
        GdalDataType::Float32 => F32(read_band_array(&band).map_err(io)?),
        GdalDataType::Float64 => F64(read_band_array(&band).map_err(io)?),
        other => bail!("{}: unsupported mask band type {:?}", path.display(), other),
    };
    debug!("read {:?} mask from {}", mask.dim(), path.display());

    Ok(LoadedMask {
        mask,
        meta: read_metadata(&ds),
    })
}

/// Read `bands` (1-based, GDAL numbering) of the raster at
/// `path` as an image. Pixels holding a band's no-data
/// value (or NaN) are marked invalid.
pub fn read_image(path: &Path, bands: &[isize]) -> Result<(MultiBandImage, GeoMetadata)> {
    let ds = open_dataset(path)?;
    let mut arrays = Vec::with_capacity(bands.len());
    let mut no_data = Vec::with_capacity(bands.len());
    for &idx in bands {
        let band = ds
            .rasterband(idx)
            .map_err(MaskError::io("opening band of", path))
            .with_context(|| format!("band {}", idx))?;
        arrays.push(
            read_band_array::<f64>(&band)
                .with_context(|| format!("reading band {} of {}", idx, path.display()))?,
        );
        no_data.push(band.no_data_value());
    }

    let mut image = MultiBandImage::new(arrays)?;
    for (pos, no_val) in no_data.into_iter().enumerate() {
        if let Some(no_val) = no_val {
            image = image.with_no_data(pos, no_val);
        }
    }
    debug!(
        "read {} band(s) of {:?} from {}",
        bands.len(),
        image.dim(),
        path.display()
    );
    Ok((image, read_metadata(&ds)))
}
