//! In-memory multi-band images with per-pixel validity.

use crate::error::MaskError;
use crate::geometry::GridShape;
use crate::Result;
use anyhow::bail;
use ndarray::{s, Array2, ArrayView2, Zip};

/// A stack of equally sized bands plus a pixel validity
/// mask. A pixel is valid when `valid[(row, col)]` is `true`.
#[derive(Debug, Clone)]
pub struct MultiBandImage {
    bands: Vec<Array2<f64>>,
    valid: Array2<bool>,
}

impl MultiBandImage {
    /// Construct from bands; every pixel starts valid.
    pub fn new(bands: Vec<Array2<f64>>) -> Result<Self> {
        let shape = match bands.first() {
            Some(band) => band.dim(),
            None => bail!("image requires at least one band"),
        };
        for (idx, band) in bands.iter().enumerate() {
            if band.dim() != shape {
                return Err(anyhow::Error::new(MaskError::shape_mismatch(band.len(), shape))
                    .context(format!("band {} differs in shape from band 0", idx)));
            }
        }
        Ok(MultiBandImage {
            bands,
            valid: Array2::from_elem(shape, true),
        })
    }

    /// Mark pixels where band `band` holds `no_val` or NaN as
    /// invalid.
    pub fn with_no_data(mut self, band: usize, no_val: f64) -> Self {
        Zip::from(&mut self.valid)
            .and(&self.bands[band])
            .for_each(|valid, &val| {
                if val == no_val || val.is_nan() {
                    *valid = false;
                }
            });
        self
    }

    /// Combine an externally computed validity mask (`true` =
    /// usable) with the current one.
    pub fn with_validity(mut self, valid: &Array2<bool>) -> Result<Self> {
        if valid.dim() != self.dim() {
            return Err(MaskError::shape_mismatch(valid.len(), self.dim()).into());
        }
        Zip::from(&mut self.valid)
            .and(valid)
            .for_each(|a, &b| *a = *a && b);
        Ok(self)
    }

    /// `(rows, cols)` of every band.
    pub fn dim(&self) -> GridShape {
        self.valid.dim()
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn band(&self, idx: usize) -> &Array2<f64> {
        &self.bands[idx]
    }

    pub fn validity(&self) -> &Array2<bool> {
        &self.valid
    }

    /// Borrow the pixels of the rectangle at `offset` (row, col)
    /// with `size` (rows, cols). The rectangle must lie inside
    /// the image.
    pub fn window(&self, offset: GridShape, size: GridShape) -> ImageWindow<'_> {
        let rows = offset.0..offset.0 + size.0;
        let cols = offset.1..offset.1 + size.1;
        ImageWindow {
            bands: self
                .bands
                .iter()
                .map(|b| b.slice(s![rows.clone(), cols.clone()]))
                .collect(),
            valid: self.valid.slice(s![rows, cols]),
        }
    }
}

/// Borrowed view of all bands over one window.
pub struct ImageWindow<'a> {
    bands: Vec<ArrayView2<'a, f64>>,
    valid: ArrayView2<'a, bool>,
}

impl<'a> ImageWindow<'a> {
    pub fn band(&self, idx: usize) -> &ArrayView2<'a, f64> {
        &self.bands[idx]
    }

    pub fn validity(&self) -> &ArrayView2<'a, bool> {
        &self.valid
    }

    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }
}
