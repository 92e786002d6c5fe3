//! Error kinds raised by mask derivation.
//!
//! Functions in this crate return [`crate::Result`], an
//! `anyhow` result. When a failure belongs to one of the
//! kinds below, a [`MaskError`] sits in its cause chain and
//! may be recovered with [`kind`].

#[cfg(feature = "gdal")]
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaskError {
    /// A flat array could not be laid out as the requested grid.
    #[error("cannot reshape {len} values into a {rows}x{cols} grid")]
    ShapeMismatch { len: usize, rows: usize, cols: usize },

    /// Automatic thresholding was requested without any valid sample.
    #[error("no valid samples to compute a threshold from")]
    InsufficientData,

    /// Reading or writing a raster or vector dataset failed.
    #[cfg(feature = "gdal")]
    #[error("{op} {}", path.display())]
    IoFailure {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: gdal::errors::GdalError,
    },

    /// Polygons (or the transform used to place them) are malformed.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl MaskError {
    pub(crate) fn shape_mismatch(len: usize, (rows, cols): (usize, usize)) -> Self {
        MaskError::ShapeMismatch { len, rows, cols }
    }

    #[cfg(feature = "gdal")]
    pub(crate) fn io<P: Into<PathBuf>>(
        op: &'static str,
        path: P,
    ) -> impl FnOnce(gdal::errors::GdalError) -> Self {
        let path = path.into();
        move |source| MaskError::IoFailure { op, path, source }
    }
}

/// Returns the first [`MaskError`] in the cause chain of `err`.
pub fn kind(err: &crate::Error) -> Option<&MaskError> {
    err.chain().find_map(|e| e.downcast_ref::<MaskError>())
}
