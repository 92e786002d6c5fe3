//! Windowed inclusion masks over raster scenes.
//!
//! A scene is walked in fixed-size windows. Each window is
//! reduced to a single scalar (the mean intensity of a band,
//! or a normalized difference index of two bands) and the
//! resulting grid is binarized either with a fixed cutoff or
//! with an automatically chosen Otsu cutoff. Windows without
//! usable data are tracked alongside the values and are
//! always excluded from the final mask.
//!
//! The mask can be persisted as a single band raster, and a
//! mask can also be derived directly from polygons in a
//! vector dataset.

pub mod error;
pub mod geometry;
pub mod image;
pub mod tiling;

pub mod feature;
pub mod extract;
pub mod stats;

pub mod histogram;
pub mod signal;
pub mod threshold;

pub mod config;
pub mod mask;
pub mod rasterize;

#[cfg(feature = "gdal")]
pub mod reader;
#[cfg(feature = "gdal")]
pub mod vector;
#[cfg(feature = "gdal")]
pub mod writer;

pub mod prelude;

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use error::MaskError;
