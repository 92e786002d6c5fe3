pub use crate::{Error, Result};
pub use crate::error::{kind, MaskError};

pub use crate::geometry::*;
pub use crate::image::*;
pub use crate::tiling::*;

pub use crate::extract::*;
pub use crate::feature::*;

pub use crate::signal::*;
pub use crate::threshold::*;

pub use crate::config::*;
pub use crate::mask::*;
pub use crate::rasterize::*;

#[cfg(feature = "gdal")]
pub use crate::reader::*;
#[cfg(feature = "gdal")]
pub use crate::vector::*;
#[cfg(feature = "gdal")]
pub use crate::writer::*;
