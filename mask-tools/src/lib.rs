pub mod utils;
pub use raster_masks::{Error, Result};

pub mod cli;
