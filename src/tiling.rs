//! Partition a raster into a grid of fixed-size windows.
//!
//! A [`Tiling`] splits a `height x width` raster with a fixed
//! step `(step_h, step_w)`. Tile `(row, col)` starts at pixel
//! `(row * step_h, col * step_w)`; tiles along the bottom and
//! right edges are clipped to the raster, so the grid has
//! `ceil(height / step_h)` rows and `ceil(width / step_w)`
//! columns.
//!
//! Tiles are produced in row-major order, both by the
//! sequential iterator and by the (order preserving)
//! parallel iterator available with the "use-rayon" feature.
//!
//! # Windows
//!
//! A feature may look at a window larger (or smaller) than
//! the step. Such a window is centered on the tile and
//! clipped to the raster; see [`Tiling::window`]. A window
//! of the same size as the step coincides with the tile.

use crate::geometry::GridShape;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tiling {
    height: usize,
    width: usize,

    step_h: usize,
    step_w: usize,
}

/// A single tile of a [`Tiling`]. Offsets and sizes are in
/// `(row, col)` order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    pub offset: GridShape,
    pub size: GridShape,
}

mod builder;
mod iters;

#[cfg(feature = "use-rayon")]
mod par_iters;

#[inline]
fn div_ceil(num: usize, d: usize) -> usize {
    (num + d - 1) / d
}

impl Tiling {
    /// Shape `(rows, cols)` of the window grid.
    pub fn grid_shape(&self) -> GridShape {
        (div_ceil(self.height, self.step_h), div_ceil(self.width, self.step_w))
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        let (rows, cols) = self.grid_shape();
        rows * cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tile at position `idx` in row-major order.
    pub fn tile(&self, idx: usize) -> Tile {
        let (_, cols) = self.grid_shape();
        let (row, col) = (idx / cols, idx % cols);
        let offset = (row * self.step_h, col * self.step_w);
        let size = (
            self.step_h.min(self.height - offset.0),
            self.step_w.min(self.width - offset.1),
        );
        Tile {
            row,
            col,
            offset,
            size,
        }
    }

    /// Pixel rectangle `(offset, size)` of a `size` window
    /// centered on `tile`, clipped to the raster. Returns
    /// `None` if nothing of the window is inside.
    pub fn window(&self, tile: &Tile, size: GridShape) -> Option<(GridShape, GridShape)> {
        let rows = centered(tile.offset.0, self.step_h, size.0, self.height)?;
        let cols = centered(tile.offset.1, self.step_w, size.1, self.width)?;
        Some(((rows.0, cols.0), (rows.1, cols.1)))
    }
}

/// Clip a `len` span centered on the step starting at
/// `start` to `0..limit`. Returns `(start, len)`.
fn centered(start: usize, step: usize, len: usize, limit: usize) -> Option<(usize, usize)> {
    let center = start + step / 2;
    let lo = center.saturating_sub(len / 2);
    let hi = (center + len - len / 2).min(limit);
    if lo >= hi {
        None
    } else {
        Some((lo, hi - lo))
    }
}
