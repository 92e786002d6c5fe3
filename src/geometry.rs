//! Affine transforms between pixel and geo. coordinates.

use nalgebra::Matrix3;
use serde_derive::{Deserialize, Serialize};

/// Shape of a 2-D grid as `(rows, cols)`.
pub type GridShape = (usize, usize);

/// GDAL style geo transform: `[x0, dx/dcol, dx/drow, y0, dy/dcol, dy/drow]`.
pub type GeoTransform = [f64; 6];

/// Homogeneous form of a [`GeoTransform`]. Maps `(col, row, 1)`
/// pixel coordinates to `(x, y, 1)` geo. coordinates.
pub type PixelTransform = Matrix3<f64>;

/// Georeferencing carried alongside a raster: the projection
/// (WKT) and the geo transform, either of which may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoMetadata {
    pub projection: Option<String>,
    pub transform: Option<GeoTransform>,
}

pub fn transform_from_gdal(t: &GeoTransform) -> PixelTransform {
    Matrix3::new(
        t[1], t[2], t[0],
        t[4], t[5], t[3],
        0., 0., 1.,
    )
}

pub fn transform_to_gdal(t: &PixelTransform) -> GeoTransform {
    [t[(0, 2)], t[(0, 0)], t[(0, 1)], t[(1, 2)], t[(1, 0)], t[(1, 1)]]
}

/// Geo transform of the window grid obtained by tiling a
/// raster with `step` (height, width). The origin is kept;
/// each grid cell spans `step` source pixels.
pub fn window_grid_transform(t: &GeoTransform, step: GridShape) -> GeoTransform {
    let (step_h, step_w) = (step.0 as f64, step.1 as f64);
    [
        t[0],
        t[1] * step_w,
        t[2] * step_h,
        t[3],
        t[4] * step_w,
        t[5] * step_h,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    const GT: GeoTransform = [100., 2., 0., 50., 0., -2.];

    #[test]
    fn gdal_round_trip() {
        assert_eq!(transform_to_gdal(&transform_from_gdal(&GT)), GT);
    }

    #[test]
    fn maps_pixel_corner() {
        let t = transform_from_gdal(&GT);
        let pt = t.transform_point(&Point2::new(3., 4.));
        assert_eq!((pt.x, pt.y), (106., 42.));
    }

    #[test]
    fn window_grid_scales_pixel_size() {
        let gt = window_grid_transform(&GT, (10, 5));
        assert_eq!(gt, [100., 10., 0., 50., 0., -20.]);
    }
}
