//! Burn polygons into a boolean grid.
//!
//! A pixel is set when its center lies inside any of the
//! polygons or on a polygon's boundary; centers on an edge
//! are included on every side. Polygons are given in geo.
//! coordinates and placed on the grid through the inverse of
//! the grid's geo transform.

use crate::error::MaskError;
use crate::geometry::{transform_from_gdal, GeoTransform, GridShape};
use crate::Result;
use geo::{BoundingRect, Coord, Intersects, MapCoords, MultiPolygon, Point, Polygon};
use nalgebra::Point2;
use ndarray::Array2;

/// Rasterize `polygons` onto a `shape` grid placed by
/// `transform`. Fails with [`MaskError::InvalidGeometry`] for
/// non-finite coordinates, degenerate rings, or a transform
/// that cannot be inverted.
pub fn rasterize_polygons(
    polygons: &MultiPolygon<f64>,
    shape: GridShape,
    transform: &GeoTransform,
) -> Result<Array2<bool>> {
    for (idx, poly) in polygons.iter().enumerate() {
        check_polygon(poly).map_err(|msg| {
            MaskError::InvalidGeometry(format!("polygon {}: {}", idx, msg))
        })?;
    }

    let inv = transform_from_gdal(transform)
        .try_inverse()
        .ok_or_else(|| MaskError::InvalidGeometry("geo transform is not invertible".into()))?;

    // Polygons in (col, row) pixel coordinates
    let pixels: MultiPolygon<f64> = polygons.map_coords(|Coord { x, y }| {
        let pt = inv.transform_point(&Point2::new(x, y));
        Coord { x: pt.x, y: pt.y }
    });

    let (rows, cols) = shape;
    let mut mask = Array2::from_elem(shape, false);
    for poly in &pixels {
        let bounds = match poly.bounding_rect() {
            Some(rect) => rect,
            None => continue,
        };
        let row_range = pixel_span(bounds.min().y, bounds.max().y, rows);
        let col_range = pixel_span(bounds.min().x, bounds.max().x, cols);
        for i in row_range {
            for j in col_range.clone() {
                if mask[(i, j)] {
                    continue;
                }
                let center = Point::new(j as f64 + 0.5, i as f64 + 0.5);
                if poly.intersects(&center) {
                    mask[(i, j)] = true;
                }
            }
        }
    }
    Ok(mask)
}

fn check_polygon(poly: &Polygon<f64>) -> std::result::Result<(), String> {
    let rings = std::iter::once(poly.exterior()).chain(poly.interiors());
    for (idx, ring) in rings.enumerate() {
        if ring.0.len() < 4 {
            return Err(format!("ring {} has {} coordinates", idx, ring.0.len()));
        }
        if ring.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(format!("ring {} has non-finite coordinates", idx));
        }
    }
    Ok(())
}

/// Indices of pixels whose centers may fall in `[lo, hi]`.
fn pixel_span(lo: f64, hi: f64, limit: usize) -> std::ops::Range<usize> {
    let start = (lo - 0.5).ceil().max(0.) as usize;
    let end = ((hi - 0.5).floor() + 1.).max(0.).min(limit as f64) as usize;
    start.min(end)..end
}
