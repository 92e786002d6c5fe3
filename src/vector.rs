//! Read polygons from vector datasets (shapefiles, GeoJSON, ...).

use crate::error::MaskError;
use crate::Result;
use gdal::vector::LayerAccess;
use gdal::Dataset;
use geo::{Geometry, MultiPolygon};
use log::debug;
use std::path::Path;

/// Collect the polygons of the first layer of the vector
/// dataset at `path` into one multi-polygon. Also returns
/// the layer's CRS as WKT, when known. Features without a
/// geometry are skipped; any non-polygonal geometry fails
/// with [`MaskError::InvalidGeometry`].
pub fn load_polygons(path: &Path) -> Result<(MultiPolygon<f64>, Option<String>)> {
    let ds = Dataset::open(path).map_err(MaskError::io("opening vector dataset", path))?;
    let mut layer = ds
        .layer(0)
        .map_err(MaskError::io("opening first layer of", path))?;
    let crs = layer.spatial_ref().and_then(|srs| srs.to_wkt().ok());

    let mut polygons = vec![];
    for (idx, feature) in layer.features().enumerate() {
        let geometry = match feature.geometry() {
            Some(geometry) => geometry,
            None => continue,
        };
        let geometry = geometry
            .to_geo()
            .map_err(|e| MaskError::InvalidGeometry(format!("feature {}: {}", idx, e)))?;
        match geometry {
            Geometry::Polygon(poly) => polygons.push(poly),
            Geometry::MultiPolygon(multi) => polygons.extend(multi),
            _ => {
                return Err(MaskError::InvalidGeometry(format!(
                    "feature {} is not a (multi-)polygon",
                    idx
                ))
                .into())
            }
        }
    }

    debug!("loaded {} polygon(s) from {}", polygons.len(), path.display());
    Ok((MultiPolygon(polygons), crs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind;
    use crate::mask::shapefile_mask;
    use ndarray::array;
    use std::fs;
    use tempdir::TempDir;

    fn feature_collection(geometries: &[&str]) -> String {
        let features: Vec<String> = geometries
            .iter()
            .map(|g| format!(r#"{{"type":"Feature","properties":{{}},"geometry":{}}}"#, g))
            .collect();
        format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        )
    }

    #[test]
    fn polygons_into_mask() -> Result<()> {
        let tmp_dir = TempDir::new("raster_masks_test").unwrap();
        let path = tmp_dir.path().join("fields.geojson");
        fs::write(
            &path,
            feature_collection(&[
                r#"{"type":"Polygon","coordinates":[[[0,4],[2,4],[2,2],[0,2],[0,4]]]}"#,
                r#"{"type":"MultiPolygon","coordinates":[[[[3,1],[4,1],[4,0],[3,0],[3,1]]]]}"#,
            ]),
        )?;

        let (polygons, _) = load_polygons(&path)?;
        assert_eq!(polygons.0.len(), 2);

        let mask = shapefile_mask(&path, (4, 4), &[0., 1., 0., 4., 0., -1.])?;
        assert_eq!(
            mask,
            array![
                [true, true, false, false],
                [true, true, false, false],
                [false, false, false, false],
                [false, false, false, true],
            ]
        );
        Ok(())
    }

    #[test]
    fn points_are_invalid() -> Result<()> {
        let tmp_dir = TempDir::new("raster_masks_test").unwrap();
        let path = tmp_dir.path().join("points.geojson");
        fs::write(
            &path,
            feature_collection(&[r#"{"type":"Point","coordinates":[1,1]}"#]),
        )?;

        let err = load_polygons(&path).unwrap_err();
        assert!(matches!(kind(&err), Some(MaskError::InvalidGeometry(_))));
        Ok(())
    }

    #[test]
    fn missing_dataset_is_io_failure() {
        let tmp_dir = TempDir::new("raster_masks_test").unwrap();
        let err = load_polygons(&tmp_dir.path().join("none.shp")).unwrap_err();
        assert!(matches!(kind(&err), Some(MaskError::IoFailure { .. })));
    }
}
