//! Per-window scalar signals and their validity.

use crate::error::MaskError;
use crate::extract::{extract, Parallelism};
use crate::feature::{MeanIntensity, NormalizedDifference};
use crate::geometry::GridShape;
use crate::image::MultiBandImage;
use crate::tiling::Tiling;
use crate::Result;
use ndarray::{Array2, Zip};

/// Lay out row-major `flat` data as a `(rows, cols)` grid.
/// Fails with [`MaskError::ShapeMismatch`] unless
/// `flat.len() == rows * cols`.
pub fn reshape_grid<T>(flat: Vec<T>, shape: GridShape) -> Result<Array2<T>> {
    let len = flat.len();
    Array2::from_shape_vec(shape, flat).map_err(|_| MaskError::shape_mismatch(len, shape).into())
}

/// A scalar grid paired with its validity. An entry is
/// unusable where `invalid` is `true`; its value carries no
/// meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedSignal {
    values: Array2<f64>,
    invalid: Array2<bool>,
}

impl MaskedSignal {
    pub fn new(values: Array2<f64>, invalid: Array2<bool>) -> Result<Self> {
        if values.dim() != invalid.dim() {
            return Err(MaskError::shape_mismatch(invalid.len(), values.dim()).into());
        }
        Ok(MaskedSignal { values, invalid })
    }

    /// Wrap a grid where every entry is usable.
    pub fn all_valid(values: Array2<f64>) -> Self {
        let invalid = Array2::from_elem(values.dim(), false);
        MaskedSignal { values, invalid }
    }

    pub fn dim(&self) -> GridShape {
        self.values.dim()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn invalid(&self) -> &Array2<bool> {
        &self.invalid
    }

    /// Values at usable positions, in row-major order.
    pub fn valid_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .zip(self.invalid.iter())
            .filter(|(_, invalid)| !**invalid)
            .map(|(&val, _)| val)
            .collect()
    }

    pub fn valid_count(&self) -> usize {
        self.invalid.iter().filter(|&&invalid| !invalid).count()
    }

    /// Force every unusable position of `mask` to `false`.
    pub fn apply_validity(&self, mask: &mut Array2<bool>) {
        Zip::from(mask)
            .and(&self.invalid)
            .for_each(|m, &invalid| *m = *m && !invalid);
    }

    pub fn into_parts(self) -> (Array2<f64>, Array2<bool>) {
        (self.values, self.invalid)
    }
}

/// Mean of `band` over each tile of `tiling`. Every window
/// is considered usable.
pub fn mean_signal(
    image: &MultiBandImage,
    tiling: &Tiling,
    band: usize,
    parallelism: Parallelism,
) -> Result<Array2<f64>> {
    let feature = MeanIntensity::new(band, tiling.step());
    let fv = extract(&feature, tiling, image, parallelism)?;
    let shape = fv.shape();
    reshape_grid(fv.values().to_vec(), shape)
}

/// Window mean of the normalized difference of bands `a`
/// and `b`. Windows without a single defined pixel are
/// marked unusable.
pub fn index_signal(
    image: &MultiBandImage,
    tiling: &Tiling,
    a: usize,
    b: usize,
    parallelism: Parallelism,
) -> Result<MaskedSignal> {
    let feature = NormalizedDifference::new(a, b, tiling.step());
    extract(&feature, tiling, image, parallelism)?.into_signal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn is_shape_mismatch(err: &crate::Error) -> bool {
        matches!(crate::error::kind(err), Some(MaskError::ShapeMismatch { .. }))
    }

    #[test]
    fn reshape_exact_length() {
        for &(rows, cols) in &[(1, 1), (2, 3), (4, 4), (1, 7)] {
            let flat: Vec<f64> = (0..rows * cols).map(|v| v as f64).collect();
            let grid = reshape_grid(flat, (rows, cols)).unwrap();
            assert_eq!(grid.dim(), (rows, cols));
            assert_eq!(grid[(rows - 1, cols - 1)], (rows * cols - 1) as f64);
        }
    }

    #[test]
    fn reshape_other_length_fails() {
        for &len in &[0usize, 5, 7, 12] {
            let err = reshape_grid(vec![0.; len], (2, 3)).unwrap_err();
            assert!(is_shape_mismatch(&err), "len {} reshaped", len);
        }
    }

    #[test]
    fn valid_values_in_row_major_order() {
        let sig = MaskedSignal::new(
            array![[1., 2.], [3., 4.]],
            array![[false, true], [false, false]],
        )
        .unwrap();
        assert_eq!(sig.valid_values(), vec![1., 3., 4.]);
        assert_eq!(sig.valid_count(), 3);
        assert_eq!(sig.values(), &array![[1., 2.], [3., 4.]]);
    }

    #[test]
    fn mismatched_validity_is_rejected() {
        let err = MaskedSignal::new(Array2::zeros((2, 2)), Array2::from_elem((2, 3), false))
            .unwrap_err();
        assert!(is_shape_mismatch(&err));
    }

    #[test]
    fn mean_signal_over_tiles() {
        let img = MultiBandImage::new(vec![array![
            [1., 1., 0., 0.],
            [1., 1., 0., 2.],
        ]])
        .unwrap();
        let tiling = Tiling::with_dims(2, 4).with_step(2, 2);
        let grid = mean_signal(&img, &tiling, 0, Parallelism::Sequential).unwrap();
        assert_eq!(grid, array![[1., 0.5]]);
    }

    #[test]
    fn index_signal_marks_zero_denominator_windows() {
        let nir = array![[3., 3., 0., 0.], [3., 3., 0., 0.]];
        let red = array![[1., 1., 0., 0.], [1., 1., 0., 0.]];
        let img = MultiBandImage::new(vec![nir, red]).unwrap();
        let tiling = Tiling::with_dims(2, 4).with_step(2, 2);
        let sig = index_signal(&img, &tiling, 0, 1, Parallelism::Sequential).unwrap();
        assert_eq!(sig.invalid(), &array![[false, true]]);
        assert_eq!(sig.valid_values(), vec![0.5]);
    }
}
