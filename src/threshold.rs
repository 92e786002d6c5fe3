//! Binarize scalar grids.
//!
//! Two policies are supported:
//!
//! - **Fixed.** An entry is included when its value is
//! strictly greater than the cutoff.
//!
//! - **Otsu.** The cutoff is computed from the usable
//! entries only, and an entry is included when its value is
//! strictly _less_ than the cutoff. Low index values mark
//! the windows of interest in this mode.
//!
//! In both cases unusable entries are cleared after the
//! comparison, so validity always wins over the threshold.

use crate::error::MaskError;
use crate::histogram::Histogram;
use crate::signal::MaskedSignal;
use crate::Result;
use anyhow::bail;
use log::debug;
use ndarray::Array2;
use serde_derive::{Deserialize, Serialize};

/// Default number of histogram bins for Otsu thresholds.
pub const OTSU_BINS: usize = 256;

/// Fewest bins that admit a split into two classes.
pub const MIN_OTSU_BINS: usize = 2;

/// `value > threshold` for every entry of `grid`.
pub fn fixed_threshold_mask(grid: &Array2<f64>, threshold: f64) -> Array2<bool> {
    grid.mapv(|val| val > threshold)
}

/// Otsu threshold of `values` over a histogram with `bins`
/// bins. Non-finite values are ignored. Fails with
/// [`MaskError::InsufficientData`] when no finite value is
/// given, and with a plain error when `bins` is below
/// [`MIN_OTSU_BINS`].
pub fn otsu_threshold(values: &[f64], bins: usize) -> Result<f64> {
    if bins < MIN_OTSU_BINS {
        bail!(
            "otsu threshold requires at least {} bins (got {})",
            MIN_OTSU_BINS,
            bins
        );
    }
    Histogram::from_values(values, bins)
        .and_then(|hist| hist.otsu_threshold())
        .ok_or_else(|| MaskError::InsufficientData.into())
}

/// Mask of the usable entries of `signal` below their Otsu
/// threshold. Unusable entries are always `false`.
pub fn otsu_mask(signal: &MaskedSignal, bins: usize) -> Result<Array2<bool>> {
    let threshold = otsu_threshold(&signal.valid_values(), bins)?;
    debug!(
        "otsu threshold {} over {} usable windows",
        threshold,
        signal.valid_count()
    );
    let mut mask = signal.values().mapv(|val| val < threshold);
    signal.apply_validity(&mut mask);
    Ok(mask)
}

/// How to turn a [`MaskedSignal`] into a mask.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThresholdPolicy {
    /// Include entries strictly above `threshold`.
    Fixed { threshold: f64 },
    /// Include entries strictly below the Otsu threshold.
    Otsu { bins: usize },
}

impl ThresholdPolicy {
    pub fn apply(&self, signal: &MaskedSignal) -> Result<Array2<bool>> {
        match *self {
            ThresholdPolicy::Fixed { threshold } => {
                let mut mask = fixed_threshold_mask(signal.values(), threshold);
                signal.apply_validity(&mut mask);
                Ok(mask)
            }
            ThresholdPolicy::Otsu { bins } => otsu_mask(signal, bins),
        }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        ThresholdPolicy::Otsu { bins: OTSU_BINS }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn signal(values: Array2<f64>, invalid: Array2<bool>) -> MaskedSignal {
        MaskedSignal::new(values, invalid).unwrap()
    }

    #[test]
    fn fixed_is_strictly_greater() {
        let grid = array![[0.5, 0.8], [0.80001, -1.]];
        for &t in &[-2., -1., 0., 0.5, 0.8, 1., f64::INFINITY] {
            let mask = fixed_threshold_mask(&grid, t);
            for (m, v) in mask.iter().zip(grid.iter()) {
                assert_eq!(*m, *v > t);
            }
        }
        assert_eq!(
            fixed_threshold_mask(&grid, 0.8),
            array![[false, false], [true, false]]
        );
    }

    #[test]
    fn fixed_four_by_four() {
        let grid = array![
            [0.9, 0.5, 0.95, 0.2],
            [0.85, 0.1, 0.99, 0.3],
            [0.4, 0.6, 0.7, 0.8],
            [0.0, 0.75, 0.55, 0.65],
        ];
        let mask = fixed_threshold_mask(&grid, 0.8);
        let included: Vec<_> = mask
            .indexed_iter()
            .filter(|(_, m)| **m)
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(included, vec![(0, 0), (0, 2), (1, 0), (1, 2)]);
    }

    #[test]
    fn otsu_two_by_two() {
        let sig = MaskedSignal::all_valid(array![[0.1, 0.2], [0.8, 0.9]]);
        let mask = otsu_mask(&sig, OTSU_BINS).unwrap();
        assert_eq!(mask, array![[true, true], [false, false]]);
    }

    #[test]
    fn otsu_invalid_entries_are_excluded() {
        // the invalid entry would pass the comparison by far
        let sig = signal(
            array![[0.1, 0.2, 0.8], [0.9, 0.15, -100.]],
            array![[false, false, false], [false, false, true]],
        );
        let mask = otsu_mask(&sig, OTSU_BINS).unwrap();
        assert_eq!(mask, array![[true, true, false], [false, true, false]]);
    }

    #[test]
    fn otsu_ignores_invalid_values() {
        let invalid = array![[false, false, false], [false, false, true]];
        let base = array![[0.1, 0.2, 0.8], [0.9, 0.15, 0.5]];
        let t0 = otsu_threshold(&signal(base.clone(), invalid.clone()).valid_values(), 256).unwrap();
        let m0 = otsu_mask(&signal(base.clone(), invalid.clone()), 256).unwrap();

        for &junk in &[-1e9, 0.0, 0.85, 1e9, f64::NAN] {
            let mut values = base.clone();
            values[(1, 2)] = junk;
            let sig = signal(values, invalid.clone());
            assert_eq!(otsu_threshold(&sig.valid_values(), 256).unwrap(), t0);
            assert_eq!(otsu_mask(&sig, 256).unwrap(), m0);
        }
    }

    #[test]
    fn otsu_without_valid_entries_fails() {
        let sig = signal(array![[0.1, 0.9]], array![[true, true]]);
        let err = otsu_mask(&sig, OTSU_BINS).unwrap_err();
        assert!(matches!(
            crate::error::kind(&err),
            Some(MaskError::InsufficientData)
        ));
    }

    #[test]
    fn too_few_bins_is_not_missing_data() {
        let sig = MaskedSignal::all_valid(array![[0.1, 0.2], [0.8, 0.9]]);
        for &bins in &[0, 1] {
            let err = otsu_mask(&sig, bins).unwrap_err();
            assert!(crate::error::kind(&err).is_none(), "bins = {}: {}", bins, err);
            let err = ThresholdPolicy::Otsu { bins }.apply(&sig).unwrap_err();
            assert!(crate::error::kind(&err).is_none());
        }
        assert_eq!(
            otsu_mask(&sig, MIN_OTSU_BINS).unwrap(),
            array![[true, true], [false, false]]
        );
    }

    #[test]
    fn extreme_range_is_thresholded() {
        let sig = MaskedSignal::all_valid(array![[-1e308, -1e308], [1e308, 1e308]]);
        let mask = otsu_mask(&sig, OTSU_BINS).unwrap();
        assert_eq!(mask, array![[true, true], [false, false]]);
    }

    #[test]
    fn fixed_policy_gates_validity() {
        let sig = signal(array![[0.9, 0.95]], array![[false, true]]);
        let mask = ThresholdPolicy::Fixed { threshold: 0.8 }.apply(&sig).unwrap();
        assert_eq!(mask, array![[true, false]]);
    }
}
