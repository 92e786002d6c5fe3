//! Utilities to compute histograms and Otsu thresholds

use serde_derive::Serialize;
use std::ops::AddAssign;

/// Configuration to generate histogram. Bins are of equal
/// width and span `[min, max]`; the last bin is closed so
/// that `max` itself is counted.
///
/// Bin positions are computed on halved values, so ranges
/// wider than `f64::MAX` (e.g. `[-1e308, 1e308]`) still bin
/// correctly.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Config {
    min: f64,
    max: f64,
    half_step: f64,
    len: usize,
}

impl Config {
    pub fn from_min_max_bins(min: f64, max: f64, len: usize) -> Self {
        assert!(min <= max, "min must be smaller than max");
        assert!(len > 0, "histogram requires at least one bin");
        let half_step = (max / 2. - min / 2.) / len as f64;
        Config {
            min,
            max,
            half_step,
            len,
        }
    }

    /// Configuration spanning the finite values of `values`.
    /// Returns `None` if there are none.
    pub fn for_values(values: &[f64], len: usize) -> Option<Self> {
        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Config::from_min_max_bins(min, max, len))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Bin width; infinite when the range itself overflows.
    #[inline]
    pub fn step(&self) -> f64 {
        2. * self.half_step
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Bin holding `val`, or `None` if it lies outside
    /// `[min, max]` (or is NaN).
    #[inline]
    pub fn bin_for(&self, val: f64) -> Option<usize> {
        if !(val >= self.min && val <= self.max) {
            return None;
        }
        if self.half_step == 0. {
            return Some(0);
        }
        let bin = ((val / 2. - self.min / 2.) / self.half_step).floor() as usize;
        Some(bin.min(self.len - 1))
    }

    #[inline]
    pub fn bin_center(&self, bin: usize) -> f64 {
        2. * (self.min / 2. + (bin as f64 + 0.5) * self.half_step)
    }
}

/// A histogram built by accumulating individual values.
/// Values outside the configured range are counted as
/// `skipped`.
#[derive(Clone, Debug, Serialize)]
pub struct Histogram {
    cfg: Config,
    hist: Vec<usize>,
    skipped: usize,
}

impl Histogram {
    pub fn new(cfg: Config) -> Self {
        Histogram {
            hist: vec![0; cfg.len()],
            cfg,
            skipped: 0,
        }
    }

    /// Histogram of the finite `values` over their own range.
    pub fn from_values(values: &[f64], len: usize) -> Option<Self> {
        let mut hist = Histogram::new(Config::for_values(values, len)?);
        for &v in values {
            hist += v;
        }
        Some(hist)
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn counts(&self) -> &[usize] {
        &self.hist
    }

    pub fn count(&self) -> usize {
        self.hist.iter().sum()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Otsu's threshold: the bin center splitting the
    /// histogram into two classes with maximum between-class
    /// variance. The threshold is the center of the last bin
    /// of the lower class; ties resolve to the lowest split.
    /// A histogram of a single distinct value returns that
    /// value. Returns `None` for an empty histogram, or for
    /// a histogram of fewer than two bins over a non-constant
    /// range.
    ///
    /// Class means are taken in bin units; the split is
    /// invariant under the affine map to values, and sums
    /// stay finite for any range.
    pub fn otsu_threshold(&self) -> Option<f64> {
        let total = self.count();
        if total == 0 {
            return None;
        }
        if self.cfg.min == self.cfg.max {
            return Some(self.cfg.min);
        }

        let total_weight = total as f64;
        let total_moment: f64 = self
            .hist
            .iter()
            .enumerate()
            .map(|(bin, &count)| count as f64 * (bin as f64 + 0.5))
            .sum();

        let mut weight_lo = 0.;
        let mut moment_lo = 0.;
        let mut best: Option<(usize, f64)> = None;

        for bin in 0..self.cfg.len() - 1 {
            let count = self.hist[bin] as f64;
            weight_lo += count;
            moment_lo += count * (bin as f64 + 0.5);

            let weight_hi = total_weight - weight_lo;
            if weight_lo == 0. || weight_hi == 0. {
                continue;
            }
            let mean_lo = moment_lo / weight_lo;
            let mean_hi = (total_moment - moment_lo) / weight_hi;
            let variance = weight_lo * weight_hi * (mean_lo - mean_hi).powi(2);

            match best {
                Some((_, v)) if v >= variance => {}
                _ => best = Some((bin, variance)),
            }
        }

        best.map(|(bin, _)| self.cfg.bin_center(bin))
    }
}

impl AddAssign<f64> for Histogram {
    fn add_assign(&mut self, other: f64) {
        match self.cfg.bin_for(other) {
            Some(bin) => self.hist[bin] += 1,
            None => self.skipped += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_cover_closed_range() {
        let cfg = Config::from_min_max_bins(0., 1., 4);
        assert_eq!(cfg.bin_for(0.), Some(0));
        assert_eq!(cfg.bin_for(0.3), Some(1));
        assert_eq!(cfg.bin_for(1.), Some(3));
        assert_eq!(cfg.bin_for(1.5), None);
        assert_eq!(cfg.bin_for(f64::NAN), None);
        assert_eq!(cfg.bin_center(1), 0.375);
    }

    #[test]
    fn non_finite_values_are_skipped() {
        let hist = Histogram::from_values(&[0., f64::NAN, 1., f64::INFINITY], 2).unwrap();
        assert_eq!(hist.counts(), &[1, 1]);
        assert_eq!(hist.skipped(), 2);
        assert!(Histogram::from_values(&[f64::NAN], 2).is_none());
    }

    #[test]
    fn otsu_separates_bimodal() {
        let mut data = Vec::new();
        for i in 0..100 {
            data.push(0.1 + 0.2 * (i as f64 / 100.0));
            data.push(0.7 + 0.2 * (i as f64 / 100.0));
        }
        let t = Histogram::from_values(&data, 256)
            .unwrap()
            .otsu_threshold()
            .unwrap();
        assert!(t > 0.29 && t < 0.7, "threshold {} between clusters", t);
    }

    #[test]
    fn huge_range_stays_finite() {
        let hist = Histogram::from_values(&[-1e308, -1e308, 1e308, 1e308], 256).unwrap();
        assert_eq!(hist.counts()[0], 2);
        assert_eq!(hist.counts()[255], 2);
        let t = hist.otsu_threshold().unwrap();
        assert!(t.is_finite() && t > -1e308 && t < 1e308, "threshold {}", t);
    }

    #[test]
    fn otsu_constant() {
        let hist = Histogram::from_values(&[5.; 10], 256).unwrap();
        assert_eq!(hist.otsu_threshold(), Some(5.));
    }
}
