//! Accumulate the mean of a window's samples incrementally.
use serde_derive::Serialize;
use std::ops::AddAssign;

/// Running sum and count of the defined samples of a window.
/// Accumulation is done by add-assigning (using `+=`) one of
/// the following.
///
/// - a `f64` value.  Adds a new sample
/// - an `Option<f64>`.  Adds the sample if defined, and
///   otherwise counts it as skipped.
/// - another `WindowStats` value.  Accumulates the other into `self`.
#[derive(Debug, Default, Serialize, Clone, PartialEq)]
pub struct WindowStats {
    sum: f64,
    count: usize,
    skipped: usize,
}

impl AddAssign<f64> for WindowStats {
    fn add_assign(&mut self, other: f64) {
        self.sum += other;
        self.count += 1;
    }
}

impl AddAssign<Option<f64>> for WindowStats {
    fn add_assign(&mut self, other: Option<f64>) {
        match other {
            Some(val) => *self += val,
            None => self.skipped += 1,
        }
    }
}

impl AddAssign<&WindowStats> for WindowStats {
    fn add_assign(&mut self, other: &WindowStats) {
        self.sum += other.sum;
        self.count += other.count;
        self.skipped += other.skipped;
    }
}

impl WindowStats {
    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Mean of the defined samples, `None` if there are none.
    #[inline]
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_undefined() {
        let mut stats = WindowStats::default();
        stats += 1.;
        stats += None;
        stats += Some(3.);
        assert_eq!(stats.count(), 2);
        assert_eq!(stats.skipped(), 1);
        assert_eq!(stats.mean(), Some(2.));
    }

    #[test]
    fn merge() {
        let mut a = WindowStats::default();
        a += 4.;
        let mut b = WindowStats::default();
        b += None;
        a += &b;
        assert_eq!(a.mean(), Some(4.));
        assert_eq!(a.skipped(), 1);
        assert_eq!(WindowStats::default().mean(), None);
    }
}
