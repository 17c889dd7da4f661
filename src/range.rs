//! Axis value ranges and range resolution from sample data.

use crate::error::{Error, Result};

/// Symmetric expansion applied to a degenerate (min == max) range so that
/// a single repeated value still produces one visible bin.
pub const DEGENERATE_EPSILON: f64 = 0.5;

/// An ordered `(min, max)` extent along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive; the last bin is closed above).
    pub max: f64,
}

impl ValueRange {
    /// Create a new range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBinSpec`] if `min > max` or either bound is
    /// non-finite.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::InvalidBinSpec(format!(
                "range bounds must be finite, got ({min}, {max})"
            )));
        }
        if min > max {
            return Err(Error::InvalidBinSpec(format!(
                "range min {min} exceeds max {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Compute the extent of the finite values in an iterator.
    ///
    /// Non-finite values are dropped, matching the binning engine's policy
    /// of silently excluding samples it cannot place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDomain`] if no finite value exists.
    pub fn from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut extent: Option<(f64, f64)> = None;
        for v in values {
            if !v.is_finite() {
                continue;
            }
            extent = Some(match extent {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        let (min, max) = extent.ok_or(Error::EmptyDomain)?;
        Ok(Self { min, max })
    }

    /// Width of the range.
    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the range.
    #[must_use]
    pub fn midpoint(self) -> f64 {
        self.min + self.span() / 2.0
    }

    /// Whether `v` lies inside the range, both bounds inclusive.
    #[must_use]
    pub fn contains(self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Map `v` to its normalized position in `[0, 1]`.
    ///
    /// A zero-width range maps every value to `0.0`.
    #[must_use]
    pub fn normalize(self, v: f64) -> f64 {
        let span = self.span();
        if span == 0.0 {
            return 0.0;
        }
        (v - self.min) / span
    }

    /// Expand a degenerate range symmetrically so it has nonzero width.
    #[must_use]
    pub fn widen_if_degenerate(self) -> Self {
        if self.span() > 0.0 {
            return self;
        }
        Self {
            min: self.min - DEGENERATE_EPSILON,
            max: self.max + DEGENERATE_EPSILON,
        }
    }
}

impl TryFrom<(f64, f64)> for ValueRange {
    type Error = Error;

    fn try_from(pair: (f64, f64)) -> Result<Self> {
        Self::new(pair.0, pair.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_inverted() {
        assert!(ValueRange::new(1.0, 0.0).is_err());
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(ValueRange::new(f64::NAN, 1.0).is_err());
        assert!(ValueRange::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_values() {
        let range = ValueRange::from_values([3.0, -1.0, 2.0]).expect("range should resolve");
        assert_eq!(range.min, -1.0);
        assert_eq!(range.max, 3.0);
    }

    #[test]
    fn test_from_values_drops_non_finite() {
        let range = ValueRange::from_values([f64::NAN, 1.0, f64::INFINITY, 4.0])
            .expect("range should resolve");
        assert_eq!(range.min, 1.0);
        assert_eq!(range.max, 4.0);
    }

    #[test]
    fn test_from_values_empty_domain() {
        assert!(matches!(
            ValueRange::from_values([]),
            Err(Error::EmptyDomain)
        ));
        assert!(matches!(
            ValueRange::from_values([f64::NAN]),
            Err(Error::EmptyDomain)
        ));
    }

    #[test]
    fn test_widen_if_degenerate() {
        let range = ValueRange::from_values([7.0, 7.0])
            .expect("range should resolve")
            .widen_if_degenerate();
        assert!(range.span() > 0.0);
        assert_eq!(range.midpoint(), 7.0);
    }

    #[test]
    fn test_widen_leaves_proper_range_alone() {
        let range = ValueRange::new(0.0, 2.0).expect("range should resolve");
        assert_eq!(range.widen_if_degenerate(), range);
    }

    #[test]
    fn test_normalize() {
        let range = ValueRange::new(10.0, 20.0).expect("range should resolve");
        assert_eq!(range.normalize(10.0), 0.0);
        assert_eq!(range.normalize(15.0), 0.5);
        assert_eq!(range.normalize(20.0), 1.0);
    }

    #[test]
    fn test_normalize_zero_span() {
        let range = ValueRange::new(5.0, 5.0).expect("range should resolve");
        assert_eq!(range.normalize(5.0), 0.0);
    }

    #[test]
    fn test_contains_both_bounds() {
        let range = ValueRange::new(0.0, 1.0).expect("range should resolve");
        assert!(range.contains(0.0));
        assert!(range.contains(1.0));
        assert!(!range.contains(1.0001));
    }
}
