//! Binning of 2-D samples into regular count grids.
//!
//! A [`BinSpec`] carries either a bin count or a bin size per axis; it is
//! resolved into a canonical [`ResolvedBins`] (count + effective size +
//! effective range per axis) at build time, so nothing downstream ever deals
//! with the count/size duality. Bins are half-open `[edge, edge + size)`
//! along each axis, except the last bin, which is closed above so the range
//! maximum is included.

use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::range::ValueRange;

/// Default bin counts when the caller specifies nothing.
pub const DEFAULT_BIN_COUNT: (usize, usize) = (80, 40);

/// Bin partitioning requested per axis: a count or a size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinSpec {
    /// Number of bins along X and Y.
    Count(usize, usize),
    /// Bin width along X and Y, in data units.
    Size(f64, f64),
}

impl BinSpec {
    /// The same bin count on both axes.
    #[must_use]
    pub const fn square_count(n: usize) -> Self {
        Self::Count(n, n)
    }

    /// The same bin size on both axes.
    #[must_use]
    pub const fn square_size(s: f64) -> Self {
        Self::Size(s, s)
    }

    fn validate(self) -> Result<()> {
        match self {
            Self::Count(nx, ny) if nx == 0 || ny == 0 => Err(Error::InvalidBinSpec(
                format!("bin counts must be positive, got ({nx}, {ny})"),
            )),
            Self::Size(sx, sy) if !(sx > 0.0 && sy > 0.0 && sx.is_finite() && sy.is_finite()) => {
                Err(Error::InvalidBinSpec(format!(
                    "bin sizes must be positive and finite, got ({sx}, {sy})"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for BinSpec {
    fn default() -> Self {
        Self::Count(DEFAULT_BIN_COUNT.0, DEFAULT_BIN_COUNT.1)
    }
}

/// The canonical form every [`BinSpec`] resolves to: a count, an effective
/// size, and an effective range per axis. When a size-based spec does not
/// divide the range evenly, the range maximum is extended upward to the next
/// full bin; the adjusted range is what axis labeling must use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBins {
    /// Bin counts along (X, Y).
    pub counts: (usize, usize),
    /// Effective bin sizes along (X, Y).
    pub sizes: (f64, f64),
    /// Effective X range after any size-based extension.
    pub x_range: ValueRange,
    /// Effective Y range after any size-based extension.
    pub y_range: ValueRange,
}

/// Resolve a bin spec against concrete axis ranges.
///
/// `align_bins` applies to size-based specs only: it snaps the lower edge
/// down to a multiple of the bin size before extending upward.
///
/// # Errors
///
/// Returns [`Error::InvalidBinSpec`] for non-positive counts or sizes.
pub fn resolve(
    spec: BinSpec,
    x_range: ValueRange,
    y_range: ValueRange,
    align_bins: bool,
) -> Result<ResolvedBins> {
    spec.validate()?;
    let x_range = x_range.widen_if_degenerate();
    let y_range = y_range.widen_if_degenerate();

    let ((nx, sx, x_range), (ny, sy, y_range)) = match spec {
        BinSpec::Count(nx, ny) => (
            (nx, x_range.span() / nx as f64, x_range),
            (ny, y_range.span() / ny as f64, y_range),
        ),
        BinSpec::Size(sx, sy) => (
            resolve_sized_axis(sx, x_range, align_bins),
            resolve_sized_axis(sy, y_range, align_bins),
        ),
    };

    Ok(ResolvedBins {
        counts: (nx, ny),
        sizes: (sx, sy),
        x_range,
        y_range,
    })
}

/// Resolve one size-based axis: `n = ceil(span / size)`, extending the
/// maximum upward to `min + n * size`. The user-given size is never
/// truncated.
fn resolve_sized_axis(size: f64, range: ValueRange, align: bool) -> (usize, f64, ValueRange) {
    let min = if align {
        (range.min / size).floor() * size
    } else {
        range.min
    };
    let n = (((range.max - min) / size).ceil() as usize).max(1);
    let range = ValueRange {
        min,
        max: min + n as f64 * size,
    };
    (n, size, range)
}

/// Bin index for `v` on an axis with `n` bins, or `None` when out of range.
///
/// `v == range.max` maps to the last bin (closed upper bound); every
/// interior edge belongs to the bin it is the lower edge of.
pub(crate) fn bin_index(v: f64, range: ValueRange, n: usize) -> Option<usize> {
    if !v.is_finite() || !range.contains(v) {
        return None;
    }
    let idx = (range.normalize(v) * n as f64).floor() as usize;
    Some(idx.min(n - 1))
}

/// Builder that bins `(x, y)` samples into a [`Grid`] of counts.
#[derive(Debug, Clone)]
pub struct Histogram2d {
    points: Vec<(f64, f64)>,
    spec: BinSpec,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    align_bins: bool,
    drop_outside: bool,
    resolved: Option<ResolvedBins>,
}

impl Default for Histogram2d {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram2d {
    /// Create a new histogram builder with default binning (80x40).
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            spec: BinSpec::default(),
            x_range: None,
            y_range: None,
            align_bins: false,
            drop_outside: true,
            resolved: None,
        }
    }

    /// Set the samples to bin.
    #[must_use]
    pub fn points(mut self, points: &[(f64, f64)]) -> Self {
        self.points = points.to_vec();
        self
    }

    /// Set the bin spec.
    #[must_use]
    pub fn bins(mut self, spec: BinSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Set bin counts per axis.
    #[must_use]
    pub fn bin_count(self, nx: usize, ny: usize) -> Self {
        self.bins(BinSpec::Count(nx, ny))
    }

    /// Set bin sizes per axis.
    #[must_use]
    pub fn bin_size(self, sx: f64, sy: f64) -> Self {
        self.bins(BinSpec::Size(sx, sy))
    }

    /// Explicit X range; samples outside it are excluded, not errors.
    #[must_use]
    pub fn x_range(mut self, min: f64, max: f64) -> Self {
        self.x_range = Some((min, max));
        self
    }

    /// Explicit Y range; samples outside it are excluded, not errors.
    #[must_use]
    pub fn y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some((min, max));
        self
    }

    /// Snap size-based bin edges to multiples of the bin size.
    #[must_use]
    pub fn align_bins(mut self, align: bool) -> Self {
        self.align_bins = align;
        self
    }

    /// When disabled, out-of-range samples clamp into the nearest edge bin
    /// instead of being dropped.
    #[must_use]
    pub fn drop_outside(mut self, drop: bool) -> Self {
        self.drop_outside = drop;
        self
    }

    /// Validate the configuration and resolve ranges and bins.
    ///
    /// All configuration errors surface here, before any rendering.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBinSpec`] for bad counts/sizes/ranges and
    /// [`Error::EmptyDomain`] when a range must be derived but no finite
    /// sample exists.
    pub fn build(mut self) -> Result<Self> {
        self.resolved = Some(self.resolve()?);
        Ok(self)
    }

    /// The canonical bins this configuration resolves to.
    ///
    /// Populated by [`build`](Self::build).
    #[must_use]
    pub fn resolved_bins(&self) -> Option<&ResolvedBins> {
        self.resolved.as_ref()
    }

    fn resolve(&self) -> Result<ResolvedBins> {
        let x_range = match self.x_range {
            Some((min, max)) => ValueRange::new(min, max)?,
            None => ValueRange::from_values(self.points.iter().map(|p| p.0))?,
        };
        let y_range = match self.y_range {
            Some((min, max)) => ValueRange::new(min, max)?,
            None => ValueRange::from_values(self.points.iter().map(|p| p.1))?,
        };
        resolve(self.spec, x_range, y_range, self.align_bins)
    }

    /// Bin the samples into a grid of counts.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build) when called on an unbuilt builder.
    pub fn grid(&self) -> Result<Grid> {
        let resolved = match self.resolved {
            Some(r) => r,
            None => self.resolve()?,
        };
        let (nx, ny) = resolved.counts;
        let mut grid = Grid::new(nx, ny, resolved.x_range, resolved.y_range)?;

        for &(x, y) in &self.points {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            let xi = bin_index(x, resolved.x_range, nx);
            let yi = bin_index(y, resolved.y_range, ny);
            match (xi, yi) {
                (Some(xi), Some(yi)) => grid.accumulate(xi, yi, 1.0),
                _ if self.drop_outside => {}
                _ => {
                    let xi = xi.unwrap_or(if x < resolved.x_range.min { 0 } else { nx - 1 });
                    let yi = yi.unwrap_or(if y < resolved.y_range.min { 0 } else { ny - 1 });
                    grid.accumulate(xi, yi, 1.0);
                }
            }
        }
        Ok(grid)
    }
}
