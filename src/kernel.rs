//! Kernel density accumulation over a bin grid.
//!
//! Instead of one unit count per sample, each sample spreads a weighted
//! footprint over the bin centers inside the kernel's support. The footprint
//! is normalized per sample, so every in-range sample contributes total mass
//! exactly 1 no matter which kernel or bandwidth is chosen; the grid total
//! equals the in-range sample count.

use crate::binning::{self, BinSpec, ResolvedBins};
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::range::ValueRange;

/// Smoothing kernel shapes. Separable: the 2-D weight is the product of the
/// 1-D weights in X and Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kernel {
    /// Uniform weight inside one bandwidth.
    Box,
    /// Linear falloff reaching zero at one bandwidth.
    #[default]
    Triangular,
    /// Gaussian falloff with the bandwidth as sigma, truncated at three
    /// bandwidths.
    Gaussian,
}

impl Kernel {
    /// 1-D weight at distance `d` for bandwidth `bw`.
    #[must_use]
    pub fn weight(self, d: f64, bw: f64) -> f64 {
        let d = d.abs();
        match self {
            Self::Box => {
                if d <= bw {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Triangular => (1.0 - d / bw).max(0.0),
            Self::Gaussian => {
                if d > 3.0 * bw {
                    0.0
                } else {
                    (-0.5 * (d / bw) * (d / bw)).exp()
                }
            }
        }
    }

    /// Distance beyond which the weight is zero.
    #[must_use]
    pub fn support_radius(self, bw: f64) -> f64 {
        match self {
            Self::Box | Self::Triangular => bw,
            Self::Gaussian => 3.0 * bw,
        }
    }
}

/// Builder that smooths `(x, y)` samples into a density [`Grid`].
#[derive(Debug, Clone, Default)]
pub struct DensityMap {
    points: Vec<(f64, f64)>,
    spec: BinSpec,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    kernel: Kernel,
    bandwidth: Option<(f64, f64)>,
    align_bins: bool,
    resolved: Option<ResolvedBins>,
}

impl DensityMap {
    /// Create a new density builder with default binning and a triangular
    /// kernel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the samples to smooth.
    #[must_use]
    pub fn points(mut self, points: &[(f64, f64)]) -> Self {
        self.points = points.to_vec();
        self
    }

    /// Set the bin spec for the output grid.
    #[must_use]
    pub fn bins(mut self, spec: BinSpec) -> Self {
        self.spec = spec;
        self
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

    /// Set the kernel shape.
    #[must_use]
    pub fn kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set the kernel bandwidth per axis, in data units.
    ///
    /// Defaults to one bin size per axis when unset.
    #[must_use]
    pub fn bandwidth(mut self, bx: f64, by: f64) -> Self {
        self.bandwidth = Some((bx, by));
        self
    }

    /// Snap size-based bin edges to multiples of the bin size.
    #[must_use]
    pub fn align_bins(mut self, align: bool) -> Self {
        self.align_bins = align;
        self
    }

    /// Validate the configuration and resolve ranges and bins.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBinSpec`] for bad counts/sizes/bandwidths and
    /// [`Error::EmptyDomain`] when a range must be derived but no finite
    /// sample exists.
    pub fn build(mut self) -> Result<Self> {
        if let Some((bx, by)) = self.bandwidth {
            if !(bx > 0.0 && by > 0.0 && bx.is_finite() && by.is_finite()) {
                return Err(Error::InvalidBinSpec(format!(
                    "bandwidths must be positive and finite, got ({bx}, {by})"
                )));
            }
        }
        self.resolved = Some(self.resolve()?);
        Ok(self)
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
        binning::resolve(self.spec, x_range, y_range, self.align_bins)
    }

    /// Smooth the samples into a density grid.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build) when called on an unbuilt builder.
    pub fn grid(&self) -> Result<Grid> {
        let resolved = match self.resolved {
            Some(r) => r,
            None => {
                // surface bandwidth validation for unbuilt builders too
                return self.clone().build()?.grid();
            }
        };
        let (nx, ny) = resolved.counts;
        let (sx, sy) = resolved.sizes;
        let (bx, by) = self.bandwidth.unwrap_or((sx, sy));
        let mut grid = Grid::new(nx, ny, resolved.x_range, resolved.y_range)?;

        let rx = self.kernel.support_radius(bx);
        let ry = self.kernel.support_radius(by);

        for &(x, y) in &self.points {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            if !resolved.x_range.contains(x) || !resolved.y_range.contains(y) {
                continue;
            }

            let xw = axis_weights(x, resolved.x_range.min, sx, nx, rx, self.kernel, bx);
            let yw = axis_weights(y, resolved.y_range.min, sy, ny, ry, self.kernel, by);
            let total: f64 =
                xw.iter().map(|w| w.1).sum::<f64>() * yw.iter().map(|w| w.1).sum::<f64>();

            if total > 0.0 {
                for &(yi, wy) in &yw {
                    for &(xi, wx) in &xw {
                        grid.accumulate(xi, yi, wx * wy / total);
                    }
                }
            } else {
                // footprint missed every bin center; conserve mass anyway
                let xi = binning::bin_index(x, resolved.x_range, nx);
                let yi = binning::bin_index(y, resolved.y_range, ny);
                if let (Some(xi), Some(yi)) = (xi, yi) {
                    grid.accumulate(xi, yi, 1.0);
                }
            }
        }
        Ok(grid)
    }
}

/// Kernel weights for the bin centers within the support window around `v`.
fn axis_weights(
    v: f64,
    min: f64,
    size: f64,
    n: usize,
    radius: f64,
    kernel: Kernel,
    bw: f64,
) -> Vec<(usize, f64)> {
    let lo = (((v - radius - min) / size - 0.5).ceil() as isize).max(0);
    let hi = (((v + radius - min) / size - 0.5).floor() as isize).min(n as isize - 1);

    let mut out = Vec::with_capacity((hi - lo + 1).max(0) as usize);
    let mut i = lo;
    while i <= hi {
        let center = min + (i as f64 + 0.5) * size;
        let w = kernel.weight(v - center, bw);
        if w > 0.0 {
            out.push((i as usize, w));
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_points() -> Vec<(f64, f64)> {
        (0..50)
            .map(|i| {
                let t = f64::from(i) / 7.0;
                (t.sin() * 3.0, t.cos() * 3.0)
            })
            .collect()
    }

    #[test]
    fn test_mass_conserved_for_every_kernel() {
        for kernel in [Kernel::Box, Kernel::Triangular, Kernel::Gaussian] {
            let grid = DensityMap::new()
                .points(&sample_points())
                .bins(BinSpec::square_count(12))
                .kernel(kernel)
                .build()
                .expect("build should succeed")
                .grid()
                .expect("smoothing should succeed");
            assert_relative_eq!(grid.total(), 50.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_mass_conserved_across_bandwidths() {
        for bw in [0.1, 0.7, 2.5] {
            let grid = DensityMap::new()
                .points(&sample_points())
                .bins(BinSpec::square_count(10))
                .kernel(Kernel::Gaussian)
                .bandwidth(bw, bw)
                .build()
                .expect("build should succeed")
                .grid()
                .expect("smoothing should succeed");
            assert_relative_eq!(grid.total(), 50.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_footprint_spreads_over_neighbors() {
        let grid = DensityMap::new()
            .points(&[(0.5, 0.5)])
            .bins(BinSpec::square_count(5))
            .x_range(0.0, 1.0)
            .y_range(0.0, 1.0)
            .bandwidth(0.4, 0.4)
            .build()
            .expect("build should succeed")
            .grid()
            .expect("smoothing should succeed");

        let occupied = (0..5)
            .flat_map(|r| (0..5).map(move |c| (c, r)))
            .filter(|&(c, r)| grid.get(c, r).is_some_and(|v| v > 0.0))
            .count();
        assert!(occupied > 1, "kernel should cover multiple bins");
        assert_relative_eq!(grid.total(), 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_out_of_range_samples_excluded() {
        let grid = DensityMap::new()
            .points(&[(0.5, 0.5), (9.0, 9.0)])
            .bins(BinSpec::square_count(4))
            .x_range(0.0, 1.0)
            .y_range(0.0, 1.0)
            .build()
            .expect("build should succeed")
            .grid()
            .expect("smoothing should succeed");
        assert_relative_eq!(grid.total(), 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_tiny_bandwidth_falls_back_to_unit_count() {
        // box support so narrow it misses every bin center
        let grid = DensityMap::new()
            .points(&[(0.09, 0.09)])
            .bins(BinSpec::square_count(5))
            .x_range(0.0, 1.0)
            .y_range(0.0, 1.0)
            .kernel(Kernel::Box)
            .bandwidth(1e-6, 1e-6)
            .build()
            .expect("build should succeed")
            .grid()
            .expect("smoothing should succeed");
        assert_relative_eq!(grid.total(), 1.0, max_relative = 1e-9);
        assert_eq!(grid.get(0, 0), Some(1.0));
    }

    #[test]
    fn test_non_positive_bandwidth_rejected() {
        assert!(DensityMap::new()
            .points(&[(0.0, 0.0)])
            .bandwidth(0.0, 1.0)
            .build()
            .is_err());
    }

    #[test]
    fn test_kernel_weights_shapes() {
        assert_eq!(Kernel::Box.weight(0.5, 1.0), 1.0);
        assert_eq!(Kernel::Box.weight(1.5, 1.0), 0.0);
        assert_relative_eq!(Kernel::Triangular.weight(0.5, 1.0), 0.5);
        assert_eq!(Kernel::Triangular.weight(1.0, 1.0), 0.0);
        assert!(Kernel::Gaussian.weight(0.0, 1.0) > Kernel::Gaussian.weight(1.0, 1.0));
        assert_eq!(Kernel::Gaussian.weight(4.0, 1.0), 0.0);
    }
}
