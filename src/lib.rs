//! # Termgram
//!
//! Character-cell 2-D histogram, density, and heatmap plotting for color
//! terminals.
//!
//! Termgram renders scatter points, pre-gridded values, or paired-signal
//! eye-diagram samples as a lattice of colored terminal cells, with no
//! graphical display surface: quick visual inspection of numeric data over
//! remote shells, logs, and CI output.
//!
//! ## Pipeline
//!
//! Raw samples flow through range resolution and binning (or kernel density
//! accumulation) into a [`Grid`](grid::Grid) of scalar values; a
//! capability-aware [`ColorMapper`](palette::ColorMapper) turns cell values
//! into colors; the [`Plot`](plot::Plot) composes colored cells, axes, and
//! margins into styled text lines.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use termgram::prelude::*;
//!
//! let points: Vec<(f64, f64)> = (0..1000)
//!     .map(|i| {
//!         let t = f64::from(i) / 50.0;
//!         (t.sin() * 3.0, t.cos() * 2.0)
//!     })
//!     .collect();
//!
//! // Bin into 40x20 cells, auto-detect color capability, print
//! histplot2d(&points, (40, 20))?.show()?;
//! # Ok::<(), termgram::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serialization support for the configuration enums

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in plotting code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// ============================================================================
// Core Modules
// ============================================================================

/// Axis value ranges and range resolution.
pub mod range;

/// Binning of samples into count grids.
pub mod binning;

/// Kernel density accumulation.
pub mod kernel;

/// The binned value grid and compositing (upscale, trim).
pub mod grid;

// ============================================================================
// Color Modules
// ============================================================================

/// RGB colors and terminal quantization.
pub mod color;

/// Terminal color capability levels and detection.
pub mod capability;

/// Palettes and the capability-aware color mapper.
pub mod palette;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Axis tick placement and margin rendering.
pub mod axis;

/// Plot composition and terminal output.
pub mod plot;

/// Colorbar legends.
pub mod colorbar;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for termgram operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and functions for convenient imports.
///
/// ```rust,ignore
/// use termgram::prelude::*;
/// ```
pub mod prelude {
    pub use crate::axis::{Axis, LabelFormat};
    pub use crate::binning::{BinSpec, Histogram2d};
    pub use crate::capability::ColorLevel;
    pub use crate::color::Rgb;
    pub use crate::colorbar::{make_colorbar, make_vertical_colorbar};
    pub use crate::error::{Error, Result};
    pub use crate::grid::Grid;
    pub use crate::kernel::{DensityMap, Kernel};
    pub use crate::palette::{ColorMapper, Palette};
    pub use crate::plot::{densityplot2d, grid_heatmap, histplot2d, Plot};
    pub use crate::range::ValueRange;
}

// ============================================================================
// Tests
// ============================================================================
