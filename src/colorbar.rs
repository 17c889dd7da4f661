//! Colorbar legends derived from an existing plot.
//!
//! A colorbar is itself a [`Plot`]: a one-cell-thick gradient spanning the
//! source plot's value extent, labeled at both ends, sharing the source's
//! color mapper so the legend matches the plot exactly.

use crate::axis::{Axis, LabelFormat};
use crate::error::Result;
use crate::grid::Grid;
use crate::plot::Plot;
use crate::range::ValueRange;

/// Build a horizontal colorbar for `source`, indented to line up with the
/// source plot's cells.
///
/// # Errors
///
/// Propagates grid construction errors.
pub fn make_colorbar(source: &Plot, label_fmt: LabelFormat) -> Result<Plot> {
    let (min, max) = source.value_limits();
    let width = source.grid().cols().max(2);

    let gradient: Vec<f64> = (0..width)
        .map(|i| i as f64 / (width - 1) as f64)
        .collect();
    let grid = Grid::from_rows(
        &[gradient],
        ValueRange::new(min, max)?.widen_if_degenerate(),
        ValueRange::new(0.0, 1.0)?,
    )?;

    let axis = Axis::new(grid.x_range())
        .values_are_edges(false)
        .labels(end_labels(min, max, label_fmt));

    Plot::new(grid)
        .color_map(source.mapper().clone().zero_as_background(false))
        .data_limits(0.0, 1.0)
        .x_axis(axis)
        .flip_y(false)
        .half_height(source.is_half_height())
        .left_pad(source.left_margin())
        .build()
}

/// Build a vertical colorbar for `source`, suitable for rendering beside it.
///
/// # Errors
///
/// Propagates grid construction errors.
pub fn make_vertical_colorbar(source: &Plot, label_fmt: LabelFormat) -> Result<Plot> {
    let (min, max) = source.value_limits();
    let height = source.grid().rows().max(2);

    let gradient: Vec<Vec<f64>> = (0..height)
        .map(|i| vec![i as f64 / (height - 1) as f64])
        .collect();
    let grid = Grid::from_rows(
        &gradient,
        ValueRange::new(0.0, 1.0)?,
        ValueRange::new(min, max)?.widen_if_degenerate(),
    )?;

    let axis = Axis::new(grid.y_range())
        .values_are_edges(false)
        .labels(end_labels(min, max, label_fmt));

    Plot::new(grid)
        .color_map(source.mapper().clone().zero_as_background(false))
        .data_limits(0.0, 1.0)
        .y_axis(axis)
        .half_height(source.is_half_height())
        .build()
}

fn end_labels(min: f64, max: f64, fmt: LabelFormat) -> Vec<(f64, String)> {
    vec![
        (min, fmt.format(min, None)),
        (max, fmt.format(max, None)),
    ]
}
