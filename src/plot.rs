//! Plot composition and terminal rendering.
//!
//! A [`Plot`] owns a [`Grid`], an optional axis per edge, and a
//! [`ColorMapper`], and composes them into styled text lines. Rendering is
//! pure; the only side-effecting operation is [`Plot::show`], which writes
//! the composed lines to stdout without mutating the plot.
//!
//! Color levels render full cells as colored backgrounds; by default two
//! vertical cells share one character using the lower-half block `▄`
//! (foreground = lower cell, background = upper cell), doubling the Y
//! resolution. Mono renders one glyph per cell.

use std::io::{self, Write};

use crate::axis::Axis;
use crate::binning::Histogram2d;
use crate::capability::ColorLevel;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::kernel::DensityMap;
use crate::palette::{CellColor, ColorMapper, Palette};
use crate::range::ValueRange;

/// A composed density/histogram/heatmap plot.
#[derive(Debug, Clone)]
pub struct Plot {
    grid: Grid,
    mapper: ColorMapper,
    x_axis: Option<Axis>,
    y_axis: Option<Axis>,
    limits: Option<(f64, f64)>,
    scale: (usize, usize),
    half_height: bool,
    flip_y: bool,
    left_pad: usize,
}

impl Plot {
    /// Create a plot over a grid with auto-detected color capability and
    /// the blue-red palette.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            mapper: ColorMapper::auto(Palette::blue_red()),
            x_axis: None,
            y_axis: None,
            limits: None,
            scale: (1, 1),
            half_height: true,
            flip_y: true,
            left_pad: 0,
        }
    }

    /// Set the color mapper (palette + capability level).
    #[must_use]
    pub fn color_map(mut self, mapper: ColorMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Attach an X axis rendered below the plot.
    #[must_use]
    pub fn x_axis(mut self, axis: Axis) -> Self {
        self.x_axis = Some(axis);
        self
    }

    /// Attach a Y axis rendered as the left margin.
    #[must_use]
    pub fn y_axis(mut self, axis: Axis) -> Self {
        self.y_axis = Some(axis);
        self
    }

    /// Override the value extent used for color normalization.
    #[must_use]
    pub fn data_limits(mut self, min: f64, max: f64) -> Self {
        self.limits = Some((min, max));
        self
    }

    /// Integer upscale factors applied at build time.
    #[must_use]
    pub fn scale(mut self, sx: usize, sy: usize) -> Self {
        self.scale = (sx, sy);
        self
    }

    /// Render two vertical cells per character with `▄` (color levels only).
    #[must_use]
    pub fn half_height(mut self, half: bool) -> Self {
        self.half_height = half;
        self
    }

    /// Put grid row 0 at the bottom of the output (the default).
    #[must_use]
    pub fn flip_y(mut self, flip: bool) -> Self {
        self.flip_y = flip;
        self
    }

    /// Extra indentation columns before the left margin.
    #[must_use]
    pub fn left_pad(mut self, pad: usize) -> Self {
        self.left_pad = pad;
        self
    }

    /// Whether zero-valued cells render as plain background.
    #[must_use]
    pub fn zero_as_background(mut self, background: bool) -> Self {
        self.mapper = self.mapper.zero_as_background(background);
        self
    }

    /// Validate layout parameters and apply the upscale factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBinSpec`] for a zero scale factor.
    pub fn build(mut self) -> Result<Self> {
        if self.scale != (1, 1) {
            self.grid = self.grid.upscale(self.scale.0, self.scale.1)?;
            self.scale = (1, 1);
        }
        Ok(self)
    }

    /// The grid being rendered.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The mapper used for cell colors.
    #[must_use]
    pub const fn mapper(&self) -> &ColorMapper {
        &self.mapper
    }

    /// Whether half-height rendering is enabled for this plot.
    #[must_use]
    pub const fn is_half_height(&self) -> bool {
        self.half_height
    }

    /// The value extent used for normalization: explicit limits when set,
    /// else the grid's cell extent.
    #[must_use]
    pub fn value_limits(&self) -> (f64, f64) {
        self.limits.unwrap_or_else(|| self.grid.value_extent())
    }

    /// Number of output lines the plot area occupies.
    #[must_use]
    pub fn line_count(&self) -> usize {
        let rows = self.grid.rows() * self.scale.1;
        if self.uses_half_height() {
            rows.div_ceil(2)
        } else {
            rows
        }
    }

    /// Width of everything left of the first plot column.
    #[must_use]
    pub fn left_margin(&self) -> usize {
        let margin = self.y_axis.as_ref().map_or(0, |ax| {
            ax.margin_width(self.line_count(), self.x_axis.is_some())
        });
        self.left_pad + margin
    }

    fn uses_half_height(&self) -> bool {
        self.half_height && self.mapper.level() != ColorLevel::Mono
    }

    fn normalized(&self, col: usize, display_row: usize) -> (f64, bool) {
        let rows = self.grid.rows();
        let data_row = if self.flip_y {
            rows - 1 - display_row
        } else {
            display_row
        };
        let v = self.grid.get(col, data_row).unwrap_or(0.0);
        let (min, max) = self.value_limits();
        let span = max - min;
        let t = if span > 0.0 {
            ((v - min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (t, v == 0.0)
    }

    fn cell_color(&self, col: usize, display_row: usize) -> CellColor {
        let (t, is_zero) = self.normalized(col, display_row);
        self.mapper.color_for(t, is_zero)
    }

    /// One output line of two stacked cells: background paints the upper,
    /// foreground the lower.
    fn half_height_cell(upper: Option<CellColor>, lower: Option<CellColor>) -> String {
        match (
            upper.unwrap_or(CellColor::Background),
            lower.unwrap_or(CellColor::Background),
        ) {
            (CellColor::Background, CellColor::Background) => "\x1b[0m ".to_string(),
            (up, CellColor::Background) => format!("\x1b[0m\x1b[{}m▀", up.fg_sgr()),
            (up, low) => format!("\x1b[{};{}m▄", up.bg_sgr(), low.fg_sgr()),
        }
    }

    fn plot_lines(&self) -> Vec<String> {
        let cols = self.grid.cols();
        let rows = self.grid.rows();

        if self.mapper.level() == ColorLevel::Mono {
            return (0..rows)
                .map(|dr| {
                    (0..cols)
                        .map(|c| {
                            let (t, is_zero) = self.normalized(c, dr);
                            self.mapper.glyph_for(t, is_zero)
                        })
                        .collect()
                })
                .collect();
        }

        if !self.uses_half_height() {
            return (0..rows)
                .map(|dr| {
                    let mut line = String::new();
                    for c in 0..cols {
                        match self.cell_color(c, dr) {
                            CellColor::Background => line.push_str("\x1b[0m "),
                            color => {
                                line.push_str(&format!("\x1b[{}m ", color.bg_sgr()));
                            }
                        }
                    }
                    line.push_str("\x1b[0m");
                    line
                })
                .collect();
        }

        let mut out = Vec::with_capacity(rows.div_ceil(2));
        let mut dr = 0;
        if rows % 2 == 1 {
            // odd row count: the first line has only a lower half
            let mut line = String::new();
            for c in 0..cols {
                line.push_str(&Self::half_height_cell(None, Some(self.cell_color(c, 0))));
            }
            line.push_str("\x1b[0m");
            out.push(line);
            dr = 1;
        }
        while dr + 1 < rows {
            let mut line = String::new();
            for c in 0..cols {
                line.push_str(&Self::half_height_cell(
                    Some(self.cell_color(c, dr)),
                    Some(self.cell_color(c, dr + 1)),
                ));
            }
            line.push_str("\x1b[0m");
            out.push(line);
            dr += 2;
        }
        out
    }

    /// Compose the full output: plot cells, Y margin, X tick/label rows.
    #[must_use]
    pub fn as_lines(&self) -> Vec<String> {
        let plot_lines = self.plot_lines();
        let line_count = plot_lines.len();
        let has_x = self.x_axis.is_some();

        let margin_lines = match &self.y_axis {
            Some(ax) => ax.render_left(line_count, has_x, self.flip_y),
            None => vec![String::new(); line_count + usize::from(has_x)],
        };
        let margin_w = margin_lines.first().map_or(0, |s| s.chars().count());
        let pad = " ".repeat(self.left_pad);

        let mut out: Vec<String> = plot_lines
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{pad}{}{line}", margin_lines[i]))
            .collect();

        if let Some(ax) = &self.x_axis {
            let total_margin = self.left_pad + margin_w;
            let (tick_line, label_line) = ax.render_bottom(self.grid.cols(), total_margin);
            out.push(merge_corner(
                &tick_line,
                margin_lines.get(line_count),
                total_margin,
            ));
            if !label_line.is_empty() {
                out.push(label_line);
            }
        }
        out
    }

    /// Write the composed plot to a writer.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the writer uninterpreted.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        for line in self.as_lines() {
            writeln!(w, "{line}")?;
        }
        Ok(())
    }

    /// Write the composed plot to stdout.
    ///
    /// The single side-effecting operation on a plot; does not mutate it.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors uninterpreted.
    pub fn show(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_to(&mut lock)
    }
}

/// Overlay the Y axis corner character onto the X tick line.
fn merge_corner(tick_line: &str, corner_line: Option<&String>, total_margin: usize) -> String {
    let Some(corner) = corner_line else {
        return tick_line.to_string();
    };
    if total_margin == 0 || !corner.ends_with('╵') {
        return tick_line.to_string();
    }
    let mut chars: Vec<char> = tick_line.chars().collect();
    if chars.len() < total_margin {
        chars.resize(total_margin, ' ');
    }
    chars[total_margin - 1] = if chars[total_margin - 1] == '╶' {
        '└'
    } else {
        '╵'
    };
    chars.into_iter().collect()
}

/// Bin points and build a plot with edge-labeled axes.
///
/// # Errors
///
/// Propagates binning configuration errors ([`Error::EmptyDomain`],
/// [`Error::InvalidBinSpec`]).
pub fn histplot2d(points: &[(f64, f64)], bins: (usize, usize)) -> Result<Plot> {
    let hist = Histogram2d::new()
        .points(points)
        .bin_count(bins.0, bins.1)
        .build()?;
    let grid = hist.grid()?;
    let x_axis = Axis::new(grid.x_range());
    let y_axis = Axis::new(grid.y_range());
    Plot::new(grid).x_axis(x_axis).y_axis(y_axis).build()
}

/// Smooth points with the default kernel and build a plot with
/// edge-labeled axes.
///
/// # Errors
///
/// Propagates density configuration errors.
pub fn densityplot2d(points: &[(f64, f64)]) -> Result<Plot> {
    let density = DensityMap::new().points(points).build()?;
    let grid = density.grid()?;
    let x_axis = Axis::new(grid.x_range());
    let y_axis = Axis::new(grid.y_range());
    Plot::new(grid).x_axis(x_axis).y_axis(y_axis).build()
}

/// Build a table-style heatmap from pre-gridded values with optional
/// per-column and per-row labels. Row 0 renders at the top, and every cell
/// participates in the gradient.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] for empty or ragged input, or when
/// a label list's length disagrees with the grid.
pub fn grid_heatmap(
    values: &[Vec<f64>],
    x_labels: Option<&[&str]>,
    y_labels: Option<&[&str]>,
) -> Result<Plot> {
    let rows = values.len();
    let cols = values.first().map_or(0, Vec::len);
    let x_range = ValueRange::new(-0.5, cols as f64 - 0.5)?;
    let y_range = ValueRange::new(-0.5, rows as f64 - 0.5)?;
    let grid = Grid::from_rows(values, x_range, y_range)?;

    let mut x_axis = Axis::new(ValueRange::new(0.0, (cols - 1) as f64)?).values_are_edges(false);
    if let Some(labels) = x_labels {
        if labels.len() != cols {
            return Err(Error::DimensionMismatch {
                expected: cols,
                actual: labels.len(),
            });
        }
        x_axis = x_axis.labels(indexed_labels(labels));
    }

    let mut y_axis = Axis::new(ValueRange::new(0.0, (rows - 1) as f64)?).values_are_edges(false);
    if let Some(labels) = y_labels {
        if labels.len() != rows {
            return Err(Error::DimensionMismatch {
                expected: rows,
                actual: labels.len(),
            });
        }
        y_axis = y_axis.labels(indexed_labels(labels));
    }

    Plot::new(grid)
        .x_axis(x_axis)
        .y_axis(y_axis)
        .flip_y(false)
        .zero_as_background(false)
        .build()
}

fn indexed_labels(labels: &[&str]) -> Vec<(f64, String)> {
    labels
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, (*s).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::ColorLevel;

    fn counts_grid() -> Grid {
        Grid::from_rows(
            &[vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 0.0]],
            ValueRange::new(0.0, 3.0).expect("range should resolve"),
            ValueRange::new(0.0, 2.0).expect("range should resolve"),
        )
        .expect("grid should build")
    }

    fn mapper(level: ColorLevel) -> ColorMapper {
        ColorMapper::select_at(Palette::blue_red(), Some(level), level)
            .expect("selection should succeed")
    }

    #[test]
    fn test_mono_line_shape() {
        let plot = Plot::new(counts_grid())
            .color_map(mapper(ColorLevel::Mono))
            .build()
            .expect("build should succeed");
        let lines = plot.as_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() == 3));
        assert!(lines.iter().all(|l| !l.contains('\x1b')));
    }

    #[test]
    fn test_mono_flip_places_row_zero_last() {
        let plot = Plot::new(counts_grid())
            .color_map(mapper(ColorLevel::Mono))
            .build()
            .expect("build should succeed");
        let lines = plot.as_lines();
        // data row 1 holds the maximum (4.0) and renders on the first line
        assert!(lines[0].contains('@'));
        // data row 0 starts with a zero cell, shown as background
        assert!(lines[1].starts_with(' '));
    }

    #[test]
    fn test_truecolor_full_height_escapes() {
        let plot = Plot::new(counts_grid())
            .color_map(mapper(ColorLevel::TrueColor))
            .half_height(false)
            .build()
            .expect("build should succeed");
        let lines = plot.as_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\x1b[48;2;"));
        assert!(lines[0].ends_with("\x1b[0m"));
    }

    #[test]
    fn test_half_height_halves_line_count() {
        let plot = Plot::new(counts_grid())
            .color_map(mapper(ColorLevel::TrueColor))
            .build()
            .expect("build should succeed");
        assert_eq!(plot.line_count(), 1);
        let lines = plot.as_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains('▄'));
    }

    #[test]
    fn test_half_height_odd_rows_adds_partial_line() {
        let grid = Grid::from_rows(
            &[vec![1.0], vec![2.0], vec![3.0]],
            ValueRange::new(0.0, 1.0).expect("range should resolve"),
            ValueRange::new(0.0, 3.0).expect("range should resolve"),
        )
        .expect("grid should build");
        let plot = Plot::new(grid)
            .color_map(mapper(ColorLevel::TrueColor))
            .build()
            .expect("build should succeed");
        assert_eq!(plot.as_lines().len(), 2);
    }

    #[test]
    fn test_ansi256_indexed_escapes() {
        let plot = Plot::new(counts_grid())
            .color_map(mapper(ColorLevel::Ansi256))
            .half_height(false)
            .build()
            .expect("build should succeed");
        let joined = plot.as_lines().join("");
        assert!(joined.contains("\x1b[48;5;"));
        assert!(!joined.contains("48;2;"));
    }

    #[test]
    fn test_zero_cells_render_blank() {
        let plot = Plot::new(counts_grid())
            .color_map(mapper(ColorLevel::TrueColor))
            .half_height(false)
            .build()
            .expect("build should succeed");
        let lines = plot.as_lines();
        // row 0 of data renders last; its first cell is zero => reset + space
        assert!(lines[1].starts_with("\x1b[0m "));
    }

    #[test]
    fn test_scale_applied_at_build() {
        let plot = Plot::new(counts_grid())
            .color_map(mapper(ColorLevel::Mono))
            .scale(2, 3)
            .build()
            .expect("build should succeed");
        assert_eq!(plot.grid().cols(), 6);
        assert_eq!(plot.grid().rows(), 6);
        assert_eq!(plot.as_lines().len(), 6);
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(Plot::new(counts_grid()).scale(0, 1).build().is_err());
    }

    #[test]
    fn test_axes_add_margin_and_bottom_rows() {
        let grid = counts_grid();
        let x_axis = Axis::new(grid.x_range());
        let y_axis = Axis::new(grid.y_range());
        let plot = Plot::new(grid)
            .color_map(mapper(ColorLevel::Mono))
            .x_axis(x_axis)
            .y_axis(y_axis)
            .build()
            .expect("build should succeed");

        let lines = plot.as_lines();
        // 2 plot rows + tick row + label row
        assert_eq!(lines.len(), 4);
        assert!(plot.left_margin() > 0);
    }

    #[test]
    fn test_left_pad_indents_everything() {
        let plot = Plot::new(counts_grid())
            .color_map(mapper(ColorLevel::Mono))
            .left_pad(3)
            .build()
            .expect("build should succeed");
        assert!(plot.as_lines().iter().all(|l| l.starts_with("   ")));
        assert_eq!(plot.left_margin(), 3);
    }

    #[test]
    fn test_write_to_does_not_mutate() {
        let plot = Plot::new(counts_grid())
            .color_map(mapper(ColorLevel::Mono))
            .build()
            .expect("build should succeed");
        let before = plot.as_lines();
        let mut sink = Vec::new();
        plot.write_to(&mut sink).expect("write should succeed");
        assert_eq!(plot.as_lines(), before);
        assert!(!sink.is_empty());
    }

    #[test]
    fn test_histplot2d_pipeline() {
        let points = [(0.0, 0.0), (0.0, 0.0), (5.0, 5.0), (10.0, 10.0)];
        let plot = histplot2d(&points, (2, 2)).expect("histplot should build");
        assert_eq!(plot.grid().total(), 4.0);
        assert!(!plot.as_lines().is_empty());
    }

    #[test]
    fn test_densityplot2d_pipeline() {
        let points: Vec<(f64, f64)> = (0..40)
            .map(|i| (f64::from(i % 7), f64::from(i % 5)))
            .collect();
        let plot = densityplot2d(&points).expect("density plot should build");
        let total = plot.grid().total();
        assert!((total - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_grid_heatmap_with_labels() {
        let values = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let plot = grid_heatmap(
            &values,
            Some(&["a", "b", "c"]),
            Some(&["top", "bottom"]),
        )
        .expect("heatmap should build");
        let joined = plot.as_lines().join("\n");
        assert!(joined.contains("top"));
        assert!(joined.contains('a'));
    }

    #[test]
    fn test_grid_heatmap_label_count_mismatch() {
        let values = vec![vec![1.0, 2.0]];
        let err = grid_heatmap(&values, Some(&["only-one"]), None);
        assert!(matches!(err, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_grid_heatmap_ragged_rejected() {
        let values = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(grid_heatmap(&values, None, None).is_err());
    }

    #[test]
    fn test_degenerate_limits_render_flat() {
        let grid = Grid::from_rows(
            &[vec![2.0, 2.0]],
            ValueRange::new(0.0, 2.0).expect("range should resolve"),
            ValueRange::new(0.0, 1.0).expect("range should resolve"),
        )
        .expect("grid should build");
        let plot = Plot::new(grid)
            .color_map(mapper(ColorLevel::Mono))
            .build()
            .expect("build should succeed");
        // max == min maps every cell to t = 0, the bottom of the glyph ramp
        let lines = plot.as_lines();
        assert_eq!(lines[0], "  ");
    }
}
