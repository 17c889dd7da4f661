//! Axis tick placement, label formatting, and margin rendering.
//!
//! An [`Axis`] describes one edge of a plot: the value range it spans,
//! whether range values are bin edges or bin centers, an optional border
//! rule, and how tick labels are formatted. Tick values are chosen from the
//! 1/2/5 x 10^k family so labels land on round numbers.

use crate::range::ValueRange;

/// How tick labels are formatted.
#[derive(Debug, Clone, Copy, Default)]
pub enum LabelFormat {
    /// Pick a precision from the tick step (or value magnitude).
    #[default]
    Auto,
    /// Fixed number of decimal places.
    Fixed(usize),
    /// Caller-supplied formatting function.
    Custom(fn(f64) -> String),
}

impl LabelFormat {
    /// Format a tick value. `step` is the tick spacing when known; `Auto`
    /// uses it to pick a precision.
    #[must_use]
    pub fn format(&self, v: f64, step: Option<f64>) -> String {
        match *self {
            Self::Auto => match step {
                Some(step) => {
                    let decimals = step_decimals(step);
                    format!("{:.decimals$}", zero_snap(v, step))
                }
                None => auto_label(v),
            },
            Self::Fixed(decimals) => format!("{v:.decimals$}"),
            Self::Custom(f) => f(v),
        }
    }
}

/// Decimal places needed to print multiples of `step` exactly.
fn step_decimals(step: f64) -> usize {
    if step >= 1.0 || step <= 0.0 {
        return 0;
    }
    (-step.log10()).ceil() as usize
}

/// Avoid printing `-0.0` for rounding noise near zero.
fn zero_snap(v: f64, step: f64) -> f64 {
    if v.abs() < step * 1e-9 {
        0.0
    } else {
        v
    }
}

/// Shortest readable label for an isolated value (no step context).
fn auto_label(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let magnitude = v.abs().log10().floor() as i32;
    let decimals = (3 - magnitude).clamp(0, 6) as usize;
    let mut out = format!("{v:.decimals$}");
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    out
}

/// Pick a round step from the 1/2/5 x 10^k family near `span / target`.
fn nice_step(span: f64, target: usize) -> f64 {
    let nominal = span / target.max(1) as f64;
    let decade = 10f64.powf(nominal.log10().floor());
    let frac = nominal / decade;
    let mult = if frac < 1.1 {
        1.0
    } else if frac < 2.2 {
        2.0
    } else if frac < 5.5 {
        5.0
    } else {
        10.0
    };
    mult * decade
}

/// Rendering descriptor for one plot axis. Created once per plot from a
/// range; immutable afterward.
#[derive(Debug, Clone)]
pub struct Axis {
    range: ValueRange,
    values_are_edges: bool,
    border_line: bool,
    label_fmt: LabelFormat,
    labels: Option<Vec<(f64, String)>>,
    target_ticks: usize,
}

impl Axis {
    /// Create an axis over a value range with default options: edge-valued,
    /// no border rule, automatic labels, about four labeled ticks.
    #[must_use]
    pub fn new(range: ValueRange) -> Self {
        Self {
            range,
            values_are_edges: true,
            border_line: false,
            label_fmt: LabelFormat::Auto,
            labels: None,
            target_ticks: 4,
        }
    }

    /// Whether the range values are bin edges (true) or bin centers (false).
    #[must_use]
    pub fn values_are_edges(mut self, edges: bool) -> Self {
        self.values_are_edges = edges;
        self
    }

    /// Draw a rule along the plot edge adjoining the axis.
    #[must_use]
    pub fn border_line(mut self, border: bool) -> Self {
        self.border_line = border;
        self
    }

    /// Set the label format.
    #[must_use]
    pub fn label_fmt(mut self, fmt: LabelFormat) -> Self {
        self.label_fmt = fmt;
        self
    }

    /// Explicit labels as `(value, text)` pairs, replacing generated ticks.
    #[must_use]
    pub fn labels(mut self, labels: Vec<(f64, String)>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Approximate number of labeled ticks to generate.
    #[must_use]
    pub fn target_ticks(mut self, ticks: usize) -> Self {
        self.target_ticks = ticks.max(1);
        self
    }

    /// The value range this axis spans.
    #[must_use]
    pub const fn range(&self) -> ValueRange {
        self.range
    }

    /// Whether the border rule is enabled.
    #[must_use]
    pub const fn has_border(&self) -> bool {
        self.border_line
    }

    /// Tick positions and labels, sorted by value.
    #[must_use]
    pub fn ticks(&self) -> Vec<(f64, String)> {
        if let Some(labels) = &self.labels {
            let mut out = labels.clone();
            out.sort_by(|a, b| a.0.total_cmp(&b.0));
            return out;
        }
        let span = self.range.span();
        if span <= 0.0 {
            return Vec::new();
        }
        let step = nice_step(span, self.target_ticks);
        let first = (self.range.min / step).ceil();
        let mut out = Vec::new();
        let mut k = 0.0;
        loop {
            let v = (first + k) * step;
            if v > self.range.max + step * 1e-9 {
                break;
            }
            out.push((v, self.label_fmt.format(v, Some(step))));
            k += 1.0;
        }
        out
    }

    /// The display cell index a tick value maps to, for `cells` cells laid
    /// out min-to-max, or `None` when the value lies outside the axis.
    fn cell_of(&self, v: f64, cells: usize) -> Option<usize> {
        if !self.range.contains(v) || cells == 0 {
            return None;
        }
        let t = self.range.normalize(v);
        let idx = if self.values_are_edges || cells == 1 {
            (t * cells as f64).floor() as usize
        } else {
            (t * (cells - 1) as f64).round() as usize
        };
        Some(idx.min(cells - 1))
    }

    /// Column position of a tick within an X axis `cols` cells wide.
    ///
    /// Edge-valued axes place ticks at bin boundaries (positions `0..=cols`);
    /// center-valued axes at bin midpoints (`0..cols`).
    fn column_of(&self, v: f64, cols: usize) -> Option<usize> {
        if !self.range.contains(v) {
            return None;
        }
        let t = self.range.normalize(v);
        if self.values_are_edges {
            Some(((t * cols as f64).round() as usize).min(cols))
        } else if cols == 1 {
            Some(0)
        } else {
            Some(((t * (cols - 1) as f64).round() as usize).min(cols - 1))
        }
    }

    /// Render this axis as the left margin of a plot.
    ///
    /// Produces one string per output line (`lines` of them, plus a corner
    /// line when `pad_bottom` reserves room for an X axis underneath), all
    /// padded to equal width. With `flip` the maximum value sits on the
    /// first line.
    #[must_use]
    pub(crate) fn render_left(&self, lines: usize, pad_bottom: bool, flip: bool) -> Vec<String> {
        let mut labels: Vec<Option<String>> = vec![None; lines];
        for (v, text) in self.ticks() {
            if let Some(cell) = self.cell_of(v, lines) {
                let line = if flip { lines - 1 - cell } else { cell };
                if labels[line].is_none() {
                    labels[line] = Some(text);
                }
            }
        }

        let mut out: Vec<String> = labels
            .into_iter()
            .map(|label| match label {
                Some(text) if self.border_line => format!("{text}┤"),
                Some(text) => format!("{text}─"),
                None if self.border_line => "│".to_string(),
                None => String::new(),
            })
            .collect();
        if pad_bottom {
            out.push(if self.border_line { "╵" } else { "" }.to_string());
        }

        let width = out.iter().map(|s| s.chars().count()).max().unwrap_or(0);
        for line in &mut out {
            let pad = width - line.chars().count();
            if pad > 0 {
                *line = format!("{}{line}", " ".repeat(pad));
            }
        }
        out
    }

    /// Render this axis as the bottom of a plot: a tick line and a label
    /// line, both offset by `left_margin` columns.
    #[must_use]
    pub(crate) fn render_bottom(&self, cols: usize, left_margin: usize) -> (String, String) {
        let width = left_margin + cols + 1;
        let mut tick_line = vec![' '; width];
        let mut label_line = vec![' '; width];

        if self.border_line {
            if left_margin > 0 {
                tick_line[left_margin - 1] = '╶';
            }
            for slot in tick_line.iter_mut().skip(left_margin).take(cols) {
                *slot = '─';
            }
            tick_line[left_margin + cols] = '╴';
        }

        // explicit labels are placed unconditionally; generated ones thin
        // out when they would collide
        let explicit = self.labels.is_some();
        let mut last_label_end: Option<usize> = None;
        for (v, text) in self.ticks() {
            let Some(col) = self.column_of(v, cols) else {
                continue;
            };
            let pos = left_margin + col;
            tick_line[pos] = if self.border_line { '┴' } else { '│' };

            let len = text.chars().count();
            let start = pos.saturating_sub(len / 2).min(width.saturating_sub(len));
            if !explicit && last_label_end.is_some_and(|end| start <= end + 1) {
                continue;
            }
            for (i, ch) in text.chars().enumerate().take(width - start) {
                label_line[start + i] = ch;
            }
            last_label_end = Some(start + len.saturating_sub(1));
        }

        (collect_trimmed(tick_line), collect_trimmed(label_line))
    }

    /// Width of the left margin this axis needs for `lines` output lines.
    #[must_use]
    pub(crate) fn margin_width(&self, lines: usize, pad_bottom: bool) -> usize {
        self.render_left(lines, pad_bottom, true)
            .first()
            .map_or(0, |s| s.chars().count())
    }
}

fn collect_trimmed(chars: Vec<char>) -> String {
    let mut out: String = chars.into_iter().collect();
    while out.ends_with(' ') {
        out.pop();
    }
    out
}
