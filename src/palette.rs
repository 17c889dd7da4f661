//! Palettes and the capability-aware color mapper.
//!
//! A [`Palette`] is a named gradient over `[0, 1]`. A [`ColorMapper`] binds a
//! palette to one [`ColorLevel`] selected once per plot, and turns normalized
//! cell values into [`CellColor`]s (or glyphs for mono output). Rendering
//! code holds the mapper as a single value; it never branches on the level
//! per cell.

use crate::capability::{self, ColorLevel};
use crate::color::Rgb;
use crate::error::{Error, Result};

/// Glyph ramp used for mono output, dark to bright.
const GLYPH_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// A named gradient: evenly spaced RGB stops interpolated over `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    name: String,
    stops: Vec<Rgb>,
}

impl Palette {
    /// Create a palette from evenly spaced color stops.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBinSpec`] if no stops are given.
    pub fn new(name: impl Into<String>, stops: Vec<Rgb>) -> Result<Self> {
        if stops.is_empty() {
            return Err(Error::InvalidBinSpec(
                "palette requires at least one color stop".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            stops,
        })
    }

    /// Linear blue-to-red ramp, the documented default for density plots.
    #[must_use]
    pub fn blue_red() -> Self {
        Self {
            name: "blue-red".to_string(),
            stops: vec![Rgb::new(16, 48, 220), Rgb::new(220, 40, 16)],
        }
    }

    /// Black-to-white ramp.
    #[must_use]
    pub fn grayscale() -> Self {
        Self {
            name: "grayscale".to_string(),
            stops: vec![Rgb::BLACK, Rgb::WHITE],
        }
    }

    /// Dark-to-bright ramp fading in through blue.
    #[must_use]
    pub fn fade_in() -> Self {
        Self {
            name: "fade-in".to_string(),
            stops: vec![
                Rgb::BLACK,
                Rgb::new(24, 24, 112),
                Rgb::new(48, 96, 220),
                Rgb::new(128, 200, 255),
                Rgb::WHITE,
            ],
        }
    }

    /// Blue-to-red rainbow sweep.
    #[must_use]
    pub fn rainbow() -> Self {
        Self {
            name: "rainbow".to_string(),
            stops: vec![
                Rgb::new(0, 0, 200),
                Rgb::new(0, 180, 220),
                Rgb::new(0, 200, 0),
                Rgb::new(230, 220, 0),
                Rgb::new(220, 0, 0),
            ],
        }
    }

    /// Palette name, for lookup and diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample the gradient at `t` in `[0, 1]` (clamped).
    ///
    /// Piecewise-linear interpolation between the two nearest stops.
    #[must_use]
    pub fn sample(&self, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        if self.stops.len() == 1 {
            return self.stops[0];
        }

        let segment_count = self.stops.len() - 1;
        let pos = t * segment_count as f64;
        let segment = (pos.floor() as usize).min(segment_count - 1);
        let local_t = pos - segment as f64;

        self.stops[segment].lerp(self.stops[segment + 1], local_t)
    }
}

/// A cell's resolved color at the mapper's capability level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellColor {
    /// Terminal default; used for zero-count cells rendered as background.
    Background,
    /// One of the 16 standard ANSI colors (0-15).
    Indexed16(u8),
    /// xterm 256-color palette index.
    Indexed256(u8),
    /// 24-bit color.
    True(Rgb),
}

impl CellColor {
    /// SGR parameters selecting this color as the foreground.
    #[must_use]
    pub fn fg_sgr(self) -> String {
        match self {
            Self::Background => "39".to_string(),
            Self::Indexed16(i) if i < 8 => (30 + u32::from(i)).to_string(),
            Self::Indexed16(i) => (90 + u32::from(i) - 8).to_string(),
            Self::Indexed256(n) => format!("38;5;{n}"),
            Self::True(c) => format!("38;2;{};{};{}", c.r, c.g, c.b),
        }
    }

    /// SGR parameters selecting this color as the background.
    #[must_use]
    pub fn bg_sgr(self) -> String {
        match self {
            Self::Background => "49".to_string(),
            Self::Indexed16(i) if i < 8 => (40 + u32::from(i)).to_string(),
            Self::Indexed16(i) => (100 + u32::from(i) - 8).to_string(),
            Self::Indexed256(n) => format!("48;5;{n}"),
            Self::True(c) => format!("48;2;{};{};{}", c.r, c.g, c.b),
        }
    }
}

/// Maps normalized cell values to colors at one capability level.
///
/// Selected once per plot and immutable afterward.
#[derive(Debug, Clone)]
pub struct ColorMapper {
    palette: Palette,
    level: ColorLevel,
    zero_as_background: bool,
}

impl ColorMapper {
    /// Select a mapper for the given palette at the auto-detected level.
    ///
    /// Auto-detection never fails; use [`select`](Self::select) to request
    /// an explicit level.
    #[must_use]
    pub fn auto(palette: Palette) -> Self {
        Self {
            palette,
            level: capability::detect(),
            zero_as_background: true,
        }
    }

    /// Select a mapper for the given palette at the richest level the
    /// terminal supports, or at an explicitly requested level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] when `requested` names a
    /// level above what the terminal supports. Without an explicit request
    /// the detected level is used as-is (auto-detection never fails).
    pub fn select(palette: Palette, requested: Option<ColorLevel>) -> Result<Self> {
        Self::select_at(palette, requested, capability::detect())
    }

    /// [`select`](Self::select) against a known detected level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] when `requested` exceeds
    /// `detected`.
    pub fn select_at(
        palette: Palette,
        requested: Option<ColorLevel>,
        detected: ColorLevel,
    ) -> Result<Self> {
        let level = match requested {
            Some(level) if level > detected => {
                return Err(Error::UnsupportedCapability {
                    requested: level,
                    detected,
                });
            }
            Some(level) => level,
            None => detected,
        };
        Ok(Self {
            palette,
            level,
            zero_as_background: true,
        })
    }

    /// Whether zero-count cells render as plain background (the default)
    /// instead of participating in the gradient.
    #[must_use]
    pub fn zero_as_background(mut self, background: bool) -> Self {
        self.zero_as_background = background;
        self
    }

    /// The capability level this mapper renders at.
    #[must_use]
    pub const fn level(&self) -> ColorLevel {
        self.level
    }

    /// The palette this mapper samples.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Resolve a normalized value to a color at the selected level.
    #[must_use]
    pub fn color_for(&self, t: f64, is_zero: bool) -> CellColor {
        if is_zero && self.zero_as_background {
            return CellColor::Background;
        }
        let rgb = self.palette.sample(t);
        match self.level {
            ColorLevel::Mono => CellColor::Background,
            ColorLevel::Ansi16 => CellColor::Indexed16(rgb.to_ansi16()),
            ColorLevel::Ansi256 => CellColor::Indexed256(rgb.to_ansi256()),
            ColorLevel::TrueColor => CellColor::True(rgb),
        }
    }

    /// Resolve a normalized value to a glyph for mono output.
    #[must_use]
    pub fn glyph_for(&self, t: f64, is_zero: bool) -> char {
        if is_zero && self.zero_as_background {
            return ' ';
        }
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let idx = (t * (GLYPH_RAMP.len() - 1) as f64).round() as usize;
        GLYPH_RAMP[idx.min(GLYPH_RAMP.len() - 1)]
    }
}
