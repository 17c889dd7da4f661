//! Color types and terminal color quantization.
//!
//! Provides a 24-bit RGB representation plus lossy conversions down to the
//! 256-color and 16-color ANSI palettes for less capable terminals.

/// RGB color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
}

/// The 16 standard ANSI colors, indexed 0-15 (8 normal + 8 bright).
const ANSI16_TABLE: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (170, 0, 0),
    (0, 170, 0),
    (170, 85, 0),
    (0, 0, 170),
    (170, 0, 170),
    (0, 170, 170),
    (170, 170, 170),
    (85, 85, 85),
    (255, 85, 85),
    (85, 255, 85),
    (255, 255, 85),
    (85, 85, 255),
    (255, 85, 255),
    (85, 255, 255),
    (255, 255, 255),
];

impl Rgb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f64::from(self.r) * inv_t + f64::from(other.r) * t).round() as u8,
            (f64::from(self.g) * inv_t + f64::from(other.g) * t).round() as u8,
            (f64::from(self.b) * inv_t + f64::from(other.b) * t).round() as u8,
        )
    }

    /// Rec. 709 luminance in `[0, 1]`.
    #[must_use]
    pub fn luminance(self) -> f64 {
        0.2126 * (f64::from(self.r) / 255.0)
            + 0.7152 * (f64::from(self.g) / 255.0)
            + 0.0722 * (f64::from(self.b) / 255.0)
    }

    /// Quantize to the xterm 256-color palette.
    ///
    /// Near-gray colors use the 24-step gray ramp (232-255), everything else
    /// the 6x6x6 color cube (16-231).
    #[must_use]
    pub fn to_ansi256(self) -> u8 {
        let (r, g, b) = (self.r as i32, self.g as i32, self.b as i32);

        // Grayscale ramp when the channels are close together.
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        if max - min < 12 {
            let avg = (r + g + b) / 3;
            if avg < 4 {
                return 16; // cube black
            }
            if avg > 246 {
                return 231; // cube white
            }
            let gray_idx = ((avg - 8) * 24 / 240).clamp(0, 23);
            return 232 + gray_idx as u8;
        }

        let cube = |c: i32| -> i32 {
            if c < 48 {
                0
            } else if c < 115 {
                1
            } else {
                (c - 35) / 40
            }
        };
        (16 + 36 * cube(r) + 6 * cube(g) + cube(b)) as u8
    }

    /// Quantize to the nearest of the 16 standard ANSI colors.
    #[must_use]
    pub fn to_ansi16(self) -> u8 {
        let mut best = 0usize;
        let mut best_dist = i32::MAX;
        for (idx, &(r, g, b)) in ANSI16_TABLE.iter().enumerate() {
            let dr = i32::from(self.r) - i32::from(r);
            let dg = i32::from(self.g) - i32::from(g);
            let db = i32::from(self.b) - i32::from(b);
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best = idx;
            }
        }
        best as u8
    }
}
