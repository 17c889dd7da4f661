//! Terminal color capability levels and environment-based detection.
//!
//! The raw terminal query mechanics live outside this crate; what we consume
//! here is their observable result: environment variables and a tty check.
//! Detection runs once per process and the result is cached for the session.

use std::env;
use std::io::IsTerminal;
use std::sync::OnceLock;

/// The richest color-rendering mode an output surface supports.
///
/// Levels are totally ordered by the number of distinguishable colors, so
/// `Mono < Ansi16 < Ansi256 < TrueColor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorLevel {
    /// On/off glyphs only, no color codes.
    Mono,
    /// The 16 standard ANSI colors.
    Ansi16,
    /// The xterm 256-color palette.
    Ansi256,
    /// 24-bit color.
    TrueColor,
}

impl ColorLevel {
    /// Number of distinguishable colors at this level.
    #[must_use]
    pub const fn color_count(self) -> u32 {
        match self {
            Self::Mono => 1,
            Self::Ansi16 => 16,
            Self::Ansi256 => 256,
            Self::TrueColor => 16_777_216,
        }
    }
}

static DETECTED: OnceLock<ColorLevel> = OnceLock::new();

/// Detect the terminal's color capability from the environment.
///
/// Computed once per process and cached; repeated calls are free. Explicit
/// per-plot overrides are handled by
/// [`ColorMapper::select`](crate::palette::ColorMapper::select), not here.
#[must_use]
pub fn detect() -> ColorLevel {
    *DETECTED.get_or_init(|| {
        classify(
            env::var("TERM").ok().as_deref(),
            env::var("COLORTERM").ok().as_deref(),
            env::var("NO_COLOR").is_ok_and(|v| v != "0"),
            std::io::stdout().is_terminal(),
        )
    })
}

/// Classify a capability level from raw environment observations.
///
/// Pure function backing [`detect`], exposed so tests can exercise the
/// heuristics without mutating process-wide environment state.
#[must_use]
pub fn classify(
    term: Option<&str>,
    colorterm: Option<&str>,
    no_color: bool,
    is_tty: bool,
) -> ColorLevel {
    if no_color || !is_tty {
        return ColorLevel::Mono;
    }
    let term = term.unwrap_or("");
    if term == "dumb" {
        return ColorLevel::Mono;
    }

    if let Some(colorterm) = colorterm {
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return ColorLevel::TrueColor;
        }
    }

    if term.ends_with("256color") || term.ends_with("256") {
        return ColorLevel::Ansi256;
    }

    if term.starts_with("xterm")
        || term.starts_with("screen")
        || term.starts_with("tmux")
        || term.starts_with("vt100")
        || term.starts_with("rxvt")
        || term.contains("linux")
        || term.contains("color")
        || term.contains("ansi")
    {
        return ColorLevel::Ansi16;
    }

    ColorLevel::Mono
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(ColorLevel::Mono < ColorLevel::Ansi16);
        assert!(ColorLevel::Ansi16 < ColorLevel::Ansi256);
        assert!(ColorLevel::Ansi256 < ColorLevel::TrueColor);
    }

    #[test]
    fn test_color_count_monotonic() {
        let levels = [
            ColorLevel::Mono,
            ColorLevel::Ansi16,
            ColorLevel::Ansi256,
            ColorLevel::TrueColor,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0].color_count() < pair[1].color_count());
        }
    }

    #[test]
    fn test_classify_no_color_wins() {
        assert_eq!(
            classify(Some("xterm-256color"), Some("truecolor"), true, true),
            ColorLevel::Mono
        );
    }

    #[test]
    fn test_classify_not_a_tty() {
        assert_eq!(
            classify(Some("xterm-256color"), None, false, false),
            ColorLevel::Mono
        );
    }

    #[test]
    fn test_classify_dumb_terminal() {
        assert_eq!(classify(Some("dumb"), None, false, true), ColorLevel::Mono);
    }

    #[test]
    fn test_classify_truecolor() {
        assert_eq!(
            classify(Some("xterm"), Some("truecolor"), false, true),
            ColorLevel::TrueColor
        );
        assert_eq!(
            classify(Some("xterm"), Some("24bit"), false, true),
            ColorLevel::TrueColor
        );
    }

    #[test]
    fn test_classify_256color() {
        assert_eq!(
            classify(Some("xterm-256color"), None, false, true),
            ColorLevel::Ansi256
        );
        assert_eq!(
            classify(Some("screen-256color"), None, false, true),
            ColorLevel::Ansi256
        );
    }

    #[test]
    fn test_classify_basic_ansi() {
        assert_eq!(classify(Some("xterm"), None, false, true), ColorLevel::Ansi16);
        assert_eq!(classify(Some("linux"), None, false, true), ColorLevel::Ansi16);
    }

    #[test]
    fn test_classify_unknown_term() {
        assert_eq!(classify(Some("paper"), None, false, true), ColorLevel::Mono);
        assert_eq!(classify(None, None, false, true), ColorLevel::Mono);
    }
}
