//! The three color predicates and their thresholds.
//!
//! The thresholds are tuned to the warm dawn palette and are not derived
//! from a formula. The asymmetry between background and text limits matters.

use crate::color::Color;

/// Colors at or below this alpha are invisible and never classified.
pub const VISIBLE_ALPHA_FLOOR: f64 = 0.02;

/// A bright, low-saturation band: `brightness >= min_brightness` and
/// `spread <= max_spread`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeutralThreshold {
    pub min_brightness: f64,
    pub max_spread: f64,
}

impl NeutralThreshold {
    fn contains(&self, c: &Color) -> bool {
        c.brightness() >= self.min_brightness && c.spread() <= self.max_spread
    }
}

pub const HARSH_BRIGHT_NEUTRAL: NeutralThreshold = NeutralThreshold {
    min_brightness: 236.0,
    max_spread: 24.0,
};

pub const VERY_LIGHT_TEXT: NeutralThreshold = NeutralThreshold {
    min_brightness: 226.0,
    max_spread: 34.0,
};

/// Any color at or below this brightness counts as a dark background.
pub const DARK_BACKGROUND_MAX_BRIGHTNESS: f64 = 72.0;

fn visible(c: Option<&Color>) -> Option<&Color> {
    c.filter(|c| c.a > VISIBLE_ALPHA_FLOOR)
}

/// Unparsed, or too transparent to be seen.
pub fn is_transparent(c: Option<&Color>) -> bool {
    visible(c).is_none()
}

/// Near-white, low-saturation color: the surfaces this system re-skins.
pub fn is_harsh_bright_neutral(c: Option<&Color>) -> bool {
    visible(c).is_some_and(|c| HARSH_BRIGHT_NEUTRAL.contains(c))
}

pub fn is_very_light_text(c: Option<&Color>) -> bool {
    visible(c).is_some_and(|c| VERY_LIGHT_TEXT.contains(c))
}

/// Dark colors of any hue, saturated ones included.
pub fn is_dark_background(c: Option<&Color>) -> bool {
    visible(c).is_some_and(|c| c.brightness() <= DARK_BACKGROUND_MAX_BRIGHTNESS)
}
