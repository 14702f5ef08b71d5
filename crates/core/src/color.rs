use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A computed color as reported by the host: channels in `0..=255`, alpha in
/// `0..=1`. Values are carried as parsed, without clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("transparent keyword")]
    Transparent,
    #[error("not an rgb()/rgba() function: {0:?}")]
    NotFunctional(String),
    #[error("expected at least 3 components, found {0}")]
    TooFewComponents(usize),
    #[error("component is not a number: {0:?}")]
    InvalidComponent(String),
}

impl Color {
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Perceptual brightness (weighted luma), roughly `0..=255`.
    pub fn brightness(&self) -> f64 {
        (self.r * 299.0 + self.g * 587.0 + self.b * 114.0) / 1000.0
    }

    /// Max channel minus min channel. Near zero for grays, large for saturated hues.
    pub fn spread(&self) -> f64 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        max - min
    }
}

/// Parse a computed color string, returning `None` for anything that is not a
/// functional `rgb()`/`rgba()` color (including `transparent`).
pub fn parse(s: &str) -> Option<Color> {
    s.parse().ok()
}

fn component(raw: &str) -> Result<f64, ColorParseError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .ok_or_else(|| ColorParseError::InvalidComponent(raw.to_string()))
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts `rgb(r, g, b)` and `rgba(r, g, b, a)`, case-insensitive and
    /// whitespace-tolerant around components. Components past the fourth are
    /// ignored; a missing alpha defaults to 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "transparent" {
            return Err(ColorParseError::Transparent);
        }

        let args = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .filter(|args| !args.is_empty() && !args.contains(')'))
            .ok_or_else(|| ColorParseError::NotFunctional(s.to_string()))?;

        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            return Err(ColorParseError::TooFewComponents(parts.len()));
        }

        let r = component(parts[0])?;
        let g = component(parts[1])?;
        let b = component(parts[2])?;
        let a = match parts.get(3) {
            Some(raw) => component(raw)?,
            None => 1.0,
        };

        Ok(Color { r, g, b, a })
    }
}
