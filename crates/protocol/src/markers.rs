use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute placed on the document root while harsh-mode is active.
pub const ROOT_MARKER: &str = "data-dawn-contrast";

/// Value written for on/off style markers (root marker, border, dark background).
pub const FLAG_ON: &str = "on";

/// Value written for the light-text marker.
pub const LIGHT_TEXT_VALUE: &str = "muted";

/// Per-element marker attributes consumed by the stylesheet.
///
/// Each marker is present on an element only while its predicate held at the
/// most recent evaluation of that element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Marker {
    /// Harsh bright-neutral background. Valued with a [`BgRole`].
    HarshBackground,
    /// Near-white text color.
    LightText,
    /// Harsh bright-neutral top border.
    HarshBorder,
    /// Very dark background.
    DarkBackground,
}

impl Marker {
    pub const ALL: [Marker; 4] = [
        Marker::HarshBackground,
        Marker::LightText,
        Marker::HarshBorder,
        Marker::DarkBackground,
    ];

    /// The attribute name this marker is written under.
    pub const fn attribute(self) -> &'static str {
        match self {
            Marker::HarshBackground => "data-dawn-bg",
            Marker::LightText => "data-dawn-fg",
            Marker::HarshBorder => "data-dawn-border",
            Marker::DarkBackground => "data-dawn-dark-bg",
        }
    }

    /// All marker attribute names, in [`Marker::ALL`] order.
    pub const fn attributes() -> [&'static str; 4] {
        [
            Marker::HarshBackground.attribute(),
            Marker::LightText.attribute(),
            Marker::HarshBorder.attribute(),
            Marker::DarkBackground.attribute(),
        ]
    }
}

/// What kind of surface a harsh background belongs to.
///
/// The stylesheet picks a different palette layer (and elevation) per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BgRole {
    /// The page canvas: the root element or the body.
    Base,
    /// Interactive surfaces: form controls and anything with a box shadow.
    Control,
    /// Everything else.
    Panel,
}

impl BgRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            BgRole::Base => "base",
            BgRole::Control => "control",
            BgRole::Panel => "panel",
        }
    }
}

impl fmt::Display for BgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_names_are_distinct() {
        let names = Marker::attributes();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
            assert_ne!(*a, ROOT_MARKER);
        }
    }

    #[test]
    fn attributes_follow_all_order() {
        let names = Marker::attributes();
        for (marker, name) in Marker::ALL.iter().zip(names) {
            assert_eq!(marker.attribute(), name);
        }
    }

    #[test]
    fn role_serializes_as_attribute_value() {
        for role in [BgRole::Base, BgRole::Control, BgRole::Panel] {
            let json = serde_json::to_string(&role).unwrap_or_default();
            assert_eq!(json, format!("\"{role}\""));
        }
    }
}
