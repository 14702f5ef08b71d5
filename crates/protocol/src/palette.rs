use serde::{Deserialize, Serialize};

/// The three warm palette layers seeded as custom properties on the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteLayer {
    Base,
    Surface,
    Surface2,
}

impl PaletteLayer {
    pub const ALL: [PaletteLayer; 3] = [
        PaletteLayer::Base,
        PaletteLayer::Surface,
        PaletteLayer::Surface2,
    ];

    /// CSS custom property holding this layer.
    pub const fn custom_property(self) -> &'static str {
        match self {
            PaletteLayer::Base => "--dawn-bg",
            PaletteLayer::Surface => "--dawn-surface",
            PaletteLayer::Surface2 => "--dawn-surface-2",
        }
    }

    /// Color literal written into the custom property.
    pub const fn color(self) -> &'static str {
        match self {
            PaletteLayer::Base => "#f4f1e8",
            PaletteLayer::Surface => "#e9e4d8",
            PaletteLayer::Surface2 => "#ded7c8",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_are_custom_properties() {
        for layer in PaletteLayer::ALL {
            assert!(layer.custom_property().starts_with("--"));
            assert!(layer.color().starts_with('#'));
            assert_eq!(layer.color().len(), 7);
        }
    }

    #[test]
    fn layers_darken_toward_surface_2() {
        let channel_sum = |hex: &str| -> u32 {
            (1..7)
                .step_by(2)
                .filter_map(|i| u32::from_str_radix(&hex[i..i + 2], 16).ok())
                .sum()
        };
        let sums: Vec<u32> = PaletteLayer::ALL
            .iter()
            .map(|l| channel_sum(l.color()))
            .collect();
        assert!(sums[0] > sums[1] && sums[1] > sums[2]);
    }
}
