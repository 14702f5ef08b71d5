pub mod markers;
pub mod palette;

pub use markers::{BgRole, FLAG_ON, LIGHT_TEXT_VALUE, Marker, ROOT_MARKER};
pub use palette::PaletteLayer;
