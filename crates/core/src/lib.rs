pub mod adjust;
pub mod classify;
pub mod color;
pub mod dom;
pub mod lifecycle;
pub mod root;
pub mod scan;
pub mod watcher;

pub use adjust::{Adjustment, Classification, adjust, classify};
pub use color::{Color, ColorParseError};
pub use dom::{ComputedStyle, Dom, DomError, ElementKind};
pub use lifecycle::{ActivationState, Controller, ControllerStatus};
pub use scan::{SCAN_CAP, ScanReport, scan};
