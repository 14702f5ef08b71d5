use serde::{Deserialize, Serialize};

use crate::adjust::{Adjustment, adjust};
use crate::dom::Dom;

/// Most elements a single scan visits, the scan root included.
pub const SCAN_CAP: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// Elements visited, skipped ones included.
    pub visited: usize,
    /// Elements actually evaluated.
    pub adjusted: usize,
    /// The cap was reached with elements left unvisited.
    pub truncated: bool,
}

/// Adjust `root` and its descendants in document order, stopping after
/// [`SCAN_CAP`] elements. Elements past the cap stay as they are until a
/// later scan or mutation reaches them.
pub fn scan<D: Dom>(dom: &D, root: &D::Element) -> ScanReport {
    let mut report = ScanReport::default();
    let mut elements = std::iter::once(root.clone()).chain(dom.descendants(root));

    for element in elements.by_ref().take(SCAN_CAP) {
        report.visited += 1;
        match adjust(dom, &element) {
            Ok(Adjustment::Evaluated(_)) => report.adjusted += 1,
            Ok(Adjustment::Skipped) => {}
            Err(err) => tracing::warn!(%err, "failed to adjust element"),
        }
    }

    report.truncated = elements.next().is_some();
    if report.truncated {
        tracing::debug!(cap = SCAN_CAP, "scan truncated");
    }
    report
}
