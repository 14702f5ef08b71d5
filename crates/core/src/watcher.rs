use futures_channel::mpsc::{self, UnboundedReceiver};

use crate::adjust::adjust;
use crate::dom::{Change, ChangeBatch, Dom, DomResult, ObserveOptions, Observer};
use crate::scan::scan;

/// Attributes whose changes can move an element's computed colors.
///
/// Must never include a marker attribute: writing markers would then feed
/// back into the watcher forever.
pub const OBSERVED_ATTRIBUTES: [&str; 2] = ["style", "class"];

/// Live subscription to document mutations.
///
/// The host pushes change batches into a channel; the watcher owns the
/// receiving end and dispatches whatever has queued up when drained.
pub struct MutationWatcher<D: Dom> {
    observer: D::Observer,
    batches: UnboundedReceiver<ChangeBatch<D::Element>>,
}

impl<D: Dom> MutationWatcher<D> {
    /// Observe insertions anywhere under `root` and style/class changes.
    pub fn start(dom: &D, root: &D::Element) -> DomResult<Self> {
        let (sink, batches) = mpsc::unbounded();
        let observer = dom.observe(
            root,
            ObserveOptions {
                child_list: true,
                attribute_filter: &OBSERVED_ATTRIBUTES,
            },
            sink,
        )?;
        Ok(Self { observer, batches })
    }

    /// Dispatch every queued batch. Returns how many were handled.
    pub fn drain(&mut self, dom: &D) -> usize {
        let mut handled = 0;
        while let Ok(batch) = self.batches.try_recv() {
            dispatch(dom, batch);
            handled += 1;
        }
        handled
    }

    /// Disconnect and discard anything still queued.
    pub fn stop(mut self) {
        self.observer.disconnect();
        self.batches.close();
    }
}

/// Inserted elements get a full subtree scan; an element whose style or class
/// changed only needs itself re-evaluated.
pub fn dispatch<D: Dom>(dom: &D, batch: ChangeBatch<D::Element>) {
    for change in batch {
        match change {
            Change::Inserted(element) => {
                let report = scan(dom, &element);
                tracing::trace!(?report, "scanned inserted subtree");
            }
            Change::Attribute { target, name } => {
                if let Err(err) = adjust(dom, &target) {
                    tracing::warn!(%err, attribute = %name, "failed to adjust element");
                }
            }
        }
    }
}
