//! Test double wrapping [`MemoryDocument`] with a failing attribute and
//! lookup counters.

use std::cell::Cell;

use futures_channel::mpsc::UnboundedSender;

use super::memory::{MemoryDocument, MemoryObserver, MemoryWalker, NodeId};
use super::{ChangeBatch, ComputedStyle, Dom, DomError, DomResult, ElementKind, ObserveOptions};

pub(crate) struct FailingDom {
    pub doc: MemoryDocument,
    /// Writes and removals of this attribute fail.
    pub failing: &'static str,
    /// Calls to `document_element` and `body`.
    pub root_lookups: Cell<usize>,
}

impl FailingDom {
    pub fn new(doc: MemoryDocument, failing: &'static str) -> Self {
        Self {
            doc,
            failing,
            root_lookups: Cell::new(0),
        }
    }
}

impl Dom for FailingDom {
    type Element = NodeId;
    type Walker = MemoryWalker;
    type Observer = MemoryObserver;

    fn document_element(&self) -> Option<NodeId> {
        self.root_lookups.set(self.root_lookups.get() + 1);
        self.doc.document_element()
    }

    fn body(&self) -> Option<NodeId> {
        self.root_lookups.set(self.root_lookups.get() + 1);
        self.doc.body()
    }

    fn element_kind(&self, element: &NodeId) -> ElementKind {
        self.doc.element_kind(element)
    }

    fn computed_style(&self, element: &NodeId) -> ComputedStyle {
        self.doc.computed_style(element)
    }

    fn has_attribute(&self, element: &NodeId, name: &str) -> bool {
        self.doc.has_attribute(element, name)
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> DomResult<()> {
        if name == self.failing {
            return Err(DomError::SetAttribute {
                name: name.to_string(),
                reason: "rejected".into(),
            });
        }
        self.doc.set_attribute(element, name, value)
    }

    fn remove_attribute(&self, element: &NodeId, name: &str) -> DomResult<()> {
        if name == self.failing {
            return Err(DomError::RemoveAttribute {
                name: name.to_string(),
                reason: "rejected".into(),
            });
        }
        self.doc.remove_attribute(element, name)
    }

    fn set_custom_property(&self, element: &NodeId, name: &str, value: &str) -> DomResult<()> {
        self.doc.set_custom_property(element, name, value)
    }

    fn descendants(&self, root: &NodeId) -> MemoryWalker {
        self.doc.descendants(root)
    }

    fn elements_with_any_attribute(&self, names: &[&str]) -> DomResult<Vec<NodeId>> {
        self.doc.elements_with_any_attribute(names)
    }

    fn observe(
        &self,
        root: &NodeId,
        options: ObserveOptions<'_>,
        sink: UnboundedSender<ChangeBatch<NodeId>>,
    ) -> DomResult<MemoryObserver> {
        self.doc.observe(root, options, sink)
    }
}
