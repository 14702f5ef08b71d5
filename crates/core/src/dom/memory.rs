//! In-memory [`Dom`] used to drive the engine without a browser.
//!
//! Mutation records follow the browser's rules closely enough for the
//! engine's purposes: insertions and filtered attribute changes under an
//! observed root are queued per observer and delivered as one batch by
//! [`MemoryDocument::flush`], the stand-in for a microtask checkpoint.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use futures_channel::mpsc::UnboundedSender;

use super::{
    Change, ChangeBatch, ComputedStyle, Dom, DomResult, ElementKind, ObserveOptions, Observer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    tag: String,
    html: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    custom_properties: BTreeMap<String, String>,
    style: ComputedStyle,
}

struct Subscription {
    id: u64,
    root: NodeId,
    child_list: bool,
    attribute_filter: Vec<String>,
    pending: ChangeBatch<NodeId>,
    sink: UnboundedSender<ChangeBatch<NodeId>>,
}

struct Tree {
    nodes: Vec<Node>,
    body: Option<NodeId>,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

const HTML: NodeId = NodeId(0);

/// Whether `ancestor` is `node` or one of its ancestors.
fn contains(nodes: &[Node], ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = nodes[id.0].parent;
    }
    false
}

impl Tree {
    fn push(&mut self, tag: &str, html: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_string(),
            html,
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            custom_properties: BTreeMap::new(),
            style: ComputedStyle::default(),
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn record_insertion(&mut self, child: NodeId) {
        let Tree {
            nodes,
            subscriptions,
            ..
        } = self;
        for sub in subscriptions.iter_mut() {
            if sub.child_list && contains(nodes, sub.root, child) && sub.root != child {
                sub.pending.push(Change::Inserted(child));
            }
        }
    }

    fn record_attribute(&mut self, target: NodeId, name: &str) {
        let Tree {
            nodes,
            subscriptions,
            ..
        } = self;
        for sub in subscriptions.iter_mut() {
            if sub.attribute_filter.iter().any(|f| f == name) && contains(nodes, sub.root, target)
            {
                sub.pending.push(Change::Attribute {
                    target,
                    name: name.to_string(),
                });
            }
        }
    }

    fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev());
        }
        out
    }
}

/// A shared, mutable in-memory document with an `<html>` root.
#[derive(Clone)]
pub struct MemoryDocument {
    tree: Rc<RefCell<Tree>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A document with `<html>` and an empty `<body>`.
    pub fn new() -> Self {
        let doc = Self::without_body();
        let body = doc.append(doc.html(), "body");
        doc.tree.borrow_mut().body = Some(body);
        doc
    }

    /// A document whose root has no body yet.
    pub fn without_body() -> Self {
        let mut tree = Tree {
            nodes: Vec::new(),
            body: None,
            subscriptions: Vec::new(),
            next_subscription: 0,
        };
        tree.push("html", true);
        Self {
            tree: Rc::new(RefCell::new(tree)),
        }
    }

    pub fn html(&self) -> NodeId {
        HTML
    }

    pub fn body_id(&self) -> Option<NodeId> {
        self.tree.borrow().body
    }

    /// Create a detached HTML element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree.borrow_mut().push(tag, true)
    }

    /// Create a detached element outside the HTML namespace (e.g. SVG).
    pub fn create_foreign_element(&self, tag: &str) -> NodeId {
        self.tree.borrow_mut().push(tag, false)
    }

    /// Attach `child` as the last child of `parent`, queueing an insertion
    /// record for observers that cover `parent`.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut tree = self.tree.borrow_mut();
        tree.node_mut(child).parent = Some(parent);
        tree.node_mut(parent).children.push(child);
        tree.record_insertion(child);
    }

    /// Create an HTML element and append it to `parent`.
    pub fn append(&self, parent: NodeId, tag: &str) -> NodeId {
        let child = self.create_element(tag);
        self.append_child(parent, child);
        child
    }

    /// Change an element's computed style without producing a mutation
    /// record, as a stylesheet or inherited change would.
    pub fn update_style(&self, node: NodeId, f: impl FnOnce(&mut ComputedStyle)) {
        f(&mut self.tree.borrow_mut().node_mut(node).style);
    }

    pub fn set_background(&self, node: NodeId, color: &str) {
        self.update_style(node, |s| s.background_color = color.to_string());
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree.borrow().node(node).attributes.get(name).cloned()
    }

    pub fn custom_property(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree.borrow().node(node).custom_properties.get(name).cloned()
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.tree.borrow().subscriptions.len()
    }

    /// Deliver every observer's queued records as a single batch.
    pub fn flush(&self) {
        let mut tree = self.tree.borrow_mut();
        for sub in tree.subscriptions.iter_mut() {
            if sub.pending.is_empty() {
                continue;
            }
            let batch = std::mem::take(&mut sub.pending);
            // A closed receiver means the watcher already stopped.
            let _ = sub.sink.unbounded_send(batch);
        }
    }
}

/// Depth-first, document-order walk over a subtree's descendants.
pub struct MemoryWalker {
    tree: Rc<RefCell<Tree>>,
    stack: Vec<NodeId>,
}

impl Iterator for MemoryWalker {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let tree = self.tree.borrow();
        self.stack.extend(tree.node(id).children.iter().rev());
        Some(id)
    }
}

pub struct MemoryObserver {
    tree: Weak<RefCell<Tree>>,
    id: u64,
}

impl Observer for MemoryObserver {
    fn disconnect(&mut self) {
        if let Some(tree) = self.tree.upgrade() {
            tree.borrow_mut().subscriptions.retain(|s| s.id != self.id);
        }
        self.tree = Weak::new();
    }
}

impl Drop for MemoryObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl Dom for MemoryDocument {
    type Element = NodeId;
    type Walker = MemoryWalker;
    type Observer = MemoryObserver;

    fn document_element(&self) -> Option<NodeId> {
        Some(HTML)
    }

    fn body(&self) -> Option<NodeId> {
        self.body_id()
    }

    fn element_kind(&self, element: &NodeId) -> ElementKind {
        let tree = self.tree.borrow();
        let node = tree.node(*element);
        ElementKind::from_tag(&node.tag, node.html)
    }

    fn computed_style(&self, element: &NodeId) -> ComputedStyle {
        self.tree.borrow().node(*element).style.clone()
    }

    fn has_attribute(&self, element: &NodeId, name: &str) -> bool {
        self.tree.borrow().node(*element).attributes.contains_key(name)
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> DomResult<()> {
        let mut tree = self.tree.borrow_mut();
        tree.node_mut(*element)
            .attributes
            .insert(name.to_string(), value.to_string());
        tree.record_attribute(*element, name);
        Ok(())
    }

    fn remove_attribute(&self, element: &NodeId, name: &str) -> DomResult<()> {
        let mut tree = self.tree.borrow_mut();
        if tree.node_mut(*element).attributes.remove(name).is_some() {
            tree.record_attribute(*element, name);
        }
        Ok(())
    }

    fn set_custom_property(&self, element: &NodeId, name: &str, value: &str) -> DomResult<()> {
        self.tree
            .borrow_mut()
            .node_mut(*element)
            .custom_properties
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn descendants(&self, root: &NodeId) -> MemoryWalker {
        let stack = self
            .tree
            .borrow()
            .node(*root)
            .children
            .iter()
            .rev()
            .copied()
            .collect();
        MemoryWalker {
            tree: Rc::clone(&self.tree),
            stack,
        }
    }

    fn elements_with_any_attribute(&self, names: &[&str]) -> DomResult<Vec<NodeId>> {
        let tree = self.tree.borrow();
        Ok(tree
            .preorder(HTML)
            .into_iter()
            .filter(|id| {
                let attrs = &tree.node(*id).attributes;
                names.iter().any(|n| attrs.contains_key(*n))
            })
            .collect())
    }

    fn observe(
        &self,
        root: &NodeId,
        options: ObserveOptions<'_>,
        sink: UnboundedSender<ChangeBatch<NodeId>>,
    ) -> DomResult<MemoryObserver> {
        let mut tree = self.tree.borrow_mut();
        let id = tree.next_subscription;
        tree.next_subscription += 1;
        tree.subscriptions.push(Subscription {
            id,
            root: *root,
            child_list: options.child_list,
            attribute_filter: options
                .attribute_filter
                .iter()
                .map(|s| String::from(*s))
                .collect(),
            pending: Vec::new(),
            sink,
        });
        Ok(MemoryObserver {
            tree: Rc::downgrade(&self.tree),
            id,
        })
    }
}
