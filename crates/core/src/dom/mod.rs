//! Host document abstraction.
//!
//! The engine never touches a concrete DOM. Everything it needs from the host
//! (computed styles, attribute writes, document-order traversal and mutation
//! observation) goes through [`Dom`]. Handles follow the browser object model:
//! cheap to clone, compared by identity, mutated through shared references.

pub mod memory;
#[cfg(test)]
pub(crate) mod testing;

use futures_channel::mpsc::UnboundedSender;
use thiserror::Error;

/// What an element is, as far as color evaluation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Ordinary content-bearing HTML element.
    Content,
    /// Form control: input, textarea, select, button.
    Control,
    /// Never evaluated: scripts, media, embedded frames, and anything outside
    /// the HTML namespace (SVG primitives, MathML).
    NonVisual,
}

impl ElementKind {
    /// Classify an element from its tag name and namespace. Tag matching is
    /// case-insensitive.
    pub fn from_tag(tag: &str, is_html: bool) -> Self {
        if !is_html {
            return ElementKind::NonVisual;
        }
        match tag.to_ascii_lowercase().as_str() {
            "script" | "style" | "noscript" | "img" | "svg" | "path" | "video" | "canvas"
            | "iframe" => ElementKind::NonVisual,
            "input" | "textarea" | "select" | "button" => ElementKind::Control,
            _ => ElementKind::Content,
        }
    }
}

/// The computed-style values the engine reads, verbatim from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub background_color: String,
    pub color: String,
    pub border_top_color: String,
    pub box_shadow: String,
}

impl ComputedStyle {
    pub fn has_box_shadow(&self) -> bool {
        self.box_shadow.trim() != "none"
    }
}

impl Default for ComputedStyle {
    /// CSS initial values: transparent background, black text and border, no shadow.
    fn default() -> Self {
        Self {
            background_color: "rgba(0, 0, 0, 0)".into(),
            color: "rgb(0, 0, 0)".into(),
            border_top_color: "rgb(0, 0, 0)".into(),
            box_shadow: "none".into(),
        }
    }
}

/// A single observed change.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<E> {
    /// An element was inserted somewhere under the observed root.
    Inserted(E),
    /// A filtered attribute changed on `target`.
    Attribute { target: E, name: String },
}

/// Changes delivered together, in the order the host recorded them.
pub type ChangeBatch<E> = Vec<Change<E>>;

/// Which changes an observation reports.
#[derive(Debug, Clone, Copy)]
pub struct ObserveOptions<'a> {
    /// Report element insertions anywhere in the subtree.
    pub child_list: bool,
    /// Report changes to these attributes only.
    pub attribute_filter: &'a [&'a str],
}

/// A live observation. Dropping it, or calling [`Observer::disconnect`], stops
/// delivery; nothing is sent afterwards.
pub trait Observer {
    fn disconnect(&mut self);
}

#[derive(Debug, Error)]
pub enum DomError {
    #[error("failed to set attribute {name}: {reason}")]
    SetAttribute { name: String, reason: String },
    #[error("failed to remove attribute {name}: {reason}")]
    RemoveAttribute { name: String, reason: String },
    #[error("failed to set custom property {name}: {reason}")]
    SetProperty { name: String, reason: String },
    #[error("failed to query marked elements: {0}")]
    Query(String),
    #[error("failed to observe mutations: {0}")]
    Observe(String),
}

pub type DomResult<T> = Result<T, DomError>;

/// The host document.
pub trait Dom {
    type Element: Clone + PartialEq;
    type Walker: Iterator<Item = Self::Element>;
    type Observer: Observer;

    /// The document root (`<html>`), if any.
    fn document_element(&self) -> Option<Self::Element>;

    fn body(&self) -> Option<Self::Element>;

    fn element_kind(&self, element: &Self::Element) -> ElementKind;

    /// Computed style; hosts fall back to [`ComputedStyle::default`] when the
    /// style cannot be read.
    fn computed_style(&self, element: &Self::Element) -> ComputedStyle;

    fn has_attribute(&self, element: &Self::Element, name: &str) -> bool;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str) -> DomResult<()>;

    /// Removing an absent attribute is a no-op.
    fn remove_attribute(&self, element: &Self::Element, name: &str) -> DomResult<()>;

    fn set_custom_property(&self, element: &Self::Element, name: &str, value: &str)
    -> DomResult<()>;

    /// Descendant elements of `root` (excluding `root`) in document order.
    fn descendants(&self, root: &Self::Element) -> Self::Walker;

    /// Every element in the document carrying at least one of `names`.
    fn elements_with_any_attribute(&self, names: &[&str]) -> DomResult<Vec<Self::Element>>;

    /// Start observing `root`'s subtree, sending each batch of changes to `sink`.
    fn observe(
        &self,
        root: &Self::Element,
        options: ObserveOptions<'_>,
        sink: UnboundedSender<ChangeBatch<Self::Element>>,
    ) -> DomResult<Self::Observer>;

    /// Whether `element` is the document root or the body.
    fn is_root_or_body(&self, element: &Self::Element) -> bool {
        self.document_element().as_ref() == Some(element) || self.body().as_ref() == Some(element)
    }
}
