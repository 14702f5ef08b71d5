use std::rc::Rc;

use dawn_contrast_core::dom::{
    ChangeBatch, ComputedStyle, Dom, DomError, DomResult, ElementKind, ObserveOptions,
};
use futures_channel::mpsc::UnboundedSender;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, TreeWalker, Window};

use crate::observer::WebObserver;

/// `NodeFilter.SHOW_ELEMENT`
const SHOW_ELEMENT: u32 = 0x1;

pub(crate) fn js_reason(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// The live browser document.
#[derive(Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
    /// Called after the observer queues a batch, so the owner can drain it.
    on_batch: Rc<dyn Fn()>,
}

impl WebDom {
    pub fn new(window: Window, on_batch: impl Fn() + 'static) -> Option<Self> {
        let document = window.document()?;
        Some(Self {
            window,
            document,
            on_batch: Rc::new(on_batch),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// Element-only `TreeWalker` over a subtree, excluding its root.
pub struct ElementWalker {
    walker: Option<TreeWalker>,
}

impl Iterator for ElementWalker {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        let walker = self.walker.as_ref()?;
        match walker.next_node() {
            Ok(Some(node)) => node.dyn_into::<Element>().ok(),
            _ => None,
        }
    }
}

impl Dom for WebDom {
    type Element = Element;
    type Walker = ElementWalker;
    type Observer = WebObserver;

    fn document_element(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn element_kind(&self, element: &Element) -> ElementKind {
        ElementKind::from_tag(&element.tag_name(), element.is_instance_of::<HtmlElement>())
    }

    fn computed_style(&self, element: &Element) -> ComputedStyle {
        let defaults = ComputedStyle::default();
        let Ok(Some(decl)) = self.window.get_computed_style(element) else {
            return defaults;
        };
        let read = |property: &str, fallback: String| {
            decl.get_property_value(property).unwrap_or(fallback)
        };
        ComputedStyle {
            background_color: read("background-color", defaults.background_color),
            color: read("color", defaults.color),
            border_top_color: read("border-top-color", defaults.border_top_color),
            box_shadow: read("box-shadow", defaults.box_shadow),
        }
    }

    fn has_attribute(&self, element: &Element, name: &str) -> bool {
        element.has_attribute(name)
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) -> DomResult<()> {
        element
            .set_attribute(name, value)
            .map_err(|err| DomError::SetAttribute {
                name: name.to_string(),
                reason: js_reason(&err),
            })
    }

    fn remove_attribute(&self, element: &Element, name: &str) -> DomResult<()> {
        element
            .remove_attribute(name)
            .map_err(|err| DomError::RemoveAttribute {
                name: name.to_string(),
                reason: js_reason(&err),
            })
    }

    fn set_custom_property(&self, element: &Element, name: &str, value: &str) -> DomResult<()> {
        let html = element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::SetProperty {
                name: name.to_string(),
                reason: format!("<{}> has no inline style", element.tag_name()),
            })?;
        html.style()
            .set_property(name, value)
            .map_err(|err| DomError::SetProperty {
                name: name.to_string(),
                reason: js_reason(&err),
            })
    }

    fn descendants(&self, root: &Element) -> ElementWalker {
        ElementWalker {
            walker: self
                .document
                .create_tree_walker_with_what_to_show(root, SHOW_ELEMENT)
                .ok(),
        }
    }

    fn elements_with_any_attribute(&self, names: &[&str]) -> DomResult<Vec<Element>> {
        let selector = names
            .iter()
            .map(|name| format!("[{name}]"))
            .collect::<Vec<_>>()
            .join(", ");
        let list = self
            .document
            .query_selector_all(&selector)
            .map_err(|err| DomError::Query(js_reason(&err)))?;
        Ok((0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn observe(
        &self,
        root: &Element,
        options: ObserveOptions<'_>,
        sink: UnboundedSender<ChangeBatch<Element>>,
    ) -> DomResult<WebObserver> {
        WebObserver::observe(root, options, sink, Rc::clone(&self.on_batch))
            .map_err(|err| DomError::Observe(js_reason(&err)))
    }
}
