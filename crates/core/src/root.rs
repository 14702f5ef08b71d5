use crate::classify::{is_harsh_bright_neutral, is_transparent};
use crate::color::{self, Color};
use crate::dom::Dom;

fn background<D: Dom>(dom: &D, element: Option<D::Element>) -> Option<Color> {
    element.and_then(|el| color::parse(&dom.computed_style(&el).background_color))
}

/// Whether the page canvas is harsh enough for harsh-mode.
///
/// True when the root or the body has a harsh bright-neutral background, or
/// when both are transparent: such a page shows the browser's default white
/// canvas. A missing body counts as transparent.
pub fn is_root_harsh<D: Dom>(dom: &D) -> bool {
    let root = background(dom, dom.document_element());
    let body = background(dom, dom.body());

    if is_harsh_bright_neutral(root.as_ref()) || is_harsh_bright_neutral(body.as_ref()) {
        return true;
    }
    is_transparent(root.as_ref()) && is_transparent(body.as_ref())
}
