//! End-to-end lifecycle scenarios driven through the in-memory document:
//! activation, incremental re-evaluation from mutations, and teardown.

use dawn_contrast_core::dom::Dom;
use dawn_contrast_core::dom::memory::{MemoryDocument, NodeId};
use dawn_contrast_core::{ActivationState, Controller, SCAN_CAP};
use dawn_contrast_protocol::{Marker, PaletteLayer, ROOT_MARKER};

const WHITE: &str = "rgb(255, 255, 255)";

fn body(doc: &MemoryDocument) -> NodeId {
    doc.body_id().expect("body")
}

fn marked(doc: &MemoryDocument) -> Vec<NodeId> {
    doc.elements_with_any_attribute(&Marker::attributes())
        .expect("query marked elements")
}

fn bg_marker(doc: &MemoryDocument, node: NodeId) -> Option<String> {
    doc.attribute(node, Marker::HarshBackground.attribute())
}

#[test]
fn transparent_page_activates() {
    let doc = MemoryDocument::new();
    doc.set_background(doc.html(), "rgba(0, 0, 0, 0)");
    doc.set_background(body(&doc), "rgba(0, 0, 0, 0)");

    let mut controller = Controller::new(doc.clone());
    assert_eq!(controller.evaluate(), ActivationState::Active);
}

#[test]
fn white_root_activates_and_marks_base() {
    let doc = MemoryDocument::new();
    doc.set_background(doc.html(), WHITE);
    doc.set_background(body(&doc), WHITE);

    let mut controller = Controller::new(doc.clone());
    controller.evaluate();

    assert_eq!(bg_marker(&doc, doc.html()).as_deref(), Some("base"));
    assert_eq!(bg_marker(&doc, body(&doc)).as_deref(), Some("base"));
}

#[test]
fn off_white_roles_follow_tag_rules() {
    let doc = MemoryDocument::new();
    let off_white = "rgb(250, 248, 245)";
    doc.set_background(body(&doc), off_white);
    let panel = doc.append(body(&doc), "div");
    let button = doc.append(body(&doc), "button");
    let raised = doc.append(body(&doc), "div");
    for el in [panel, button, raised] {
        doc.set_background(el, off_white);
    }
    let shadow = "rgba(0, 0, 0, 0.2) 0px 1px 3px 0px";
    doc.update_style(button, |s| s.box_shadow = shadow.into());
    doc.update_style(raised, |s| s.box_shadow = shadow.into());

    let mut controller = Controller::new(doc.clone());
    controller.evaluate();

    assert_eq!(bg_marker(&doc, body(&doc)).as_deref(), Some("base"));
    assert_eq!(bg_marker(&doc, panel).as_deref(), Some("panel"));
    assert_eq!(bg_marker(&doc, button).as_deref(), Some("control"));
    assert_eq!(bg_marker(&doc, raised).as_deref(), Some("control"));
}

#[test]
fn light_text_respects_alpha() {
    let doc = MemoryDocument::new();
    let visible = doc.append(body(&doc), "p");
    let faded = doc.append(body(&doc), "p");
    doc.update_style(visible, |s| s.color = "rgba(245, 245, 245, 1)".into());
    doc.update_style(faded, |s| s.color = "rgba(245, 245, 245, 0.01)".into());

    let mut controller = Controller::new(doc.clone());
    controller.evaluate();

    let fg = Marker::LightText.attribute();
    assert_eq!(doc.attribute(visible, fg).as_deref(), Some("muted"));
    assert_eq!(doc.attribute(faded, fg), None);
}

#[test]
fn large_insertion_is_capped() {
    let doc = MemoryDocument::new();
    let mut controller = Controller::new(doc.clone());
    controller.evaluate();

    let widget = doc.create_element("div");
    doc.set_background(widget, WHITE);
    let mut subtree = vec![widget];
    for i in 1..6000 {
        // Mix nesting and siblings so document order is not just insertion order.
        let parent = if i % 3 == 0 { subtree[i - 1] } else { widget };
        let el = doc.append(parent, "div");
        doc.set_background(el, WHITE);
        subtree.push(el);
    }
    let order: Vec<NodeId> = std::iter::once(widget)
        .chain(doc.descendants(&widget))
        .collect();
    assert_eq!(order.len(), 6000);

    doc.append_child(body(&doc), widget);
    doc.flush();
    assert_eq!(controller.process_pending(), 1);

    let (scanned, rest) = order.split_at(SCAN_CAP);
    assert!(scanned.iter().all(|n| bg_marker(&doc, *n).is_some()));
    assert!(rest.iter().all(|n| bg_marker(&doc, *n).is_none()));

    // A later mutation brings a skipped element up to date.
    let straggler = rest[rest.len() - 1];
    doc.set_attribute(&straggler, "style", "padding: 0").expect("set attribute");
    doc.flush();
    controller.process_pending();
    assert_eq!(bg_marker(&doc, straggler).as_deref(), Some("panel"));
}

#[test]
fn deactivation_clears_all_markers() {
    let doc = MemoryDocument::new();
    for _ in 0..50 {
        let el = doc.append(body(&doc), "section");
        doc.set_background(el, WHITE);
    }

    let mut controller = Controller::new(doc.clone());
    controller.evaluate();
    assert_eq!(marked(&doc).len(), 50);

    // The page turns dark: the root now has an intentional background.
    doc.set_background(doc.html(), "rgb(18, 18, 18)");
    assert_eq!(controller.evaluate(), ActivationState::Inactive);

    assert!(marked(&doc).is_empty());
    assert_eq!(doc.attribute(doc.html(), ROOT_MARKER), None);
    assert_eq!(doc.observer_count(), 0);
    // Custom properties are allowed to linger.
    for layer in PaletteLayer::ALL {
        assert!(doc.custom_property(doc.html(), layer.custom_property()).is_some());
    }
}

#[test]
fn inactive_document_stays_unmarked_through_mutations() {
    let doc = MemoryDocument::new();
    doc.set_background(doc.html(), "rgb(18, 18, 18)");
    let mut controller = Controller::new(doc.clone());
    assert_eq!(controller.evaluate(), ActivationState::Inactive);

    let el = doc.append(body(&doc), "div");
    doc.set_background(el, WHITE);
    doc.set_attribute(&el, "class", "bright").expect("set attribute");
    doc.flush();
    assert_eq!(controller.process_pending(), 0);
    assert!(marked(&doc).is_empty());
}

#[test]
fn reactivation_after_restore() {
    let doc = MemoryDocument::new();
    doc.set_background(doc.html(), "rgb(18, 18, 18)");
    let el = doc.append(body(&doc), "div");
    doc.set_background(el, WHITE);

    let mut controller = Controller::new(doc.clone());
    assert_eq!(controller.evaluate(), ActivationState::Inactive);
    assert!(marked(&doc).is_empty());

    doc.set_background(doc.html(), WHITE);
    assert_eq!(controller.evaluate(), ActivationState::Active);
    assert_eq!(bg_marker(&doc, el).as_deref(), Some("panel"));
    assert!(controller.is_watching());
}

#[test]
fn stale_markers_are_removed_on_restyle() {
    let doc = MemoryDocument::new();
    let card = doc.append(body(&doc), "div");
    doc.set_background(card, WHITE);

    let mut controller = Controller::new(doc.clone());
    controller.evaluate();
    assert_eq!(bg_marker(&doc, card).as_deref(), Some("panel"));

    doc.set_background(card, "rgb(120, 180, 90)");
    doc.set_attribute(&card, "class", "green").expect("set attribute");
    doc.flush();
    controller.process_pending();
    assert!(marked(&doc).is_empty());
}

#[test]
fn marker_writes_do_not_feed_back() {
    let doc = MemoryDocument::new();
    let mut controller = Controller::new(doc.clone());
    controller.evaluate();

    let el = doc.append(body(&doc), "div");
    doc.set_background(el, WHITE);
    doc.flush();
    assert_eq!(controller.process_pending(), 1);

    // Adjusting wrote markers; none of them are observed.
    doc.flush();
    assert_eq!(controller.process_pending(), 0);
}
