use dawn_contrast_protocol::{BgRole, FLAG_ON, LIGHT_TEXT_VALUE, Marker};
use serde::{Deserialize, Serialize};

use crate::classify::{is_dark_background, is_harsh_bright_neutral, is_very_light_text};
use crate::color;
use crate::dom::{ComputedStyle, Dom, DomResult, ElementKind};

/// The four marker decisions for one element, recomputed on every adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Classification {
    /// Set when the background is harsh, tagged with the surface role.
    pub harsh_bg: Option<BgRole>,
    pub light_text: bool,
    pub harsh_border: bool,
    pub dark_bg: bool,
}

impl Classification {
    /// Each marker paired with the value to write, or `None` to clear it.
    pub fn markers(&self) -> [(Marker, Option<&'static str>); 4] {
        let flag = |on: bool| on.then_some(FLAG_ON);
        [
            (Marker::HarshBackground, self.harsh_bg.map(BgRole::as_str)),
            (
                Marker::LightText,
                self.light_text.then_some(LIGHT_TEXT_VALUE),
            ),
            (Marker::HarshBorder, flag(self.harsh_border)),
            (Marker::DarkBackground, flag(self.dark_bg)),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.markers().iter().all(|(_, value)| value.is_none())
    }
}

/// Which surface a harsh background belongs to.
///
/// A box shadow counts as an interactive affordance, so shadowed panels are
/// reported as controls too.
pub fn background_role(kind: ElementKind, is_root_or_body: bool, style: &ComputedStyle) -> BgRole {
    if is_root_or_body {
        return BgRole::Base;
    }
    match kind {
        ElementKind::Control => BgRole::Control,
        _ if style.has_box_shadow() => BgRole::Control,
        _ => BgRole::Panel,
    }
}

pub fn classify(kind: ElementKind, is_root_or_body: bool, style: &ComputedStyle) -> Classification {
    classify_with(kind, style, || is_root_or_body)
}

/// `is_root_or_body` is only consulted once a background is known to be harsh.
fn classify_with(
    kind: ElementKind,
    style: &ComputedStyle,
    is_root_or_body: impl FnOnce() -> bool,
) -> Classification {
    let bg = color::parse(&style.background_color);
    let fg = color::parse(&style.color);
    let border = color::parse(&style.border_top_color);

    Classification {
        harsh_bg: is_harsh_bright_neutral(bg.as_ref())
            .then(|| background_role(kind, is_root_or_body(), style)),
        light_text: is_very_light_text(fg.as_ref()),
        harsh_border: is_harsh_bright_neutral(border.as_ref()),
        dark_bg: is_dark_background(bg.as_ref()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Non-visual element; left untouched, existing markers included.
    Skipped,
    Evaluated(Classification),
}

/// Re-evaluate one element and bring its markers in line with the result.
pub fn adjust<D: Dom>(dom: &D, element: &D::Element) -> DomResult<Adjustment> {
    let kind = dom.element_kind(element);
    if kind == ElementKind::NonVisual {
        return Ok(Adjustment::Skipped);
    }

    let style = dom.computed_style(element);
    let classification = classify_with(kind, &style, || dom.is_root_or_body(element));

    // Every marker gets its write even if an earlier one failed.
    let mut first_error = None;
    for (marker, value) in classification.markers() {
        let name = marker.attribute();
        let result = match value {
            Some(value) => dom.set_attribute(element, name, value),
            None if dom.has_attribute(element, name) => dom.remove_attribute(element, name),
            None => Ok(()),
        };
        if let Err(err) = result {
            if first_error.is_some() {
                tracing::warn!(%err, "failed to update marker");
            } else {
                first_error = Some(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(Adjustment::Evaluated(classification)),
    }
}
