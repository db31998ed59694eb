use alloc::string::ToString;
use core::fmt;

use crate::{GeometrySnapshot, Host, StickState, StickyOptions};

/// Class carried by every controlled element.
pub const ELEMENT_CLASS: &str = "vue-sticky-el";
/// Class carried by the placeholder.
pub const PLACEHOLDER_CLASS: &str = "vue-sticky-placeholder";
pub const TOP_STICKY_CLASS: &str = "top-sticky";
pub const BOTTOM_STICKY_CLASS: &str = "bottom-sticky";

/// Inline style properties written by the mutator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Position,
    Top,
    Bottom,
    Left,
    Width,
    ZIndex,
    PaddingTop,
}

impl StyleProperty {
    /// Properties removed from the controlled element on unbind.
    pub const ELEMENT: [StyleProperty; 6] = [
        StyleProperty::Position,
        StyleProperty::Top,
        StyleProperty::Bottom,
        StyleProperty::Left,
        StyleProperty::Width,
        StyleProperty::ZIndex,
    ];

    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Width => "width",
            Self::ZIndex => "z-index",
            Self::PaddingTop => "padding-top",
        }
    }
}

/// A CSS value as written into an inline style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CssValue {
    Keyword(&'static str),
    Px(f64),
    Integer(i32),
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(k) => f.write_str(k),
            Self::Px(v) => write!(f, "{v}px"),
            Self::Integer(v) => write!(f, "{v}"),
        }
    }
}

const AUTO: CssValue = CssValue::Keyword("auto");

/// The full set of style and class writes for one cycle.
///
/// Every cycle produces a complete patch (never a partial one), so applying it is idempotent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementPatch {
    pub element_style: [(StyleProperty, CssValue); 6],
    pub element_classes: [(&'static str, bool); 3],
    pub placeholder_style: [(StyleProperty, CssValue); 1],
    pub placeholder_classes: [(&'static str, bool); 1],
}

impl ElementPatch {
    pub fn element_value(&self, property: StyleProperty) -> Option<CssValue> {
        self.element_style
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }
}

/// Builds the patch for `state`.
///
/// When both flags are set, top stickiness wins.
pub fn compute_patch(
    snapshot: &GeometrySnapshot,
    state: StickState,
    options: &StickyOptions,
) -> ElementPatch {
    let top_offset = options.top_offset();
    let bottom_offset = options.bottom_offset();

    let mut position = CssValue::Keyword("static");
    let mut top = AUTO;
    let mut bottom = AUTO;
    let mut left = AUTO;
    let mut width = AUTO;
    let mut padding_top = CssValue::Px(0.0);

    if state.is_top_sticky {
        position = CssValue::Keyword("fixed");
        top = CssValue::Px(top_offset);
        left = CssValue::Px(snapshot.x_offset);
        width = CssValue::Px(snapshot.width);
        // Scroll off with the container instead of overflowing its bottom edge.
        let limit = snapshot.container.bottom() - snapshot.height - bottom_offset - top_offset;
        if limit < 0.0 {
            top = CssValue::Px(limit + top_offset);
        }
        padding_top = CssValue::Px(snapshot.height);
    } else if state.is_bottom_sticky {
        position = CssValue::Keyword("fixed");
        bottom = CssValue::Px(bottom_offset);
        left = CssValue::Px(snapshot.x_offset);
        width = CssValue::Px(snapshot.width);
        let limit = snapshot.viewport_height
            - snapshot.container.top
            - snapshot.height
            - bottom_offset
            - top_offset;
        if limit < 0.0 {
            bottom = CssValue::Px(limit + bottom_offset);
        }
        padding_top = CssValue::Px(snapshot.height);
    }

    let top_sticky = state.is_top_sticky;
    let bottom_sticky = !top_sticky && state.is_bottom_sticky;

    ElementPatch {
        element_style: [
            (StyleProperty::Position, position),
            (StyleProperty::Top, top),
            (StyleProperty::Bottom, bottom),
            (StyleProperty::Left, left),
            (StyleProperty::Width, width),
            (
                StyleProperty::ZIndex,
                CssValue::Integer(options.z_index()),
            ),
        ],
        element_classes: [
            (ELEMENT_CLASS, true),
            (TOP_STICKY_CLASS, top_sticky),
            (BOTTOM_STICKY_CLASS, bottom_sticky),
        ],
        placeholder_style: [(StyleProperty::PaddingTop, padding_top)],
        placeholder_classes: [(PLACEHOLDER_CLASS, true)],
    }
}

fn apply_to<H: Host>(
    host: &mut H,
    node: &H::Node,
    style: &[(StyleProperty, CssValue)],
    classes: &[(&'static str, bool)],
) {
    for (property, value) in style {
        host.set_style(node, property.css_name(), &value.to_string());
    }
    for &(class, wanted) in classes {
        let present = host.has_class(node, class);
        if wanted && !present {
            host.add_class(node, class);
        } else if !wanted && present {
            host.remove_class(node, class);
        }
    }
}

/// Writes `patch` to the element and, when present, the placeholder.
///
/// All style properties are written first; classes are only touched when their membership has
/// to change.
pub fn apply_patch<H: Host>(
    host: &mut H,
    element: &H::Node,
    placeholder: Option<&H::Node>,
    patch: &ElementPatch,
) {
    apply_to(host, element, &patch.element_style, &patch.element_classes);
    if let Some(placeholder) = placeholder {
        apply_to(
            host,
            placeholder,
            &patch.placeholder_style,
            &patch.placeholder_classes,
        );
    }
}

/// Restores the element to its pre-bind inline state and detaches the placeholder.
pub fn reset_element<H: Host>(host: &mut H, element: &H::Node, placeholder: Option<&H::Node>) {
    for property in StyleProperty::ELEMENT {
        host.remove_style(element, property.css_name());
    }
    host.remove_class(element, BOTTOM_STICKY_CLASS);
    host.remove_class(element, TOP_STICKY_CLASS);

    if let Some(placeholder) = placeholder {
        if host.parent_element(placeholder).is_some() {
            host.remove(placeholder);
        }
    }
}
