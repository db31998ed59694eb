use crate::Host;

/// A viewport-relative bounding box, as reported by `getBoundingClientRect()`.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Returns the same rect moved vertically by `dy` (negative moves it up).
    pub fn translated(self, dy: f64) -> Self {
        Self {
            top: self.top + dy,
            ..self
        }
    }
}

/// Geometry measured at the start of an update cycle.
///
/// A snapshot is always taken whole, before any style is written for that cycle, so the state
/// machine and the mutator never observe a half-updated layout.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometrySnapshot {
    /// Height of the controlled element.
    pub height: f64,
    /// Width of the reserved slot (taken from the placeholder).
    pub width: f64,
    /// Horizontal offset of the reserved slot (taken from the placeholder).
    pub x_offset: f64,
    pub placeholder: ClientRect,
    pub container: ClientRect,
    pub viewport_height: f64,
}

/// Reads a fresh snapshot from the host.
///
/// Returns `None` when the placeholder or the container is not available yet; the caller skips
/// the cycle in that case.
pub fn read_snapshot<H: Host>(
    host: &H,
    element: &H::Node,
    placeholder: Option<&H::Node>,
    container: Option<&H::Node>,
) -> Option<GeometrySnapshot> {
    let (placeholder, container) = (placeholder?, container?);
    let placeholder = host.bounding_rect(placeholder);
    let container = host.bounding_rect(container);
    let height = host.bounding_rect(element).height;
    Some(GeometrySnapshot {
        height,
        width: placeholder.width,
        x_offset: placeholder.left,
        placeholder,
        container,
        viewport_height: host.viewport_height(),
    })
}
