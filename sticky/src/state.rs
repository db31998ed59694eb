use crate::{GeometrySnapshot, StickyOptions};

/// Whether the placeholder has scrolled past the top offset while the container still reaches
/// the bottom offset line.
///
/// Always `false` when top stickiness is disabled.
pub fn is_top_sticky(snapshot: &GeometrySnapshot, options: &StickyOptions) -> bool {
    if !options.should_top_sticky() {
        return false;
    }
    let from_top = snapshot.placeholder.top;
    let from_bottom = snapshot.container.bottom();
    from_top <= options.top_offset() && from_bottom >= options.bottom_offset()
}

/// Mirror of [`is_top_sticky`] in bottom-anchored coordinates.
///
/// Always `false` when bottom stickiness is disabled.
pub fn is_bottom_sticky(snapshot: &GeometrySnapshot, options: &StickyOptions) -> bool {
    if !options.should_bottom_sticky() {
        return false;
    }
    let from_bottom = snapshot.viewport_height - snapshot.placeholder.top - snapshot.height;
    let from_top = snapshot.viewport_height - snapshot.container.top;
    from_bottom <= options.bottom_offset() && from_top >= options.top_offset()
}

/// The sticky decision for one snapshot.
///
/// Both flags are evaluated independently; a narrow container with large offsets can set both.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StickState {
    pub is_top_sticky: bool,
    pub is_bottom_sticky: bool,
}

impl StickState {
    pub fn evaluate(snapshot: &GeometrySnapshot, options: &StickyOptions) -> Self {
        Self {
            is_top_sticky: is_top_sticky(snapshot, options),
            is_bottom_sticky: is_bottom_sticky(snapshot, options),
        }
    }

    pub fn sticked(&self) -> bool {
        self.is_top_sticky || self.is_bottom_sticky
    }
}

/// Payload of the `on_stick` callback.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StickChange {
    pub top: bool,
    pub bottom: bool,
    pub sticked: bool,
}

impl From<StickState> for StickChange {
    fn from(state: StickState) -> Self {
        Self {
            top: state.is_top_sticky,
            bottom: state.is_bottom_sticky,
            sticked: state.sticked(),
        }
    }
}

/// Remembers the last state reported through `on_stick`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct LastFired(StickChange);

impl LastFired {
    /// Records `state` and returns it when it differs from the last reported one.
    pub(crate) fn transition(&mut self, state: StickState) -> Option<StickChange> {
        let next = StickChange::from(state);
        if next == self.0 {
            return None;
        }
        self.0 = next;
        Some(next)
    }
}
