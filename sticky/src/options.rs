use alloc::rc::Rc;
use core::fmt;
use core::str::FromStr;

use crate::StickChange;

/// A callback fired when the element sticks or unsticks.
///
/// It receives the new `{ top, bottom, sticked }` state and fires at most once per transition.
pub type OnStickCallback = Rc<dyn Fn(StickChange)>;

/// The z-index applied to the controlled element when the user does not pick one.
pub const DEFAULT_Z_INDEX: i32 = 10;

/// Which viewport edges the element may stick to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    #[default]
    Top,
    Bottom,
    Both,
}

impl Side {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Both => "both",
        }
    }

    pub const fn sticks_top(self) -> bool {
        matches!(self, Self::Top | Self::Both)
    }

    pub const fn sticks_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::Both)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of `top`, `bottom` or `both`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseSideError;

impl fmt::Display for ParseSideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of `top`, `bottom`, `both`")
    }
}

impl core::error::Error for ParseSideError {}

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "both" => Ok(Self::Both),
            _ => Err(ParseSideError),
        }
    }
}

/// Pixel distances from the viewport edges at which stickiness engages.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Offset {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
}

/// User-facing configuration of a sticky element.
///
/// Every field is optional. Unset fields fall back to global defaults (see
/// [`StickyConfig::merged_over`]) and then to the built-in defaults applied by
/// [`StickyOptions::from`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`; `on_stick` is
/// skipped.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StickyConfig {
    pub offset: Offset,
    pub side: Option<Side>,
    pub z_index: Option<i32>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub on_stick: Option<OnStickCallback>,
}

impl StickyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, top: Option<f64>, bottom: Option<f64>) -> Self {
        self.offset = Offset { top, bottom };
        self
    }

    pub fn with_top_offset(mut self, top: f64) -> Self {
        self.offset.top = Some(top);
        self
    }

    pub fn with_bottom_offset(mut self, bottom: f64) -> Self {
        self.offset.bottom = Some(bottom);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn with_on_stick(mut self, on_stick: Option<impl Fn(StickChange) + 'static>) -> Self {
        self.on_stick = on_stick.map(|f| Rc::new(f) as _);
        self
    }

    /// Fills every unset field from `defaults`.
    pub fn merged_over(self, defaults: &StickyConfig) -> Self {
        Self {
            offset: Offset {
                top: self.offset.top.or(defaults.offset.top),
                bottom: self.offset.bottom.or(defaults.offset.bottom),
            },
            side: self.side.or(defaults.side),
            z_index: self.z_index.or(defaults.z_index),
            on_stick: self.on_stick.or_else(|| defaults.on_stick.clone()),
        }
    }
}

impl fmt::Debug for StickyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyConfig")
            .field("offset", &self.offset)
            .field("side", &self.side)
            .field("z_index", &self.z_index)
            .field("on_stick", &self.on_stick.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Normalized, immutable options of a [`crate::Sticky`] instance.
#[derive(Clone)]
pub struct StickyOptions {
    top_offset: f64,
    bottom_offset: f64,
    should_top_sticky: bool,
    should_bottom_sticky: bool,
    z_index: i32,
    on_stick: Option<OnStickCallback>,
}

fn offset_or_zero(v: Option<f64>) -> f64 {
    v.filter(|v| v.is_finite()).unwrap_or(0.0)
}

impl From<StickyConfig> for StickyOptions {
    fn from(config: StickyConfig) -> Self {
        let side = config.side.unwrap_or_default();
        Self {
            top_offset: offset_or_zero(config.offset.top),
            bottom_offset: offset_or_zero(config.offset.bottom),
            should_top_sticky: side.sticks_top(),
            should_bottom_sticky: side.sticks_bottom(),
            z_index: config.z_index.unwrap_or(DEFAULT_Z_INDEX),
            on_stick: config.on_stick,
        }
    }
}

impl Default for StickyOptions {
    fn default() -> Self {
        Self::from(StickyConfig::default())
    }
}

impl StickyOptions {
    pub fn top_offset(&self) -> f64 {
        self.top_offset
    }

    pub fn bottom_offset(&self) -> f64 {
        self.bottom_offset
    }

    pub fn should_top_sticky(&self) -> bool {
        self.should_top_sticky
    }

    pub fn should_bottom_sticky(&self) -> bool {
        self.should_bottom_sticky
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn on_stick(&self) -> Option<&OnStickCallback> {
        self.on_stick.as_ref()
    }
}

impl fmt::Debug for StickyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyOptions")
            .field("top_offset", &self.top_offset)
            .field("bottom_offset", &self.bottom_offset)
            .field("should_top_sticky", &self.should_top_sticky)
            .field("should_bottom_sticky", &self.should_bottom_sticky)
            .field("z_index", &self.z_index)
            .finish_non_exhaustive()
    }
}
