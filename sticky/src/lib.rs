//! A headless sticky-positioning engine.
//!
//! For framework directive glue (lifecycle hook tables, per-element instances, plugin install),
//! see the `sticky-adapter` crate.
//!
//! The core decides, from measured geometry, whether an element should be pinned to the top or
//! bottom of the viewport while its scroll container is in view, and writes the resulting inline
//! styles and classes:
//! - the geometry reader takes a [`GeometrySnapshot`] of element, placeholder and container
//! - the state machine ([`is_top_sticky`], [`is_bottom_sticky`]) turns it into a [`StickState`]
//! - the mutator ([`compute_patch`], [`apply_patch`]) writes styles and classes idempotently
//! - the [`Sticky`] controller owns bind/update/unbind and frame coalescing
//!
//! It is UI-agnostic. A document layer implements [`Host`] and provides:
//! - bounding rects and viewport height
//! - inline style, class and attribute access
//! - passive event listeners, a next-tick queue and animation frames
//!
//! [`headless::HeadlessDom`] is an in-memory host for tests and simulations. With
//! `feature = "web"` on `wasm32`, `web::WebHost` drives a real browser document.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod geometry;
mod host;
mod options;
mod patch;
mod state;

pub mod headless;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

#[cfg(test)]
mod tests;

pub use controller::{CONTAINER_ATTRIBUTE, Sticky, resolve_container};
pub use geometry::{ClientRect, GeometrySnapshot, read_snapshot};
pub use host::{Handler, Host, ListenTarget, StickyEvent, Task, Unsubscribe};
pub use options::{
    DEFAULT_Z_INDEX, OnStickCallback, Offset, ParseSideError, Side, StickyConfig, StickyOptions,
};
pub use patch::{
    BOTTOM_STICKY_CLASS, CssValue, ELEMENT_CLASS, ElementPatch, PLACEHOLDER_CLASS, StyleProperty,
    TOP_STICKY_CLASS, apply_patch, compute_patch, reset_element,
};
pub use state::{StickChange, StickState, is_bottom_sticky, is_top_sticky};
