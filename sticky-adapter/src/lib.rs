//! Directive adapter for the `sticky` crate.
//!
//! The `sticky` crate owns the sticky state machine and its DOM writes. This crate is the thin
//! framework boundary around it:
//!
//! - A hook-name table per framework major ([`HookTable`], [`FrameworkVersion`])
//! - A per-element instance side-table driven by lifecycle hooks ([`StickyDirective`])
//! - Install-once plugin registration ([`StickyPlugin`])
//!
//! This crate is framework-agnostic: the framework binding forwards its hook calls here.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod directive;
mod hooks;
mod key;
mod plugin;


pub use directive::{DirectiveValue, StickyDirective};
pub use hooks::{FrameworkVersion, HookTable, LifecycleHook};
pub use key::DirectiveKey;
pub use plugin::{DIRECTIVE_NAME, DirectiveRegistry, StickyPlugin};
