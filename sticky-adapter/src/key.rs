#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Stable identity of a directive's element, used to key the instance side-table.
#[cfg(feature = "std")]
pub trait DirectiveKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<T: core::hash::Hash + Eq> DirectiveKey for T {}

/// Stable identity of a directive's element, used to key the instance side-table.
#[cfg(not(feature = "std"))]
pub trait DirectiveKey: Ord {}
#[cfg(not(feature = "std"))]
impl<T: Ord> DirectiveKey for T {}

#[cfg(feature = "std")]
pub(crate) type InstanceMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type InstanceMap<K, V> = BTreeMap<K, V>;
