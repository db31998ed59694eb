use core::fmt;

use sticky::{Host, Sticky, StickyConfig};

use crate::key::InstanceMap;
use crate::{DirectiveKey, FrameworkVersion, HookTable, LifecycleHook};

/// The value bound to the directive (`v-sticky="..."`).
///
/// `Absent` and `Enabled` both activate stickiness; only `Disabled` (a falsy binding) turns it
/// off.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DirectiveValue {
    /// No value bound (`v-sticky`).
    #[default]
    Absent,
    /// A falsy binding.
    Disabled,
    Enabled(StickyConfig),
}

impl DirectiveValue {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    fn into_config(self) -> StickyConfig {
        match self {
            Self::Enabled(config) => config,
            Self::Absent | Self::Disabled => StickyConfig::default(),
        }
    }
}

impl From<bool> for DirectiveValue {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Enabled(StickyConfig::default())
        } else {
            Self::Disabled
        }
    }
}

impl From<StickyConfig> for DirectiveValue {
    fn from(config: StickyConfig) -> Self {
        Self::Enabled(config)
    }
}

impl From<Option<StickyConfig>> for DirectiveValue {
    fn from(config: Option<StickyConfig>) -> Self {
        config.map_or(Self::Absent, Self::Enabled)
    }
}

/// The sticky directive: one [`Sticky`] per element, created and destroyed with the element's
/// lifecycle.
///
/// Instances live in a side-table keyed by a stable element key `K` (the framework does not own
/// them). An entry is removed when its element unmounts or its binding turns falsy.
pub struct StickyDirective<H: Host, K> {
    host: H,
    defaults: StickyConfig,
    hooks: HookTable,
    instances: InstanceMap<K, Sticky<H>>,
}

impl<H: Host + Clone, K: DirectiveKey> StickyDirective<H, K> {
    pub fn new(host: H, version: FrameworkVersion) -> Self {
        Self {
            host,
            defaults: StickyConfig::default(),
            hooks: HookTable::for_version(version),
            instances: InstanceMap::new(),
        }
    }

    /// Sets global defaults; per-binding values take precedence.
    pub fn with_defaults(mut self, defaults: StickyConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &StickyConfig {
        &self.defaults
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    pub fn get(&self, key: &K) -> Option<&Sticky<H>> {
        self.instances.get(key)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn create(&self, element: H::Node, value: DirectiveValue) -> Sticky<H> {
        let config = value.into_config().merged_over(&self.defaults);
        Sticky::new(self.host.clone(), element, config)
    }

    /// The element was inserted: create and bind an instance when the binding is active.
    pub fn mounted(&mut self, key: K, element: H::Node, value: DirectiveValue) {
        if !value.is_active() {
            return;
        }
        let sticky = self.create(element, value);
        sticky.bind();
        if let Some(previous) = self.instances.insert(key, sticky) {
            previous.unbind();
        }
        adebug!(instances = self.instances.len(), "StickyDirective::mounted");
    }

    /// The owning component re-rendered.
    ///
    /// An active binding creates the instance if needed and re-asserts `bind`; a falsy binding
    /// destroys the instance.
    pub fn updated(&mut self, key: K, element: H::Node, value: DirectiveValue) {
        if value.is_active() {
            if let Some(sticky) = self.instances.get(&key) {
                sticky.bind();
                return;
            }
            let sticky = self.create(element, value);
            sticky.bind();
            self.instances.insert(key, sticky);
            adebug!(instances = self.instances.len(), "StickyDirective::updated: created");
        } else if let Some(sticky) = self.instances.remove(&key) {
            sticky.unbind();
            adebug!(instances = self.instances.len(), "StickyDirective::updated: destroyed");
        }
    }

    /// The element is being removed.
    pub fn unmounted(&mut self, key: &K) {
        if let Some(sticky) = self.instances.remove(key) {
            sticky.unbind();
            adebug!(instances = self.instances.len(), "StickyDirective::unmounted");
        }
    }

    /// Runs the handler registered under `hook_name` in this framework version's hook table.
    ///
    /// Returns the resolved hook, or `None` for names the directive does not handle.
    pub fn dispatch(
        &mut self,
        hook_name: &str,
        key: K,
        element: H::Node,
        value: DirectiveValue,
    ) -> Option<LifecycleHook> {
        let hook = self.hooks.resolve(hook_name)?;
        match hook {
            LifecycleHook::Mounted => self.mounted(key, element, value),
            LifecycleHook::Updated => self.updated(key, element, value),
            LifecycleHook::Unmounted => self.unmounted(&key),
        }
        Some(hook)
    }

    /// Unbinds and drops every instance.
    pub fn clear(&mut self) {
        for sticky in core::mem::take(&mut self.instances).into_values() {
            sticky.unbind();
        }
    }
}

impl<H: Host, K> fmt::Debug for StickyDirective<H, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyDirective")
            .field("defaults", &self.defaults)
            .field("hooks", &self.hooks)
            .field("instances", &self.instances.len())
            .finish_non_exhaustive()
    }
}
