use sticky::{Host, StickyConfig};

use crate::{DirectiveKey, FrameworkVersion, StickyDirective};

/// Name the directive is registered under.
pub const DIRECTIVE_NAME: &str = "v-sticky";

/// Something that accepts directive registrations (an application instance).
pub trait DirectiveRegistry<H: Host, K> {
    fn directive(&mut self, name: &'static str, directive: StickyDirective<H, K>);
}

/// Install-once plugin wrapper around [`StickyDirective`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StickyPlugin {
    installed: bool,
}

impl StickyPlugin {
    pub const fn new() -> Self {
        Self { installed: false }
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Registers the directive under [`DIRECTIVE_NAME`].
    ///
    /// Only the first call registers anything; later calls return `false`.
    pub fn install<H, K, R>(
        &mut self,
        registry: &mut R,
        host: H,
        version: FrameworkVersion,
        defaults: StickyConfig,
    ) -> bool
    where
        H: Host + Clone,
        K: DirectiveKey,
        R: DirectiveRegistry<H, K>,
    {
        if self.installed {
            return false;
        }
        self.installed = true;
        adebug!(%version, "StickyPlugin::install");
        registry.directive(
            DIRECTIVE_NAME,
            StickyDirective::new(host, version).with_defaults(defaults),
        );
        true
    }
}
