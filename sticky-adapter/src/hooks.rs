use core::fmt;

/// Lifecycle points the directive reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecycleHook {
    /// The element was inserted into the document.
    Mounted,
    /// The owning component re-rendered.
    Updated,
    /// The element is being removed.
    Unmounted,
}

/// Major version of the host framework; the two majors name their directive hooks differently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameworkVersion {
    V2,
    #[default]
    V3,
}

impl FrameworkVersion {
    pub fn from_major(major: u32) -> Option<Self> {
        match major {
            2 => Some(Self::V2),
            3 => Some(Self::V3),
            _ => None,
        }
    }

    /// Parses the major out of a version string such as `"3.4.21"` or `"v2.7.16"`.
    pub fn from_version_str(version: &str) -> Option<Self> {
        let version = version.trim();
        let version = version.strip_prefix('v').unwrap_or(version);
        let major = version.split('.').next()?.parse().ok()?;
        Self::from_major(major)
    }
}

impl fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2 => f.write_str("2"),
            Self::V3 => f.write_str("3"),
        }
    }
}

/// Maps framework hook names to [`LifecycleHook`] slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HookTable {
    version: FrameworkVersion,
    entries: [(&'static str, LifecycleHook); 3],
}

impl HookTable {
    pub const fn for_version(version: FrameworkVersion) -> Self {
        let entries = match version {
            FrameworkVersion::V2 => [
                ("inserted", LifecycleHook::Mounted),
                ("componentUpdated", LifecycleHook::Updated),
                ("unbind", LifecycleHook::Unmounted),
            ],
            FrameworkVersion::V3 => [
                ("mounted", LifecycleHook::Mounted),
                ("updated", LifecycleHook::Updated),
                ("unmounted", LifecycleHook::Unmounted),
            ],
        };
        Self { version, entries }
    }

    pub fn version(&self) -> FrameworkVersion {
        self.version
    }

    /// Resolves a framework hook name. Unknown names (e.g. `beforeMount`) return `None`.
    pub fn resolve(&self, name: &str) -> Option<LifecycleHook> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, hook)| *hook)
    }

    /// The framework's name for `hook`.
    pub fn name_of(&self, hook: LifecycleHook) -> &'static str {
        self.entries
            .iter()
            .find(|(_, h)| *h == hook)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, LifecycleHook)> + '_ {
        self.entries.iter().copied()
    }
}

impl Default for HookTable {
    fn default() -> Self {
        Self::for_version(FrameworkVersion::default())
    }
}
