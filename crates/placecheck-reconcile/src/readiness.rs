//! Per-provider readiness tracking.
//!
//! Each provider's SDK loads independently and asynchronously; each surface
//! container mounts and unmounts with the result view. The two signals are
//! independent state cells, and readiness is their pure conjunction with no
//! cross-provider coupling.

/// Which of the two map providers a gate, binding, or event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderSide {
    /// The provider whose coordinate may be stale.
    Primary,
    /// The independent provider used to corroborate or refute the primary.
    Secondary,
}

impl std::fmt::Display for ProviderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderSide::Primary => write!(f, "primary"),
            ProviderSide::Secondary => write!(f, "secondary"),
        }
    }
}

/// Tracks whether one provider can render: its SDK script has executed and
/// its container element is mounted.
///
/// `sdk_loaded` transitions `false → true` exactly once and never resets:
/// a loaded script stays loaded for the life of the session. Container
/// readiness is tracked separately and *can* drop back to `false` when the
/// result view unmounts.
#[derive(Debug, Clone, Default)]
pub struct ReadinessGate {
    sdk_loaded: bool,
    container_mounted: bool,
}

impl ReadinessGate {
    /// Record the external "script loaded" signal. Idempotent: repeated
    /// signals are absorbed.
    pub fn signal_sdk_loaded(&mut self) {
        self.sdk_loaded = true;
    }

    pub fn set_container_mounted(&mut self, mounted: bool) {
        self.container_mounted = mounted;
    }

    #[must_use]
    pub fn sdk_loaded(&self) -> bool {
        self.sdk_loaded
    }

    #[must_use]
    pub fn ready(&self) -> bool {
        self.sdk_loaded && self.container_mounted
    }
}
