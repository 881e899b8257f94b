//! Capability flags
//!
//! The closed set of security-relevant preferences that decide how much
//! privilege a guest window's content gets. Each flag has a designated safe
//! value; a parent holding a flag at its safe value passes it on to every
//! window it opens, whatever the feature string asked for.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::features::FeatureValue;
use crate::foundation::collections::SurfaceId;

/// A security-relevant capability flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Content runs in an isolated script context
    ContextIsolation,
    /// Scripting is enabled
    Javascript,
    /// `window.open` creates native windows
    NativeWindowOpen,
    /// Privileged platform APIs are exposed to content
    NodeIntegration,
    /// The remote module is reachable from content
    EnableRemoteModule,
    /// Content is sandboxed
    Sandbox,
    /// The embedding tag is available
    WebviewTag,
    /// Sub-frames get the same privileged APIs
    NodeIntegrationInSubFrames,
}

impl Capability {
    /// Every capability, in declaration order
    pub const ALL: [Self; 8] = [
        Self::ContextIsolation,
        Self::Javascript,
        Self::NativeWindowOpen,
        Self::NodeIntegration,
        Self::EnableRemoteModule,
        Self::Sandbox,
        Self::WebviewTag,
        Self::NodeIntegrationInSubFrames,
    ];

    /// Feature-string / preference key
    pub const fn key(self) -> &'static str {
        match self {
            Self::ContextIsolation => "contextIsolation",
            Self::Javascript => "javascript",
            Self::NativeWindowOpen => "nativeWindowOpen",
            Self::NodeIntegration => "nodeIntegration",
            Self::EnableRemoteModule => "enableRemoteModule",
            Self::Sandbox => "sandbox",
            Self::WebviewTag => "webviewTag",
            Self::NodeIntegrationInSubFrames => "nodeIntegrationInSubFrames",
        }
    }

    /// Look up a capability by its exact (case-sensitive) key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|capability| capability.key() == key)
    }

    /// The value a parent passes on unconditionally
    pub const fn safe_value(self) -> bool {
        match self {
            Self::ContextIsolation | Self::NativeWindowOpen | Self::Sandbox => true,
            Self::Javascript
            | Self::NodeIntegration
            | Self::EnableRemoteModule
            | Self::WebviewTag
            | Self::NodeIntegrationInSubFrames => false,
        }
    }

    /// Single-flag mask
    pub const fn bit(self) -> CapabilitySet {
        match self {
            Self::ContextIsolation => CapabilitySet::CONTEXT_ISOLATION,
            Self::Javascript => CapabilitySet::JAVASCRIPT,
            Self::NativeWindowOpen => CapabilitySet::NATIVE_WINDOW_OPEN,
            Self::NodeIntegration => CapabilitySet::NODE_INTEGRATION,
            Self::EnableRemoteModule => CapabilitySet::ENABLE_REMOTE_MODULE,
            Self::Sandbox => CapabilitySet::SANDBOX,
            Self::WebviewTag => CapabilitySet::WEBVIEW_TAG,
            Self::NodeIntegrationInSubFrames => CapabilitySet::NODE_INTEGRATION_IN_SUB_FRAMES,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

bitflags::bitflags! {
    /// A set of capabilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CapabilitySet: u8 {
        /// [`Capability::ContextIsolation`]
        const CONTEXT_ISOLATION = 1 << 0;
        /// [`Capability::Javascript`]
        const JAVASCRIPT = 1 << 1;
        /// [`Capability::NativeWindowOpen`]
        const NATIVE_WINDOW_OPEN = 1 << 2;
        /// [`Capability::NodeIntegration`]
        const NODE_INTEGRATION = 1 << 3;
        /// [`Capability::EnableRemoteModule`]
        const ENABLE_REMOTE_MODULE = 1 << 4;
        /// [`Capability::Sandbox`]
        const SANDBOX = 1 << 5;
        /// [`Capability::WebviewTag`]
        const WEBVIEW_TAG = 1 << 6;
        /// [`Capability::NodeIntegrationInSubFrames`]
        const NODE_INTEGRATION_IN_SUB_FRAMES = 1 << 7;
    }
}

impl CapabilitySet {
    /// Capabilities in this set, in declaration order
    pub fn capabilities(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |capability| self.contains(capability.bit()))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, capability| set | capability.bit())
    }
}

/// Capability flags and related content preferences of a surface
///
/// Every field is optional so the struct doubles as a partial layer in a
/// merge: `None` means "this layer has no opinion".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapabilityFlags {
    /// [`Capability::ContextIsolation`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_isolation: Option<bool>,
    /// [`Capability::Javascript`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javascript: Option<bool>,
    /// [`Capability::NativeWindowOpen`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_window_open: Option<bool>,
    /// [`Capability::NodeIntegration`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_integration: Option<bool>,
    /// [`Capability::EnableRemoteModule`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_remote_module: Option<bool>,
    /// [`Capability::Sandbox`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<bool>,
    /// [`Capability::WebviewTag`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webview_tag: Option<bool>,
    /// [`Capability::NodeIntegrationInSubFrames`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_integration_in_sub_frames: Option<bool>,
    /// Surface that opened this one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opener_id: Option<SurfaceId>,
    /// Other content preferences, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, FeatureValue>,
}

impl CapabilityFlags {
    /// Every flag at its safe value
    pub fn secure_defaults() -> Self {
        let mut flags = Self::default();
        for capability in Capability::ALL {
            flags.set(capability, Some(capability.safe_value()));
        }
        flags
    }

    /// Builder-style [`CapabilityFlags::set`]
    pub fn with(mut self, capability: Capability, value: bool) -> Self {
        self.set(capability, Some(value));
        self
    }

    /// Value of a flag, if this layer sets it
    pub const fn get(&self, capability: Capability) -> Option<bool> {
        match capability {
            Capability::ContextIsolation => self.context_isolation,
            Capability::Javascript => self.javascript,
            Capability::NativeWindowOpen => self.native_window_open,
            Capability::NodeIntegration => self.node_integration,
            Capability::EnableRemoteModule => self.enable_remote_module,
            Capability::Sandbox => self.sandbox,
            Capability::WebviewTag => self.webview_tag,
            Capability::NodeIntegrationInSubFrames => self.node_integration_in_sub_frames,
        }
    }

    /// Set or clear a flag
    pub fn set(&mut self, capability: Capability, value: Option<bool>) {
        let slot = match capability {
            Capability::ContextIsolation => &mut self.context_isolation,
            Capability::Javascript => &mut self.javascript,
            Capability::NativeWindowOpen => &mut self.native_window_open,
            Capability::NodeIntegration => &mut self.node_integration,
            Capability::EnableRemoteModule => &mut self.enable_remote_module,
            Capability::Sandbox => &mut self.sandbox,
            Capability::WebviewTag => &mut self.webview_tag,
            Capability::NodeIntegrationInSubFrames => &mut self.node_integration_in_sub_frames,
        };
        *slot = value;
    }

    /// Flags currently held at their safe value
    pub fn pinned(&self) -> CapabilitySet {
        Capability::ALL
            .into_iter()
            .filter(|capability| self.get(*capability) == Some(capability.safe_value()))
            .collect()
    }

    /// Only the flags held at their safe value, nothing else
    pub fn safe_baseline(&self) -> Self {
        let mut baseline = Self::default();
        for capability in self.pinned().capabilities() {
            baseline.set(capability, Some(capability.safe_value()));
        }
        baseline
    }

    /// Everything a child inherits: the flags and extra preferences, but
    /// not the opener
    pub fn inheritable(&self) -> Self {
        Self {
            opener_id: None,
            ..self.clone()
        }
    }

    /// Lay `other` on top of `self`: every value `other` sets wins
    pub fn overlay(&mut self, other: &Self) {
        for capability in Capability::ALL {
            if let Some(value) = other.get(capability) {
                self.set(capability, Some(value));
            }
        }
        if other.opener_id.is_some() {
            self.opener_id = other.opener_id;
        }
        self.extra.extend(other.extra.iter().map(|(key, value)| (key.clone(), value.clone())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for capability in Capability::ALL {
            assert_eq!(Capability::from_key(capability.key()), Some(capability));
        }
        assert_eq!(Capability::from_key("NodeIntegration"), None);
        assert_eq!(Capability::from_key("preload"), None);
    }

    #[test]
    fn test_safe_values() {
        assert!(Capability::ContextIsolation.safe_value());
        assert!(Capability::Sandbox.safe_value());
        assert!(Capability::NativeWindowOpen.safe_value());
        assert!(!Capability::NodeIntegration.safe_value());
        assert!(!Capability::Javascript.safe_value());
    }

    #[test]
    fn test_secure_defaults_pin_everything() {
        assert_eq!(CapabilityFlags::secure_defaults().pinned(), CapabilitySet::all());
    }

    #[test]
    fn test_safe_baseline_keeps_only_safe_values() {
        let parent = CapabilityFlags::default()
            .with(Capability::Sandbox, true)
            .with(Capability::NodeIntegration, true)
            .with(Capability::ContextIsolation, false);

        let baseline = parent.safe_baseline();
        assert_eq!(baseline.sandbox, Some(true));
        assert_eq!(baseline.node_integration, None);
        assert_eq!(baseline.context_isolation, None);
        assert_eq!(baseline.pinned(), CapabilitySet::SANDBOX);
    }

    #[test]
    fn test_inheritable_keeps_extras_but_not_opener() {
        let mut parent = CapabilityFlags::secure_defaults();
        parent.opener_id = Some(SurfaceId::new(7));
        parent.extra.insert("partition".to_string(), FeatureValue::from("persist:a"));

        let inherited = parent.inheritable();
        assert_eq!(inherited.opener_id, None);
        assert_eq!(inherited.sandbox, Some(true));
        assert_eq!(inherited.extra.get("partition"), Some(&FeatureValue::from("persist:a")));
    }

    #[test]
    fn test_overlay_only_replaces_set_values() {
        let mut base = CapabilityFlags::default().with(Capability::Sandbox, true);
        base.extra.insert("preload".into(), "a.js".into());
        let mut top = CapabilityFlags::default().with(Capability::Javascript, false);
        top.extra.insert("zoomFactor".into(), 2.0.into());

        base.overlay(&top);
        assert_eq!(base.sandbox, Some(true));
        assert_eq!(base.javascript, Some(false));
        assert_eq!(base.extra.len(), 2);
    }

    #[test]
    fn test_capability_set_iterates_in_order() {
        let set = CapabilitySet::SANDBOX | CapabilitySet::CONTEXT_ISOLATION;
        let listed: Vec<_> = set.capabilities().collect();
        assert_eq!(listed, vec![Capability::ContextIsolation, Capability::Sandbox]);
    }

    #[test]
    fn test_serializes_with_preference_keys() {
        let flags = CapabilityFlags::default()
            .with(Capability::NodeIntegrationInSubFrames, false)
            .with(Capability::WebviewTag, false);
        let text = toml::to_string(&flags).unwrap();
        assert!(text.contains("nodeIntegrationInSubFrames = false"));
        assert!(text.contains("webviewTag = false"));
    }
}
