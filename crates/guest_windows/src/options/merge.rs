//! Security-aware options merge
//!
//! Two independent merges produce a [`CreationDescriptor`]:
//!
//! 1. General options, lowest precedence first:
//!    configured defaults, the host window's options (legacy inheritance
//!    only), the feature string, the trusted caller's overrides.
//! 2. Capability flags, lowest precedence first:
//!    the parent's resolved preferences (flags and extra keys such as
//!    `partition`), the feature string, the parent's safe baseline, the
//!    trusted caller's overrides.
//!
//! Putting the safe baseline above the feature string is what keeps
//! untrusted content from loosening a flag its parent holds at the safe
//! value. The opener identity is stamped last.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Capability, CapabilityFlags, CapabilitySet, WindowOptions};
use crate::core::config::WindowDefaults;
use crate::features::{FeatureValue, ParsedFeatures};
use crate::foundation::collections::SurfaceId;

/// Host option that is never passed on to a child
const NON_INHERITABLE_OPTION: &str = "type";

/// What the merge needs to know about the host surface
#[derive(Debug, Clone, PartialEq)]
pub struct HostState {
    /// Host identity, becomes the child's opener
    pub id: SurfaceId,
    /// The host's resolved capability flags
    pub capabilities: CapabilityFlags,
    /// Options the host window was last configured with, `None` when the
    /// host is not a top-level window
    pub last_options: Option<WindowOptions>,
    /// Live visibility of the host's window, `None` when no window backs it
    pub window_visibility: Option<bool>,
}

/// Everything one merge consumes
#[derive(Debug, Clone, Copy)]
pub struct MergeInputs<'a> {
    /// The opening surface
    pub host: &'a HostState,
    /// Parsed feature string
    pub features: &'a ParsedFeatures,
    /// Requested frame name, may be empty
    pub frame_name: &'a str,
    /// Trusted caller overrides
    pub overrides: Option<&'a WindowOptions>,
    /// Configured defaults
    pub defaults: &'a WindowDefaults,
    /// Whether the host window's options are inherited
    pub inherit_parent_options: bool,
}

/// Final configuration handed to the backend to create a window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationDescriptor {
    /// Merged options, including merged capability flags and the opener
    pub options: WindowOptions,
    /// Bare feature keys collected in legacy mode
    pub additional_features: Vec<String>,
    /// Capability flags the feature string tried to loosen but could not
    pub suppressed: Vec<Capability>,
    /// Content the calling convention already built, for the backend to
    /// wrap instead of creating new content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adopted_content: Option<SurfaceId>,
}

impl CreationDescriptor {
    /// Run both merges
    pub fn build(inputs: &MergeInputs<'_>) -> Self {
        let defaults = defaults_layer(inputs);
        let inherited = inputs
            .inherit_parent_options
            .then(|| inherited_layer(inputs.host))
            .flatten()
            .unwrap_or_default();
        let parsed = WindowOptions::from_features(&inputs.features.options);
        let overrides = inputs.overrides.map(without_preferences).unwrap_or_default();

        let mut options = WindowOptions::layered([&defaults, &inherited, &parsed, &overrides]);

        let (mut web_preferences, suppressed) = merge_capability_flags(
            &inputs.host.capabilities,
            &inputs.features.capability_flags,
            inputs.overrides.map(|overrides| &overrides.web_preferences),
        );
        web_preferences.opener_id = Some(inputs.host.id);
        options.web_preferences = web_preferences;

        for capability in suppressed.capabilities() {
            log::warn!(
                "Ignoring {}={} from feature string: host {} holds it at {}",
                capability,
                !capability.safe_value(),
                inputs.host.id,
                capability.safe_value()
            );
        }

        Self {
            options,
            additional_features: inputs.features.additional_features.clone(),
            suppressed: suppressed.capabilities().collect(),
            adopted_content: None,
        }
    }

    /// Suppressed flags as a set
    pub fn suppressed_set(&self) -> CapabilitySet {
        self.suppressed.iter().copied().collect()
    }
}

/// Merge capability flags from parent, untrusted input and trusted overrides
///
/// Returns the merged flags and the flags whose untrusted request was
/// overruled by the parent's safe baseline. The parent's extra preferences
/// are inherited below everything else. Non-boolean untrusted values are
/// ignored.
pub fn merge_capability_flags(
    parent: &CapabilityFlags,
    untrusted: &BTreeMap<Capability, FeatureValue>,
    trusted: Option<&CapabilityFlags>,
) -> (CapabilityFlags, CapabilitySet) {
    let inherited = parent.inheritable();
    let baseline = parent.safe_baseline();
    let no_overrides = CapabilityFlags::default();
    let trusted = trusted.unwrap_or(&no_overrides);

    let mut requested = CapabilityFlags::default();
    for (capability, value) in untrusted {
        match value.as_bool() {
            Some(flag) => requested.set(*capability, Some(flag)),
            None => log::debug!("Ignoring non-boolean feature {}={}", capability, value),
        }
    }

    let mut merged = CapabilityFlags::default();
    for layer in [&inherited, &requested, &baseline, trusted] {
        merged.overlay(layer);
    }

    let suppressed = baseline
        .pinned()
        .capabilities()
        .filter(|capability| {
            trusted.get(*capability).is_none()
                && requested.get(*capability).is_some_and(|flag| flag != capability.safe_value())
        })
        .collect();

    (merged, suppressed)
}

fn defaults_layer(inputs: &MergeInputs<'_>) -> WindowOptions {
    let position = |key: &str| inputs.features.options.get(key).and_then(FeatureValue::as_number);

    WindowOptions {
        show: Some(inputs.defaults.show),
        x: position("left"),
        y: position("top"),
        width: Some(inputs.defaults.width),
        height: Some(inputs.defaults.height),
        title: (!inputs.frame_name.is_empty()).then(|| inputs.frame_name.to_string()),
        ..WindowOptions::default()
    }
}

fn inherited_layer(host: &HostState) -> Option<WindowOptions> {
    let mut inherited = without_preferences(host.last_options.as_ref()?);
    inherited.extra.remove(NON_INHERITABLE_OPTION);
    if let Some(visible) = host.window_visibility {
        inherited.show = Some(visible);
    }
    Some(inherited)
}

fn without_preferences(options: &WindowOptions) -> WindowOptions {
    WindowOptions {
        web_preferences: CapabilityFlags::default(),
        ..options.clone()
    }
}
