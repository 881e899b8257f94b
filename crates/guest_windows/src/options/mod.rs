//! Typed window options and the security-aware merge engine
//!
//! Window options come from several places with different levels of trust:
//! configured defaults, the host window's own options, the untrusted feature
//! string and the trusted caller. [`WindowOptions`] is a partial value (every
//! field optional) so each source can be expressed as one layer, and
//! [`merge`] folds the layers in a declared precedence order.

mod capabilities;
pub mod merge;

pub use capabilities::{Capability, CapabilityFlags, CapabilitySet};
pub use merge::{merge_capability_flags, CreationDescriptor, HostState, MergeInputs};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::features::FeatureValue;

/// Options for a window, every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowOptions {
    /// Whether the window is shown on creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    /// Left edge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Top edge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Minimum width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    /// Maximum width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    /// Minimum height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    /// Maximum height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    /// Window opacity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Capability flags and other content preferences
    pub web_preferences: CapabilityFlags,
    /// Options this crate has no typed field for
    #[serde(flatten)]
    pub extra: BTreeMap<String, FeatureValue>,
}

impl WindowOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the position
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Set visibility
    pub fn with_show(mut self, show: bool) -> Self {
        self.show = Some(show);
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set content preferences
    pub fn with_web_preferences(mut self, web_preferences: CapabilityFlags) -> Self {
        self.web_preferences = web_preferences;
        self
    }

    /// Set an untyped option
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Build an options layer from parsed feature-string options
    ///
    /// Known keys with a value of the right type land in typed fields;
    /// everything else is kept in [`WindowOptions::extra`].
    pub fn from_features(features: &BTreeMap<String, FeatureValue>) -> Self {
        let mut options = Self::default();
        for (key, value) in features {
            if !options.apply_feature(key, value) {
                options.extra.insert(key.clone(), value.clone());
            }
        }
        options
    }

    fn apply_feature(&mut self, key: &str, value: &FeatureValue) -> bool {
        let number_slot = match key {
            "x" => &mut self.x,
            "y" => &mut self.y,
            "width" => &mut self.width,
            "height" => &mut self.height,
            "minWidth" => &mut self.min_width,
            "maxWidth" => &mut self.max_width,
            "minHeight" => &mut self.min_height,
            "maxHeight" => &mut self.max_height,
            "opacity" => &mut self.opacity,
            "show" => {
                let Some(show) = value.as_bool() else { return false };
                self.show = Some(show);
                return true;
            }
            "title" => {
                let Some(title) = value.as_text() else { return false };
                self.title = Some(title.to_string());
                return true;
            }
            _ => return false,
        };

        match value {
            FeatureValue::Number(number) => {
                *number_slot = Some(*number);
                true
            }
            _ => false,
        }
    }

    /// Lay `other` on top of `self`, one field at a time
    ///
    /// `web_preferences` is overlaid flag by flag; it never replaces the
    /// whole block.
    pub fn overlay(&mut self, other: &Self) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }

        take(&mut self.show, &other.show);
        take(&mut self.x, &other.x);
        take(&mut self.y, &other.y);
        take(&mut self.width, &other.width);
        take(&mut self.height, &other.height);
        take(&mut self.min_width, &other.min_width);
        take(&mut self.max_width, &other.max_width);
        take(&mut self.min_height, &other.min_height);
        take(&mut self.max_height, &other.max_height);
        take(&mut self.opacity, &other.opacity);
        take(&mut self.title, &other.title);
        self.web_preferences.overlay(&other.web_preferences);
        self.extra.extend(other.extra.iter().map(|(key, value)| (key.clone(), value.clone())));
    }

    /// Fold layers lowest precedence first
    pub fn layered<'a>(layers: impl IntoIterator<Item = &'a Self>) -> Self {
        layers.into_iter().fold(Self::default(), |mut merged, layer| {
            merged.overlay(layer);
            merged
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parse_features;

    #[test]
    fn test_from_features_fills_typed_fields() {
        let parsed = parse_features("width=300,height=200,show=no,title=Docs,resizable=no", false);
        let options = WindowOptions::from_features(&parsed.options);

        assert_eq!(options.width, Some(300.0));
        assert_eq!(options.height, Some(200.0));
        assert_eq!(options.show, Some(false));
        assert_eq!(options.title.as_deref(), Some("Docs"));
        assert_eq!(options.extra["resizable"], FeatureValue::Bool(false));
    }

    #[test]
    fn test_mistyped_known_keys_are_kept_opaque() {
        let parsed = parse_features("width=wide,show=maybe,title=1", false);
        let options = WindowOptions::from_features(&parsed.options);

        assert_eq!(options.width, None);
        assert_eq!(options.show, None);
        assert_eq!(options.title, None);
        assert_eq!(options.extra["width"], FeatureValue::Text("wide".into()));
        assert_eq!(options.extra["show"], FeatureValue::Text("maybe".into()));
        assert_eq!(options.extra["title"], FeatureValue::Bool(true));
    }

    #[test]
    fn test_layered_later_layers_win_per_field() {
        let defaults = WindowOptions::new().with_size(800.0, 600.0).with_show(true);
        let parsed = WindowOptions::new().with_size(400.0, 300.0);
        let caller = WindowOptions { height: Some(500.0), ..WindowOptions::default() };

        let merged = WindowOptions::layered([&defaults, &parsed, &caller]);
        assert_eq!(merged.width, Some(400.0));
        assert_eq!(merged.height, Some(500.0));
        assert_eq!(merged.show, Some(true));
    }

    #[test]
    fn test_overlay_without_preferences_keeps_flags() {
        let mut base = WindowOptions::new()
            .with_web_preferences(CapabilityFlags::default().with(Capability::Sandbox, true));
        base.overlay(&WindowOptions::new().with_title("x"));
        assert_eq!(base.web_preferences.sandbox, Some(true));
    }

    #[test]
    fn test_deserializes_camel_case() {
        let text = "minWidth = 100.0\nshow = false\nfrobnicate = true\n[webPreferences]\nsandbox = true\npreload = \"p.js\"\n";
        let options: WindowOptions = toml::from_str(text).unwrap();
        assert_eq!(options.min_width, Some(100.0));
        assert_eq!(options.show, Some(false));
        assert_eq!(options.extra["frobnicate"], FeatureValue::Bool(true));
        assert_eq!(options.web_preferences.sandbox, Some(true));
        assert_eq!(options.web_preferences.extra["preload"], FeatureValue::Text("p.js".into()));
    }
}
