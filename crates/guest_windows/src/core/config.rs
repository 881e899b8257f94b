//! # Window Manager Configuration
//!
//! Settings that shape how guest windows are configured. They can be built in
//! code with the `with_*` builders or loaded from TOML/RON through the
//! [`Config`] trait:
//!
//! ```toml
//! log_filter = "guest_windows=debug"
//!
//! [defaults]
//! width = 1024.0
//! height = 768.0
//! show = true
//!
//! [legacy]
//! bare_keys_as_additional_features = true
//! inherit_parent_options = false
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

/// # Window Defaults
///
/// Lowest-precedence geometry and visibility for every new guest window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowDefaults {
    /// Default window width
    pub width: f64,
    /// Default window height
    pub height: f64,
    /// Whether new windows are shown by default
    pub show: bool,
}

impl Default for WindowDefaults {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            show: true,
        }
    }
}

/// # Legacy Behavior
///
/// Compatibility switches for older `window.open` integrations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyBehavior {
    /// Bare feature keys (`"menubar"` with no `=value`) are collected as
    /// additional features instead of being coerced to `true`
    pub bare_keys_as_additional_features: bool,
    /// New windows inherit the host window's last applied options
    pub inherit_parent_options: bool,
}

/// # Window Manager Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowManagerConfig {
    /// Default geometry and visibility
    pub defaults: WindowDefaults,
    /// Legacy compatibility switches
    pub legacy: LegacyBehavior,
    /// Default `env_logger` filter used by applications that initialize
    /// logging from this config
    pub log_filter: String,
}

impl WindowManagerConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            defaults: WindowDefaults::default(),
            legacy: LegacyBehavior::default(),
            log_filter: "info".to_string(),
        }
    }

    /// Set default window size
    pub fn with_default_size(mut self, width: f64, height: f64) -> Self {
        self.defaults.width = width;
        self.defaults.height = height;
        self
    }

    /// Set default visibility
    pub fn with_default_show(mut self, show: bool) -> Self {
        self.defaults.show = show;
        self
    }

    /// Collect bare feature keys as additional features
    pub fn with_legacy_bare_keys(mut self, enabled: bool) -> Self {
        self.legacy.bare_keys_as_additional_features = enabled;
        self
    }

    /// Inherit the host window's options
    pub fn with_legacy_option_inheritance(mut self, enabled: bool) -> Self {
        self.legacy.inherit_parent_options = enabled;
        self
    }

    /// Set the default log filter
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for WindowManagerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("defaults.width", self.defaults.width), ("defaults.height", self.defaults.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "log_filter",
                reason: "cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
