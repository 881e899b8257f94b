//! # Core Module
//!
//! Shared configuration for the window manager. The file-format plumbing
//! lives in [`crate::config`]; this module holds the concrete settings.

pub mod config;

pub use config::{LegacyBehavior, WindowDefaults, WindowManagerConfig};
pub use crate::config::{Config, ConfigError};
