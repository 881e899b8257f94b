//! Top-level error type

use thiserror::Error;

use crate::backend::BackendError;
use crate::config::ConfigError;

/// Window manager errors
#[derive(Error, Debug)]
pub enum WindowManagerError {
    /// A backend call failed
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
