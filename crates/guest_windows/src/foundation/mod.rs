//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Handle and identifier types
//! - Logging utilities

pub mod collections;
pub mod logging;
