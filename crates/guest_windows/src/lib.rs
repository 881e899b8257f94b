//! # Guest Windows
//!
//! Policy core for child windows ("guest windows") that web content asks its
//! host surface to open, e.g. through `window.open`.
//!
//! The crate does not render or navigate anything itself. It decides:
//!
//! - **What** configuration a new window gets: the feature string is parsed
//!   ([`features`]) and layered with defaults, inherited parent state and
//!   trusted overrides ([`options`]), without ever letting untrusted input
//!   loosen a security flag the parent holds at its safe value.
//! - **Whether** an existing window should be reused instead: named targets
//!   are tracked in a [`registry::FrameNameRegistry`].
//! - **How** destruction propagates between host and guest
//!   ([`lifecycle`]).
//!
//! Everything that actually owns a window goes through the
//! [`backend::SurfaceBackend`] trait.
//!
//! ## Quick Start
//!
//! ```rust
//! use guest_windows::prelude::*;
//!
//! let mut backend = HeadlessBackend::new();
//! let host = backend.spawn_host(WindowOptions::default(), CapabilityFlags::secure_defaults());
//!
//! let mut manager = GuestWindowManager::new(backend, WindowManagerConfig::default());
//! let outcome = manager
//!     .open_guest_window(OpenRequest::new(
//!         host,
//!         WindowOpenArgs::new("https://example.com/popup").with_frame_name("help"),
//!     ))
//!     .unwrap();
//!
//! assert!(outcome.surface().is_some());
//! assert_eq!(manager.guest_window_by_frame_name("help"), outcome.surface());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;
pub mod foundation;

pub mod backend;
pub mod events;
pub mod features;
pub mod lifecycle;
pub mod manager;
pub mod options;
pub mod registry;

mod error;

pub use error::WindowManagerError;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        WindowManagerError,
        backend::{
            BackendError, HeadlessBackend, LoadUrlOptions, PostDataElement, Referrer,
            ReferrerPolicy, SurfaceBackend,
        },
        core::config::{LegacyBehavior, WindowDefaults, WindowManagerConfig},
        config::{Config, ConfigError},
        events::SurfaceEvent,
        features::{parse_features, FeatureValue, ParsedFeatures},
        foundation::collections::SurfaceId,
        manager::{
            Decision, Disposition, GuestWindowManager, NewWindowEvent, NewWindowHook, OpenOutcome,
            OpenRequest, WindowOpenArgs,
        },
        options::{Capability, CapabilityFlags, CapabilitySet, CreationDescriptor, WindowOptions},
        registry::FrameNameRegistry,
    };
}
