//! Surface backend interface
//!
//! Everything that actually owns a window lives behind [`SurfaceBackend`]:
//! creating surfaces, loading URLs, destroying them and delivering internal
//! messages to a host. The window manager only ever refers to surfaces by
//! [`SurfaceId`].
//!
//! # Event delivery
//!
//! Backends report two events to
//! [`GuestWindowManager::handle_event`](crate::manager::GuestWindowManager::handle_event):
//! [`SurfaceEvent::RenderViewDeleted`](crate::events::SurfaceEvent) when a
//! surface's rendering view is torn down, and
//! [`SurfaceEvent::Closed`](crate::events::SurfaceEvent) when a window
//! closes. Reporting an event nobody listens for is harmless.
//!
//! [`HeadlessBackend`] is a complete in-memory implementation for tests and
//! tooling.

mod headless;

pub use headless::{HeadlessBackend, HeadlessSurface, Navigation, Notification};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::foundation::collections::SurfaceId;
use crate::options::{CapabilityFlags, CreationDescriptor, WindowOptions};

/// Backend failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not create a surface
    #[error("Surface creation failed: {0}")]
    SurfaceCreation(String),

    /// The surface does not exist or is already destroyed
    #[error("Unknown surface {0}")]
    UnknownSurface(SurfaceId),

    /// Loading a URL failed
    #[error("Navigation of surface {surface} failed: {reason}")]
    Navigation {
        /// Surface being navigated
        surface: SurfaceId,
        /// Backend-specific reason
        reason: String,
    },
}

/// Referrer policy sent along with a navigation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferrerPolicy {
    /// Backend default
    #[default]
    Default,
    /// `no-referrer`
    NoReferrer,
    /// `no-referrer-when-downgrade`
    NoReferrerWhenDowngrade,
    /// `origin`
    Origin,
    /// `origin-when-cross-origin`
    OriginWhenCrossOrigin,
    /// `same-origin`
    SameOrigin,
    /// `strict-origin`
    StrictOrigin,
    /// `strict-origin-when-cross-origin`
    StrictOriginWhenCrossOrigin,
    /// `unsafe-url`
    UnsafeUrl,
}

/// Referrer of a navigation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referrer {
    /// Referring URL, may be empty
    pub url: String,
    /// Policy to apply
    pub policy: ReferrerPolicy,
}

impl Referrer {
    /// Create a referrer with the default policy
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            policy: ReferrerPolicy::Default,
        }
    }
}

/// One element of a navigation's request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PostDataElement {
    /// Inline bytes
    RawData {
        /// Body bytes
        bytes: Vec<u8>,
    },
    /// A file uploaded from disk
    File {
        /// File to upload
        path: PathBuf,
    },
}

impl PostDataElement {
    /// Inline bytes element
    pub fn raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self::RawData { bytes: bytes.into() }
    }

    /// Inline bytes, empty for file elements
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::RawData { bytes } => bytes,
            Self::File { .. } => &[],
        }
    }
}

/// Options for loading a URL into a surface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadUrlOptions {
    /// Referrer
    pub referrer: Option<Referrer>,
    /// Extra request headers, `\n`-separated
    pub extra_headers: Option<String>,
    /// Request body
    pub post_data: Option<Vec<PostDataElement>>,
}

/// Backend that owns the actual rendering surfaces
///
/// All calls happen on the thread that drives the window manager. Calls that
/// return `()` are fire-and-forget.
pub trait SurfaceBackend {
    /// Create a window from `descriptor`
    ///
    /// When [`CreationDescriptor::adopted_content`] is set, the backend wraps
    /// that existing content instead of creating new content.
    fn create_surface(&mut self, descriptor: &CreationDescriptor) -> Result<SurfaceId, BackendError>;

    /// Load `url` into `surface`
    fn navigate(&mut self, surface: SurfaceId, url: &str, options: &LoadUrlOptions) -> Result<(), BackendError>;

    /// Whether `surface` exists and has not been destroyed
    fn is_alive(&self, surface: SurfaceId) -> bool;

    /// Visibility of the window backing `surface`, `None` when there is no
    /// such window (e.g. an embedded view)
    fn window_visibility(&self, surface: SurfaceId) -> Option<bool>;

    /// The capability flags `surface` actually runs with
    fn resolved_capabilities(&self, surface: SurfaceId) -> CapabilityFlags;

    /// Options the window backing `surface` was last configured with, `None`
    /// when `surface` is not a top-level window
    fn last_applied_options(&self, surface: SurfaceId) -> Option<WindowOptions>;

    /// Whether `host` is an embedded view that must not open popups
    fn popups_disabled(&self, _host: SurfaceId) -> bool {
        false
    }

    /// Tear down `surface`
    fn destroy(&mut self, surface: SurfaceId);

    /// Deliver a one-way internal message to `host`
    fn notify(&mut self, host: SurfaceId, channel: &str);
}
