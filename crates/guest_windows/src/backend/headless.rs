//! In-memory surface backend
//!
//! Keeps a record of every surface, navigation, notification and destruction
//! so callers can inspect what the window manager asked for. Nothing is
//! rendered.

use std::collections::BTreeMap;

use super::{BackendError, LoadUrlOptions, SurfaceBackend};
use crate::foundation::collections::SurfaceId;
use crate::options::{CapabilityFlags, CreationDescriptor, WindowOptions};

/// A navigation recorded by [`HeadlessBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Target URL
    pub url: String,
    /// Options it was loaded with
    pub options: LoadUrlOptions,
}

/// An internal message recorded by [`HeadlessBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Receiving host
    pub host: SurfaceId,
    /// Channel name
    pub channel: String,
}

/// State of one headless surface
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSurface {
    /// Identity
    pub id: SurfaceId,
    /// Descriptor the window was created from, `None` for spawned surfaces
    pub descriptor: Option<CreationDescriptor>,
    /// Window options, `None` when no window backs the surface
    pub options: Option<WindowOptions>,
    /// Resolved capability flags
    pub capabilities: CapabilityFlags,
    /// Window visibility, `None` when no window backs the surface
    pub visible: Option<bool>,
    /// Whether the surface is an embedded view with popups disabled
    pub popups_disabled: bool,
    /// Whether the surface is still alive
    pub alive: bool,
    /// Navigations, oldest first
    pub navigations: Vec<Navigation>,
}

impl HeadlessSurface {
    fn new(id: SurfaceId, capabilities: CapabilityFlags) -> Self {
        Self {
            id,
            descriptor: None,
            options: None,
            capabilities,
            visible: None,
            popups_disabled: false,
            alive: true,
            navigations: Vec::new(),
        }
    }

    fn attach_window(&mut self, descriptor: &CreationDescriptor) {
        let options = descriptor.options.clone();
        self.visible = Some(options.show.unwrap_or(true));
        self.capabilities = options.web_preferences.clone();
        self.options = Some(options);
        self.descriptor = Some(descriptor.clone());
    }
}

/// In-memory [`SurfaceBackend`]
#[derive(Debug)]
pub struct HeadlessBackend {
    surfaces: BTreeMap<SurfaceId, HeadlessSurface>,
    next_id: u32,
    notifications: Vec<Notification>,
    destroyed: Vec<SurfaceId>,
    fail_next_create: Option<String>,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self {
            surfaces: BTreeMap::new(),
            next_id: 1,
            notifications: Vec::new(),
            destroyed: Vec::new(),
            fail_next_create: None,
        }
    }

    fn allocate(&mut self, capabilities: CapabilityFlags) -> &mut HeadlessSurface {
        let id = SurfaceId::new(self.next_id);
        self.next_id += 1;
        self.surfaces.entry(id).or_insert_with(|| HeadlessSurface::new(id, capabilities))
    }

    /// Add a top-level window that can act as a host
    pub fn spawn_host(&mut self, options: WindowOptions, capabilities: CapabilityFlags) -> SurfaceId {
        let surface = self.allocate(capabilities);
        surface.visible = Some(options.show.unwrap_or(true));
        surface.options = Some(options);
        surface.id
    }

    /// Add an embedded view (no window of its own)
    pub fn spawn_embedded(&mut self, capabilities: CapabilityFlags, popups_disabled: bool) -> SurfaceId {
        let surface = self.allocate(capabilities);
        surface.popups_disabled = popups_disabled;
        surface.id
    }

    /// Add content that was built before any window exists for it
    pub fn spawn_content(&mut self, capabilities: CapabilityFlags) -> SurfaceId {
        self.allocate(capabilities).id
    }

    /// Make the next [`SurfaceBackend::create_surface`] call fail
    pub fn fail_next_create(&mut self, reason: impl Into<String>) {
        self.fail_next_create = Some(reason.into());
    }

    /// Change a window's visibility
    pub fn set_visible(&mut self, surface: SurfaceId, visible: bool) {
        if let Some(surface) = self.surfaces.get_mut(&surface) {
            surface.visible = Some(visible);
        }
    }

    /// Look at a surface
    pub fn surface(&self, surface: SurfaceId) -> Option<&HeadlessSurface> {
        self.surfaces.get(&surface)
    }

    /// Surfaces that are still alive
    pub fn live_surfaces(&self) -> impl Iterator<Item = &HeadlessSurface> {
        self.surfaces.values().filter(|surface| surface.alive)
    }

    /// Number of surfaces that were created from a descriptor
    pub fn created_count(&self) -> usize {
        self.surfaces.values().filter(|surface| surface.descriptor.is_some()).count()
    }

    /// Notifications, oldest first
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Destroyed surfaces, in destruction order
    pub fn destroyed(&self) -> &[SurfaceId] {
        &self.destroyed
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceBackend for HeadlessBackend {
    fn create_surface(&mut self, descriptor: &CreationDescriptor) -> Result<SurfaceId, BackendError> {
        if let Some(reason) = self.fail_next_create.take() {
            return Err(BackendError::SurfaceCreation(reason));
        }

        let surface = match descriptor.adopted_content {
            Some(content) => self
                .surfaces
                .get_mut(&content)
                .filter(|surface| surface.alive)
                .ok_or(BackendError::UnknownSurface(content))?,
            None => self.allocate(CapabilityFlags::default()),
        };
        surface.attach_window(descriptor);

        log::trace!("Headless surface {} created", surface.id);
        Ok(surface.id)
    }

    fn navigate(&mut self, surface: SurfaceId, url: &str, options: &LoadUrlOptions) -> Result<(), BackendError> {
        let target = self
            .surfaces
            .get_mut(&surface)
            .filter(|target| target.alive)
            .ok_or(BackendError::UnknownSurface(surface))?;
        target.navigations.push(Navigation {
            url: url.to_string(),
            options: options.clone(),
        });
        Ok(())
    }

    fn is_alive(&self, surface: SurfaceId) -> bool {
        self.surfaces.get(&surface).is_some_and(|surface| surface.alive)
    }

    fn window_visibility(&self, surface: SurfaceId) -> Option<bool> {
        self.surfaces.get(&surface).and_then(|surface| surface.visible)
    }

    fn resolved_capabilities(&self, surface: SurfaceId) -> CapabilityFlags {
        self.surfaces
            .get(&surface)
            .map(|surface| surface.capabilities.clone())
            .unwrap_or_default()
    }

    fn last_applied_options(&self, surface: SurfaceId) -> Option<WindowOptions> {
        self.surfaces.get(&surface).and_then(|surface| surface.options.clone())
    }

    fn popups_disabled(&self, host: SurfaceId) -> bool {
        self.surfaces.get(&host).is_some_and(|surface| surface.popups_disabled)
    }

    fn destroy(&mut self, surface: SurfaceId) {
        if let Some(target) = self.surfaces.get_mut(&surface) {
            if target.alive {
                target.alive = false;
                self.destroyed.push(surface);
            }
        }
    }

    fn notify(&mut self, host: SurfaceId, channel: &str) {
        self.notifications.push(Notification {
            host,
            channel: channel.to_string(),
        });
    }
}
