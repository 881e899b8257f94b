//! Guest window orchestration
//!
//! [`GuestWindowManager::open_guest_window`] is the single entry point for
//! `window.open`-style requests. For each request it:
//!
//! 1. merges the window's configuration ([`CreationDescriptor`]),
//! 2. lets legacy [`NewWindowHook`]s veto the request or substitute a window,
//! 3. reuses a live window that already owns the requested frame name,
//! 4. otherwise asks the backend for a new window and loads the URL,
//! 5. couples the new window to its host and registers its frame name.
//!
//! Everything happens synchronously, so two requests for the same frame
//! name delivered one after the other can never both create a window.

mod hooks;
pub mod post_data;

pub use hooks::{Decision, NewWindowEvent, NewWindowHook};

use serde::{Deserialize, Serialize};

use crate::backend::{LoadUrlOptions, PostDataElement, Referrer, SurfaceBackend};
use crate::core::config::WindowManagerConfig;
use crate::events::SurfaceEvent;
use crate::features::parse_features;
use crate::foundation::collections::SurfaceId;
use crate::lifecycle::LifecycleController;
use crate::options::{CreationDescriptor, HostState, MergeInputs, WindowOptions};
use crate::registry::FrameNameRegistry;
use crate::WindowManagerError;
use hooks::HookChain;

/// Where the opener asked the new content to go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disposition {
    /// No preference
    #[default]
    Default,
    /// New foreground tab
    ForegroundTab,
    /// New background tab
    BackgroundTab,
    /// New window
    NewWindow,
    /// New popup
    NewPopup,
    /// Download instead of display
    SaveToDisk,
    /// Anything else
    Other,
}

impl Disposition {
    /// Parse a disposition tag; unknown tags become [`Disposition::Other`]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "default" | "" => Self::Default,
            "foreground-tab" => Self::ForegroundTab,
            "background-tab" => Self::BackgroundTab,
            "new-window" => Self::NewWindow,
            "new-popup" => Self::NewPopup,
            "save-to-disk" => Self::SaveToDisk,
            _ => Self::Other,
        }
    }

    /// Tag string
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::ForegroundTab => "foreground-tab",
            Self::BackgroundTab => "background-tab",
            Self::NewWindow => "new-window",
            Self::NewPopup => "new-popup",
            Self::SaveToDisk => "save-to-disk",
            Self::Other => "other",
        }
    }
}

/// Arguments of a `window.open` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowOpenArgs {
    /// Target URL
    pub url: String,
    /// Referrer of the opening document
    pub referrer: Option<Referrer>,
    /// Frame name (`target`); empty for an anonymous window
    pub frame_name: String,
    /// Requested disposition
    pub disposition: Disposition,
    /// Raw feature string (untrusted)
    pub features: String,
    /// Overrides from the trusted caller
    pub options: Option<WindowOptions>,
    /// Request body for the first navigation
    pub post_data: Option<Vec<PostDataElement>>,
}

impl WindowOpenArgs {
    /// Open `url` in an anonymous window
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            disposition: Disposition::NewWindow,
            ..Self::default()
        }
    }

    /// Set the frame name
    pub fn with_frame_name(mut self, frame_name: impl Into<String>) -> Self {
        self.frame_name = frame_name.into();
        self
    }

    /// Set the feature string
    pub fn with_features(mut self, features: impl Into<String>) -> Self {
        self.features = features.into();
        self
    }

    /// Set the referrer
    pub fn with_referrer(mut self, referrer: Referrer) -> Self {
        self.referrer = Some(referrer);
        self
    }

    /// Set the disposition
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// Set trusted overrides
    pub fn with_options(mut self, options: WindowOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the request body
    pub fn with_post_data(mut self, post_data: Vec<PostDataElement>) -> Self {
        self.post_data = Some(post_data);
        self
    }
}

/// A request to open a guest window
#[derive(Debug, Clone, PartialEq)]
pub struct OpenRequest {
    /// Opening surface
    pub host: SurfaceId,
    /// Content the caller already built for the window, when the calling
    /// convention creates it before window policy is decided
    pub guest: Option<SurfaceId>,
    /// `window.open` arguments
    pub args: WindowOpenArgs,
}

impl OpenRequest {
    /// Request without pre-built content
    pub fn new(host: SurfaceId, args: WindowOpenArgs) -> Self {
        Self { host, guest: None, args }
    }

    /// Attach pre-built content
    pub fn with_guest(mut self, guest: SurfaceId) -> Self {
        self.guest = Some(guest);
        self
    }
}

/// Result of [`GuestWindowManager::open_guest_window`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new window was created
    Created(SurfaceId),
    /// A window already owning the frame name was navigated instead
    Reused(SurfaceId),
    /// A hook supplied its own window, which is now linked to the host
    Substituted {
        /// The substitute
        guest: SurfaceId,
        /// Whether the substitute is the request's pre-built content, which
        /// the caller must then keep alive
        keeps_pre_built: bool,
    },
    /// No window was created
    Vetoed,
}

impl OpenOutcome {
    /// The window the opener gets back, if any
    pub const fn surface(self) -> Option<SurfaceId> {
        match self {
            Self::Created(surface) | Self::Reused(surface) => Some(surface),
            Self::Substituted { .. } | Self::Vetoed => None,
        }
    }
}

/// Creates guest windows and keeps them coupled to their hosts
///
/// The manager owns the frame-name registry and all host/guest links for the
/// lifetime of the process. Backend events must be forwarded to
/// [`GuestWindowManager::handle_event`].
#[derive(Debug)]
pub struct GuestWindowManager<B: SurfaceBackend> {
    backend: B,
    config: WindowManagerConfig,
    registry: FrameNameRegistry,
    lifecycle: LifecycleController,
    hooks: HookChain,
}

impl<B: SurfaceBackend> GuestWindowManager<B> {
    /// Create a manager driving `backend`
    pub fn new(backend: B, config: WindowManagerConfig) -> Self {
        log::info!(
            "Guest window manager started (legacy bare keys: {}, legacy inheritance: {})",
            config.legacy.bare_keys_as_additional_features,
            config.legacy.inherit_parent_options
        );
        Self {
            backend,
            config,
            registry: FrameNameRegistry::new(),
            lifecycle: LifecycleController::new(),
            hooks: HookChain::default(),
        }
    }

    /// Active configuration
    pub const fn config(&self) -> &WindowManagerConfig {
        &self.config
    }

    /// The backend
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The frame-name registry
    pub const fn registry(&self) -> &FrameNameRegistry {
        &self.registry
    }

    /// Host/guest links
    pub const fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    /// Add a legacy new-window hook
    pub fn add_new_window_hook(&mut self, hook: impl NewWindowHook + 'static) {
        self.hooks.push(Box::new(hook));
        log::debug!("{} new-window hook(s) registered", self.hooks.len());
    }

    /// Map `name` to `surface`; `false` for an empty name
    pub fn register_frame_name_to_guest_window(&mut self, name: &str, surface: SurfaceId) -> bool {
        self.registry.register(name, surface)
    }

    /// Forget `name`
    pub fn unregister_frame_name(&mut self, name: &str) {
        self.registry.unregister(name);
    }

    /// Window currently owning `name`
    pub fn guest_window_by_frame_name(&self, name: &str) -> Option<SurfaceId> {
        self.registry.lookup(name)
    }

    /// Snapshot of what the merge needs from `host`
    pub fn host_state(&self, host: SurfaceId) -> HostState {
        HostState {
            id: host,
            capabilities: self.backend.resolved_capabilities(host),
            last_options: self.backend.last_applied_options(host),
            window_visibility: self.backend.window_visibility(host),
        }
    }

    /// Configuration a window opened by `host` with `args` would get
    pub fn creation_descriptor(&self, host: SurfaceId, args: &WindowOpenArgs) -> CreationDescriptor {
        let legacy = &self.config.legacy;
        let features = parse_features(&args.features, legacy.bare_keys_as_additional_features);
        let host = self.host_state(host);

        CreationDescriptor::build(&MergeInputs {
            host: &host,
            features: &features,
            frame_name: &args.frame_name,
            overrides: args.options.as_ref(),
            defaults: &self.config.defaults,
            inherit_parent_options: legacy.inherit_parent_options,
        })
    }

    /// Open a guest window for `request`
    ///
    /// # Errors
    ///
    /// Returns [`WindowManagerError::Backend`] when the backend fails to
    /// create the window; nothing is linked or registered in that case.
    pub fn open_guest_window(&mut self, request: OpenRequest) -> Result<OpenOutcome, WindowManagerError> {
        let OpenRequest { host, guest, args } = request;

        let mut descriptor = self.creation_descriptor(host, &args);
        descriptor.adopted_content = guest;
        log::debug!(
            "Window request from {} for {:?} (frame {:?}, {})",
            host,
            args.url,
            args.frame_name,
            args.disposition.as_str()
        );

        let decision = self.hooks.decide(&NewWindowEvent {
            host,
            guest,
            url: &args.url,
            frame_name: &args.frame_name,
            disposition: &args.disposition,
            descriptor: &descriptor,
            additional_features: &descriptor.additional_features,
            referrer: args.referrer.as_ref(),
        });

        if self.backend.popups_disabled(host) {
            log::info!("Host {} has popups disabled, not opening {:?}", host, args.url);
            return Ok(OpenOutcome::Vetoed);
        }

        match decision {
            Decision::Allow => {}
            Decision::Veto => {
                log::info!("Window request for {:?} vetoed by hook", args.url);
                return Ok(OpenOutcome::Vetoed);
            }
            Decision::SubstituteGuest(substitute) => {
                log::info!("Hook substituted guest {} for {:?}", substitute, args.url);
                self.lifecycle.link(host, substitute, &args.frame_name, &mut self.registry);
                return Ok(OpenOutcome::Substituted {
                    guest: substitute,
                    keeps_pre_built: guest == Some(substitute),
                });
            }
        }

        if let Some(existing) = self.live_window_for_frame(&args.frame_name) {
            log::debug!("Reusing window {} for frame {:?}", existing, args.frame_name);
            if let Err(err) = self.backend.navigate(existing, &args.url, &LoadUrlOptions::default()) {
                log::warn!("Failed to navigate reused window {}: {}", existing, err);
            }
            return Ok(OpenOutcome::Reused(existing));
        }

        let window = self.backend.create_surface(&descriptor)?;
        log::info!("Created guest window {} for host {}", window, host);

        // Pre-built content is already on its way to the URL.
        if guest.is_none() {
            let load = post_data::initial_load_options(args.referrer.as_ref(), args.post_data.as_deref());
            if let Err(err) = self.backend.navigate(window, &args.url, &load) {
                log::warn!("Failed to load {:?} into window {}: {}", args.url, window, err);
            }
        }

        self.lifecycle.link(host, window, &args.frame_name, &mut self.registry);
        Ok(OpenOutcome::Created(window))
    }

    /// Forward a backend event
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        log::trace!("Surface event {:?}", event);
        self.lifecycle.handle_event(event, &mut self.backend, &mut self.registry);
    }

    fn live_window_for_frame(&mut self, frame_name: &str) -> Option<SurfaceId> {
        if frame_name.is_empty() {
            return None;
        }
        let existing = self.registry.lookup(frame_name)?;
        if self.backend.is_alive(existing) {
            return Some(existing);
        }
        log::warn!("Frame {:?} pointed at dead window {}, dropping it", frame_name, existing);
        self.registry.unregister(frame_name);
        // The backend never reported the close; retire the window's link now.
        self.lifecycle
            .handle_event(SurfaceEvent::Closed(existing), &mut self.backend, &mut self.registry);
        None
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::backend::{BackendError, HeadlessBackend};
    use crate::lifecycle::window_closed_channel;
    use crate::options::{Capability, CapabilityFlags};

    fn manager_with(config: WindowManagerConfig) -> (GuestWindowManager<HeadlessBackend>, SurfaceId) {
        let mut backend = HeadlessBackend::new();
        let host = backend.spawn_host(
            WindowOptions::new().with_size(1024.0, 768.0),
            CapabilityFlags::secure_defaults(),
        );
        (GuestWindowManager::new(backend, config), host)
    }

    fn manager() -> (GuestWindowManager<HeadlessBackend>, SurfaceId) {
        manager_with(WindowManagerConfig::default())
    }

    fn open(manager: &mut GuestWindowManager<HeadlessBackend>, host: SurfaceId, args: WindowOpenArgs) -> OpenOutcome {
        manager.open_guest_window(OpenRequest::new(host, args)).unwrap()
    }

    #[test]
    fn test_open_creates_and_navigates() {
        let (mut manager, host) = manager();
        let referrer = Referrer::new("https://opener.example/");

        let outcome = open(
            &mut manager,
            host,
            WindowOpenArgs::new("https://example.com/a").with_referrer(referrer.clone()),
        );

        let OpenOutcome::Created(guest) = outcome else {
            panic!("expected a new window, got {outcome:?}");
        };
        let surface = manager.backend().surface(guest).unwrap();
        assert_eq!(surface.navigations.len(), 1);
        assert_eq!(surface.navigations[0].url, "https://example.com/a");
        assert_eq!(surface.navigations[0].options.referrer, Some(referrer));
        assert_eq!(manager.lifecycle().guests_of(host), vec![guest]);
    }

    #[test]
    fn test_named_window_is_reused() {
        let (mut manager, host) = manager();

        let first = open(&mut manager, host, WindowOpenArgs::new("https://example.com/a").with_frame_name("help"));
        let second = open(&mut manager, host, WindowOpenArgs::new("https://example.com/b").with_frame_name("help"));

        let guest = first.surface().unwrap();
        assert_eq!(second, OpenOutcome::Reused(guest));
        assert_eq!(manager.backend().created_count(), 1);

        let urls: Vec<_> = manager
            .backend()
            .surface(guest)
            .unwrap()
            .navigations
            .iter()
            .map(|navigation| navigation.url.as_str())
            .collect();
        assert_eq!(urls, ["https://example.com/a", "https://example.com/b"]);
        assert_eq!(manager.lifecycle().link_count(), 1);
    }

    #[test]
    fn test_anonymous_windows_are_never_reused() {
        let (mut manager, host) = manager();

        let first = open(&mut manager, host, WindowOpenArgs::new("https://example.com/a"));
        let second = open(&mut manager, host, WindowOpenArgs::new("https://example.com/a"));

        assert_ne!(first.surface(), second.surface());
        assert_eq!(manager.backend().created_count(), 2);
        assert!(manager.registry().is_empty());
    }

    #[test]
    fn test_hook_veto_creates_nothing() {
        let (mut manager, host) = manager();
        manager.add_new_window_hook(|_: &NewWindowEvent<'_>| Some(Decision::Veto));

        let outcome = open(&mut manager, host, WindowOpenArgs::new("https://example.com/").with_frame_name("x"));

        assert_eq!(outcome, OpenOutcome::Vetoed);
        assert_eq!(outcome.surface(), None);
        assert_eq!(manager.backend().created_count(), 0);
        assert_eq!(manager.guest_window_by_frame_name("x"), None);
    }

    #[test]
    fn test_first_deciding_hook_wins() {
        let (mut manager, host) = manager();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&seen);
        manager.add_new_window_hook(move |event: &NewWindowEvent<'_>| -> Option<Decision> {
            log.borrow_mut().push(event.url.to_string());
            None
        });
        manager.add_new_window_hook(|event: &NewWindowEvent<'_>| {
            event.url.contains("ads").then_some(Decision::Veto)
        });
        manager.add_new_window_hook(|_: &NewWindowEvent<'_>| Some(Decision::Allow));

        let blocked = open(&mut manager, host, WindowOpenArgs::new("https://ads.example/"));
        let allowed = open(&mut manager, host, WindowOpenArgs::new("https://example.com/"));

        assert_eq!(blocked, OpenOutcome::Vetoed);
        assert!(matches!(allowed, OpenOutcome::Created(_)));
        assert_eq!(*seen.borrow(), ["https://ads.example/", "https://example.com/"]);
    }

    #[test]
    fn test_hook_sees_merged_descriptor() {
        let (mut manager, host) = manager_with(WindowManagerConfig::default().with_legacy_bare_keys(true));
        let seen = Rc::new(RefCell::new(None));

        let captured = Rc::clone(&seen);
        manager.add_new_window_hook(move |event: &NewWindowEvent<'_>| -> Option<Decision> {
            *captured.borrow_mut() = Some((
                event.descriptor.options.width,
                event.additional_features.to_vec(),
                *event.disposition,
            ));
            None
        });

        open(
            &mut manager,
            host,
            WindowOpenArgs::new("https://example.com/")
                .with_features("width=320,menubar")
                .with_disposition(Disposition::NewPopup),
        );

        assert_eq!(
            seen.borrow().clone(),
            Some((Some(320.0), vec!["menubar".to_string()], Disposition::NewPopup))
        );
    }

    #[test]
    fn test_substituted_guest_is_linked() {
        let (mut manager, host) = manager();
        let substitute = manager
            .backend_mut()
            .spawn_host(WindowOptions::default(), CapabilityFlags::default());
        manager.add_new_window_hook(move |_: &NewWindowEvent<'_>| Some(Decision::SubstituteGuest(substitute)));

        let outcome = open(&mut manager, host, WindowOpenArgs::new("https://example.com/").with_frame_name("s"));

        assert_eq!(
            outcome,
            OpenOutcome::Substituted {
                guest: substitute,
                keeps_pre_built: false
            }
        );
        assert_eq!(manager.backend().created_count(), 0);
        assert_eq!(manager.guest_window_by_frame_name("s"), Some(substitute));

        manager.handle_event(SurfaceEvent::RenderViewDeleted(host));
        assert!(!manager.backend().is_alive(substitute));
    }

    #[test]
    fn test_substituting_pre_built_content_keeps_it() {
        let (mut manager, host) = manager();
        let content = manager.backend_mut().spawn_content(CapabilityFlags::default());
        manager.add_new_window_hook(|event: &NewWindowEvent<'_>| event.guest.map(Decision::SubstituteGuest));

        let outcome = manager
            .open_guest_window(OpenRequest::new(host, WindowOpenArgs::new("https://example.com/")).with_guest(content))
            .unwrap();

        assert_eq!(
            outcome,
            OpenOutcome::Substituted {
                guest: content,
                keeps_pre_built: true
            }
        );
        assert_eq!(manager.lifecycle().guests_of(host), vec![content]);
    }

    #[test]
    fn test_popups_disabled_host_is_vetoed_after_hooks() {
        let mut backend = HeadlessBackend::new();
        let view = backend.spawn_embedded(CapabilityFlags::secure_defaults(), true);
        let mut manager = GuestWindowManager::new(backend, WindowManagerConfig::default());

        let asked = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&asked);
        manager.add_new_window_hook(move |_: &NewWindowEvent<'_>| -> Option<Decision> {
            *counter.borrow_mut() += 1;
            None
        });

        let outcome = open(&mut manager, view, WindowOpenArgs::new("https://example.com/"));

        assert_eq!(outcome, OpenOutcome::Vetoed);
        assert_eq!(*asked.borrow(), 1);
        assert_eq!(manager.backend().created_count(), 0);
    }

    #[test]
    fn test_untrusted_features_cannot_loosen_capabilities() {
        let (mut manager, host) = manager();

        let outcome = open(
            &mut manager,
            host,
            WindowOpenArgs::new("https://example.com/").with_features("nodeIntegration=yes,sandbox=no,width=300"),
        );

        let guest = outcome.surface().unwrap();
        let surface = manager.backend().surface(guest).unwrap();
        let flags = &surface.capabilities;
        assert_eq!(flags.node_integration, Some(false));
        assert_eq!(flags.sandbox, Some(true));
        assert_eq!(flags.opener_id, Some(host));

        let descriptor = surface.descriptor.as_ref().unwrap();
        assert_eq!(descriptor.options.width, Some(300.0));
        assert!(descriptor.suppressed_set().contains(Capability::NodeIntegration.bit()));
        assert!(descriptor.suppressed_set().contains(Capability::Sandbox.bit()));
    }

    #[test]
    fn test_trusted_overrides_may_loosen_capabilities() {
        let (mut manager, host) = manager();
        let trusted = WindowOptions::new()
            .with_web_preferences(CapabilityFlags::default().with(Capability::NodeIntegration, true));

        let outcome = open(
            &mut manager,
            host,
            WindowOpenArgs::new("https://example.com/").with_options(trusted),
        );

        let guest = outcome.surface().unwrap();
        let flags = manager.backend().resolved_capabilities(guest);
        assert_eq!(flags.node_integration, Some(true));
        assert_eq!(flags.context_isolation, Some(true));
    }

    #[test]
    fn test_pre_built_content_is_wrapped_not_navigated() {
        let (mut manager, host) = manager();
        let content = manager.backend_mut().spawn_content(CapabilityFlags::default());

        let outcome = manager
            .open_guest_window(
                OpenRequest::new(host, WindowOpenArgs::new("https://example.com/").with_frame_name("pre"))
                    .with_guest(content),
            )
            .unwrap();

        assert_eq!(outcome, OpenOutcome::Created(content));
        let surface = manager.backend().surface(content).unwrap();
        assert!(surface.navigations.is_empty());
        assert!(surface.options.is_some());
        assert_eq!(manager.guest_window_by_frame_name("pre"), Some(content));
    }

    #[test]
    fn test_post_data_sets_content_type() {
        let (mut manager, host) = manager();
        let body = vec![PostDataElement::raw(&b"--XyZ\r\nContent-Disposition: form-data; name=\"q\"\r\n\r\n1\r\n--XyZ--"[..])];

        let outcome = open(
            &mut manager,
            host,
            WindowOpenArgs::new("https://example.com/submit").with_post_data(body.clone()),
        );

        let guest = outcome.surface().unwrap();
        let navigation = &manager.backend().surface(guest).unwrap().navigations[0];
        assert_eq!(
            navigation.options.extra_headers.as_deref(),
            Some("content-type: multipart/form-data; boundary=XyZ")
        );
        assert_eq!(navigation.options.post_data, Some(body));
    }

    #[test]
    fn test_create_failure_propagates_and_links_nothing() {
        let (mut manager, host) = manager();
        manager.backend_mut().fail_next_create("no display");

        let result = manager.open_guest_window(OpenRequest::new(
            host,
            WindowOpenArgs::new("https://example.com/").with_frame_name("f"),
        ));

        assert!(matches!(
            result,
            Err(WindowManagerError::Backend(BackendError::SurfaceCreation(_)))
        ));
        assert_eq!(manager.lifecycle().link_count(), 0);
        assert_eq!(manager.guest_window_by_frame_name("f"), None);
    }

    #[test]
    fn test_stale_frame_name_is_replaced() {
        let (mut manager, host) = manager();
        let stale = open(&mut manager, host, WindowOpenArgs::new("https://example.com/").with_frame_name("w"))
            .surface()
            .unwrap();

        // Destroyed without the backend reporting it.
        manager.backend_mut().destroy(stale);

        let outcome = open(&mut manager, host, WindowOpenArgs::new("https://example.com/").with_frame_name("w"));
        let fresh = outcome.surface().unwrap();
        assert_eq!(outcome, OpenOutcome::Created(fresh));
        assert_ne!(fresh, stale);
        assert_eq!(manager.guest_window_by_frame_name("w"), Some(fresh));

        // The stale window's link is retired along with its name.
        assert_eq!(manager.lifecycle().guests_of(host), vec![fresh]);
        assert_eq!(manager.lifecycle().link_count(), 1);
        assert_eq!(manager.lifecycle().subscription_count(), 3);
        assert_eq!(manager.backend().notifications()[0].channel, window_closed_channel(stale));

        // A late close of the stale window must not release the new owner.
        manager.handle_event(SurfaceEvent::Closed(stale));
        assert_eq!(manager.guest_window_by_frame_name("w"), Some(fresh));
    }

    #[test]
    fn test_guest_close_notifies_host_and_releases_name() {
        let (mut manager, host) = manager();
        let guest = open(&mut manager, host, WindowOpenArgs::new("https://example.com/").with_frame_name("n"))
            .surface()
            .unwrap();

        manager.handle_event(SurfaceEvent::Closed(guest));

        assert_eq!(manager.guest_window_by_frame_name("n"), None);
        assert_eq!(manager.backend().notifications().len(), 1);
        assert_eq!(manager.backend().notifications()[0].host, host);
        assert_eq!(manager.backend().notifications()[0].channel, window_closed_channel(guest));
        assert_eq!(manager.lifecycle().link_count(), 0);

        // The host going away later has nothing left to destroy.
        manager.handle_event(SurfaceEvent::RenderViewDeleted(host));
        assert!(manager.backend().destroyed().is_empty());
    }

    #[test]
    fn test_host_teardown_cascades_to_grandchildren() {
        let (mut manager, host) = manager();
        let child = open(&mut manager, host, WindowOpenArgs::new("https://example.com/child").with_frame_name("c"))
            .surface()
            .unwrap();
        let grandchild = open(&mut manager, child, WindowOpenArgs::new("https://example.com/grandchild"))
            .surface()
            .unwrap();

        manager.handle_event(SurfaceEvent::RenderViewDeleted(host));

        assert_eq!(manager.backend().destroyed(), &[child, grandchild]);
        assert!(manager.backend().notifications().is_empty());
        assert_eq!(manager.lifecycle().link_count(), 0);
        assert_eq!(manager.lifecycle().subscription_count(), 0);
        assert!(manager.registry().is_empty());
    }

    #[test]
    fn test_manual_registration() {
        let (mut manager, host) = manager();

        assert!(!manager.register_frame_name_to_guest_window("", host));
        assert!(manager.register_frame_name_to_guest_window("main", host));
        assert_eq!(manager.guest_window_by_frame_name("main"), Some(host));

        manager.unregister_frame_name("main");
        assert_eq!(manager.guest_window_by_frame_name("main"), None);
    }

    #[test]
    fn test_inherited_options_follow_host_visibility() {
        let (mut manager, host) = manager_with(WindowManagerConfig::default().with_legacy_option_inheritance(true));
        manager.backend_mut().set_visible(host, false);

        let descriptor = manager.creation_descriptor(host, &WindowOpenArgs::new("https://example.com/"));

        assert_eq!(descriptor.options.show, Some(false));
        assert_eq!(descriptor.options.width, Some(1024.0));
        assert_eq!(descriptor.options.web_preferences.opener_id, Some(host));
    }

    #[test]
    fn test_disposition_tags() {
        for disposition in [
            Disposition::Default,
            Disposition::ForegroundTab,
            Disposition::BackgroundTab,
            Disposition::NewWindow,
            Disposition::NewPopup,
            Disposition::SaveToDisk,
        ] {
            assert_eq!(Disposition::from_tag(disposition.as_str()), disposition);
        }
        assert_eq!(Disposition::from_tag("tab-in-orbit"), Disposition::Other);
    }
}
