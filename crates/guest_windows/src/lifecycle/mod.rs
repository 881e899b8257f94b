//! Host/guest lifecycle coupling
//!
//! Every guest window is linked to the host that opened it. A link holds two
//! one-shot subscriptions, and exactly one of them ever fires:
//!
//! ```text
//!            host view torn down              guest destroyed
//!   Active ──────────────────────► HostGoneCascading ──────────► Terminated
//!     │
//!     │      guest closed                     host notified
//!     └────────────────────────────► GuestGoneNotifying ───────► Terminated
//! ```
//!
//! Destroying guests when their host goes away is a policy of this crate,
//! not something the surface model requires.
//!
//! A named guest also gets a third subscription that releases its frame name
//! when it closes, whichever way that happens.

use crate::backend::SurfaceBackend;
use crate::events::{EventBus, Listener, SurfaceEvent};
use crate::foundation::collections::{LinkKey, SlotMap, SubscriptionKey, SurfaceId};
use crate::registry::FrameNameRegistry;

/// Channel prefix of the "guest closed" message sent to a host
pub const WINDOW_CLOSED_CHANNEL_PREFIX: &str = "GUEST_WINDOW_MANAGER_WINDOW_CLOSED_";

/// Channel on which a host learns that `guest` closed
pub fn window_closed_channel(guest: SurfaceId) -> String {
    format!("{WINDOW_CLOSED_CHANNEL_PREFIX}{guest}")
}

/// State of a host/guest link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Both sides alive
    Active,
    /// Host went away, guest being destroyed
    HostGoneCascading,
    /// Guest closed, host being notified
    GuestGoneNotifying,
    /// Done; the link is dropped
    Terminated,
}

/// Association between a host and one of its guests
#[derive(Debug, Clone)]
pub struct LifecycleLink {
    /// Opening surface
    pub host: SurfaceId,
    /// Opened window
    pub guest: SurfaceId,
    /// Frame name the guest was registered under
    pub frame_name: Option<String>,
    state: LinkState,
    host_gone: Option<SubscriptionKey>,
    guest_gone: Option<SubscriptionKey>,
}

impl LifecycleLink {
    /// Current state
    pub const fn state(&self) -> LinkState {
        self.state
    }
}

/// Owns every live link and the event bus that drives them
#[derive(Debug, Default)]
pub struct LifecycleController {
    links: SlotMap<LinkKey, LifecycleLink>,
    bus: EventBus,
}

impl LifecycleController {
    /// Create a controller with no links
    pub fn new() -> Self {
        Self::default()
    }

    /// Couple `guest` to `host`
    ///
    /// A non-empty `frame_name` is registered for `guest` and released when
    /// the guest closes.
    pub fn link(
        &mut self,
        host: SurfaceId,
        guest: SurfaceId,
        frame_name: &str,
        registry: &mut FrameNameRegistry,
    ) -> LinkKey {
        let frame_name = (!frame_name.is_empty()).then(|| frame_name.to_string());

        let key = self.links.insert(LifecycleLink {
            host,
            guest,
            frame_name: frame_name.clone(),
            state: LinkState::Active,
            host_gone: None,
            guest_gone: None,
        });

        let host_gone = self.bus.once(SurfaceEvent::RenderViewDeleted(host), Listener::CloseGuest(key));
        let guest_gone = self.bus.once(SurfaceEvent::Closed(guest), Listener::NotifyHost(key));
        if let Some(link) = self.links.get_mut(key) {
            link.host_gone = Some(host_gone);
            link.guest_gone = Some(guest_gone);
        }

        if let Some(name) = frame_name {
            registry.register(&name, guest);
            self.bus.once(SurfaceEvent::Closed(guest), Listener::ReleaseFrameName { name, guest });
        }

        log::debug!("Linked guest {} to host {}", guest, host);
        key
    }

    /// Process a backend event and everything it sets off
    pub fn handle_event<B: SurfaceBackend + ?Sized>(
        &mut self,
        event: SurfaceEvent,
        backend: &mut B,
        registry: &mut FrameNameRegistry,
    ) {
        self.bus.send(event);

        while let Some(event) = self.bus.next_event() {
            for listener in self.bus.take(event) {
                match listener {
                    Listener::CloseGuest(key) => self.close_guest(key, backend),
                    Listener::NotifyHost(key) => self.notify_host(key, backend),
                    Listener::ReleaseFrameName { name, guest } => {
                        if registry.lookup(&name) == Some(guest) {
                            registry.unregister(&name);
                            log::debug!("Released frame name {:?} of guest {}", name, guest);
                        }
                    }
                }
            }
        }
    }

    fn close_guest<B: SurfaceBackend + ?Sized>(&mut self, key: LinkKey, backend: &mut B) {
        let Some(guest) = self.transition(key, LinkState::HostGoneCascading) else {
            return;
        };
        let (host, guest_gone) = {
            let link = &mut self.links[key];
            link.host_gone = None;
            (link.host, link.guest_gone.take())
        };
        if let Some(subscription) = guest_gone {
            self.bus.remove(subscription);
        }

        log::debug!("Host {} went away, destroying guest {}", host, guest);
        backend.destroy(guest);

        // The destroyed guest closes and loses its own view; whoever still
        // listens (frame name, the guest's own guests) hears about it now.
        self.bus.send(SurfaceEvent::Closed(guest));
        self.bus.send(SurfaceEvent::RenderViewDeleted(guest));

        self.terminate(key);
    }

    fn notify_host<B: SurfaceBackend + ?Sized>(&mut self, key: LinkKey, backend: &mut B) {
        let Some(guest) = self.transition(key, LinkState::GuestGoneNotifying) else {
            return;
        };
        let (host, host_gone) = {
            let link = &mut self.links[key];
            link.guest_gone = None;
            (link.host, link.host_gone.take())
        };

        backend.notify(host, &window_closed_channel(guest));
        if let Some(subscription) = host_gone {
            self.bus.remove(subscription);
        }

        log::debug!("Guest {} closed, notified host {}", guest, host);
        self.terminate(key);
    }

    // Moves an active link into `next`; returns its guest, or `None` if the
    // link is gone or already left `Active`.
    fn transition(&mut self, key: LinkKey, next: LinkState) -> Option<SurfaceId> {
        let link = self.links.get_mut(key)?;
        if link.state != LinkState::Active {
            return None;
        }
        link.state = next;
        Some(link.guest)
    }

    fn terminate(&mut self, key: LinkKey) {
        if let Some(mut link) = self.links.remove(key) {
            link.state = LinkState::Terminated;
            log::trace!("Link {:?} terminated ({} -> {})", key, link.host, link.guest);
        }
    }

    /// A live link
    pub fn link_info(&self, key: LinkKey) -> Option<&LifecycleLink> {
        self.links.get(key)
    }

    /// Number of live links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Guests currently linked to `host`
    pub fn guests_of(&self, host: SurfaceId) -> Vec<SurfaceId> {
        self.links
            .values()
            .filter(|link| link.host == host)
            .map(|link| link.guest)
            .collect()
    }

    /// Number of pending subscriptions, for diagnostics
    pub fn subscription_count(&self) -> usize {
        self.bus.len()
    }
}
