//! Surface event bus
//!
//! Key principles:
//! - Listeners are plain data ([`Listener`]), not closures, so the bus can
//!   live next to the state they act on without reference cycles
//! - Every subscription is one-shot: firing an event removes all of its
//!   listeners before any of them run
//! - Subscriptions can be removed explicitly by key
//! - Events are queued and drained in FIFO order, so a listener that causes
//!   further events never recurses

use std::collections::{HashMap, VecDeque};

use crate::foundation::collections::{LinkKey, SlotMap, SubscriptionKey, SurfaceId};

/// Kind of surface event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The surface's rendering view was torn down
    RenderViewDeleted,
    /// The surface's window closed
    Closed,
}

/// Event reported by the backend about a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceEvent {
    /// The surface's rendering view was torn down
    RenderViewDeleted(SurfaceId),
    /// The surface's window closed
    Closed(SurfaceId),
}

impl SurfaceEvent {
    /// Surface the event is about
    pub const fn source(self) -> SurfaceId {
        match self {
            Self::RenderViewDeleted(surface) | Self::Closed(surface) => surface,
        }
    }

    /// Kind of event
    pub const fn kind(self) -> EventKind {
        match self {
            Self::RenderViewDeleted(_) => EventKind::RenderViewDeleted,
            Self::Closed(_) => EventKind::Closed,
        }
    }
}

/// What to do when a subscription fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listener {
    /// Host went away: destroy the linked guest
    CloseGuest(LinkKey),
    /// Guest closed: tell the linked host
    NotifyHost(LinkKey),
    /// Guest closed: drop its frame name
    ReleaseFrameName {
        /// Registered name
        name: String,
        /// Guest that owns it
        guest: SurfaceId,
    },
}

#[derive(Debug)]
struct Subscription {
    event: SurfaceEvent,
    listener: Listener,
}

/// One-shot subscriptions plus the pending event queue
#[derive(Debug, Default)]
pub struct EventBus {
    subscriptions: SlotMap<SubscriptionKey, Subscription>,
    by_event: HashMap<SurfaceEvent, Vec<SubscriptionKey>>,
    queue: VecDeque<SurfaceEvent>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `listener` the next time `event` fires
    pub fn once(&mut self, event: SurfaceEvent, listener: Listener) -> SubscriptionKey {
        let key = self.subscriptions.insert(Subscription { event, listener });
        self.by_event.entry(event).or_default().push(key);
        key
    }

    /// Remove a subscription; `false` if it already fired or was removed
    pub fn remove(&mut self, key: SubscriptionKey) -> bool {
        let Some(subscription) = self.subscriptions.remove(key) else {
            return false;
        };
        if let Some(keys) = self.by_event.get_mut(&subscription.event) {
            keys.retain(|other| *other != key);
            if keys.is_empty() {
                self.by_event.remove(&subscription.event);
            }
        }
        true
    }

    /// Remove and return every listener of `event`, in registration order
    pub fn take(&mut self, event: SurfaceEvent) -> Vec<Listener> {
        self.by_event
            .remove(&event)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|key| self.subscriptions.remove(key))
            .map(|subscription| subscription.listener)
            .collect()
    }

    /// Queue an event for processing
    pub fn send(&mut self, event: SurfaceEvent) {
        self.queue.push_back(event);
    }

    /// Next queued event
    pub fn next_event(&mut self) -> Option<SurfaceEvent> {
        self.queue.pop_front()
    }

    /// Number of listeners waiting for `event`
    pub fn listener_count(&self, event: SurfaceEvent) -> usize {
        self.by_event.get(&event).map_or(0, Vec::len)
    }

    /// Total number of live subscriptions
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// True if there are no subscriptions
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
