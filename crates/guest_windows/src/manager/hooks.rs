//! Legacy new-window hooks
//!
//! Older integrations get a chance to look at every window request before a
//! window is created, and may cancel it or hand over a window of their own.
//! Hooks are asked in registration order; the first one that returns a
//! decision wins.

use std::fmt;

use super::Disposition;
use crate::backend::Referrer;
use crate::foundation::collections::SurfaceId;
use crate::options::CreationDescriptor;

/// What a hook wants done with a window request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Go ahead
    Allow,
    /// Do not create anything
    Veto,
    /// Do not create anything; link this existing guest to the host instead
    SubstituteGuest(SurfaceId),
}

/// A window request as seen by hooks
#[derive(Debug, Clone, Copy)]
pub struct NewWindowEvent<'a> {
    /// Opening surface
    pub host: SurfaceId,
    /// Content already built for the window, if any
    pub guest: Option<SurfaceId>,
    /// Target URL
    pub url: &'a str,
    /// Requested frame name
    pub frame_name: &'a str,
    /// Requested disposition
    pub disposition: &'a Disposition,
    /// Options the window would be created with
    pub descriptor: &'a CreationDescriptor,
    /// Bare feature keys (legacy mode)
    pub additional_features: &'a [String],
    /// Referrer
    pub referrer: Option<&'a Referrer>,
}

/// Observer of window requests
pub trait NewWindowHook {
    /// Inspect a request; `None` leaves the decision to later hooks
    fn on_new_window(&mut self, event: &NewWindowEvent<'_>) -> Option<Decision>;
}

impl<F> NewWindowHook for F
where
    F: FnMut(&NewWindowEvent<'_>) -> Option<Decision>,
{
    fn on_new_window(&mut self, event: &NewWindowEvent<'_>) -> Option<Decision> {
        self(event)
    }
}

/// Ordered hook chain
#[derive(Default)]
pub(crate) struct HookChain {
    hooks: Vec<Box<dyn NewWindowHook>>,
}

impl HookChain {
    pub(crate) fn push(&mut self, hook: Box<dyn NewWindowHook>) {
        self.hooks.push(hook);
    }

    pub(crate) fn len(&self) -> usize {
        self.hooks.len()
    }

    /// First decision any hook makes, `Allow` if none does
    pub(crate) fn decide(&mut self, event: &NewWindowEvent<'_>) -> Decision {
        self.hooks
            .iter_mut()
            .find_map(|hook| hook.on_new_window(event))
            .unwrap_or(Decision::Allow)
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain").field("hooks", &self.hooks.len()).finish()
    }
}
