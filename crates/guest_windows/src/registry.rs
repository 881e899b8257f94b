//! Named-target registry
//!
//! Maps frame names (the `target` of `window.open`) to the guest window that
//! currently owns them, so that opening the same name twice reuses the
//! existing window. The registry holds surface identities only; it never
//! keeps a surface alive and never destroys one. Entries are removed by the
//! lifecycle controller when the guest closes.

use std::collections::HashMap;

use crate::foundation::collections::SurfaceId;

/// Frame name → guest window mapping
#[derive(Debug, Default)]
pub struct FrameNameRegistry {
    windows: HashMap<String, SurfaceId>,
}

impl FrameNameRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `name` to `surface`, replacing any previous owner
    ///
    /// Returns `false` and changes nothing when `name` is empty.
    pub fn register(&mut self, name: &str, surface: SurfaceId) -> bool {
        if name.is_empty() {
            return false;
        }
        if let Some(previous) = self.windows.insert(name.to_string(), surface) {
            if previous != surface {
                log::debug!("Frame name {:?} moved from surface {} to {}", name, previous, surface);
            }
        }
        true
    }

    /// Surface currently owning `name`
    pub fn lookup(&self, name: &str) -> Option<SurfaceId> {
        self.windows.get(name).copied()
    }

    /// Forget `name`; no-op if it is not registered
    pub fn unregister(&mut self, name: &str) -> Option<SurfaceId> {
        self.windows.remove(name)
    }

    /// Forget every name owned by `surface`
    pub fn release_surface(&mut self, surface: SurfaceId) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, owner| *owner != surface);
        before - self.windows.len()
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// True if no names are registered
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.windows.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
