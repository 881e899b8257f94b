//! Handle and identifier types

use serde::{Deserialize, Serialize};
use std::fmt;

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a host/guest lifecycle link
    pub struct LinkKey;

    /// Handle to a one-shot event subscription
    pub struct SubscriptionKey;
}

/// Identity of a rendering surface owned by the backend
///
/// The crate never owns surfaces; it only refers to them by this identity.
/// The backend is responsible for keeping identities unique for the lifetime
/// of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(u32);

impl SurfaceId {
    /// Create a surface identity from its raw value
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw identity value
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
