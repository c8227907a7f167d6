//! Entity identification for battlefield instances.
//!
//! Every battlefield card instance (including tokens and the generator)
//! gets a unique `EntityId` when it is created. Ids are local to one
//! client: two clients never exchange them. Cross-client addressing uses
//! zone + positional index instead (see `zones::Slot`).

use serde::{Deserialize, Serialize};

/// Unique identifier for a battlefield instance within one client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create an entity ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
