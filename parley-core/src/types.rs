//! Identity types shared across the bridge.
//!
//! The host's live objects (players, creatures, maps) are only safe to touch
//! from the simulation thread, so nothing in parley ever carries one across
//! the async boundary. Workers and queues deal exclusively in these opaque,
//! stable identifiers; the tick loop resolves them back to live objects at
//! drain time and silently drops anything that no longer resolves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable unique identifier for an in-world actor (player or NPC),
/// independent of its current liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(
    /// The host-assigned raw identifier.
    pub u64,
);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

/// Stable identifier for a player session — the addressee of config and
/// status replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(
    /// The host-assigned raw identifier.
    pub u64,
);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// Compound identifier for an entity's container: region (map) plus
/// instance. Captured at dispatch time and used to re-resolve the entity
/// after the reply arrives, however many ticks later that is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationKey {
    /// Region (map) identifier.
    pub region: u32,
    /// Instance identifier within the region.
    pub instance: u32,
}

impl LocationKey {
    /// Create a location key from a region and instance pair.
    #[must_use]
    pub fn new(region: u32, instance: u32) -> Self {
        Self { region, instance }
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.region, self.instance)
    }
}
