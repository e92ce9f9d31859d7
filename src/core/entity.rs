//! Identifiers for world objects.
//!
//! Effects never hold pointers into the world. They name the objects they
//! touch with small copyable ids, and the board resolves those ids against
//! the objects it owns.
//!
//! - `EntityId`: a stationary cave event (Wumpus, pit, gold, ...)
//! - `TriggerId`: a movable object that is not a player (a fired arrow)
//! - `Mover`: anything that can enter a room and set events off. Players
//!   are the specialized kind of mover.
//!
//! ## Allocation
//!
//! ```
//! use rust_wumpus::core::{EntityId, IdAllocator, TriggerId};
//!
//! let mut ids = IdAllocator::new();
//! assert_eq!(ids.entity(), EntityId(0));
//! assert_eq!(ids.entity(), EntityId(1));
//! assert_eq!(ids.trigger(), TriggerId(0));
//! ```

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Identifier of a stationary world entity ("event" in cave terms).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create a new entity ID.
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

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Identifier of a movable, non-player trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerId(pub u32);

impl TriggerId {
    /// Create a new trigger ID.
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

impl std::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Trigger({})", self.0)
    }
}

/// Anything that moves through the cave and can set events off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mover {
    /// A player (the specialized kind of trigger).
    Player(PlayerId),
    /// Any other trigger, such as a fired arrow.
    Trigger(TriggerId),
}

impl Mover {
    /// The player behind this mover, if it is one.
    #[must_use]
    pub const fn player(self) -> Option<PlayerId> {
        match self {
            Mover::Player(id) => Some(id),
            Mover::Trigger(_) => None,
        }
    }

    /// The trigger id behind this mover, if it is not a player.
    #[must_use]
    pub const fn trigger(self) -> Option<TriggerId> {
        match self {
            Mover::Player(_) => None,
            Mover::Trigger(id) => Some(id),
        }
    }
}

impl std::fmt::Display for Mover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mover::Player(id) => write!(f, "{}", id),
            Mover::Trigger(id) => write!(f, "{}", id),
        }
    }
}

/// Hands out fresh entity and trigger ids.
///
/// Content that spawns objects mid-game (an arrow being fired, a baby
/// Wumpus being born) allocates the id up front so that every effect in
/// the generated sequence can refer to the object before it exists.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next_entity: u32,
    next_trigger: u32,
}

impl IdAllocator {
    /// Create an allocator starting at zero for both id spaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh entity id.
    pub fn entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    /// Allocate a fresh trigger id.
    pub fn trigger(&mut self) -> TriggerId {
        let id = TriggerId(self.next_trigger);
        self.next_trigger += 1;
        id
    }
}
