//! World objects carried by effects.
//!
//! Effects refer to world objects in two ways. Usually they borrow: they
//! hold an id (`PlayerId`, `EntityId`, `TriggerId`) and the board resolves
//! it. Sometimes they own: a `CreateObject` effect carries the boxed object
//! itself until the board takes it over. The traits in this module are the
//! contracts those boxed objects satisfy.
//!
//! ## Design
//!
//! Objects never reach into the board. When an entity needs randomness or a
//! fresh id to describe what it does, it gets them through a
//! [`WorldContext`], and it answers with an `EffectSequence` the interpreter
//! runs next.

mod item;
mod object;

pub use item::{Inventory, ItemStack, ARROWS, GOLD};
pub use object::{Entity, Motion, PlayerObject, Trigger};

use crate::core::{GameRng, IdAllocator, Mover, RoomPos};

/// Shared services lent to world objects while they react.
#[derive(Debug)]
pub struct WorldContext<'a> {
    pub rng: &'a mut GameRng,
    pub ids: &'a mut IdAllocator,
}

impl<'a> WorldContext<'a> {
    pub fn new(rng: &'a mut GameRng, ids: &'a mut IdAllocator) -> Self {
        Self { rng, ids }
    }
}

/// What an entity sees of the trigger that set it off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visitor<'a> {
    pub mover: Mover,
    pub name: &'a str,
    pub location: RoomPos,
}

impl Visitor<'_> {
    /// Whether a player (rather than a projectile) set the event off.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.mover.player().is_some()
    }
}
