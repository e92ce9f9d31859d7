//! Object contracts for things that live in the world.
//!
//! Three kinds of object can be carried by an effect:
//!
//! - [`Entity`]: a stationary event that reacts when something enters its
//!   room and may act at the start of each turn.
//! - [`Trigger`]: something that moves and sets events off (a fired arrow).
//! - [`PlayerObject`]: the specialized trigger a person controls.
//!
//! Each trait has an explicit `clone_*` method returning a boxed copy. An
//! effect that owns one of these objects clones it through that method, so
//! copies of an effect never alias the same object.

use std::fmt;

use crate::core::{Direction, EntityId, Mover, PlayerId, RoomPos};
use crate::effects::EffectSequence;

use super::item::{Inventory, ItemStack};
use super::{Visitor, WorldContext};

/// Where a movable object is, which way it is headed, and whether it
/// currently sets events off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Motion {
    pub location: RoomPos,
    pub direction: Option<Direction>,
    pub enabled: bool,
}

impl Motion {
    /// Enabled, standing at `location`, no heading yet.
    #[must_use]
    pub const fn at(location: RoomPos) -> Self {
        Self {
            location,
            direction: None,
            enabled: true,
        }
    }
}

/// A stationary world event.
pub trait Entity: fmt::Debug {
    fn id(&self) -> EntityId;

    /// Name used to find events of this type (`TriggerEvent` matches on it).
    fn name(&self) -> &str;

    fn location(&self) -> RoomPos;

    fn set_location(&mut self, room: RoomPos);

    /// Character drawn on the board in debug mode.
    fn symbol(&self) -> char;

    /// Hint given to players in an adjacent room.
    fn percept(&self) -> Option<&str> {
        None
    }

    /// Item handed over by a `PickupItem` effect naming this event.
    fn item(&self) -> Option<ItemStack> {
        None
    }

    /// Effects to run at the start of `active`'s turn.
    fn turn_update(
        &mut self,
        _active: PlayerId,
        _round_start: bool,
        _ctx: &mut WorldContext<'_>,
    ) -> EffectSequence {
        EffectSequence::new()
    }

    /// React to `visitor` entering this room, or to being triggered by name.
    fn triggered_by(&self, visitor: &Visitor<'_>, ctx: &mut WorldContext<'_>) -> EffectSequence;

    fn clone_entity(&self) -> Box<dyn Entity>;
}

/// A movable object that sets events off.
pub trait Trigger: fmt::Debug {
    /// Which mover this is, as effects refer to it.
    fn mover(&self) -> Mover;

    fn name(&self) -> &str;

    fn motion(&self) -> &Motion;

    fn motion_mut(&mut self) -> &mut Motion;

    fn clone_trigger(&self) -> Box<dyn Trigger>;

    fn location(&self) -> RoomPos {
        self.motion().location
    }

    /// Snapshot handed to entities this trigger sets off.
    fn visitor(&self) -> Visitor<'_> {
        Visitor {
            mover: self.mover(),
            name: self.name(),
            location: self.location(),
        }
    }
}

/// The trigger a person controls.
pub trait PlayerObject: Trigger {
    fn player_id(&self) -> PlayerId;

    /// Board character, `None` once the player should no longer be drawn.
    fn symbol(&self) -> Option<char>;

    /// Stop drawing this player (after losing).
    fn hide(&mut self);

    fn inventory(&self) -> &Inventory;

    fn inventory_mut(&mut self) -> &mut Inventory;

    /// Map a key press to a direction.
    fn to_direction(&self, input: i32) -> Option<Direction>;

    /// Help text listing the turn actions.
    fn action_help(&self) -> String;

    /// Help text listing the direction keys.
    fn direction_help(&self) -> String;

    fn clone_player(&self) -> Box<dyn PlayerObject>;
}

impl Clone for Box<dyn Entity> {
    fn clone(&self) -> Self {
        self.clone_entity()
    }
}

impl Clone for Box<dyn Trigger> {
    fn clone(&self) -> Self {
        self.clone_trigger()
    }
}

impl Clone for Box<dyn PlayerObject> {
    fn clone(&self) -> Self {
        self.clone_player()
    }
}
