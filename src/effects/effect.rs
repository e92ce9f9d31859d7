//! Effect definitions.
//!
//! An `Effect` is one unit of intended change or one control instruction.
//! Its kind is fixed when it is built; its payload fields stay mutable so
//! that collaborators can fill them in while the effect is in flight (a
//! direction prompt records the chosen direction on the effect that asked).
//!
//! ## Payload
//!
//! - `info`: integer payload (direction code, quantity, flag, mode code)
//! - `player`, `entity`, `trigger`: borrowed references by id
//! - `owned`: at most one exclusively owned world object
//! - `message`: display text, item name, event name or input tag
//! - `room`: explicit destination room

use serde::{Deserialize, Serialize};

use crate::core::{Direction, EntityId, Mover, PlayerId, RoomPos, TriggerId};
use crate::world::{Entity, PlayerObject, Trigger};

/// Every operation an effect can name.
///
/// The interpreter handles the control kinds itself (see
/// [`EffectKind::is_control`]). Everything else is delegated to the
/// session and, through it, to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    // === Control ===
    /// End the game if it is already decided, otherwise ask to confirm.
    ForceGameEnd,
    /// Drop the rest of this turn's effects.
    ForceUpdateEnd,
    /// Defer the block up to `EndWait` by one turn.
    BeginWait,
    /// Defer the block up to `EndWait` by one full round.
    BeginRoundWait,
    EndWait,
    /// A failed guard: skip to the matching `EndConditional`.
    BeginConditional,
    EndConditional,
    /// Enable (`info == 1`) or disable the turn prompt.
    SetPlayerActionEnabled,
    /// Read one input value and hand it back as `HandleInput`.
    RequestInput,

    // === Session ===
    WinGame,
    LoseGame,
    SetGameMode,
    RefreshBoardDisplay,
    DisplayText,

    // === Board ===
    PromptPlayerAction,
    PromptDirection,
    HandleInput,
    CreateObject,
    MoveObject,
    MoveObjectRandom,
    DestroyObject,
    PickupItem,
    RemoveItem,
    ItemConditional,
    SetObjectEnabled,
    TriggerEvent,
}

impl EffectKind {
    /// Kinds the interpreter resolves without delegating.
    #[must_use]
    pub const fn is_control(self) -> bool {
        matches!(
            self,
            EffectKind::ForceGameEnd
                | EffectKind::ForceUpdateEnd
                | EffectKind::BeginWait
                | EffectKind::BeginRoundWait
                | EffectKind::EndWait
                | EffectKind::BeginConditional
                | EffectKind::EndConditional
                | EffectKind::SetPlayerActionEnabled
                | EffectKind::RequestInput
        )
    }
}

/// A world object exclusively owned by an effect.
///
/// Dropping the effect drops the object unless it was taken out first with
/// [`Effect::take_owned`]. Cloning deep-clones it.
#[derive(Debug)]
pub enum Owned {
    Player(Box<dyn PlayerObject>),
    Entity(Box<dyn Entity>),
    Trigger(Box<dyn Trigger>),
}

impl Clone for Owned {
    fn clone(&self) -> Self {
        match self {
            Owned::Player(player) => Owned::Player(player.clone_player()),
            Owned::Entity(entity) => Owned::Entity(entity.clone_entity()),
            Owned::Trigger(trigger) => Owned::Trigger(trigger.clone_trigger()),
        }
    }
}

/// One unit of intended change.
///
/// ```
/// use rust_wumpus::core::PlayerId;
/// use rust_wumpus::effects::{Effect, EffectKind};
///
/// let effect = Effect::new(EffectKind::RemoveItem)
///     .with_player(PlayerId::new(0))
///     .with_message("Arrows");
/// assert_eq!(effect.kind(), EffectKind::RemoveItem);
/// assert_eq!(effect.message(), "Arrows");
/// assert!(effect.owned().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Effect {
    kind: EffectKind,
    pub info: Option<i32>,
    pub player: Option<PlayerId>,
    pub entity: Option<EntityId>,
    pub trigger: Option<TriggerId>,
    owned: Option<Owned>,
    pub message: Option<String>,
    pub room: Option<RoomPos>,
}

impl Effect {
    /// Create an effect with an empty payload.
    #[must_use]
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            info: None,
            player: None,
            entity: None,
            trigger: None,
            owned: None,
            message: None,
            room: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    #[must_use]
    pub fn is(&self, kind: EffectKind) -> bool {
        self.kind == kind
    }

    // === Builders ===

    #[must_use]
    pub fn with_info(mut self, info: i32) -> Self {
        self.info = Some(info);
        self
    }

    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerId) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Reference a mover by whichever id kind it is.
    #[must_use]
    pub fn with_mover(self, mover: Mover) -> Self {
        match mover {
            Mover::Player(id) => self.with_player(id),
            Mover::Trigger(id) => self.with_trigger(id),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_room(mut self, room: RoomPos) -> Self {
        self.room = Some(room);
        self
    }

    #[must_use]
    pub fn with_direction(self, direction: Direction) -> Self {
        self.with_info(direction.code())
    }

    /// Give this effect exclusive ownership of `object`.
    ///
    /// The matching reference field is filled in from the object so the
    /// rest of the sequence can keep referring to it by id. Any previously
    /// owned object is dropped.
    #[must_use]
    pub fn owning(mut self, object: Owned) -> Self {
        match &object {
            Owned::Player(player) => self.player = Some(player.player_id()),
            Owned::Entity(entity) => self.entity = Some(entity.id()),
            Owned::Trigger(trigger) => {
                if let Mover::Trigger(id) = trigger.mover() {
                    self.trigger = Some(id);
                }
            }
        }
        self.owned = Some(object);
        self
    }

    // === Shorthands ===

    /// A control marker with no payload.
    #[must_use]
    pub fn marker(kind: EffectKind) -> Self {
        Self::new(kind)
    }

    #[must_use]
    pub fn display(text: impl Into<String>) -> Self {
        Self::new(EffectKind::DisplayText).with_message(text)
    }

    #[must_use]
    pub fn win(text: impl Into<String>) -> Self {
        Self::new(EffectKind::WinGame).with_message(text)
    }

    #[must_use]
    pub fn lose(text: impl Into<String>) -> Self {
        Self::new(EffectKind::LoseGame).with_message(text)
    }

    /// A `CreateObject` effect that owns `object`.
    #[must_use]
    pub fn create(object: Owned) -> Self {
        Self::new(EffectKind::CreateObject).owning(object)
    }

    // === Accessors ===

    /// Message text, empty when unset.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }

    /// Decoded direction from `info`.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.info.and_then(Direction::from_code)
    }

    /// The referenced mover, preferring the player reference.
    #[must_use]
    pub fn mover(&self) -> Option<Mover> {
        self.player
            .map(Mover::Player)
            .or(self.trigger.map(Mover::Trigger))
    }

    #[must_use]
    pub fn owned(&self) -> Option<&Owned> {
        self.owned.as_ref()
    }

    /// Transfer the owned object out. The effect keeps its id references.
    pub fn take_owned(&mut self) -> Option<Owned> {
        self.owned.take()
    }
}
