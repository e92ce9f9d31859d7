//! The cave board: a grid of rooms and everything in them.
//!
//! `CaveBoard` is the cave's [`StateMutator`]. It owns every player, event
//! and arrow once their `CreateObject` effect has handed them over, and it
//! answers the board-level effects:
//!
//! | Effect | Needs | Result |
//! |---|---|---|
//! | `PromptPlayerAction` | player | `RequestInput` tagged `action` |
//! | `PromptDirection` | player, optional trigger | `RequestInput` tagged `direction` |
//! | `HandleInput` | player, tag, key | depends on the key |
//! | `CreateObject` | owned object | takes the object over |
//! | `MoveObject` | mover or entity, optional direction | events in the new room |
//! | `MoveObjectRandom` | mover or entity, mode code | events in the new room |
//! | `DestroyObject` | entity or trigger | |
//! | `PickupItem` | player, entity | |
//! | `RemoveItem` | player, item name, optional amount | |
//! | `ItemConditional` | player, item name, optional amount | `BeginConditional` on failure |
//! | `SetObjectEnabled` | mover, flag | |
//! | `TriggerEvent` | mover, event name | reactions of every matching event |
//! | `SetGameMode` | mode code | |
//!
//! ## Item checks
//!
//! `ItemConditional` passes when the player holds at least `info` of the
//! item. An `info` of zero flips the check: it passes only when the player
//! holds none. Without `info` the player needs at least one.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::{
    Direction, EngineError, EntityId, GameConfig, GameMode, GameRng, IdAllocator, Mover, PlayerId, Result,
    RoomPos, TriggerId,
};
use crate::effects::{Effect, EffectKind, EffectSequence, Owned};
use crate::rules::{key, StateMutator};
use crate::world::{Entity, Motion, PlayerObject, Trigger, WorldContext, ARROWS};

use super::events::{random_move, BabyWumpus, Wumpus};
use super::objects::Arrow;

/// Input tag for a turn action.
pub const ACTION_INPUT: &str = "action";
/// Input tag for a direction choice.
pub const DIRECTION_INPUT: &str = "direction";

const WALL_BUMP: &str = "You can't move in that direction! Please try again.";

fn unknown(what: impl std::fmt::Display) -> EngineError {
    EngineError::contract("cave board", format!("unknown {what}"))
}

fn missing(kind: EffectKind, what: &str) -> EngineError {
    EngineError::missing(kind, what)
}

#[derive(Clone, Debug, Default)]
struct Room {
    entities: SmallVec<[EntityId; 2]>,
    players: SmallVec<[PlayerId; 2]>,
}

impl Room {
    fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.players.is_empty()
    }
}

/// The reference cave world.
#[derive(Clone, Debug)]
pub struct CaveBoard {
    height: usize,
    width: usize,
    mode: GameMode,
    arrow_range: usize,
    rooms: Vec<Room>,
    entities: FxHashMap<EntityId, Box<dyn Entity>>,
    triggers: FxHashMap<TriggerId, Box<dyn Trigger>>,
    players: FxHashMap<PlayerId, Box<dyn PlayerObject>>,
    rng: GameRng,
    ids: IdAllocator,
}

impl CaveBoard {
    /// An empty cave sized and seeded from `config`.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            height: config.height,
            width: config.width,
            mode: config.game_mode,
            arrow_range: config.arrow_range,
            rooms: vec![Room::default(); config.height * config.width],
            entities: FxHashMap::default(),
            triggers: FxHashMap::default(),
            players: FxHashMap::default(),
            rng: GameRng::new(config.seed),
            ids: IdAllocator::new(),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn entity(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities.get(&id).map(|e| e.as_ref())
    }

    pub fn player(&self, id: PlayerId) -> Option<&dyn PlayerObject> {
        self.players.get(&id).map(|p| p.as_ref())
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&dyn Trigger> {
        self.triggers.get(&id).map(|t| t.as_ref())
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Events in `room`, in the order they arrived.
    pub fn entities_at(&self, room: RoomPos) -> impl Iterator<Item = &dyn Entity> + '_ {
        self.room(room)
            .into_iter()
            .flat_map(|r| r.entities.iter())
            .filter_map(|id| self.entity(*id))
    }

    /// Ids of every event called `name`, lowest first.
    #[must_use]
    pub fn find_entities(&self, name: &str) -> Vec<EntityId> {
        let mut found: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| e.name() == name)
            .map(|(id, _)| *id)
            .collect();
        found.sort_unstable();
        found
    }

    /// Whether nothing and nobody is in `room`.
    #[must_use]
    pub fn is_empty_room(&self, room: RoomPos) -> bool {
        self.room(room).is_some_and(Room::is_empty)
    }

    // === Setup ===

    /// Take over a world object.
    pub fn place(&mut self, object: Owned) -> Result<()> {
        match object {
            Owned::Player(player) => {
                let id = player.player_id();
                let index = self.index(player.location())?;
                self.rooms[index].players.push(id);
                debug!(player = %id, room = %player.location(), "player placed");
                self.players.insert(id, player);
            }
            Owned::Entity(entity) => {
                let id = entity.id();
                let index = self.index(entity.location())?;
                self.rooms[index].entities.push(id);
                debug!(entity = %id, name = entity.name(), room = %entity.location(), "event placed");
                self.entities.insert(id, entity);
            }
            Owned::Trigger(trigger) => {
                let Mover::Trigger(id) = trigger.mover() else {
                    return Err(EngineError::contract(
                        "cave board",
                        "players must be created as players, not triggers",
                    ));
                };
                self.index(trigger.location())?;
                self.triggers.insert(id, trigger);
            }
        }
        Ok(())
    }

    /// A fresh event id.
    pub fn allocate_entity(&mut self) -> EntityId {
        self.ids.entity()
    }

    pub(super) fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    // === Rooms ===

    fn index(&self, room: RoomPos) -> Result<usize> {
        if room.row < self.height && room.col < self.width {
            Ok(room.row * self.width + room.col)
        } else {
            Err(EngineError::contract(
                "cave board",
                format!("room {room} is outside the cave"),
            ))
        }
    }

    fn room(&self, room: RoomPos) -> Option<&Room> {
        self.index(room).ok().map(|i| &self.rooms[i])
    }

    fn position(&self, index: usize) -> RoomPos {
        RoomPos::new(index / self.width, index % self.width)
    }

    fn empty_rooms(&self) -> Vec<RoomPos> {
        (0..self.rooms.len())
            .filter(|i| self.rooms[*i].is_empty())
            .map(|i| self.position(i))
            .collect()
    }

    /// Rooms one step away, in direction order.
    fn neighbours(&self, room: RoomPos) -> SmallVec<[RoomPos; 4]> {
        Direction::ALL
            .iter()
            .map(|d| room.step(*d, self.height, self.width))
            .filter(|next| *next != room)
            .collect()
    }

    /// Where a random move of mode `code` from `from` ends up.
    fn random_target(&mut self, from: RoomPos, code: i32) -> RoomPos {
        let candidates: Vec<RoomPos> = match code {
            random_move::ANY_ROOM => (0..self.rooms.len()).map(|i| self.position(i)).collect(),
            random_move::EMPTY_ROOM => self.empty_rooms(),
            random_move::ADJACENT => self.neighbours(from).into_vec(),
            random_move::EMPTY_ADJACENT => self
                .neighbours(from)
                .into_iter()
                .filter(|r| self.is_empty_room(*r))
                .collect(),
            other => {
                warn!(code = other, "unknown random move; staying put");
                Vec::new()
            }
        };
        self.rng.choose(&candidates).copied().unwrap_or(from)
    }

    // === Objects ===

    fn player_ref(&self, id: PlayerId) -> Result<&dyn PlayerObject> {
        self.player(id).ok_or_else(|| unknown(id))
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Box<dyn PlayerObject>> {
        self.players.get_mut(&id).ok_or_else(|| unknown(id))
    }

    fn motion(&self, mover: Mover) -> Result<Motion> {
        match mover {
            Mover::Player(id) => self.players.get(&id).map(|p| *p.motion()),
            Mover::Trigger(id) => self.triggers.get(&id).map(|t| *t.motion()),
        }
        .ok_or_else(|| unknown(mover))
    }

    fn motion_mut(&mut self, mover: Mover) -> Result<&mut Motion> {
        match mover {
            Mover::Player(id) => self.players.get_mut(&id).map(|p| p.motion_mut()),
            Mover::Trigger(id) => self.triggers.get_mut(&id).map(|t| t.motion_mut()),
        }
        .ok_or_else(|| unknown(mover))
    }

    fn relocate_mover(&mut self, mover: Mover, to: RoomPos) -> Result<()> {
        let target = self.index(to)?;
        if let Mover::Player(id) = mover {
            let from = self.index(self.motion(mover)?.location)?;
            self.rooms[from].players.retain(|p| *p != id);
            self.rooms[target].players.push(id);
        }
        self.motion_mut(mover)?.location = to;
        Ok(())
    }

    fn relocate_entity(&mut self, id: EntityId, to: RoomPos) -> Result<()> {
        let target = self.index(to)?;
        let entity = self.entities.get_mut(&id).ok_or_else(|| unknown(id))?;
        let from = entity.location();
        entity.set_location(to);
        if let Ok(from) = self.index(from) {
            self.rooms[from].entities.retain(|e| *e != id);
        }
        self.rooms[target].entities.push(id);
        trace!(entity = %id, from = %from, to = %to, "event moved");
        Ok(())
    }

    /// Let `mover` set off each of `targets`.
    fn react(&mut self, mover: Mover, targets: &[EntityId]) -> Result<EffectSequence> {
        let visitor = match mover {
            Mover::Player(id) => self.players.get(&id).map(|p| p.visitor()),
            Mover::Trigger(id) => self.triggers.get(&id).map(|t| t.visitor()),
        }
        .ok_or_else(|| unknown(mover))?;

        let mut ctx = WorldContext::new(&mut self.rng, &mut self.ids);
        let mut sequence = EffectSequence::new();
        for id in targets {
            if let Some(entity) = self.entities.get(id) {
                trace!(entity = %id, mover = %mover, "event triggered");
                sequence.append(entity.triggered_by(&visitor, &mut ctx));
            }
        }
        Ok(sequence)
    }

    /// Put `mover` in `to` and set off what it finds there.
    ///
    /// A player who did not move and was given `bump` text hears it and is
    /// asked for another action.
    fn finish_move(&mut self, mover: Mover, to: RoomPos, bump: Option<&str>) -> Result<EffectSequence> {
        let before = self.motion(mover)?;
        self.relocate_mover(mover, to)?;

        if to != before.location {
            debug!(mover = %mover, from = %before.location, to = %to, "moved");
            if !before.enabled {
                return Ok(EffectSequence::new());
            }
            let here: SmallVec<[EntityId; 4]> = self.rooms[self.index(to)?].entities.iter().copied().collect();
            return self.react(mover, &here);
        }

        match (mover.player(), bump) {
            (Some(player), Some(text)) if !text.is_empty() => Ok([
                Effect::display(text),
                Effect::new(EffectKind::PromptPlayerAction).with_player(player),
            ]
            .into_iter()
            .collect()),
            _ => Ok(EffectSequence::new()),
        }
    }

    // === Effects ===

    fn move_object(&mut self, effect: &Effect) -> Result<EffectSequence> {
        if let Some(mover) = effect.mover() {
            let motion = self.motion(mover)?;
            let direction = effect
                .direction()
                .or(motion.direction)
                .ok_or_else(|| EngineError::contract("cave board", format!("{mover} has no direction to move in")))?;
            let to = motion.location.step(direction, self.height, self.width);
            return self.finish_move(mover, to, effect.message.as_deref());
        }

        let id = effect.entity.ok_or_else(|| missing(effect.kind(), "an object to move"))?;
        let from = self.entity(id).ok_or_else(|| unknown(id))?.location();
        let to = match effect.direction() {
            Some(direction) => from.step(direction, self.height, self.width),
            None => self.random_target(from, random_move::EMPTY_ROOM),
        };
        self.relocate_entity(id, to)?;
        Ok(EffectSequence::new())
    }

    fn move_object_random(&mut self, effect: &Effect) -> Result<EffectSequence> {
        let code = effect.info.unwrap_or(random_move::ANY_ROOM);
        if let Some(mover) = effect.mover() {
            let from = self.motion(mover)?.location;
            let to = self.random_target(from, code);
            return self.finish_move(mover, to, None);
        }

        let id = effect.entity.ok_or_else(|| missing(effect.kind(), "an object to move"))?;
        let from = self.entity(id).ok_or_else(|| unknown(id))?.location();
        let to = self.random_target(from, code);
        self.relocate_entity(id, to)?;
        Ok(EffectSequence::new())
    }

    fn create_object(&mut self, effect: &mut Effect) -> Result<EffectSequence> {
        let object = effect
            .take_owned()
            .ok_or_else(|| missing(EffectKind::CreateObject, "an owned object"))?;
        self.place(object)?;
        Ok(EffectSequence::new())
    }

    fn destroy_object(&mut self, effect: &Effect) -> Result<EffectSequence> {
        if let Some(id) = effect.entity {
            let entity = self.entities.remove(&id).ok_or_else(|| unknown(id))?;
            if let Ok(index) = self.index(entity.location()) {
                self.rooms[index].entities.retain(|e| *e != id);
            }
            debug!(entity = %id, name = entity.name(), "event destroyed");
        } else if let Some(id) = effect.trigger {
            self.triggers.remove(&id).ok_or_else(|| unknown(id))?;
            trace!(trigger = %id, "trigger destroyed");
        } else {
            return Err(missing(EffectKind::DestroyObject, "an event or trigger"));
        }
        Ok(EffectSequence::new())
    }

    fn pickup_item(&mut self, effect: &Effect) -> Result<EffectSequence> {
        let player = effect.player.ok_or_else(|| missing(effect.kind(), "a player"))?;
        let source = effect.entity.ok_or_else(|| missing(effect.kind(), "an event"))?;
        let item = self
            .entity(source)
            .ok_or_else(|| unknown(source))?
            .item()
            .ok_or_else(|| EngineError::contract("cave board", format!("{source} carries no item")))?;
        debug!(player = %player, item = %item.name, count = item.count, "item picked up");
        self.player_mut(player)?.inventory_mut().add(item);
        Ok(EffectSequence::new())
    }

    fn remove_item(&mut self, effect: &Effect) -> Result<EffectSequence> {
        let player = effect.player.ok_or_else(|| missing(effect.kind(), "a player"))?;
        let amount = u32::try_from(effect.info.unwrap_or(1)).unwrap_or(0);
        self.player_mut(player)?
            .inventory_mut()
            .remove(effect.message(), amount);
        Ok(EffectSequence::new())
    }

    fn item_conditional(&self, effect: &Effect) -> Result<EffectSequence> {
        let player = effect.player.ok_or_else(|| missing(effect.kind(), "a player"))?;
        let held = self
            .player_ref(player)?
            .inventory()
            .get(effect.message())
            .map(|s| i64::from(s.count));

        let passes = match (held, effect.info) {
            (Some(count), Some(0)) => count == 0,
            (Some(count), Some(needed)) => count >= i64::from(needed),
            (Some(count), None) => count > 0,
            (None, info) => info == Some(0),
        };
        trace!(player = %player, item = effect.message(), passes, "item check");

        if passes {
            Ok(EffectSequence::new())
        } else {
            Ok(Effect::marker(EffectKind::BeginConditional).into())
        }
    }

    fn set_object_enabled(&mut self, effect: &Effect) -> Result<EffectSequence> {
        let mover = effect.mover().ok_or_else(|| missing(effect.kind(), "a mover"))?;
        self.motion_mut(mover)?.enabled = effect.info == Some(1);
        Ok(EffectSequence::new())
    }

    fn trigger_event(&mut self, effect: &Effect) -> Result<EffectSequence> {
        let mover = effect.mover().ok_or_else(|| missing(effect.kind(), "a mover"))?;
        let targets = self.find_entities(effect.message());
        self.react(mover, &targets)
    }

    fn prompt_action(effect: &Effect) -> Result<EffectSequence> {
        let player = effect.player.ok_or_else(|| missing(effect.kind(), "a player"))?;
        Ok(Effect::new(EffectKind::RequestInput)
            .with_player(player)
            .with_message(ACTION_INPUT)
            .into())
    }

    fn prompt_direction(effect: &Effect) -> Result<EffectSequence> {
        let player = effect.player.ok_or_else(|| missing(effect.kind(), "a player"))?;
        let mut request = Effect::new(EffectKind::RequestInput)
            .with_player(player)
            .with_message(DIRECTION_INPUT);
        request.trigger = effect.trigger;
        Ok(request.into())
    }

    fn handle_input(&mut self, effect: &Effect) -> Result<EffectSequence> {
        let player = effect.player.ok_or_else(|| missing(effect.kind(), "a player"))?;
        let value = effect.info.ok_or_else(|| missing(effect.kind(), "an input value"))?;
        match effect.message() {
            ACTION_INPUT => {
                let mut sequence = self.action(player, value)?;
                sequence.push(Effect::marker(EffectKind::ForceUpdateEnd));
                Ok(sequence)
            }
            DIRECTION_INPUT => self.direction(player, effect.trigger, value),
            other => Err(EngineError::contract(
                "cave board",
                format!("unknown input tag {other:?}"),
            )),
        }
    }

    /// What a key press on the turn prompt does.
    fn action(&mut self, player: PlayerId, value: i32) -> Result<EffectSequence> {
        let (direction, help) = {
            let object = self.player_ref(player)?;
            (object.to_direction(value), object.action_help())
        };
        let prompt = Effect::new(EffectKind::PromptPlayerAction).with_player(player);

        let sequence: EffectSequence = if let Some(direction) = direction {
            Effect::new(EffectKind::MoveObject)
                .with_player(player)
                .with_direction(direction)
                .with_message(WALL_BUMP)
                .into()
        } else if value == key(' ') {
            self.fire_arrow(player)?
        } else if value == key('h') {
            [Effect::display(format!("{help}x: Exit the Game\n")), prompt].into_iter().collect()
        } else if value == key('x') {
            [Effect::marker(EffectKind::ForceGameEnd), prompt].into_iter().collect()
        } else {
            [Effect::display("Invalid action. Please try again."), prompt]
                .into_iter()
                .collect()
        };
        Ok(sequence)
    }

    /// What a key press on a direction prompt does.
    fn direction(&mut self, player: PlayerId, trigger: Option<TriggerId>, value: i32) -> Result<EffectSequence> {
        let (direction, help) = {
            let object = self.player_ref(player)?;
            (object.to_direction(value), object.direction_help())
        };
        let mut reprompt = Effect::new(EffectKind::PromptDirection).with_player(player);
        reprompt.trigger = trigger;

        if let Some(direction) = direction {
            let mover = trigger.map_or(Mover::Player(player), Mover::Trigger);
            self.motion_mut(mover)?.direction = Some(direction);
            trace!(mover = %mover, ?direction, "direction chosen");
            return Ok(EffectSequence::new());
        }

        let first = if value == key('x') {
            Effect::marker(EffectKind::ForceGameEnd)
        } else if value == key('h') {
            Effect::display(format!("{help}x: Exit The Game\n"))
        } else {
            Effect::display("Please enter a valid direction.")
        };
        Ok([first, reprompt].into_iter().collect())
    }

    /// Check for arrows, ask for a direction, then loose one.
    ///
    /// When the player has no arrows the nested prompt ends the turn before
    /// the flight is reached, and the unused arrow is dropped with its
    /// `CreateObject` effect.
    fn fire_arrow(&mut self, player: PlayerId) -> Result<EffectSequence> {
        let location = self.player_ref(player)?.location();
        let id = self.ids.trigger();
        let arrow = Arrow::new(id, location);

        let mut sequence: EffectSequence = [
            Effect::new(EffectKind::ItemConditional)
                .with_player(player)
                .with_message(ARROWS)
                .with_info(0),
            Effect::display("You don't have any arrows!"),
            Effect::new(EffectKind::PromptPlayerAction).with_player(player),
            Effect::marker(EffectKind::EndConditional),
            Effect::display("What direction would you like to fire in?"),
            Effect::create(Owned::Trigger(Box::new(arrow))),
            Effect::new(EffectKind::PromptDirection)
                .with_player(player)
                .with_trigger(id),
            Effect::new(EffectKind::RemoveItem)
                .with_player(player)
                .with_message(ARROWS)
                .with_info(1),
        ]
        .into_iter()
        .collect();

        for _ in 0..self.arrow_range {
            sequence.push(Effect::new(EffectKind::MoveObject).with_trigger(id));
        }
        for name in [Wumpus::NAME, BabyWumpus::NAME] {
            sequence.push(
                Effect::new(EffectKind::TriggerEvent)
                    .with_trigger(id)
                    .with_message(name),
            );
        }
        sequence.push(Effect::new(EffectKind::DestroyObject).with_trigger(id));
        Ok(sequence)
    }

    fn percepts(&self, room: RoomPos) -> Vec<String> {
        self.neighbours(room)
            .into_iter()
            .filter_map(|next| {
                let mut heard: Vec<&str> = self.entities_at(next).filter_map(|e| e.percept()).collect();
                if heard.is_empty() {
                    return None;
                }
                heard.sort_unstable();
                Some(heard.join(" "))
            })
            .collect()
    }

    fn room_symbol(&self, index: usize) -> char {
        let room = &self.rooms[index];
        let player = room
            .players
            .iter()
            .filter_map(|id| self.players.get(id))
            .find_map(|p| p.symbol());
        if let Some(symbol) = player {
            return symbol;
        }
        if self.mode == GameMode::Debug {
            if let Some(entity) = room.entities.iter().find_map(|id| self.entities.get(id)) {
                return entity.symbol();
            }
        }
        ' '
    }
}

impl StateMutator for CaveBoard {
    fn update_state(&mut self, effect: &mut Effect) -> Result<EffectSequence> {
        match effect.kind() {
            EffectKind::PromptPlayerAction => Self::prompt_action(effect),
            EffectKind::PromptDirection => Self::prompt_direction(effect),
            EffectKind::HandleInput => self.handle_input(effect),
            EffectKind::CreateObject => self.create_object(effect),
            EffectKind::MoveObject => self.move_object(effect),
            EffectKind::MoveObjectRandom => self.move_object_random(effect),
            EffectKind::DestroyObject => self.destroy_object(effect),
            EffectKind::PickupItem => self.pickup_item(effect),
            EffectKind::RemoveItem => self.remove_item(effect),
            EffectKind::ItemConditional => self.item_conditional(effect),
            EffectKind::SetObjectEnabled => self.set_object_enabled(effect),
            EffectKind::TriggerEvent => self.trigger_event(effect),
            EffectKind::SetGameMode => {
                let code = effect.info.ok_or_else(|| missing(effect.kind(), "a mode"))?;
                self.mode = GameMode::from_code(code)
                    .ok_or_else(|| EngineError::contract("cave board", format!("unknown game mode {code}")))?;
                debug!(mode = ?self.mode, "game mode set");
                Ok(EffectSequence::new())
            }
            other => Err(EngineError::contract(
                "cave board",
                format!("{other:?} is not a board effect"),
            )),
        }
    }

    fn turn_update(&mut self, active: PlayerId, round_start: bool) -> EffectSequence {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort_unstable();

        let mut sequence = EffectSequence::new();
        for id in ids {
            if let Some(entity) = self.entities.get_mut(&id) {
                let mut ctx = WorldContext::new(&mut self.rng, &mut self.ids);
                sequence.append(entity.turn_update(active, round_start, &mut ctx));
            }
        }
        sequence
    }

    fn render(&self, viewer: Option<PlayerId>) -> String {
        let mut out = String::new();
        let viewer = viewer.and_then(|id| self.players.get(&id));
        if let Some(player) = viewer {
            out.push_str(&player.inventory().listing());
        }

        let border = format!("-{}\n", "----".repeat(self.width));
        for row in 0..self.height {
            out.push_str(&border);
            out.push('|');
            for col in 0..self.width {
                out.push(' ');
                out.push(self.room_symbol(row * self.width + col));
                out.push_str(" |");
            }
            out.push('\n');
        }
        out.push_str(&border);

        if let Some(player) = viewer {
            for line in self.percepts(player.location()) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    fn player_lost(&mut self, player: PlayerId) {
        if let Some(object) = self.players.get_mut(&player) {
            object.hide();
            object.motion_mut().enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::cave::events::{ArrowCache, BatSwarm, EscapeRope, Gold};
    use crate::games::cave::objects::Adventurer;
    use crate::world::GOLD;

    const P0: PlayerId = PlayerId::new(0);

    fn board() -> CaveBoard {
        let mut board = CaveBoard::new(&GameConfig::default().with_size(4, 4));
        board
            .place(Owned::Player(Box::new(Adventurer::new(P0, RoomPos::new(0, 0)))))
            .unwrap();
        board
    }

    fn apply(board: &mut CaveBoard, effect: Effect) -> EffectSequence {
        let mut effect = effect;
        board.update_state(&mut effect).unwrap()
    }

    #[test]
    fn test_prompt_requests_action_input() {
        let mut board = board();
        let out = apply(&mut board, Effect::new(EffectKind::PromptPlayerAction).with_player(P0));
        let request = out.head().unwrap();
        assert_eq!(request.kind(), EffectKind::RequestInput);
        assert_eq!(request.message(), ACTION_INPUT);
        assert_eq!(request.player, Some(P0));
    }

    #[test]
    fn test_move_into_wall_reprompts() {
        let mut board = board();
        let out = apply(
            &mut board,
            Effect::new(EffectKind::HandleInput)
                .with_player(P0)
                .with_message(ACTION_INPUT)
                .with_info(key('w')),
        );
        assert_eq!(out.kinds(), vec![EffectKind::MoveObject, EffectKind::ForceUpdateEnd]);

        let mut move_up = out.head().unwrap().clone();
        let bump = board.update_state(&mut move_up).unwrap();
        assert_eq!(bump.kinds(), vec![EffectKind::DisplayText, EffectKind::PromptPlayerAction]);
        assert_eq!(board.player(P0).unwrap().location(), RoomPos::new(0, 0));
    }

    #[test]
    fn test_move_sets_off_events() {
        let mut board = board();
        let id = board.allocate_entity();
        board
            .place(Owned::Entity(Box::new(BatSwarm::new(id, RoomPos::new(0, 1)))))
            .unwrap();

        let out = apply(
            &mut board,
            Effect::new(EffectKind::MoveObject)
                .with_player(P0)
                .with_direction(Direction::Right),
        );
        assert_eq!(out.head_kind(), Some(EffectKind::BeginRoundWait));
        assert_eq!(board.player(P0).unwrap().location(), RoomPos::new(0, 1));
        assert!(!board.is_empty_room(RoomPos::new(0, 1)));
        assert!(board.is_empty_room(RoomPos::new(0, 0)));
    }

    #[test]
    fn test_invalid_and_help_keys() {
        let mut board = board();
        let invalid = apply(
            &mut board,
            Effect::new(EffectKind::HandleInput)
                .with_player(P0)
                .with_message(ACTION_INPUT)
                .with_info(key('q')),
        );
        assert_eq!(
            invalid.kinds(),
            vec![EffectKind::DisplayText, EffectKind::PromptPlayerAction, EffectKind::ForceUpdateEnd]
        );

        let help = apply(
            &mut board,
            Effect::new(EffectKind::HandleInput)
                .with_player(P0)
                .with_message(ACTION_INPUT)
                .with_info(key('h')),
        );
        assert!(help.head().unwrap().message().ends_with("x: Exit the Game\n"));
    }

    #[test]
    fn test_item_conditional_rules() {
        let mut board = board();
        let check = |board: &mut CaveBoard, info: Option<i32>| {
            let mut effect = Effect::new(EffectKind::ItemConditional)
                .with_player(P0)
                .with_message(ARROWS);
            effect.info = info;
            board.update_state(&mut effect).unwrap().is_empty()
        };

        // Never carried.
        assert!(check(&mut board, Some(0)));
        assert!(!check(&mut board, None));
        assert!(!check(&mut board, Some(1)));

        board
            .player_mut(P0)
            .unwrap()
            .inventory_mut()
            .add(crate::world::ItemStack::new(ARROWS, 2));
        assert!(!check(&mut board, Some(0)));
        assert!(check(&mut board, None));
        assert!(check(&mut board, Some(2)));
        assert!(!check(&mut board, Some(3)));

        apply(
            &mut board,
            Effect::new(EffectKind::RemoveItem)
                .with_player(P0)
                .with_message(ARROWS)
                .with_info(2),
        );
        // Carried but used up.
        assert!(check(&mut board, Some(0)));
        assert!(!check(&mut board, None));
    }

    #[test]
    fn test_pickup_and_destroy() {
        let mut board = board();
        let id = board.allocate_entity();
        board
            .place(Owned::Entity(Box::new(Gold::new(id, RoomPos::new(0, 0)))))
            .unwrap();

        apply(
            &mut board,
            Effect::new(EffectKind::PickupItem).with_player(P0).with_entity(id),
        );
        apply(&mut board, Effect::new(EffectKind::DestroyObject).with_entity(id));

        assert_eq!(board.player(P0).unwrap().inventory().count(GOLD), 1);
        assert!(board.entity(id).is_none());
        assert_eq!(board.entities_at(RoomPos::new(0, 0)).count(), 0);
    }

    #[test]
    fn test_create_takes_ownership() {
        let mut board = board();
        let id = board.allocate_entity();
        let mut create = Effect::create(Owned::Entity(Box::new(EscapeRope::new(id, RoomPos::new(2, 2)))));
        assert_eq!(create.entity, Some(id));

        board.update_state(&mut create).unwrap();
        assert!(create.owned().is_none());
        assert_eq!(board.entity(id).unwrap().name(), EscapeRope::NAME);

        // A second hand-over of the same effect has nothing left to give.
        assert!(board.update_state(&mut create).is_err());
    }

    #[test]
    fn test_fire_without_arrows_is_guarded() {
        let mut board = board();
        let out = apply(
            &mut board,
            Effect::new(EffectKind::HandleInput)
                .with_player(P0)
                .with_message(ACTION_INPUT)
                .with_info(key(' ')),
        );
        let kinds = out.kinds();
        assert_eq!(kinds[0], EffectKind::ItemConditional);
        assert_eq!(kinds.iter().filter(|k| **k == EffectKind::MoveObject).count(), 3);
        assert_eq!(kinds.last(), Some(&EffectKind::ForceUpdateEnd));
    }

    #[test]
    fn test_direction_choice_goes_to_trigger() {
        let mut board = board();
        let arrow_id = TriggerId::new(9);
        board
            .place(Owned::Trigger(Box::new(Arrow::new(arrow_id, RoomPos::new(0, 0)))))
            .unwrap();

        let out = apply(
            &mut board,
            Effect::new(EffectKind::HandleInput)
                .with_player(P0)
                .with_trigger(arrow_id)
                .with_message(DIRECTION_INPUT)
                .with_info(key('s')),
        );
        assert!(out.is_empty());
        assert_eq!(board.trigger(arrow_id).unwrap().motion().direction, Some(Direction::Down));
        assert_eq!(board.player(P0).unwrap().motion().direction, None);

        let bad = apply(
            &mut board,
            Effect::new(EffectKind::HandleInput)
                .with_player(P0)
                .with_trigger(arrow_id)
                .with_message(DIRECTION_INPUT)
                .with_info(key('z')),
        );
        assert_eq!(bad.kinds(), vec![EffectKind::DisplayText, EffectKind::PromptDirection]);
        assert_eq!(bad.iter().nth(1).unwrap().borrow().trigger, Some(arrow_id));
    }

    #[test]
    fn test_disabled_arrow_passes_silently() {
        let mut board = board();
        let cache = board.allocate_entity();
        board
            .place(Owned::Entity(Box::new(ArrowCache::new(cache, RoomPos::new(1, 0)))))
            .unwrap();
        let wumpus = board.allocate_entity();
        board
            .place(Owned::Entity(Box::new(Wumpus::new(wumpus, RoomPos::new(2, 0)))))
            .unwrap();

        let arrow_id = TriggerId::new(0);
        let mut arrow = Arrow::new(arrow_id, RoomPos::new(0, 0));
        arrow.motion_mut().direction = Some(Direction::Down);
        board.place(Owned::Trigger(Box::new(arrow))).unwrap();

        // Arrow caches ignore arrows.
        let first = apply(&mut board, Effect::new(EffectKind::MoveObject).with_trigger(arrow_id));
        assert!(first.is_empty());

        apply(
            &mut board,
            Effect::new(EffectKind::SetObjectEnabled)
                .with_trigger(arrow_id)
                .with_info(0),
        );
        let second = apply(&mut board, Effect::new(EffectKind::MoveObject).with_trigger(arrow_id));
        assert!(second.is_empty());
        assert_eq!(board.trigger(arrow_id).unwrap().location(), RoomPos::new(2, 0));
    }

    #[test]
    fn test_trigger_event_by_name() {
        let mut board = board();
        let wumpus = board.allocate_entity();
        board
            .place(Owned::Entity(Box::new(Wumpus::new(wumpus, RoomPos::new(3, 3)))))
            .unwrap();
        board
            .place(Owned::Trigger(Box::new(Arrow::new(TriggerId::new(0), RoomPos::new(3, 3)))))
            .unwrap();

        let out = apply(
            &mut board,
            Effect::new(EffectKind::TriggerEvent)
                .with_trigger(TriggerId::new(0))
                .with_message(Wumpus::NAME),
        );
        assert_eq!(out.kinds(), vec![EffectKind::WinGame]);
    }

    #[test]
    fn test_random_moves_stay_in_bounds() {
        let mut board = board();
        for code in 0..4 {
            apply(
                &mut board,
                Effect::new(EffectKind::MoveObjectRandom)
                    .with_player(P0)
                    .with_info(code),
            );
            let at = board.player(P0).unwrap().location();
            assert!(at.row < 4 && at.col < 4);
        }
    }

    #[test]
    fn test_render_grid_and_debug_mode() {
        let mut board = board();
        let id = board.allocate_entity();
        board
            .place(Owned::Entity(Box::new(Wumpus::new(id, RoomPos::new(0, 1)))))
            .unwrap();

        let normal = board.render(Some(P0));
        assert!(normal.starts_with("-----------------\n| * |   |"));
        assert!(normal.contains("You smell a terrible stench.\n"));

        apply(
            &mut board,
            Effect::new(EffectKind::SetGameMode).with_info(GameMode::Debug.code()),
        );
        assert!(board.render(None).contains("| * | W |"));
        assert!(!board.render(None).contains("stench"));
    }

    #[test]
    fn test_lost_player_is_hidden() {
        let mut board = board();
        board.player_lost(P0);
        assert!(!board.render(None).contains('*'));
        assert!(!board.player(P0).unwrap().motion().enabled);
    }

    #[test]
    fn test_unknown_references_are_errors() {
        let mut board = board();
        let mut effect = Effect::new(EffectKind::DestroyObject).with_entity(EntityId::new(42));
        assert!(matches!(
            board.update_state(&mut effect),
            Err(EngineError::ContractViolation { .. })
        ));

        let mut stray = Effect::display("not mine");
        assert!(board.update_state(&mut stray).is_err());
    }

    #[test]
    fn test_reference_less_effects_are_missing_references() {
        let mut board = board();
        for kind in [EffectKind::MoveObject, EffectKind::HandleInput, EffectKind::PickupItem] {
            let mut effect = Effect::new(kind);
            assert!(matches!(
                board.update_state(&mut effect),
                Err(EngineError::MissingReference { kind: k, .. }) if k == kind
            ));
        }
    }
}
