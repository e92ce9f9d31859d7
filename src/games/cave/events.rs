//! The events hidden in the cave.
//!
//! Every event reacts only by describing what should happen next as an
//! effect sequence. Hazards that want to act "later" wrap their effects in
//! a round wait, so they fire when the same player's next turn comes up.
//!
//! | Event | Symbol | Reacts to |
//! |---|---|---|
//! | [`Wumpus`] | `W` | players entering, arrows (anywhere) |
//! | [`BatSwarm`] | `S` | players entering |
//! | [`BottomlessPit`] | `P` | players entering |
//! | [`ArrowCache`] | `A` | players entering |
//! | [`Gold`] | `G` | players entering |
//! | [`EscapeRope`] | `R` | players entering |
//! | [`BabyWumpus`] | `w` | players entering, arrows (anywhere) |

use crate::core::{EntityId, PlayerId, RoomPos};
use crate::effects::{Effect, EffectKind, EffectSequence, Owned};
use crate::world::{Entity, ItemStack, Visitor, WorldContext, ARROWS, GOLD};

/// `MoveObjectRandom` info codes understood by the board.
pub mod random_move {
    /// Any room on the board.
    pub const ANY_ROOM: i32 = 0;
    /// A room with nothing in it.
    pub const EMPTY_ROOM: i32 = 1;
    /// One step in a random direction that does not hit a wall.
    pub const ADJACENT: i32 = 2;
    /// One step into an empty neighbouring room, if there is one.
    pub const EMPTY_ADJACENT: i32 = 3;
}

/// The player who walked in, if the visitor is a player standing in `room`.
fn entering_player(visitor: &Visitor<'_>, room: RoomPos) -> Option<PlayerId> {
    visitor.mover.player().filter(|_| visitor.location == room)
}

/// `[BeginRoundWait, ..effects, EndWait]`
fn round_wait(flag: Option<i32>, effects: impl IntoIterator<Item = Effect>) -> EffectSequence {
    let mut begin = Effect::new(EffectKind::BeginRoundWait);
    if let Some(flag) = flag {
        begin = begin.with_info(flag);
    }
    let mut sequence = EffectSequence::from(begin);
    sequence.extend(effects);
    sequence.push(Effect::marker(EffectKind::EndWait));
    sequence
}

/// `[PickupItem, DestroyObject, <round wait: message>]`
fn discovery(player: PlayerId, entity: EntityId, message: &str) -> EffectSequence {
    let mut sequence: EffectSequence = [
        Effect::new(EffectKind::PickupItem)
            .with_player(player)
            .with_entity(entity),
        Effect::new(EffectKind::DestroyObject).with_entity(entity),
    ]
    .into_iter()
    .collect();
    sequence.append(round_wait(None, [Effect::display(message)]));
    sequence
}

/// A forced flight: redraw, explain, ask for a direction, then `moving`.
fn forced_flight(player: PlayerId, message: String, moving: Effect) -> EffectSequence {
    round_wait(
        Some(1),
        [
            Effect::marker(EffectKind::RefreshBoardDisplay),
            Effect::display(message),
            Effect::new(EffectKind::PromptDirection).with_player(player),
            moving,
            Effect::marker(EffectKind::ForceUpdateEnd),
        ],
    )
}

// =============================================================================
// Wumpus
// =============================================================================

/// Round counting for a Wumpus that roams and breeds.
#[derive(Clone, Debug, PartialEq)]
pub struct Wandering {
    pub rounds: u32,
    pub babies_after: u32,
    pub baby_count: usize,
    pub baby_kill_chance: f64,
}

/// The beast itself.
#[derive(Clone, Debug)]
pub struct Wumpus {
    id: EntityId,
    location: RoomPos,
    wandering: Option<Wandering>,
}

impl Wumpus {
    pub const NAME: &'static str = "Wumpus";

    #[must_use]
    pub fn new(id: EntityId, location: RoomPos) -> Self {
        Self {
            id,
            location,
            wandering: None,
        }
    }

    /// Roam one room per round and give birth after `babies_after` rounds.
    #[must_use]
    pub fn wandering(mut self, babies_after: u32, baby_count: usize, baby_kill_chance: f64) -> Self {
        self.wandering = Some(Wandering {
            rounds: 0,
            babies_after,
            baby_count,
            baby_kill_chance,
        });
        self
    }

    #[must_use]
    pub fn rounds(&self) -> Option<u32> {
        self.wandering.as_ref().map(|w| w.rounds)
    }
}

impl Entity for Wumpus {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn location(&self) -> RoomPos {
        self.location
    }

    fn set_location(&mut self, room: RoomPos) {
        self.location = room;
    }

    fn symbol(&self) -> char {
        'W'
    }

    fn percept(&self) -> Option<&str> {
        Some("You smell a terrible stench.")
    }

    fn turn_update(
        &mut self,
        _active: PlayerId,
        round_start: bool,
        ctx: &mut WorldContext<'_>,
    ) -> EffectSequence {
        let Some(wandering) = self.wandering.as_mut() else {
            return EffectSequence::new();
        };
        let mut sequence = EffectSequence::new();

        if round_start {
            wandering.rounds += 1;
            if wandering.rounds == wandering.babies_after {
                for _ in 0..wandering.baby_count {
                    let baby = BabyWumpus::new(ctx.ids.entity(), self.location, wandering.baby_kill_chance);
                    let baby_id = baby.id;
                    sequence.push(Effect::create(Owned::Entity(Box::new(baby))));
                    sequence.push(
                        Effect::new(EffectKind::MoveObjectRandom)
                            .with_entity(baby_id)
                            .with_info(random_move::EMPTY_ROOM),
                    );
                }
            } else {
                sequence.push(
                    Effect::new(EffectKind::MoveObjectRandom)
                        .with_entity(self.id)
                        .with_info(random_move::EMPTY_ADJACENT),
                );
            }
        }

        if wandering.rounds == wandering.babies_after {
            sequence.push(Effect::display("Baby Wumpus have been born. Watch Out!"));
        }
        sequence
    }

    fn triggered_by(&self, visitor: &Visitor<'_>, _ctx: &mut WorldContext<'_>) -> EffectSequence {
        if visitor.is_player() {
            return match entering_player(visitor, self.location) {
                Some(player) => Effect::lose(
                    "The Wumpus angrily eats the foolish adventurer that entered its room.",
                )
                .with_player(player)
                .into(),
                None => EffectSequence::new(),
            };
        }
        if visitor.location == self.location {
            Effect::win("You have killed the Wumpus!!").into()
        } else {
            // Startled by the arrow.
            Effect::new(EffectKind::MoveObjectRandom)
                .with_entity(self.id)
                .with_info(random_move::EMPTY_ROOM)
                .into()
        }
    }

    fn clone_entity(&self) -> Box<dyn Entity> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Hazards
// =============================================================================

/// Carries whoever enters to a random neighbouring room on their next turn.
#[derive(Clone, Debug)]
pub struct BatSwarm {
    id: EntityId,
    location: RoomPos,
}

impl BatSwarm {
    pub const NAME: &'static str = "BatSwarm";

    #[must_use]
    pub fn new(id: EntityId, location: RoomPos) -> Self {
        Self { id, location }
    }
}

impl Entity for BatSwarm {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn location(&self) -> RoomPos {
        self.location
    }

    fn set_location(&mut self, room: RoomPos) {
        self.location = room;
    }

    fn symbol(&self) -> char {
        'S'
    }

    fn percept(&self) -> Option<&str> {
        Some("You hear wings flapping.")
    }

    fn triggered_by(&self, visitor: &Visitor<'_>, _ctx: &mut WorldContext<'_>) -> EffectSequence {
        let Some(player) = entering_player(visitor, self.location) else {
            return EffectSequence::new();
        };
        forced_flight(
            player,
            format!(
                "\n{}: You've been swarmed by bats and must escape! Choose a direction to move.\n",
                visitor.name
            ),
            Effect::new(EffectKind::MoveObjectRandom)
                .with_player(player)
                .with_info(random_move::ADJACENT),
        )
    }

    fn clone_entity(&self) -> Box<dyn Entity> {
        Box::new(self.clone())
    }
}

/// A pit with no discernable bottom.
#[derive(Clone, Debug)]
pub struct BottomlessPit {
    id: EntityId,
    location: RoomPos,
    fall_chance: f64,
}

impl BottomlessPit {
    pub const NAME: &'static str = "BottomlessPit";

    #[must_use]
    pub fn new(id: EntityId, location: RoomPos, fall_chance: f64) -> Self {
        Self {
            id,
            location,
            fall_chance,
        }
    }
}

impl Entity for BottomlessPit {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn location(&self) -> RoomPos {
        self.location
    }

    fn set_location(&mut self, room: RoomPos) {
        self.location = room;
    }

    fn symbol(&self) -> char {
        'P'
    }

    fn percept(&self) -> Option<&str> {
        Some("You feel a breeze.")
    }

    fn triggered_by(&self, visitor: &Visitor<'_>, ctx: &mut WorldContext<'_>) -> EffectSequence {
        let Some(player) = entering_player(visitor, self.location) else {
            return EffectSequence::new();
        };
        if ctx.rng.gen_bool(self.fall_chance) {
            Effect::lose(
                "You slipped and fell into a pit! You still haven't found the bottom...\n\n...aaaahhhhhhhhh!!!!!!!",
            )
            .with_player(player)
            .into()
        } else {
            round_wait(
                None,
                [Effect::display(
                    "You narrowly avoided falling into a pit with no discernable bottom.",
                )],
            )
        }
    }

    fn clone_entity(&self) -> Box<dyn Entity> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Treasures
// =============================================================================

/// A spare arrow lying on the floor.
#[derive(Clone, Debug)]
pub struct ArrowCache {
    id: EntityId,
    location: RoomPos,
}

impl ArrowCache {
    #[must_use]
    pub fn new(id: EntityId, location: RoomPos) -> Self {
        Self { id, location }
    }
}

impl Entity for ArrowCache {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        ARROWS
    }

    fn location(&self) -> RoomPos {
        self.location
    }

    fn set_location(&mut self, room: RoomPos) {
        self.location = room;
    }

    fn symbol(&self) -> char {
        'A'
    }

    fn item(&self) -> Option<ItemStack> {
        Some(ItemStack::single(ARROWS))
    }

    fn triggered_by(&self, visitor: &Visitor<'_>, _ctx: &mut WorldContext<'_>) -> EffectSequence {
        match entering_player(visitor, self.location) {
            Some(player) => discovery(player, self.id, "You discovered an arrow!"),
            None => EffectSequence::new(),
        }
    }

    fn clone_entity(&self) -> Box<dyn Entity> {
        Box::new(self.clone())
    }
}

/// The Wumpus' hoard.
#[derive(Clone, Debug)]
pub struct Gold {
    id: EntityId,
    location: RoomPos,
}

impl Gold {
    #[must_use]
    pub fn new(id: EntityId, location: RoomPos) -> Self {
        Self { id, location }
    }
}

impl Entity for Gold {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        GOLD
    }

    fn location(&self) -> RoomPos {
        self.location
    }

    fn set_location(&mut self, room: RoomPos) {
        self.location = room;
    }

    fn symbol(&self) -> char {
        'G'
    }

    fn percept(&self) -> Option<&str> {
        Some("You see something shimmer nearby.")
    }

    fn item(&self) -> Option<ItemStack> {
        Some(ItemStack::single(GOLD))
    }

    fn triggered_by(&self, visitor: &Visitor<'_>, _ctx: &mut WorldContext<'_>) -> EffectSequence {
        match entering_player(visitor, self.location) {
            Some(player) => discovery(player, self.id, "You stumbled upon the gold of the Wumpus!!"),
            None => EffectSequence::new(),
        }
    }

    fn clone_entity(&self) -> Box<dyn Entity> {
        Box::new(self.clone())
    }
}

/// The way out. Only worth climbing with the gold.
#[derive(Clone, Debug)]
pub struct EscapeRope {
    id: EntityId,
    location: RoomPos,
}

impl EscapeRope {
    pub const NAME: &'static str = "EscapeRope";

    #[must_use]
    pub fn new(id: EntityId, location: RoomPos) -> Self {
        Self { id, location }
    }
}

impl Entity for EscapeRope {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn location(&self) -> RoomPos {
        self.location
    }

    fn set_location(&mut self, room: RoomPos) {
        self.location = room;
    }

    fn symbol(&self) -> char {
        'R'
    }

    fn triggered_by(&self, visitor: &Visitor<'_>, _ctx: &mut WorldContext<'_>) -> EffectSequence {
        let Some(player) = entering_player(visitor, self.location) else {
            return EffectSequence::new();
        };
        [
            Effect::new(EffectKind::ItemConditional)
                .with_player(player)
                .with_message(GOLD),
            Effect::win("You have escaped with the gold of the fearsome Wumpus!").with_player(player),
            Effect::marker(EffectKind::EndConditional),
        ]
        .into_iter()
        .collect()
    }

    fn clone_entity(&self) -> Box<dyn Entity> {
        Box::new(self.clone())
    }
}

// =============================================================================
// Baby Wumpus
// =============================================================================

/// Offspring of a wandering Wumpus. Smaller, but still hungry.
#[derive(Clone, Debug)]
pub struct BabyWumpus {
    id: EntityId,
    location: RoomPos,
    kill_chance: f64,
}

impl BabyWumpus {
    pub const NAME: &'static str = "BabyWumpus";

    #[must_use]
    pub fn new(id: EntityId, location: RoomPos, kill_chance: f64) -> Self {
        Self {
            id,
            location,
            kill_chance,
        }
    }
}

impl Entity for BabyWumpus {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn location(&self) -> RoomPos {
        self.location
    }

    fn set_location(&mut self, room: RoomPos) {
        self.location = room;
    }

    fn symbol(&self) -> char {
        'w'
    }

    fn percept(&self) -> Option<&str> {
        Some("You feel like you're being watched.")
    }

    fn triggered_by(&self, visitor: &Visitor<'_>, ctx: &mut WorldContext<'_>) -> EffectSequence {
        if visitor.is_player() {
            let Some(player) = entering_player(visitor, self.location) else {
                return EffectSequence::new();
            };
            if ctx.rng.gen_bool(self.kill_chance) {
                return Effect::lose("You've been eaten by a baby Wumpus!")
                    .with_player(player)
                    .into();
            }
            return forced_flight(
                player,
                format!(
                    "\n{}: You've been attacked by a baby Wumpus! Choose a direction to run.",
                    visitor.name
                ),
                Effect::new(EffectKind::MoveObject).with_player(player),
            );
        }

        if visitor.location != self.location {
            return Effect::new(EffectKind::MoveObjectRandom)
                .with_entity(self.id)
                .with_info(random_move::EMPTY_ADJACENT)
                .into();
        }

        // Shot: the arrow stops here.
        let mut sequence = EffectSequence::new();
        if let Some(arrow) = visitor.mover.trigger() {
            sequence.push(
                Effect::new(EffectKind::SetObjectEnabled)
                    .with_trigger(arrow)
                    .with_info(0),
            );
        }
        sequence.push(Effect::new(EffectKind::DestroyObject).with_entity(self.id));
        sequence.append(round_wait(None, [Effect::display("You killed a baby Wumpus.")]));
        sequence
    }

    fn clone_entity(&self) -> Box<dyn Entity> {
        Box::new(self.clone())
    }
}
