//! # rust-wumpus
//!
//! A turn-based effect interpreter, with Hunt the Wumpus as its reference
//! game.
//!
//! ## Design Principles
//!
//! 1. **Effects, Not Mutations**: Content never changes the world directly.
//!    It describes what should happen as an `EffectSequence`, and the
//!    interpreter decides when each effect runs.
//!
//! 2. **One Place for Control Flow**: Skipping, ending a turn early,
//!    ending the game and deferring work to a later turn are all markers in
//!    the sequence, resolved by the interpreter alone.
//!
//! 3. **N-Player First**: Deferred work is counted in turns of players who
//!    are still in the game, whatever the player count.
//!
//! ## Architecture
//!
//! - **Depth-First Expansion**: Effects generated by an effect run right
//!   after it, before its later siblings.
//!
//! - **Cross-Turn Timeline**: Wait blocks are parked between turn
//!   boundaries and handed back when their turn comes up.
//!
//! - **Owned Objects Travel in Effects**: A `CreateObject` effect owns the
//!   new object until the world takes it over; copies of the effect deep
//!   clone it.
//!
//! ## Modules
//!
//! - `core`: Identifiers, players and turn rotation, positions, RNG,
//!   configuration, errors
//! - `effects`: Effect kinds, effects and effect sequences
//! - `world`: Contracts for objects that effects carry
//! - `rules`: Collaborator contracts (world state, display, input)
//! - `timeline`: The deferred scheduler
//! - `engine`: The per-turn interpreter and the game session
//! - `games`: Game implementations (the cave)

pub mod core;
pub mod effects;
pub mod world;
pub mod rules;
pub mod timeline;
pub mod engine;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    Direction, EngineError, EntityId, GameConfig, GameMode, GameRng, Mover, PlayerId, PlayerMap,
    PlayerStatus, Result, RoomPos, Roster, TriggerId,
};

pub use crate::effects::{Effect, EffectKind, EffectSequence, Owned};

pub use crate::world::{Entity, Inventory, ItemStack, PlayerObject, Trigger};

pub use crate::rules::{Console, DisplaySink, ExitPrompt, InputSource, StateMutator};

pub use crate::timeline::DeferredScheduler;

pub use crate::engine::{GameOutcome, Interpreter, InterpreterState, Session, TurnEnd, TurnHost};
