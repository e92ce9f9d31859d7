//! Core engine types: identifiers, players, positions, RNG, configuration, errors.
//!
//! This module holds the building blocks every other module leans on. None
//! of it knows about effects being interpreted or how a cave behaves.

pub mod entity;
pub mod player;
pub mod position;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::{EntityId, IdAllocator, Mover, TriggerId};
pub use player::{PlayerId, PlayerMap, PlayerStatus, Roster, MAX_SEATS};
pub use position::{Direction, RoomPos};
pub use rng::GameRng;
pub use config::{ConfigError, GameConfig, GameMode, MAX_CAVE_SIZE, MAX_PLAYERS, MIN_CAVE_SIZE};
pub use error::{EngineError, Result};
