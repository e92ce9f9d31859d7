//! Hunt the Wumpus on a grid.
//!
//! The reference game for the engine. Players wander a cave of square rooms
//! looking for the Wumpus' gold and a way back out, while bats, pits and the
//! Wumpus itself try to end the expedition early.
//!
//! - Move with `w`/`a`/`s`/`d`, fire an arrow with space, `h` for help and
//!   `x` to quit.
//! - Rooms next to an event give a hint (a stench, a breeze, flapping
//!   wings).
//! - Bring the gold back to the escape rope to win, or shoot the Wumpus.
//!
//! ## Modules
//!
//! - `board`: [`CaveBoard`], the `StateMutator` that owns the world
//! - `events`: the stationary events
//! - `objects`: adventurers and arrows
//! - `setup`: [`CaveSetup`], which fills a cave from a `GameConfig`

mod board;
mod events;
mod objects;
mod setup;

pub use board::{CaveBoard, ACTION_INPUT, DIRECTION_INPUT};
pub use events::{
    random_move, ArrowCache, BabyWumpus, BatSwarm, BottomlessPit, EscapeRope, Gold, Wandering, Wumpus,
};
pub use objects::{Adventurer, Arrow, PLAYER_SYMBOLS};
pub use setup::CaveSetup;
