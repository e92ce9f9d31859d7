//! Games built on the engine.
//!
//! - `cave`: Hunt the Wumpus, the reference implementation of every
//!   collaborator contract

pub mod cave;
