//! Collaborator contracts for game implementations.
//!
//! Games implement `StateMutator` to define:
//! - How each ordinary effect changes the world
//! - What happens at the start of every turn
//! - How the world is drawn
//!
//! Front ends implement the console traits (`DisplaySink`, `InputSource`,
//! `ExitPrompt`). The engine calls into both but never interprets
//! game-specific concepts directly.

pub mod console;
pub mod mutator;

pub use console::{key, Console, DisplaySink, ExitPrompt, InputSource, LineConsole, ScriptedConsole};
pub use mutator::StateMutator;
