//! Turn execution.
//!
//! - [`Interpreter`] walks one turn's effect sequence, resolving control
//!   markers and delegating the rest through a [`TurnHost`].
//! - [`Session`] owns a whole game: it seats the players, builds each
//!   turn's starting sequence, answers session-level effects, and decides
//!   when the game is over.

mod interpreter;
mod session;

pub use interpreter::{Interpreter, InterpreterState, TurnContext, TurnEnd, TurnHost};
pub use session::{GameOutcome, Session};
