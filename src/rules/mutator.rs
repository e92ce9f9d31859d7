//! The world-state collaborator.

use crate::core::{PlayerId, Result};
use crate::effects::{Effect, EffectSequence};

/// Applies ordinary effects to world state.
///
/// Games implement this trait to define how their world reacts. The
/// interpreter hands over every effect it does not handle itself, exactly
/// once, and splices whatever comes back right after it.
///
/// ## Implementation Notes
///
/// - `update_state` gets the effect mutably so it can take an owned object
///   out (`CreateObject`) or record data on it (a chosen direction).
/// - Returning an empty sequence means "nothing follows".
/// - Bad player input is answered with effects (a message and a fresh
///   prompt), never with an error.
/// - Errors are reserved for effects the world cannot make sense of, such
///   as a reference to an object it does not hold.
pub trait StateMutator {
    /// Apply one effect and return the effects it causes.
    fn update_state(&mut self, effect: &mut Effect) -> Result<EffectSequence>;

    /// Effects to run before the active player's action each turn.
    fn turn_update(&mut self, active: PlayerId, round_start: bool) -> EffectSequence;

    /// Text shown when the board is refreshed. `viewer` is the player whose
    /// items and percepts to include, if any.
    fn render(&self, _viewer: Option<PlayerId>) -> String {
        String::new()
    }

    /// Called once when a player loses, so the world can stop showing them.
    fn player_lost(&mut self, _player: PlayerId) {}
}
