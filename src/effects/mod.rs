//! Effects and effect sequences.
//!
//! - `Effect`: one unit of intended change, tagged with an `EffectKind`
//! - `Owned`: a world object an effect owns outright
//! - `EffectSequence`: an ordered, splice-able chain of effects
//!
//! ## Design Philosophy
//!
//! Content never mutates the world directly. It describes what should
//! happen as effects, and only the interpreter decides when each one runs:
//! now, after a skipped conditional region, or several turns later.

mod effect;
mod sequence;

pub use effect::{Effect, EffectKind, Owned};
pub use sequence::{EffectCell, EffectSequence, IntoIter, Iter};
