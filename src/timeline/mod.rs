//! The cross-turn timeline.
//!
//! Effects that should happen "a turn from now" or "once everyone has
//! moved" are lifted out of the running sequence and parked here until
//! their turn comes around. See [`DeferredScheduler`] for the merge rules.

mod scheduler;

pub use scheduler::{DeferredScheduler, TimelineEntry};
