//! Cross-turn deferred scheduling.
//!
//! The timeline is a queue of turn boundaries, each tagged with the player
//! whose future turn it stands for, with deferred blocks sitting after the
//! boundary they are due at:
//!
//! ```text
//! [Boundary(P2)] [Boundary(P1)] [Block] [Block] [Boundary(P2)] [Block]
//!   next turn      turn after     due there        third turn    due there
//! ```
//!
//! ## Scheduling
//!
//! `schedule(block, k)` walks the boundaries of players still in the game.
//! If it reaches the k-th one, the block goes in right after it, ahead of
//! any blocks already parked there. Otherwise the missing boundaries are
//! appended, following the turn rotation from the active player, and the
//! block goes at the very end.
//!
//! ## Draining
//!
//! `due()` runs once per turn. It pops the first boundary and every block
//! up to the next boundary, so a block scheduled `k` turns ahead comes back
//! from exactly the k-th call.
//!
//! ## Losers
//!
//! Boundaries of players who have lost do not count toward `k`. When the
//! set of lost players changes, `realign` retags every boundary to follow
//! the surviving rotation, so each remaining boundary matches one future
//! turn again.

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::core::{EngineError, PlayerId, Result, Roster};
use crate::effects::EffectSequence;

/// One entry of the timeline.
#[derive(Clone, Debug)]
pub enum TimelineEntry {
    /// A future turn of this player.
    Boundary(PlayerId),
    /// Effects deferred to the turn of the boundary before them.
    Block(EffectSequence),
}

impl TimelineEntry {
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        matches!(self, TimelineEntry::Boundary(_))
    }
}

/// Owner of the cross-turn timeline.
#[derive(Clone, Debug, Default)]
pub struct DeferredScheduler {
    timeline: VecDeque<TimelineEntry>,
}

impl DeferredScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing is scheduled and no boundary is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Number of boundaries currently on the timeline.
    #[must_use]
    pub fn boundary_count(&self) -> usize {
        self.timeline.iter().filter(|e| e.is_boundary()).count()
    }

    /// Number of blocks waiting to fire.
    #[must_use]
    pub fn pending_blocks(&self) -> usize {
        self.timeline.len() - self.boundary_count()
    }

    /// Player tags of the boundaries, in order.
    #[must_use]
    pub fn boundaries(&self) -> Vec<PlayerId> {
        self.timeline
            .iter()
            .filter_map(|e| match e {
                TimelineEntry::Boundary(p) => Some(*p),
                TimelineEntry::Block(_) => None,
            })
            .collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.timeline.iter()
    }

    /// Schedule `block` to run `turns_ahead` turns from now.
    ///
    /// `turns_ahead` must be at least 1; the current turn cannot be targeted.
    pub fn schedule(
        &mut self,
        block: EffectSequence,
        turns_ahead: usize,
        roster: &Roster,
    ) -> Result<()> {
        if turns_ahead == 0 {
            return Err(EngineError::contract(
                "scheduler",
                "turns_ahead must be at least 1",
            ));
        }

        let mut passed = 0;
        let mut player = roster.active();
        for index in 0..self.timeline.len() {
            let TimelineEntry::Boundary(tag) = self.timeline[index] else {
                continue;
            };
            if roster.is_lost(tag) {
                continue;
            }
            passed += 1;
            if let Some(next) = roster.next_after(player) {
                player = next;
            }
            if passed == turns_ahead {
                debug!(turns_ahead, at = index + 1, "block merged after existing boundary");
                self.timeline.insert(index + 1, TimelineEntry::Block(block));
                return Ok(());
            }
        }

        for _ in passed..turns_ahead {
            player = roster.next_after(player).ok_or_else(|| {
                EngineError::contract("scheduler", "no players left to take a turn")
            })?;
            self.timeline.push_back(TimelineEntry::Boundary(player));
        }
        debug!(
            turns_ahead,
            appended = turns_ahead - passed,
            "block appended after new boundaries"
        );
        self.timeline.push_back(TimelineEntry::Block(block));
        Ok(())
    }

    /// Pop the next boundary and return everything due there.
    pub fn due(&mut self) -> EffectSequence {
        let mut due = EffectSequence::new();
        if let Some(TimelineEntry::Boundary(player)) = self.timeline.front() {
            trace!(player = %player, "boundary consumed");
            self.timeline.pop_front();
        }
        while let Some(TimelineEntry::Block(_)) = self.timeline.front() {
            if let Some(TimelineEntry::Block(block)) = self.timeline.pop_front() {
                due.append(block);
            }
        }
        due
    }

    /// Retag boundaries to follow the surviving rotation after the active
    /// player's turn.
    pub fn realign(&mut self, roster: &Roster) {
        let mut player = roster.active();
        for entry in self.timeline.iter_mut() {
            if let TimelineEntry::Boundary(tag) = entry {
                match roster.next_after(player) {
                    Some(next) => {
                        player = next;
                        *tag = next;
                    }
                    None => {
                        warn!("no players left; timeline boundaries left as they were");
                        return;
                    }
                }
            }
        }
        debug!(boundaries = ?self.boundaries(), "timeline realigned");
    }

    /// Drop every boundary and block.
    pub fn clear(&mut self) {
        self.timeline.clear();
    }
}
