//! The per-turn effect interpreter.
//!
//! The interpreter walks one `EffectSequence` per turn from left to right.
//! Control markers it resolves itself; every other effect is delegated to
//! the [`TurnHost`], and whatever the host returns is spliced in right
//! after the effect that caused it, so generated effects run before the
//! siblings that followed their generator.
//!
//! ## Control markers
//!
//! | Marker | Behavior |
//! |---|---|
//! | `ForceGameEnd` | stop if the game is decided, else ask to confirm |
//! | `ForceUpdateEnd` | drop the rest of the turn |
//! | `BeginWait` / `BeginRoundWait` | defer the block up to `EndWait` |
//! | `BeginConditional` | skip to the matching `EndConditional` |
//! | `EndConditional` | no-op (the guard passed) |
//! | `SetPlayerActionEnabled` | open or close the turn prompt gate |
//! | `RequestInput` | read a key and splice in `HandleInput` |
//!
//! Markers do not nest. A wait or conditional region ends at the first
//! matching end marker.
//!
//! ## Suspension
//!
//! `RequestInput` is the only suspension point. When no input is available
//! the interpreter reports `AwaitingInput` and keeps the request at the
//! head of the sequence; the next [`Interpreter::run`] picks up exactly
//! there.

use tracing::{debug, trace, warn};

use crate::core::{EngineError, Result, Roster};
use crate::effects::{Effect, EffectKind, EffectSequence};
use crate::timeline::DeferredScheduler;

/// How a turn finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnEnd {
    /// Play moves on to the next player.
    Continue,
    /// The game is over.
    Stop,
}

/// Where the interpreter stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpreterState {
    /// No turn has been started.
    Idle,
    Running,
    /// Paused on a `RequestInput` until input becomes available.
    AwaitingInput,
    Ended(TurnEnd),
}

/// Per-turn flags, reset whenever a turn begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnContext {
    /// Whether `PromptPlayerAction` is delegated this turn.
    pub player_action_enabled: bool,
    /// Effects taken off the sequence so far this turn.
    pub position: usize,
}

impl Default for TurnContext {
    fn default() -> Self {
        Self {
            player_action_enabled: true,
            position: 0,
        }
    }
}

/// Everything the interpreter needs from the surrounding session.
pub trait TurnHost {
    /// Apply one ordinary effect and return its follow-up effects.
    fn update_state(&mut self, effect: &mut Effect) -> Result<EffectSequence>;

    /// Next input value, or `None` if none is available yet.
    fn read_input(&mut self) -> Option<i32>;

    /// Ask whether the player really wants to quit.
    fn confirm_exit(&mut self) -> bool;

    /// Some player has won.
    fn has_winner(&self) -> bool;

    /// Every player has lost.
    fn all_lost(&self) -> bool;

    /// Current turn rotation.
    fn roster(&self) -> &Roster;
}

/// The per-turn driver.
#[derive(Debug)]
pub struct Interpreter {
    scheduler: DeferredScheduler,
    active: EffectSequence,
    context: TurnContext,
    state: InterpreterState,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scheduler: DeferredScheduler::new(),
            active: EffectSequence::new(),
            context: TurnContext::default(),
            state: InterpreterState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> InterpreterState {
        self.state
    }

    #[must_use]
    pub fn context(&self) -> &TurnContext {
        &self.context
    }

    #[must_use]
    pub fn scheduler(&self) -> &DeferredScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut DeferredScheduler {
        &mut self.scheduler
    }

    /// Effects still to run this turn.
    #[must_use]
    pub fn pending(&self) -> &EffectSequence {
        &self.active
    }

    /// Start a new turn with `sequence`, discarding anything left over.
    pub fn begin_turn(&mut self, sequence: EffectSequence) {
        self.active = sequence;
        self.context = TurnContext::default();
        self.state = InterpreterState::Running;
    }

    /// Run the current turn until it ends or needs input.
    pub fn run<H: TurnHost + ?Sized>(&mut self, host: &mut H) -> Result<InterpreterState> {
        match self.state {
            InterpreterState::Idle | InterpreterState::Ended(_) => return Ok(self.state),
            InterpreterState::Running | InterpreterState::AwaitingInput => {}
        }
        self.state = InterpreterState::Running;
        let mut lost_before = host.roster().lost_players();

        loop {
            self.active.skip_placeholders();
            let Some(cell) = self.active.head_cell() else {
                self.state = InterpreterState::Ended(TurnEnd::Continue);
                break;
            };
            let kind = cell.borrow().kind();
            let position = self.context.position;
            debug!(kind = ?kind, position, "effect");

            match kind {
                EffectKind::ForceGameEnd => {
                    if host.has_winner() || host.all_lost() || host.confirm_exit() {
                        self.active = EffectSequence::new();
                        self.state = InterpreterState::Ended(TurnEnd::Stop);
                        break;
                    }
                }
                EffectKind::ForceUpdateEnd => {
                    self.active = EffectSequence::new();
                    self.state = InterpreterState::Ended(TurnEnd::Continue);
                    break;
                }
                EffectKind::BeginWait | EffectKind::BeginRoundWait => {
                    let prompt_off = cell.borrow().info == Some(1);
                    self.defer_block(kind, prompt_off, host.roster())?;
                    continue;
                }
                EffectKind::EndWait => {
                    return Err(EngineError::structural(
                        kind,
                        position,
                        "EndWait without a wait marker before it",
                    ));
                }
                EffectKind::BeginConditional => {
                    self.active.advance();
                    if !self.active.skip_until(EffectKind::EndConditional) {
                        return Err(EngineError::structural(
                            kind,
                            position,
                            "no matching EndConditional",
                        ));
                    }
                    trace!(position, "conditional region skipped");
                    self.active.advance();
                    self.context.position += 1;
                    continue;
                }
                EffectKind::EndConditional => {}
                EffectKind::SetPlayerActionEnabled => {
                    self.context.player_action_enabled = cell.borrow().info == Some(1);
                }
                EffectKind::RequestInput => {
                    let Some(value) = host.read_input() else {
                        debug!(position, "waiting for input");
                        self.state = InterpreterState::AwaitingInput;
                        return Ok(self.state);
                    };
                    let handle = Self::handle_input(&cell.borrow(), value);
                    self.active.insert_after_head(handle.into());
                }
                EffectKind::PromptPlayerAction if !self.context.player_action_enabled => {
                    trace!(position, "turn prompt disabled");
                }
                _ => {
                    let follow = {
                        let mut effect = cell.borrow_mut();
                        host.update_state(&mut effect).map_err(|err| err.at(position))?
                    };
                    trace!(generated = follow.len(), "effects spliced");
                    self.active.insert_after_head(follow);

                    let lost_now = host.roster().lost_players();
                    if lost_now != lost_before {
                        self.scheduler.realign(host.roster());
                        lost_before = lost_now;
                    }
                }
            }

            self.active.advance();
            self.context.position += 1;
        }

        Ok(self.state)
    }

    /// Lift the block after a wait marker out of the sequence and park it
    /// on the timeline.
    fn defer_block(&mut self, kind: EffectKind, prompt_off: bool, roster: &Roster) -> Result<()> {
        let position = self.context.position;
        self.active.advance();
        let Some(block) = self.active.split_until(EffectKind::EndWait) else {
            return Err(EngineError::structural(kind, position, "no matching EndWait"));
        };
        self.active.advance();
        self.context.position += 1;

        let mut deferred = EffectSequence::new();
        if prompt_off {
            deferred.push(Effect::new(EffectKind::SetPlayerActionEnabled).with_info(0));
        }
        deferred.append(block);

        let remaining = roster.remaining();
        if remaining == 0 {
            warn!(kind = ?kind, "no players left; deferred block dropped");
            return Ok(());
        }
        let turns_ahead = match kind {
            EffectKind::BeginRoundWait => remaining,
            _ => 1,
        };
        debug!(kind = ?kind, turns_ahead, effects = deferred.len(), "block deferred");
        self.scheduler.schedule(deferred, turns_ahead, roster)
    }

    /// The `HandleInput` answering `request` with `value`.
    fn handle_input(request: &Effect, value: i32) -> Effect {
        let mut handle = Effect::new(EffectKind::HandleInput).with_info(value);
        handle.player = request.player;
        handle.entity = request.entity;
        handle.trigger = request.trigger;
        handle.message = request.message.clone();
        handle.room = request.room;
        handle
    }
}
