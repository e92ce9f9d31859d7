//! A whole game: turn rotation, win/lose bookkeeping and display buffering.
//!
//! The session sits between the interpreter and the board. It answers the
//! session-level effects itself (`WinGame`, `LoseGame`, `DisplayText`,
//! `RefreshBoardDisplay`) and passes everything else on to the board.
//!
//! ## Display buffering
//!
//! Text produced before the board has been drawn in a turn is held back and
//! shown right after the next redraw, so messages from deferred blocks land
//! under the board rather than being wiped by it.

use tracing::{debug, info};

use crate::core::{ConfigError, PlayerId, PlayerStatus, Result, Roster, MAX_SEATS};
use crate::effects::{Effect, EffectKind, EffectSequence, Owned};
use crate::rules::{Console, StateMutator};
use crate::world::PlayerObject;

use super::interpreter::{Interpreter, InterpreterState, TurnEnd, TurnHost};

/// How a game finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Won(PlayerId),
    AllLost,
    /// A player confirmed the exit, or input ran out.
    Quit,
}

#[derive(Debug, Default)]
struct DisplayState {
    board_drawn: bool,
    pending: String,
}

/// Drives turns until the game is decided.
///
/// ```
/// use rust_wumpus::core::GameConfig;
/// use rust_wumpus::engine::{GameOutcome, Session};
/// use rust_wumpus::games::cave::CaveSetup;
/// use rust_wumpus::rules::ScriptedConsole;
///
/// let config = GameConfig::default().with_seed(7);
/// let (board, players) = CaveSetup::new(config).build().unwrap();
/// let console = ScriptedConsole::with_keys("x").with_confirmations([true]);
///
/// let mut session = Session::new(board, console, players).unwrap();
/// assert_eq!(session.play().unwrap(), GameOutcome::Quit);
/// ```
#[derive(Debug)]
pub struct Session<W, C> {
    world: W,
    console: C,
    roster: Roster,
    interpreter: Interpreter,
    display: DisplayState,
    turns: u64,
}

impl<W: StateMutator, C: Console> Session<W, C> {
    /// Hand every player to the board and seat the first one.
    pub fn new(mut world: W, console: C, players: Vec<Box<dyn PlayerObject>>) -> Result<Self> {
        if players.is_empty() {
            return Err(ConfigError::PlayerCount(0).into());
        }
        if players.len() > MAX_SEATS {
            return Err(ConfigError::Seats(players.len()).into());
        }
        let roster = Roster::new(players.len());
        for player in players {
            let mut create = Effect::create(Owned::Player(player));
            let follow = world.update_state(&mut create)?;
            if !follow.is_empty() {
                debug!(effects = follow.len(), "player setup effects ignored");
            }
        }
        info!(players = roster.player_count(), "setup complete");

        Ok(Self {
            world,
            console,
            roster,
            interpreter: Interpreter::new(),
            display: DisplayState::default(),
            turns: 0,
        })
    }

    #[must_use]
    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    #[must_use]
    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Turns started so far.
    #[must_use]
    pub fn turns(&self) -> u64 {
        self.turns
    }

    pub fn into_parts(self) -> (W, C) {
        (self.world, self.console)
    }

    /// Start the active player's turn and run it as far as it goes.
    pub fn play_turn(&mut self) -> Result<InterpreterState> {
        let active = self.roster.active();
        let round_start = self.roster.round_start();
        self.turns += 1;
        info!(player = %active, round_start, turn = self.turns, "turn started");

        let mut start = self.world.turn_update(active, round_start);
        start.append(self.interpreter.scheduler_mut().due());
        start.push(Effect::marker(EffectKind::RefreshBoardDisplay));
        start.push(Effect::new(EffectKind::PromptPlayerAction).with_player(active));

        self.roster.clear_round_start();
        self.display.board_drawn = false;
        self.interpreter.begin_turn(start);
        self.resume()
    }

    /// Continue a turn that stopped for input.
    pub fn resume(&mut self) -> Result<InterpreterState> {
        let mut host = SessionHost {
            world: &mut self.world,
            console: &mut self.console,
            roster: &mut self.roster,
            display: &mut self.display,
        };
        self.interpreter.run(&mut host)
    }

    /// Play until someone wins, everyone loses, or a player quits.
    pub fn play(&mut self) -> Result<GameOutcome> {
        loop {
            match self.play_turn()? {
                InterpreterState::Ended(TurnEnd::Stop) => break,
                InterpreterState::AwaitingInput => {
                    info!("input exhausted");
                    break;
                }
                _ => {}
            }
            if self.roster.has_winner() || self.roster.all_lost() {
                break;
            }
            if self.roster.advance().is_none() {
                break;
            }
        }
        Ok(self.finish())
    }

    fn finish(&mut self) -> GameOutcome {
        let mut host = SessionHost {
            world: &mut self.world,
            console: &mut self.console,
            roster: &mut self.roster,
            display: &mut self.display,
        };
        host.refresh();

        let outcome = if let Some(winner) = self.roster.winner() {
            GameOutcome::Won(winner)
        } else if self.roster.all_lost() {
            GameOutcome::AllLost
        } else {
            GameOutcome::Quit
        };

        let closing = match outcome {
            GameOutcome::Won(_) if self.roster.player_count() == 1 => "\nYou win!!!\n\n\n".to_string(),
            GameOutcome::Won(winner) => format!("\n{winner} wins!!!!\n\n\n"),
            GameOutcome::AllLost => {
                let plural = if self.roster.player_count() > 1 { "s" } else { "" };
                format!(
                    "\nThe mighty Wumpus has defeated the mere mortal{plural} who dared venture into its cave.\n\n\n"
                )
            }
            GameOutcome::Quit => "\nExiting. Please wait...\n\n\n".to_string(),
        };
        self.console.show(&closing);
        info!(outcome = ?outcome, turns = self.turns, "game over");
        outcome
    }
}

/// The session's side of the interpreter contract, borrowed for one run.
struct SessionHost<'a, W, C> {
    world: &'a mut W,
    console: &'a mut C,
    roster: &'a mut Roster,
    display: &'a mut DisplayState,
}

impl<W: StateMutator, C: Console> SessionHost<'_, W, C> {
    fn refresh(&mut self) {
        let active = self.roster.active();
        let viewer = match self.roster.status(active) {
            PlayerStatus::Won | PlayerStatus::Lost => None,
            PlayerStatus::Playing | PlayerStatus::Active => Some(active),
        };
        self.console.clear();
        self.console.show(&self.world.render(viewer));
        self.display.board_drawn = true;
        if !self.display.pending.is_empty() {
            let pending = std::mem::take(&mut self.display.pending);
            self.console.show(&pending);
        }
    }

    fn display(&mut self, text: &str) {
        if self.display.board_drawn {
            self.console.show(text);
        } else {
            self.display.pending.push_str(text);
        }
    }
}

impl<W: StateMutator, C: Console> TurnHost for SessionHost<'_, W, C> {
    fn update_state(&mut self, effect: &mut Effect) -> Result<EffectSequence> {
        match effect.kind() {
            EffectKind::WinGame => {
                self.refresh();
                let player = effect.player.unwrap_or_else(|| self.roster.active());
                self.roster.set_status(player, PlayerStatus::Won);
                info!(player = %player, "player won");
                self.console.show(&format!("\n\n{}\n", effect.message()));
                Ok(Effect::marker(EffectKind::ForceGameEnd).into())
            }
            EffectKind::LoseGame => {
                self.refresh();
                let player = effect.player.unwrap_or_else(|| self.roster.active());
                self.roster.set_status(player, PlayerStatus::Lost);
                self.world.player_lost(player);
                info!(player = %player, "player lost");
                self.console.show(&format!("\n{}\n", effect.message()));
                Ok(EffectSequence::new())
            }
            EffectKind::DisplayText => {
                let text = format!("{}\n", effect.message());
                self.display(&text);
                Ok(EffectSequence::new())
            }
            EffectKind::RefreshBoardDisplay => {
                self.refresh();
                Ok(EffectSequence::new())
            }
            _ => self.world.update_state(effect),
        }
    }

    fn read_input(&mut self) -> Option<i32> {
        self.console.read()
    }

    fn confirm_exit(&mut self) -> bool {
        self.console.confirm_exit()
    }

    fn has_winner(&self) -> bool {
        self.roster.has_winner()
    }

    fn all_lost(&self) -> bool {
        self.roster.all_lost()
    }

    fn roster(&self) -> &Roster {
        self.roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Direction, EngineError, Mover, RoomPos};
    use crate::rules::ScriptedConsole;
    use crate::world::{Inventory, Motion, Trigger};

    /// A board that records what reaches it and answers prompts with a
    /// scripted reaction per turn.
    #[derive(Debug, Default)]
    struct StubBoard {
        seen: Vec<EffectKind>,
        created: usize,
        reactions: Vec<EffectSequence>,
    }

    impl StateMutator for StubBoard {
        fn update_state(&mut self, effect: &mut Effect) -> Result<EffectSequence> {
            self.seen.push(effect.kind());
            match effect.kind() {
                EffectKind::CreateObject => {
                    assert!(effect.take_owned().is_some());
                    self.created += 1;
                    Ok(EffectSequence::new())
                }
                EffectKind::PromptPlayerAction if !self.reactions.is_empty() => {
                    Ok(self.reactions.remove(0))
                }
                _ => Ok(EffectSequence::new()),
            }
        }

        fn turn_update(&mut self, _active: PlayerId, _round_start: bool) -> EffectSequence {
            EffectSequence::new()
        }

        fn render(&self, _viewer: Option<PlayerId>) -> String {
            "[board]".to_string()
        }
    }

    #[derive(Clone, Debug)]
    struct Dummy {
        id: PlayerId,
        motion: Motion,
        inventory: Inventory,
    }

    impl Dummy {
        fn boxed(id: u8) -> Box<dyn PlayerObject> {
            Box::new(Self {
                id: PlayerId::new(id),
                motion: Motion::at(RoomPos::new(0, 0)),
                inventory: Inventory::new(),
            })
        }
    }

    impl Trigger for Dummy {
        fn mover(&self) -> Mover {
            Mover::Player(self.id)
        }
        fn name(&self) -> &str {
            "dummy"
        }
        fn motion(&self) -> &Motion {
            &self.motion
        }
        fn motion_mut(&mut self) -> &mut Motion {
            &mut self.motion
        }
        fn clone_trigger(&self) -> Box<dyn Trigger> {
            Box::new(self.clone())
        }
    }

    impl PlayerObject for Dummy {
        fn player_id(&self) -> PlayerId {
            self.id
        }
        fn symbol(&self) -> Option<char> {
            Some('*')
        }
        fn hide(&mut self) {}
        fn inventory(&self) -> &Inventory {
            &self.inventory
        }
        fn inventory_mut(&mut self) -> &mut Inventory {
            &mut self.inventory
        }
        fn to_direction(&self, _input: i32) -> Option<Direction> {
            None
        }
        fn action_help(&self) -> String {
            String::new()
        }
        fn direction_help(&self) -> String {
            String::new()
        }
        fn clone_player(&self) -> Box<dyn PlayerObject> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn test_new_hands_players_to_board() {
        let session = Session::new(
            StubBoard::default(),
            ScriptedConsole::new(),
            vec![Dummy::boxed(0), Dummy::boxed(1)],
        )
        .unwrap();
        assert_eq!(session.world().created, 2);
        assert_eq!(session.roster().player_count(), 2);
    }

    #[test]
    fn test_new_rejects_no_players() {
        let result = Session::new(StubBoard::default(), ScriptedConsole::new(), Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_more_seats_than_ids() {
        let players = (0..=MAX_SEATS).map(|_| Dummy::boxed(0)).collect();
        let result = Session::new(StubBoard::default(), ScriptedConsole::new(), players);
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::Seats(count))) if count == MAX_SEATS + 1
        ));
    }

    #[test]
    fn test_text_before_refresh_is_buffered() {
        let board = StubBoard {
            reactions: vec![[Effect::win("done")].into_iter().collect()],
            ..StubBoard::default()
        };
        let mut session = Session::new(board, ScriptedConsole::new(), vec![Dummy::boxed(0)]).unwrap();
        session
            .interpreter
            .scheduler_mut()
            .schedule(Effect::display("deferred").into(), 1, &session.roster)
            .unwrap();

        assert_eq!(session.play().unwrap(), GameOutcome::Won(PlayerId::new(0)));
        let shown = session.console().shown();
        assert_eq!(shown[0], "[board]");
        assert_eq!(shown[1], "deferred\n");
        assert!(session.console().transcript().contains("\n\ndone\n"));
        assert!(session.console().transcript().ends_with("\nYou win!!!\n\n\n"));
        assert_eq!(session.console().exit_prompts(), 0);
    }

    #[test]
    fn test_loss_ends_single_player_game() {
        let board = StubBoard {
            reactions: vec![[Effect::lose("eaten")].into_iter().collect()],
            ..StubBoard::default()
        };
        let mut session = Session::new(board, ScriptedConsole::new(), vec![Dummy::boxed(0)]).unwrap();
        assert_eq!(session.play().unwrap(), GameOutcome::AllLost);
        assert_eq!(session.roster().status(PlayerId::new(0)), PlayerStatus::Lost);
        assert!(session.console().transcript().contains("mere mortal who dared"));
    }

    #[test]
    fn test_rotation_skips_losers() {
        let board = StubBoard {
            reactions: vec![
                [Effect::lose("out")].into_iter().collect(),
                EffectSequence::new(),
                EffectSequence::new(),
                [Effect::win("made it")].into_iter().collect(),
            ],
            ..StubBoard::default()
        };
        let mut session = Session::new(
            board,
            ScriptedConsole::new(),
            vec![Dummy::boxed(0), Dummy::boxed(1), Dummy::boxed(2)],
        )
        .unwrap();
        // Seat 0 loses on the first turn, so the fourth turn goes to seat 1.
        assert_eq!(session.play().unwrap(), GameOutcome::Won(PlayerId::new(1)));
        assert_eq!(session.turns(), 4);
        assert!(session.console().transcript().contains("Player 2 wins!!!!"));
    }
}
