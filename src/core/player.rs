//! Player identification, per-player storage and turn rotation.
//!
//! ## PlayerId
//!
//! Type-safe player identifier. Indices are 0-based internally and shown
//! 1-based to humans ("Player 1" is `PlayerId(0)`).
//!
//! ## PlayerMap
//!
//! One value per seat, such as each player's status.
//!
//! ## Roster
//!
//! Who is playing, who is active, who has won or lost, and whose turn comes
//! next. Players who have lost are skipped by every rotation query.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Most seats a single game can name with a `PlayerId`.
pub const MAX_SEATS: usize = u8::MAX as usize;

/// Player identifier supporting 1-255 players.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use rust_wumpus::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players.len(), 3);
    /// assert_eq!(players[0], PlayerId::new(0));
    /// assert_eq!(players[2], PlayerId::new(2));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0 as u16 + 1)
    }
}

/// One value per seat, indexed by `PlayerId`.
///
/// ```
/// use rust_wumpus::core::{PlayerId, PlayerMap};
///
/// let mut arrows: PlayerMap<i32> = PlayerMap::new(2, |_| 1);
/// arrows[PlayerId::new(1)] += 2;
/// assert_eq!(arrows[PlayerId::new(0)], 1);
/// assert_eq!(arrows[PlayerId::new(1)], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Fill every seat from `init`.
    ///
    /// Panics on an empty table or more seats than `PlayerId` can name;
    /// configuration validation rules both out long before this.
    pub fn new(player_count: usize, init: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "a game needs at least one seat");
        assert!(player_count <= MAX_SEATS, "too many seats for PlayerId");

        Self {
            seats: PlayerId::all(player_count).map(init).collect(),
        }
    }

    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    /// `(seat, value)` pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.player_ids().zip(self.seats.iter())
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.seats.len())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.seats[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.seats[player.index()]
    }
}

/// Where a player stands in the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// Still in the game, waiting for a turn.
    #[default]
    Playing,
    /// Currently taking a turn.
    Active,
    /// Won the game.
    Won,
    /// Out of the game. Skipped by rotation and turn counting.
    Lost,
}

/// Turn rotation and win/lose bookkeeping.
///
/// ```
/// use rust_wumpus::core::{PlayerId, PlayerStatus, Roster};
///
/// let mut roster = Roster::new(3);
/// assert_eq!(roster.active(), PlayerId::new(0));
///
/// roster.set_status(PlayerId::new(1), PlayerStatus::Lost);
/// assert_eq!(roster.next_after(PlayerId::new(0)), Some(PlayerId::new(2)));
/// assert_eq!(roster.remaining(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    status: PlayerMap<PlayerStatus>,
    active: PlayerId,
    round_start: bool,
}

impl Roster {
    /// Create a roster where player 0 is active and a round is starting.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        let mut status = PlayerMap::with_value(player_count, PlayerStatus::Playing);
        status[PlayerId(0)] = PlayerStatus::Active;
        Self {
            status,
            active: PlayerId(0),
            round_start: true,
        }
    }

    /// Number of seats, including players who have lost.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.status.player_count()
    }

    /// All seats in turn order.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.status.player_ids()
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn active(&self) -> PlayerId {
        self.active
    }

    /// Whether the current turn is the first of a round.
    #[must_use]
    pub fn round_start(&self) -> bool {
        self.round_start
    }

    /// Clear the round-start flag once the turn has picked it up.
    pub fn clear_round_start(&mut self) {
        self.round_start = false;
    }

    #[must_use]
    pub fn status(&self, player: PlayerId) -> PlayerStatus {
        self.status[player]
    }

    pub fn set_status(&mut self, player: PlayerId, status: PlayerStatus) {
        self.status[player] = status;
    }

    #[must_use]
    pub fn is_lost(&self, player: PlayerId) -> bool {
        self.status[player] == PlayerStatus::Lost
    }

    /// Number of players who have not lost.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.status
            .iter()
            .filter(|(_, s)| **s != PlayerStatus::Lost)
            .count()
    }

    /// Seats that have lost, in seat order.
    #[must_use]
    pub fn lost_players(&self) -> Vec<PlayerId> {
        self.status
            .iter()
            .filter(|(_, s)| **s == PlayerStatus::Lost)
            .map(|(p, _)| p)
            .collect()
    }

    /// The next player after `player` in seat order who has not lost,
    /// wrapping around. May return `player` itself if it is the only one
    /// left. `None` when everyone has lost.
    #[must_use]
    pub fn next_after(&self, player: PlayerId) -> Option<PlayerId> {
        let count = self.player_count();
        (1..=count)
            .map(|step| PlayerId(((player.index() + step) % count) as u8))
            .find(|p| !self.is_lost(*p))
    }

    /// Hand the turn to the next player who has not lost.
    ///
    /// Wrapping past the last seat starts a new round. Returns the new
    /// active player, or `None` when nobody is left to play.
    pub fn advance(&mut self) -> Option<PlayerId> {
        if self.status[self.active] == PlayerStatus::Active {
            self.status[self.active] = PlayerStatus::Playing;
        }

        let count = self.player_count();
        let mut seat = self.active.index();
        for _ in 0..count {
            seat += 1;
            if seat == count {
                seat = 0;
                self.round_start = true;
            }
            let candidate = PlayerId(seat as u8);
            if !self.is_lost(candidate) {
                self.active = candidate;
                if self.status[candidate] == PlayerStatus::Playing {
                    self.status[candidate] = PlayerStatus::Active;
                }
                return Some(candidate);
            }
        }
        None
    }

    /// At least one player has won.
    #[must_use]
    pub fn has_winner(&self) -> bool {
        self.status.iter().any(|(_, s)| *s == PlayerStatus::Won)
    }

    /// The first player who won, if any.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.status
            .iter()
            .find(|(_, s)| **s == PlayerStatus::Won)
            .map(|(p, _)| p)
    }

    /// Every player has lost.
    #[must_use]
    pub fn all_lost(&self) -> bool {
        self.status.iter().all(|(_, s)| *s == PlayerStatus::Lost)
    }
}
