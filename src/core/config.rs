//! Game configuration.
//!
//! `GameConfig` carries every tunable of a cave game: board size, player
//! count, how many of each hazard to place, and the odds that drive the
//! hazards. It is plain serde data so the binary can read it from a TOML
//! file, and it offers `with_*` builders for code and tests.
//!
//! ```
//! use rust_wumpus::core::{GameConfig, GameMode};
//!
//! let config = GameConfig::default()
//!     .with_players(2)
//!     .with_size(6, 5)
//!     .with_mode(GameMode::Debug);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.width, 6);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::MAX_SEATS;

/// Smallest allowed board edge.
pub const MIN_CAVE_SIZE: usize = 4;
/// Largest allowed board edge.
pub const MAX_CAVE_SIZE: usize = 30;
/// Most players a game supports (one board symbol each).
pub const MAX_PLAYERS: usize = 5;

/// How the board is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Only players are visible.
    #[default]
    Normal,
    /// Every event is drawn on the board.
    Debug,
}

impl GameMode {
    /// Integer code carried by `SetGameMode` effects.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            GameMode::Normal => 0,
            GameMode::Debug => 1,
        }
    }

    #[must_use]
    pub const fn from_code(code: i32) -> Option<GameMode> {
        match code {
            0 => Some(GameMode::Normal),
            1 => Some(GameMode::Debug),
            _ => None,
        }
    }
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("player count must be between 1 and 5, got {0}")]
    PlayerCount(usize),

    #[error("a session seats at most {max} players, got {0}", max = MAX_SEATS)]
    Seats(usize),

    #[error("{dimension} must be between 4 and 30, got {value}")]
    CaveSize { dimension: &'static str, value: usize },

    #[error("{name} must be a probability between 0 and 1, got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("arrow range must be at least 1")]
    ArrowRange,

    #[error("a {rooms}-room cave cannot hold {events} events")]
    TooManyEvents { rooms: usize, events: usize },

    #[error("no room is far enough from the escape rope to hide the gold")]
    NoGoldRoom,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of players (1-5).
    pub player_count: usize,

    /// Board width in rooms.
    pub width: usize,

    /// Board height in rooms.
    pub height: usize,

    pub game_mode: GameMode,

    /// Seed for every random choice in the game.
    pub seed: u64,

    /// Rooms an arrow travels when fired.
    pub arrow_range: usize,

    /// Arrows each player carries at the start.
    pub starting_arrows: u32,

    pub bat_swarms: usize,
    pub pits: usize,
    pub arrow_caches: usize,

    /// Chance a player entering a pit falls in.
    pub pit_fall_chance: f64,

    /// Wumpus roams each round and eventually breeds.
    pub wandering_wumpus: bool,

    /// Rounds before the wandering Wumpus has babies.
    pub babies_after_rounds: u32,

    /// Babies born at once.
    pub baby_count: usize,

    /// Chance a baby Wumpus eats a player who enters its room.
    pub baby_kill_chance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 1,
            width: 6,
            height: 6,
            game_mode: GameMode::Normal,
            seed: 0,
            arrow_range: 3,
            starting_arrows: 0,
            bat_swarms: 2,
            pits: 2,
            arrow_caches: 2,
            pit_fall_chance: 0.5,
            wandering_wumpus: false,
            babies_after_rounds: 10,
            baby_count: 3,
            baby_kill_chance: 0.5,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn with_players(mut self, player_count: usize) -> Self {
        self.player_count = player_count;
        self
    }

    /// Set the board size as width then height.
    #[must_use]
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.game_mode = mode;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_starting_arrows(mut self, arrows: u32) -> Self {
        self.starting_arrows = arrows;
        self
    }

    /// Set how many bat swarms, pits and arrow caches to place.
    #[must_use]
    pub fn with_hazards(mut self, bat_swarms: usize, pits: usize, arrow_caches: usize) -> Self {
        self.bat_swarms = bat_swarms;
        self.pits = pits;
        self.arrow_caches = arrow_caches;
        self
    }

    #[must_use]
    pub fn with_pit_fall_chance(mut self, chance: f64) -> Self {
        self.pit_fall_chance = chance;
        self
    }

    #[must_use]
    pub fn with_wandering_wumpus(mut self, enabled: bool) -> Self {
        self.wandering_wumpus = enabled;
        self
    }

    #[must_use]
    pub fn with_baby_kill_chance(mut self, chance: f64) -> Self {
        self.baby_kill_chance = chance;
        self
    }

    /// Total rooms on the board.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.width * self.height
    }

    /// Events placed at setup: Wumpus, rope, gold and the hazards.
    #[must_use]
    pub fn event_count(&self) -> usize {
        3 + self.bat_swarms + self.pits + self.arrow_caches
    }

    /// Check every value is in range and the board can hold every event.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_count == 0 || self.player_count > MAX_PLAYERS {
            return Err(ConfigError::PlayerCount(self.player_count));
        }
        for (dimension, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_CAVE_SIZE..=MAX_CAVE_SIZE).contains(&value) {
                return Err(ConfigError::CaveSize { dimension, value });
            }
        }
        for (name, value) in [
            ("pit_fall_chance", self.pit_fall_chance),
            ("baby_kill_chance", self.baby_kill_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }
        if self.arrow_range == 0 {
            return Err(ConfigError::ArrowRange);
        }
        if self.event_count() > self.room_count() {
            return Err(ConfigError::TooManyEvents {
                rooms: self.room_count(),
                events: self.event_count(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.arrow_range, 3);
        assert_eq!(config.event_count(), 9);
    }

    #[test]
    fn test_player_count_bounds() {
        assert_eq!(
            GameConfig::default().with_players(0).validate(),
            Err(ConfigError::PlayerCount(0))
        );
        assert_eq!(
            GameConfig::default().with_players(6).validate(),
            Err(ConfigError::PlayerCount(6))
        );
        assert!(GameConfig::default().with_players(5).validate().is_ok());
    }

    #[test]
    fn test_cave_size_bounds() {
        let err = GameConfig::default().with_size(3, 10).validate();
        assert_eq!(
            err,
            Err(ConfigError::CaveSize {
                dimension: "width",
                value: 3
            })
        );
        let err = GameConfig::default().with_size(10, 31).validate();
        assert!(matches!(err, Err(ConfigError::CaveSize { dimension: "height", .. })));
    }

    #[test]
    fn test_probability_bounds() {
        let err = GameConfig::default().with_pit_fall_chance(1.5).validate();
        assert!(matches!(err, Err(ConfigError::Probability { name: "pit_fall_chance", .. })));
    }

    #[test]
    fn test_too_many_events() {
        let config = GameConfig::default().with_size(4, 4).with_hazards(5, 5, 5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyEvents { rooms: 16, events: 18 })
        );
    }

    #[test]
    fn test_game_mode_codes() {
        assert_eq!(GameMode::from_code(GameMode::Debug.code()), Some(GameMode::Debug));
        assert_eq!(GameMode::from_code(7), None);
    }

    #[test]
    fn test_serde_fills_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"player_count": 3, "game_mode": "debug"}"#).unwrap();
        assert_eq!(config.player_count, 3);
        assert_eq!(config.game_mode, GameMode::Debug);
        assert_eq!(config.width, GameConfig::default().width);
    }
}
