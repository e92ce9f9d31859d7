//! Building a fresh cave from a configuration.
//!
//! Events land in distinct random rooms: the Wumpus, the bat swarms, the
//! pits, the arrow caches and the escape rope. The gold goes last, into a
//! free room far enough from the rope that finding it takes some walking.
//! Every player starts at the rope.

use tracing::info;

use crate::core::{ConfigError, GameConfig, PlayerId, Result, RoomPos};
use crate::effects::Owned;
use crate::world::{Entity, PlayerObject};

use super::board::CaveBoard;
use super::events::{ArrowCache, BatSwarm, BottomlessPit, EscapeRope, Gold, Wumpus};
use super::objects::Adventurer;

/// Builder for a new cave game.
///
/// ```
/// use rust_wumpus::core::GameConfig;
/// use rust_wumpus::games::cave::CaveSetup;
///
/// let (board, players) = CaveSetup::new(GameConfig::default().with_players(2))
///     .build()
///     .unwrap();
/// assert_eq!(players.len(), 2);
/// assert_eq!(board.entity_count(), GameConfig::default().event_count());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CaveSetup {
    config: GameConfig,
}

impl CaveSetup {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Minimum rope-to-gold distance, in rooms walked.
    #[must_use]
    pub fn gold_distance(&self) -> usize {
        (self.config.height + self.config.width).div_ceil(4)
    }

    /// Validate the configuration, fill the cave and create the players.
    ///
    /// The players are returned rather than placed: a session hands them to
    /// the board itself when the game starts.
    pub fn build(self) -> Result<(CaveBoard, Vec<Box<dyn PlayerObject>>)> {
        let config = &self.config;
        config.validate()?;

        let mut board = CaveBoard::new(config);
        let width = config.width;
        let at = |index: usize| RoomPos::new(index / width, index % width);

        // Everything but the gold gets a distinct room up front.
        let placed = config.event_count() - 1;
        let mut rooms = board
            .rng_mut()
            .sample_indices(config.room_count(), placed)
            .into_iter()
            .map(at);
        let mut next_room = || {
            rooms
                .next()
                .ok_or(ConfigError::TooManyEvents {
                    rooms: config.room_count(),
                    events: config.event_count(),
                })
        };

        let mut events: Vec<Box<dyn Entity>> = Vec::with_capacity(config.event_count());

        let mut wumpus = Wumpus::new(board.allocate_entity(), next_room()?);
        if config.wandering_wumpus {
            wumpus = wumpus.wandering(
                config.babies_after_rounds,
                config.baby_count,
                config.baby_kill_chance,
            );
        }
        events.push(Box::new(wumpus));
        for _ in 0..config.bat_swarms {
            events.push(Box::new(BatSwarm::new(board.allocate_entity(), next_room()?)));
        }
        for _ in 0..config.pits {
            events.push(Box::new(BottomlessPit::new(
                board.allocate_entity(),
                next_room()?,
                config.pit_fall_chance,
            )));
        }
        for _ in 0..config.arrow_caches {
            events.push(Box::new(ArrowCache::new(board.allocate_entity(), next_room()?)));
        }
        let rope = next_room()?;
        events.push(Box::new(EscapeRope::new(board.allocate_entity(), rope)));

        let taken: Vec<RoomPos> = events.iter().map(|e| e.location()).collect();
        let far_rooms: Vec<RoomPos> = (0..config.room_count())
            .map(at)
            .filter(|room| !taken.contains(room) && room.distance(rope) > self.gold_distance())
            .collect();
        let gold = *board
            .rng_mut()
            .choose(&far_rooms)
            .ok_or(ConfigError::NoGoldRoom)?;
        events.push(Box::new(Gold::new(board.allocate_entity(), gold)));

        for event in events {
            board.place(Owned::Entity(event))?;
        }

        let players: Vec<Box<dyn PlayerObject>> = PlayerId::all(config.player_count)
            .map(|id| {
                Box::new(Adventurer::new(id, rope).with_arrows(config.starting_arrows))
                    as Box<dyn PlayerObject>
            })
            .collect();

        info!(
            width = config.width,
            height = config.height,
            players = players.len(),
            seed = config.seed,
            rope = %rope,
            gold = %gold,
            "cave ready"
        );
        Ok((board, players))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameMode;
    use crate::games::cave::events::BabyWumpus;
    use crate::world::Trigger;

    #[test]
    fn test_every_event_has_its_own_room() {
        let config = GameConfig::default().with_seed(3);
        let (board, _) = CaveSetup::new(config.clone()).build().unwrap();

        let mut rooms: Vec<RoomPos> = (0..config.event_count() as u32)
            .filter_map(|raw| board.entity(crate::core::EntityId::new(raw)))
            .map(|e| e.location())
            .collect();
        assert_eq!(rooms.len(), config.event_count());
        rooms.sort_unstable();
        rooms.dedup();
        assert_eq!(rooms.len(), config.event_count());
    }

    #[test]
    fn test_players_start_at_rope_and_gold_is_far() {
        for seed in 0..20 {
            let setup = CaveSetup::new(GameConfig::default().with_players(3).with_seed(seed));
            let distance = setup.gold_distance();
            let (board, players) = setup.build().unwrap();

            let rope = board.entity(board.find_entities(EscapeRope::NAME)[0]).unwrap().location();
            let gold = board
                .entity(board.find_entities(crate::world::GOLD)[0])
                .unwrap()
                .location();
            assert!(gold.distance(rope) > distance);
            assert!(players.iter().all(|p| p.location() == rope));
        }
    }

    #[test]
    fn test_same_seed_same_cave() {
        let config = GameConfig::default().with_seed(11).with_mode(GameMode::Debug);
        let (a, _) = CaveSetup::new(config.clone()).build().unwrap();
        let (b, _) = CaveSetup::new(config).build().unwrap();
        assert_eq!(
            crate::rules::StateMutator::render(&a, None),
            crate::rules::StateMutator::render(&b, None)
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = CaveSetup::new(GameConfig::default().with_players(0)).build();
        assert!(matches!(
            result,
            Err(crate::core::EngineError::Config(ConfigError::PlayerCount(0)))
        ));
    }

    #[test]
    fn test_wandering_wumpus_configured() {
        let config = GameConfig::default().with_wandering_wumpus(true);
        let (mut board, _) = CaveSetup::new(config).build().unwrap();
        assert!(board.find_entities(BabyWumpus::NAME).is_empty());

        // With the default ten rounds nothing is born on the first round.
        let start = crate::rules::StateMutator::turn_update(&mut board, PlayerId::new(0), true);
        assert_eq!(start.len(), 1);
    }
}
