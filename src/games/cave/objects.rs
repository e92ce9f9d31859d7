//! The movable objects of the cave: adventurers and arrows.

use crate::core::{Direction, Mover, PlayerId, RoomPos, TriggerId};
use crate::rules::key;
use crate::world::{Inventory, ItemStack, Motion, PlayerObject, Trigger, ARROWS};

/// Board symbols handed out to players in seat order.
pub const PLAYER_SYMBOLS: [char; 5] = ['*', '~', '@', '^', '&'];

/// A person exploring the cave.
#[derive(Clone, Debug)]
pub struct Adventurer {
    id: PlayerId,
    name: String,
    symbol: Option<char>,
    motion: Motion,
    inventory: Inventory,
}

impl Adventurer {
    /// An adventurer standing at `location` with empty pockets.
    #[must_use]
    pub fn new(id: PlayerId, location: RoomPos) -> Self {
        Self {
            id,
            name: id.to_string(),
            symbol: Some(PLAYER_SYMBOLS[id.index() % PLAYER_SYMBOLS.len()]),
            motion: Motion::at(location),
            inventory: Inventory::new(),
        }
    }

    #[must_use]
    pub fn with_arrows(mut self, arrows: u32) -> Self {
        if arrows > 0 {
            self.inventory.add(ItemStack::new(ARROWS, arrows));
        }
        self
    }
}

impl Trigger for Adventurer {
    fn mover(&self) -> Mover {
        Mover::Player(self.id)
    }

    fn name(&self) -> &str {
        &self.name
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

impl PlayerObject for Adventurer {
    fn player_id(&self) -> PlayerId {
        self.id
    }

    fn symbol(&self) -> Option<char> {
        self.symbol
    }

    fn hide(&mut self) {
        self.symbol = None;
    }

    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    fn to_direction(&self, input: i32) -> Option<Direction> {
        match input {
            i if i == key('w') => Some(Direction::Up),
            i if i == key('a') => Some(Direction::Left),
            i if i == key('s') => Some(Direction::Down),
            i if i == key('d') => Some(Direction::Right),
            _ => None,
        }
    }

    fn action_help(&self) -> String {
        "w: Move Up\na: Move Left\ns: Move Down\nd: Move Right\nspace: Fire an Arrow\nh: Help\n"
            .to_string()
    }

    fn direction_help(&self) -> String {
        "w: Up\na: Left\ns: Down\nd: Right\nh: Help\n".to_string()
    }

    fn clone_player(&self) -> Box<dyn PlayerObject> {
        Box::new(self.clone())
    }
}

/// A fired arrow. Flies in a straight line and sets off what it passes.
#[derive(Clone, Debug)]
pub struct Arrow {
    id: TriggerId,
    motion: Motion,
}

impl Arrow {
    pub const NAME: &'static str = "Arrow";

    #[must_use]
    pub fn new(id: TriggerId, location: RoomPos) -> Self {
        Self {
            id,
            motion: Motion::at(location),
        }
    }
}

impl Trigger for Arrow {
    fn mover(&self) -> Mover {
        Mover::Trigger(self.id)
    }

    fn name(&self) -> &str {
        Self::NAME
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
