//! Grid positions and movement directions.

use serde::{Deserialize, Serialize};

/// A room on the cave grid, addressed by row then column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomPos {
    pub row: usize,
    pub col: usize,
}

impl RoomPos {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another room.
    #[must_use]
    pub fn distance(self, other: RoomPos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The neighbouring room in `direction` on a `height` x `width` grid.
    ///
    /// Moving off the edge of the grid stays in place.
    ///
    /// ```
    /// use rust_wumpus::core::{Direction, RoomPos};
    ///
    /// let corner = RoomPos::new(0, 0);
    /// assert_eq!(corner.step(Direction::Up, 4, 4), corner);
    /// assert_eq!(corner.step(Direction::Right, 4, 4), RoomPos::new(0, 1));
    /// ```
    #[must_use]
    pub fn step(self, direction: Direction, height: usize, width: usize) -> RoomPos {
        let mut next = self;
        match direction {
            Direction::Up if next.row > 0 => next.row -= 1,
            Direction::Down if next.row + 1 < height => next.row += 1,
            Direction::Left if next.col > 0 => next.col -= 1,
            Direction::Right if next.col + 1 < width => next.col += 1,
            _ => {}
        }
        next
    }
}

impl std::fmt::Display for RoomPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four grid directions.
///
/// Directions travel inside effects as their integer code in `info`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in code order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Integer code carried in an effect's `info` field.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Decode a direction from an effect's `info` field.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Direction> {
        match code {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }
}
