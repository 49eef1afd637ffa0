//! Grid coordinates.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A square on the board, addressed by column `x` and row `y`.
///
/// Coordinates are signed so that out-of-bounds requests (including
/// negative ones) can be represented and rejected rather than wrapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbours in fixed order: up, down, left, right.
    ///
    /// Not filtered by bounds; see `Board::adjacent_positions`. Neighbours
    /// past the `i32` range are omitted.
    #[must_use]
    pub fn neighbours(self) -> SmallVec<[Position; 4]> {
        [
            self.y.checked_sub(1).map(|y| Position::new(self.x, y)),
            self.y.checked_add(1).map(|y| Position::new(self.x, y)),
            self.x.checked_sub(1).map(|x| Position::new(x, self.y)),
            self.x.checked_add(1).map(|x| Position::new(x, self.y)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Check whether `other` shares an edge with this position.
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y)) == 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
