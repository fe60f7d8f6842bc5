//! Board coordinates.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A cell on the board. `(0, 0)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another cell.
    ///
    /// ```
    /// use pawn_tactics::core::GridPos;
    ///
    /// assert_eq!(GridPos::new(4, 5).manhattan(GridPos::new(5, 5)), 1);
    /// assert_eq!(GridPos::new(0, 0).manhattan(GridPos::new(3, -2)), 5);
    /// ```
    #[must_use]
    pub const fn manhattan(self, other: GridPos) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// The four orthogonal neighbours, bounds not checked.
    #[must_use]
    pub fn neighbors(self) -> SmallVec<[GridPos; 4]> {
        SmallVec::from_buf([
            GridPos::new(self.x, self.y - 1),
            GridPos::new(self.x + 1, self.y),
            GridPos::new(self.x, self.y + 1),
            GridPos::new(self.x - 1, self.y),
        ])
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
