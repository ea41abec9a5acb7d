use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::grid::Direction;

/// A single maze cell.
///
/// Walls are stored in [`Direction::ALL`] order (`[top, right, bottom, left]`), `true` meaning
/// the wall is standing. Only the walls and `in_maze` are persisted, the remaining flags are
/// per-run search state and come back as `false` after a load.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub walls: [bool; 4],
    pub in_maze: bool,
    #[serde(skip)]
    pub visited: bool,
    #[serde(skip)]
    pub in_path: bool,
    #[serde(skip)]
    pub highlighted: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            walls: [true; 4],
            in_maze: false,
            visited: false,
            in_path: false,
            highlighted: false,
        }
    }
}

impl Cell {
    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls[direction.index()]
    }

    /// Directions in which the wall has been carved away.
    pub fn openings(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(|direction| !self.has_wall(*direction))
    }

    pub(crate) fn remove_wall(&mut self, direction: Direction) {
        self.walls[direction.index()] = false;
    }

    pub(crate) fn clear_search_flags(&mut self) {
        self.visited = false;
        self.in_path = false;
        self.highlighted = false;
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            if self.highlighted {
                "@"
            } else if self.in_path {
                "*"
            } else if self.visited {
                "."
            } else {
                " "
            }
        )
    }
}
