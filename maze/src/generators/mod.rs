pub mod dfs;
pub mod prim;

use std::fmt::Display;
use std::str::FromStr;

use rand::Rng;

use crate::error::MazeError;
use crate::grid::Grid;
use crate::snapshot::{Snapshot, StepKind};

pub use dfs::DepthFirst;
pub use prim::{Prim, WallCandidate};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GeneratorState {
    Idle,
    Running,
    Done,
}

/// A maze generator carving walls into a borrowed [`Grid`] one step at a time.
///
/// Iterating yields a [`Snapshot`] after every step. The sequence is single pass: once it
/// returns `None` the generator stays [`GeneratorState::Done`]. Dropping a generator early
/// leaves the grid consistent, just not fully carved.
pub trait Generator: Iterator<Item = Snapshot> {
    /// Performs one step without taking a snapshot. Returns `None` once the maze is complete.
    fn advance(&mut self) -> Option<StepKind>;

    fn state(&self) -> GeneratorState;

    fn grid(&self) -> &Grid;

    fn is_done(&self) -> bool {
        self.state() == GeneratorState::Done
    }

    /// Runs the remaining steps and returns how many there were.
    fn finish(&mut self) -> usize {
        let mut steps = 0;
        while self.advance().is_some() {
            steps += 1;
        }
        steps
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GeneratorKind {
    Prim,
    Dfs,
}

impl GeneratorKind {
    pub fn build<'g, R: Rng + 'g>(self, grid: &'g mut Grid, rng: R) -> Box<dyn Generator + 'g> {
        match self {
            GeneratorKind::Prim => Box::new(Prim::new(grid, rng)),
            GeneratorKind::Dfs => Box::new(DepthFirst::new(grid, rng)),
        }
    }
}

impl Display for GeneratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                GeneratorKind::Prim => "prim",
                GeneratorKind::Dfs => "dfs",
            }
        )
    }
}

impl FromStr for GeneratorKind {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prim" | "prims" => Ok(GeneratorKind::Prim),
            "dfs" => Ok(GeneratorKind::Dfs),
            _ => Err(MazeError::Parse(format!("generator name {:?}", s))),
        }
    }
}
