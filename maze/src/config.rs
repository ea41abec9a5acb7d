use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{MazeError, MazeResult};
use crate::grid::{Grid, Point};

/// Inputs of a generate-then-solve run.
///
/// `start` and `goal` default to the top left and bottom right corners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub rows: usize,
    pub columns: usize,
    pub start: Option<Point>,
    pub goal: Option<Point>,
    pub seed: u64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            columns: 20,
            start: None,
            goal: None,
            seed: 0,
        }
    }
}

impl MazeConfig {
    pub fn new(rows: usize, columns: usize, seed: u64) -> Self {
        Self {
            rows,
            columns,
            seed,
            ..Default::default()
        }
    }

    /// Reads a TOML file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> MazeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MazeConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn start(&self) -> Point {
        self.start.unwrap_or(Point::ORIGIN)
    }

    pub fn goal(&self) -> Point {
        self.goal.unwrap_or(Point {
            row: self.rows.saturating_sub(1),
            col: self.columns.saturating_sub(1),
        })
    }

    pub fn validate(&self) -> MazeResult<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(MazeError::MalformedGrid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.rows, self.columns
            )));
        }

        for point in [self.start(), self.goal()] {
            if point.row >= self.rows || point.col >= self.columns {
                return Err(MazeError::OutOfBounds { point });
            }
        }

        Ok(())
    }

    /// A fully walled grid of the configured size.
    pub fn grid(&self) -> Grid {
        Grid::new(self.rows, self.columns)
    }

    /// The random source for one generator run.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}
