use crate::cell::Cell;
use crate::grid::{Grid, Point};

/// What happened during the step that produced a [`Snapshot`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StepKind {
    /// A wall was removed and a new cell joined the maze.
    Carve,
    /// A frontier wall was discarded without carving.
    Reject,
    /// Depth-first generation stepped back to an earlier cell.
    Backtrack,
    /// A search expanded a cell.
    Visit,
    /// A search expanded the goal and marked the path.
    Solved,
}

/// The state of the whole grid right after one algorithm step.
///
/// Snapshots own a copy of the grid, so they stay valid after the run that produced them moves
/// on or is dropped.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Zero-based position of this step in its run.
    pub step: usize,
    pub kind: StepKind,
    /// The highlighted cell, if any.
    pub current: Option<Point>,
    pub grid: Grid,
}

impl Snapshot {
    pub(crate) fn capture(
        step: usize,
        kind: StepKind,
        current: Option<Point>,
        grid: &Grid,
    ) -> Self {
        Self {
            step,
            kind,
            current,
            grid: grid.clone(),
        }
    }

    pub fn cell_at(&self, point: Point) -> Option<&Cell> {
        self.grid.cell_at(point)
    }
}
