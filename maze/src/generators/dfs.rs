use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::generators::{Generator, GeneratorState};
use crate::grid::{Grid, Point};
use crate::snapshot::{Snapshot, StepKind};

enum State {
    Idle,
    Running { current: Point, stack: Vec<Point> },
    Done,
}

/// Randomized depth-first carving with an explicit backtracking stack.
///
/// Walks to a random neighbor that is not in the maze yet for as long as one exists, then backs
/// up until it finds a cell with an unvisited neighbor again. Yields long winding corridors.
pub struct DepthFirst<'g, R: Rng> {
    grid: &'g mut Grid,
    rng: R,
    start: Point,
    state: State,
    steps: usize,
    highlighted: Option<Point>,
}

impl<'g, R: Rng> DepthFirst<'g, R> {
    pub fn new(grid: &'g mut Grid, rng: R) -> Self {
        Self::starting_at(grid, rng, Point::ORIGIN)
    }

    pub fn starting_at(grid: &'g mut Grid, rng: R, start: Point) -> Self {
        Self {
            grid,
            rng,
            start,
            state: State::Idle,
            steps: 0,
            highlighted: None,
        }
    }

    /// Depth of the backtracking stack, zero unless running.
    pub fn depth(&self) -> usize {
        match &self.state {
            State::Running { stack, .. } => stack.len(),
            _ => 0,
        }
    }

    fn unvisited_neighbors(&self, point: Point) -> Vec<Point> {
        self.grid
            .neighbors(point)
            .map(|(_, neighbor)| neighbor)
            .filter(|neighbor| self.grid.cell_at(*neighbor).is_some_and(|cell| !cell.in_maze))
            .collect()
    }
}

impl<'g, R: Rng> Generator for DepthFirst<'g, R> {
    fn advance(&mut self) -> Option<StepKind> {
        let (mut current, mut stack) = match std::mem::replace(&mut self.state, State::Done) {
            State::Done => return None,
            State::Idle => {
                let Some(cell) = self.grid.cell_at_mut(self.start) else {
                    debug!("dfs: start {} is outside the grid, nothing to carve", self.start);
                    return None;
                };
                cell.in_maze = true;
                debug!("dfs: started at {}", self.start);
                (self.start, Vec::new())
            }
            State::Running { current, stack } => (current, stack),
        };

        let kind = if let Some(&next) = self.unvisited_neighbors(current).choose(&mut self.rng) {
            if let Some(cell) = self.grid.cell_at_mut(next) {
                cell.in_maze = true;
            }
            if let Err(e) = self.grid.carve(current, next) {
                panic!("dfs stepped between non-adjacent cells: {}", e);
            }
            stack.push(current);
            current = next;
            StepKind::Carve
        } else if let Some(previous) = stack.pop() {
            current = previous;
            StepKind::Backtrack
        } else {
            self.grid.move_highlight(self.highlighted.take(), None);
            debug!("dfs: done after {} steps", self.steps);
            return None;
        };
        trace!("dfs step {}: {:?} to {}", self.steps, kind, current);

        self.grid.move_highlight(self.highlighted, Some(current));
        self.highlighted = Some(current);
        self.state = State::Running { current, stack };
        self.steps += 1;

        Some(kind)
    }

    fn state(&self) -> GeneratorState {
        match self.state {
            State::Idle => GeneratorState::Idle,
            State::Running { .. } => GeneratorState::Running,
            State::Done => GeneratorState::Done,
        }
    }

    fn grid(&self) -> &Grid {
        self.grid
    }
}

impl<'g, R: Rng> Iterator for DepthFirst<'g, R> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.advance()?;
        Some(Snapshot::capture(
            self.steps - 1,
            kind,
            self.highlighted,
            self.grid,
        ))
    }
}
