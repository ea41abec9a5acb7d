use log::{debug, trace};
use rand::Rng;

use crate::generators::{Generator, GeneratorState};
use crate::grid::{Direction, Grid, Point};
use crate::snapshot::{Snapshot, StepKind};

/// A frontier wall: the `direction` side of `cell`, not yet resolved.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WallCandidate {
    pub cell: Point,
    pub direction: Direction,
}

/// Maze membership of the two cells on either side of a candidate wall.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Membership {
    BothOutside,
    /// Exactly one side is in the maze, the other one is carried here.
    OneOutside(Point),
    BothInside,
}

/// Randomized Prim's algorithm.
///
/// Keeps a bag of frontier walls. Every step draws one uniformly at random, removes it, and
/// carves through it only when it separates the maze from a cell that is not in the maze yet.
/// Produces short, bushy dead ends.
pub struct Prim<'g, R: Rng> {
    grid: &'g mut Grid,
    rng: R,
    start: Point,
    frontier: Vec<WallCandidate>,
    state: GeneratorState,
    steps: usize,
    highlighted: Option<Point>,
}

impl<'g, R: Rng> Prim<'g, R> {
    pub fn new(grid: &'g mut Grid, rng: R) -> Self {
        Self::starting_at(grid, rng, Point::ORIGIN)
    }

    pub fn starting_at(grid: &'g mut Grid, rng: R, start: Point) -> Self {
        Self {
            grid,
            rng,
            start,
            frontier: Vec::new(),
            state: GeneratorState::Idle,
            steps: 0,
            highlighted: None,
        }
    }

    /// Walls still waiting to be resolved.
    pub fn frontier(&self) -> &[WallCandidate] {
        &self.frontier
    }

    fn begin(&mut self) -> bool {
        let Some(cell) = self.grid.cell_at_mut(self.start) else {
            debug!("prim: start {} is outside the grid, nothing to carve", self.start);
            self.state = GeneratorState::Done;
            return false;
        };
        cell.in_maze = true;

        let start = self.start;
        self.frontier
            .extend(Direction::ALL.map(|direction| WallCandidate { cell: start, direction }));
        self.state = GeneratorState::Running;
        debug!("prim: started at {}", start);
        true
    }

    fn in_maze(&self, point: Point) -> bool {
        self.grid.cell_at(point).is_some_and(|cell| cell.in_maze)
    }

    fn classify(&self, a: Point, b: Point) -> Membership {
        match (self.in_maze(a), self.in_maze(b)) {
            (true, true) => Membership::BothInside,
            (true, false) => Membership::OneOutside(b),
            (false, true) => Membership::OneOutside(a),
            (false, false) => Membership::BothOutside,
        }
    }

    fn resolve(&mut self, candidate: WallCandidate) -> (StepKind, Point) {
        let Some(neighbor) = self.grid.neighbor(candidate.cell, candidate.direction) else {
            return (StepKind::Reject, candidate.cell);
        };

        let outside = match self.classify(candidate.cell, neighbor) {
            Membership::OneOutside(outside) => outside,
            Membership::BothOutside | Membership::BothInside => {
                return (StepKind::Reject, candidate.cell)
            }
        };

        if let Err(e) = self.grid.carve(candidate.cell, neighbor) {
            panic!("prim frontier held a wall between non-adjacent cells: {}", e);
        }
        if let Some(cell) = self.grid.cell_at_mut(outside) {
            cell.in_maze = true;
        }

        // the wall just carved faces back into the maze, every other side joins the frontier
        let carved = if outside == neighbor {
            candidate.direction.opposite()
        } else {
            candidate.direction
        };
        self.frontier.extend(
            Direction::ALL
                .into_iter()
                .filter(|direction| *direction != carved)
                .map(|direction| WallCandidate {
                    cell: outside,
                    direction,
                }),
        );

        (StepKind::Carve, outside)
    }
}

impl<'g, R: Rng> Generator for Prim<'g, R> {
    fn advance(&mut self) -> Option<StepKind> {
        match self.state {
            GeneratorState::Done => return None,
            GeneratorState::Idle => {
                if !self.begin() {
                    return None;
                }
            }
            GeneratorState::Running => {}
        }

        if self.frontier.is_empty() {
            self.state = GeneratorState::Done;
            return None;
        }

        let index = self.rng.gen_range(0..self.frontier.len());
        let candidate = self.frontier.swap_remove(index);
        let (kind, current) = self.resolve(candidate);
        trace!(
            "prim step {}: {:?} {} wall of {}",
            self.steps,
            kind,
            candidate.direction,
            candidate.cell
        );

        if self.frontier.is_empty() {
            self.grid.move_highlight(self.highlighted.take(), None);
            self.state = GeneratorState::Done;
            debug!("prim: done after {} steps", self.steps + 1);
        } else {
            self.grid.move_highlight(self.highlighted, Some(current));
            self.highlighted = Some(current);
        }
        self.steps += 1;

        Some(kind)
    }

    fn state(&self) -> GeneratorState {
        self.state
    }

    fn grid(&self) -> &Grid {
        self.grid
    }
}

impl<'g, R: Rng> Iterator for Prim<'g, R> {
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
